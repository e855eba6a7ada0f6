use std::sync::Arc;

use anyhow::{Error, Result, anyhow};
use tracing::{debug, error, info, warn};

use crate::{
    clients::{notify::NotifySender, query::DataQueryService},
    errors::ScenarioError,
    models::{
        audit::DeliveryAudit, event::NotificationEvent, notify::NotifyReference,
        receipt::DeliveryReceipt,
    },
    scenarios::{
        ScenarioDeps,
        resolver::{EventCategory, ScenarioResolver},
        whitelist::{Settings, SettingsRegistry},
    },
};

pub const NOTHING_TO_SEND: &str = "The party does not want to be notified, nothing was sent.";

/// Final result of one event, ready to be mapped onto a protocol response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Processed { message: String, sent: usize },
    Aborted(String),
    Failed(String),
    NotImplemented(String),
}

/// Runs inbound events through the scenario pipeline.
pub struct EventProcessor {
    settings: Arc<SettingsRegistry>,
    resolver: Arc<ScenarioResolver>,
    query_service: Arc<dyn DataQueryService>,
    sender: Arc<dyn NotifySender>,
}

impl EventProcessor {
    pub fn new(
        settings: Arc<SettingsRegistry>,
        resolver: Arc<ScenarioResolver>,
        query_service: Arc<dyn DataQueryService>,
        sender: Arc<dyn NotifySender>,
    ) -> Self {
        Self {
            settings,
            resolver,
            query_service,
            sender,
        }
    }

    pub fn resolver(&self) -> &ScenarioResolver {
        &self.resolver
    }

    fn deps(&self, settings: &Settings) -> ScenarioDeps {
        ScenarioDeps {
            config: Arc::clone(&settings.config),
            whitelists: Arc::clone(&settings.whitelists),
            sender: Arc::clone(&self.sender),
        }
    }

    pub async fn handle_event(&self, event: &NotificationEvent) -> EventOutcome {
        info!(event = %event, "Processing notification event");

        let settings = self.settings.current();
        let query = self.query_service.from(event);

        let category = match EventCategory::classify(event, &settings.config, query.as_ref()).await
        {
            Ok(category) => category,
            Err(e) => {
                warn!(event = %event, error = %e, "Event could not be classified");
                return EventOutcome::Failed(e.to_string());
            }
        };

        let scenario = self.resolver.resolve(category);
        let deps = self.deps(&settings);

        let gathered = match scenario.try_get_data(&deps, event, query.as_ref()).await {
            Ok(gathered) => gathered,
            Err(ScenarioError::Aborted(signal)) => return EventOutcome::Aborted(signal.message()),
            Err(e @ ScenarioError::NotImplemented(_)) => {
                return EventOutcome::NotImplemented(e.to_string());
            }
        };

        if !gathered.success {
            return EventOutcome::Failed(gathered.message);
        }

        if gathered.content.is_empty() {
            info!(scenario = scenario.name(), "No distribution channel chosen, nothing to send");
            return EventOutcome::Processed {
                message: NOTHING_TO_SEND.to_string(),
                sent: 0,
            };
        }

        let sent = gathered.content.len();
        match scenario
            .process_data(
                &deps,
                event,
                query.as_ref(),
                &gathered.content,
                gathered.follow_up,
            )
            .await
        {
            Ok(processed) if processed.success => EventOutcome::Processed {
                message: processed.message,
                sent,
            },
            Ok(processed) => EventOutcome::Failed(processed.message),
            Err(ScenarioError::Aborted(signal)) => EventOutcome::Aborted(signal.message()),
            Err(e @ ScenarioError::NotImplemented(_)) => {
                EventOutcome::NotImplemented(e.to_string())
            }
        }
    }
}

/// Correlates a provider delivery receipt with the event it originated from.
pub fn reconcile_receipt(receipt: &DeliveryReceipt) -> Result<DeliveryAudit, Error> {
    let encoded = receipt
        .reference
        .as_deref()
        .ok_or_else(|| anyhow!("Delivery receipt {} carries no reference", receipt.id))?;
    let reference = NotifyReference::decode(encoded)?;

    let mut audit = DeliveryAudit::new(
        receipt.id,
        receipt.notification_type,
        receipt.status,
        reference.resource_uri,
        reference.party_id,
    )
    .with_case(reference.case_uri)
    .with_completed_at(receipt.completed_at);

    if receipt.status.is_failure() {
        audit = audit.with_error(format!("Notify reported delivery status {}", receipt.status));
        error!(
            notification_id = %audit.notification_id,
            method = %audit.method,
            status = %audit.status,
            resource = %audit.resource_uri,
            "Notification was not delivered"
        );
    } else if !receipt.status.is_final() {
        debug!(
            notification_id = %audit.notification_id,
            method = %audit.method,
            status = %audit.status,
            resource = %audit.resource_uri,
            "Interim delivery receipt, waiting for the final status"
        );
    } else {
        info!(
            notification_id = %audit.notification_id,
            method = %audit.method,
            status = %audit.status,
            resource = %audit.resource_uri,
            "Delivery receipt reconciled"
        );
    }

    Ok(audit)
}
