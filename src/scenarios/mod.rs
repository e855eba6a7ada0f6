//! Scenario pipeline.
//!
//! Every event category is handled by a [`ScenarioStrategy`]: it runs the
//! business gates, fetches the domain data and produces the personalization.
//! [`Scenario`] wraps a strategy in the fixed two-phase protocol:
//!
//! 1. [`Scenario::try_get_data`] gathers, routes and builds the `NotifyData`.
//! 2. The caller hands that data, plus the returned [`FollowUp`], to
//!    [`Scenario::process_data`], which sends and runs any follow-up work.
//!
//! Strategies hold no per-event state, so one instance serves all events.

use std::sync::Arc;

use anyhow::{Error, Result};
use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::{
    clients::{notify::NotifySender, query::QueryContext},
    config::Config,
    errors::{DATA_PROCESSED, MISSING_DATA, ScenarioError, StepError},
    models::{
        event::NotificationEvent,
        notify::{NotifyData, NotifyMethod, NotifyReference, Personalization, TemplateKind},
        party::PreparedData,
        response::{FollowUp, GettingDataResponse, ProcessingDataResponse},
    },
};

pub mod builder;
pub mod case_closed;
pub mod case_created;
pub mod case_status_updated;
pub mod channel;
mod common;
pub mod decision_made;
pub mod message_received;
pub mod not_implemented;
pub mod resolver;
pub mod task_assigned;
pub mod whitelist;

use builder::NotifyDataBuilder;
use whitelist::Whitelists;

/// Long-lived collaborators shared by all events.
#[derive(Clone)]
pub struct ScenarioDeps {
    pub config: Arc<Config>,
    pub whitelists: Arc<Whitelists>,
    pub sender: Arc<dyn NotifySender>,
}

/// What a strategy hands back once all of its gates passed.
#[derive(Debug, Clone)]
pub struct Gathered {
    pub kind: TemplateKind,
    pub prepared: PreparedData,
    pub personalization: Personalization,
    pub follow_up: FollowUp,
}

#[async_trait]
pub trait ScenarioStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fails for strategies that must never handle an event.
    fn ensure_implemented(&self, _event: &NotificationEvent) -> Result<(), ScenarioError> {
        Ok(())
    }

    /// Runs the gates in order and collects the data to notify with.
    ///
    /// Gates must be evaluated before any query they make redundant.
    async fn gather(
        &self,
        deps: &ScenarioDeps,
        event: &NotificationEvent,
        query: &dyn QueryContext,
    ) -> Result<Gathered, StepError>;

    /// Work that has to happen after every notification was accepted.
    async fn after_send(
        &self,
        _deps: &ScenarioDeps,
        _query: &dyn QueryContext,
        _notify_data: &[NotifyData],
        _follow_up: FollowUp,
    ) -> Result<(), Error> {
        Ok(())
    }
}

/// A strategy behind the two-phase protocol. Cheap to clone.
#[derive(Clone)]
pub struct Scenario {
    strategy: Arc<dyn ScenarioStrategy>,
}

impl Scenario {
    pub fn new(strategy: impl ScenarioStrategy + 'static) -> Self {
        Self {
            strategy: Arc::new(strategy),
        }
    }

    pub fn name(&self) -> &'static str {
        self.strategy.name()
    }

    pub async fn try_get_data(
        &self,
        deps: &ScenarioDeps,
        event: &NotificationEvent,
        query: &dyn QueryContext,
    ) -> Result<GettingDataResponse, ScenarioError> {
        self.strategy.ensure_implemented(event)?;

        let gathered = match self.strategy.gather(deps, event, query).await {
            Ok(gathered) => gathered,
            Err(StepError::Abort(signal)) => {
                info!(scenario = self.name(), reason = signal.reason(), "Notifying aborted");
                return Err(ScenarioError::Aborted(signal));
            }
            Err(StepError::NotImplemented) => {
                return Err(ScenarioError::NotImplemented(event.to_string()));
            }
            Err(StepError::Failure(e)) => {
                warn!(scenario = self.name(), error = %e, "Gathering data failed");
                return Ok(GettingDataResponse::failure(e.to_string()));
            }
        };

        let party = &gathered.prepared.party;
        let routed = match channel::route(party.distribution_channel, party) {
            Ok(routed) => routed,
            Err(e) => {
                warn!(
                    scenario = self.name(),
                    party = %party.id,
                    "Distribution channel of party is unknown"
                );
                return Ok(GettingDataResponse::failure(e.to_string()));
            }
        };

        let reference = NotifyReference {
            resource_uri: event.resource_uri.clone(),
            event_created_at: event.created_at,
            case_uri: gathered.prepared.case_uri.clone(),
            party_id: party.id.clone(),
        };

        let builder = NotifyDataBuilder::new(&deps.config, gathered.kind, reference);
        match builder.build_all(routed, &gathered.personalization) {
            Ok(content) => {
                debug!(
                    scenario = self.name(),
                    count = content.len(),
                    "Notify data prepared"
                );
                Ok(GettingDataResponse::success(content, gathered.follow_up))
            }
            Err(e) => {
                error!(scenario = self.name(), error = %e, "Building notify data failed");
                Ok(GettingDataResponse::failure(e.to_string()))
            }
        }
    }

    pub async fn process_data(
        &self,
        deps: &ScenarioDeps,
        event: &NotificationEvent,
        query: &dyn QueryContext,
        notify_data: &[NotifyData],
        follow_up: FollowUp,
    ) -> Result<ProcessingDataResponse, ScenarioError> {
        self.strategy.ensure_implemented(event)?;

        if notify_data.is_empty() {
            error!(scenario = self.name(), "Processing was requested without notify data");
            return Ok(ProcessingDataResponse::failure(MISSING_DATA));
        }

        for data in notify_data {
            let sent = match data.method {
                NotifyMethod::Email => deps.sender.send_email(data).await,
                NotifyMethod::Sms => deps.sender.send_sms(data).await,
            };

            if let Err(e) = sent {
                error!(
                    scenario = self.name(),
                    method = %data.method,
                    error = %e,
                    "Sending notification failed"
                );
                return Ok(ProcessingDataResponse::failure(e.to_string()));
            }
        }

        if let Err(e) = self
            .strategy
            .after_send(deps, query, notify_data, follow_up)
            .await
        {
            error!(scenario = self.name(), error = %e, "Post-processing failed after sending");
            return Ok(ProcessingDataResponse::failure(e.to_string()));
        }

        info!(
            scenario = self.name(),
            count = notify_data.len(),
            "Notifications processed"
        );
        Ok(ProcessingDataResponse::success(DATA_PROCESSED))
    }
}
