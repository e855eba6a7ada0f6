use std::collections::HashMap;

use anyhow::{Error, Result};
use tracing::{debug, info};

use crate::{
    clients::query::QueryContext,
    config::{Config, WorkflowVersion},
    models::event::{EventAction, EventChannel, EventResource, NotificationEvent},
    scenarios::{
        Scenario, case_closed::CaseClosedScenario, case_created::CaseCreatedScenario,
        case_status_updated::CaseStatusUpdatedScenario, decision_made::DecisionMadeScenario,
        message_received::MessageReceivedScenario, not_implemented::NotImplementedScenario,
        task_assigned::TaskAssignedScenario,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    CaseCreated,
    CaseStatusUpdated,
    CaseClosed,
    TaskAssigned,
    DecisionMade,
    MessageReceived,
    Unsupported,
}

impl EventCategory {
    /// Determines the category of an event.
    ///
    /// Status events need one lookup to tell a final status apart from an
    /// intermediate one; every other category follows from the event alone.
    pub async fn classify(
        event: &NotificationEvent,
        config: &Config,
        query: &dyn QueryContext,
    ) -> Result<Self, Error> {
        let category = match (event.channel, event.resource, event.action) {
            (EventChannel::Zaken, EventResource::Zaak, EventAction::Create) => {
                EventCategory::CaseCreated
            }
            (EventChannel::Zaken, EventResource::Status, EventAction::Create) => {
                let status = query.get_event_status().await?;
                let status_type = query.get_case_status_type(&status.status_type_uri).await?;

                if status_type.is_final {
                    EventCategory::CaseClosed
                } else {
                    EventCategory::CaseStatusUpdated
                }
            }
            (EventChannel::Objecten, EventResource::Object, EventAction::Create) => {
                Self::classify_object(event, config)
            }
            (EventChannel::Besluiten, EventResource::DecisionInfoObject, EventAction::Create) => {
                EventCategory::DecisionMade
            }
            _ => EventCategory::Unsupported,
        };

        debug!(event = %event, category = ?category, "Event classified");
        Ok(category)
    }

    fn classify_object(event: &NotificationEvent, config: &Config) -> Self {
        match event.object_type_uuid() {
            Some(uuid) if uuid.eq_ignore_ascii_case(&config.object_type_task_uuid) => {
                EventCategory::TaskAssigned
            }
            Some(uuid) if uuid.eq_ignore_ascii_case(&config.object_type_message_uuid) => {
                EventCategory::MessageReceived
            }
            _ => EventCategory::Unsupported,
        }
    }
}

/// Maps event categories to scenarios for one workflow version.
///
/// Built once at startup; resolving is a lookup.
pub struct ScenarioResolver {
    version: WorkflowVersion,
    scenarios: HashMap<EventCategory, Scenario>,
    not_implemented: Scenario,
}

impl ScenarioResolver {
    pub fn new(version: WorkflowVersion) -> Self {
        let mut scenarios = HashMap::new();
        scenarios.insert(EventCategory::CaseCreated, Scenario::new(CaseCreatedScenario));
        scenarios.insert(
            EventCategory::CaseStatusUpdated,
            Scenario::new(CaseStatusUpdatedScenario),
        );
        scenarios.insert(EventCategory::CaseClosed, Scenario::new(CaseClosedScenario));
        scenarios.insert(EventCategory::TaskAssigned, Scenario::new(TaskAssignedScenario));
        scenarios.insert(EventCategory::DecisionMade, Scenario::new(DecisionMadeScenario));

        // Inbox messages only exist in the second workflow.
        match version {
            WorkflowVersion::V1 => {}
            WorkflowVersion::V2 => {
                scenarios.insert(
                    EventCategory::MessageReceived,
                    Scenario::new(MessageReceivedScenario),
                );
            }
        }

        info!(workflow_version = %version, scenarios = scenarios.len(), "Scenarios registered");

        Self {
            version,
            scenarios,
            not_implemented: Scenario::new(NotImplementedScenario),
        }
    }

    pub fn resolve(&self, category: EventCategory) -> Scenario {
        self.scenarios
            .get(&category)
            .unwrap_or(&self.not_implemented)
            .clone()
    }

    pub fn version(&self) -> WorkflowVersion {
        self.version
    }
}
