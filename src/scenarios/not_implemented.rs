use async_trait::async_trait;
use tracing::error;

use crate::{
    clients::query::QueryContext,
    errors::{ScenarioError, StepError},
    models::event::NotificationEvent,
    scenarios::{Gathered, ScenarioDeps, ScenarioStrategy},
};

/// Fallback for events no scenario handles. Every operation fails.
pub struct NotImplementedScenario;

#[async_trait]
impl ScenarioStrategy for NotImplementedScenario {
    fn name(&self) -> &'static str {
        "not_implemented"
    }

    fn ensure_implemented(&self, event: &NotificationEvent) -> Result<(), ScenarioError> {
        error!(event = %event, "No scenario is implemented for this event");
        Err(ScenarioError::NotImplemented(event.to_string()))
    }

    async fn gather(
        &self,
        _deps: &ScenarioDeps,
        _event: &NotificationEvent,
        _query: &dyn QueryContext,
    ) -> Result<Gathered, StepError> {
        Err(StepError::NotImplemented)
    }
}
