use anyhow::{Error, Result};
use async_trait::async_trait;

use crate::models::{
    domain::{
        Case, CaseStatus, CaseStatusType, CaseType, Decision, DecisionResource, DecisionType,
        InfoObject, MessageObject, TaskObject,
    },
    event::NotificationEvent,
    party::PartyData,
};

/// Hands out a query context bound to a single event.
pub trait DataQueryService: Send + Sync {
    fn from(&self, event: &NotificationEvent) -> Box<dyn QueryContext>;
}

/// Domain questions a scenario can ask the external registries.
///
/// Methods without a URI argument resolve against the resource of the event
/// the context was created for.
#[async_trait]
pub trait QueryContext: Send + Sync {
    async fn get_case(&self, case_uri: &str) -> Result<Case, Error>;

    async fn get_case_type(&self, case_type_uri: &str) -> Result<CaseType, Error>;

    async fn get_case_statuses(&self, case_uri: &str) -> Result<Vec<CaseStatus>, Error>;

    async fn get_case_status_type(&self, status_type_uri: &str) -> Result<CaseStatusType, Error>;

    /// Status resource the event points at.
    async fn get_event_status(&self) -> Result<CaseStatus, Error>;

    async fn get_party_data(
        &self,
        case_uri: Option<&str>,
        citizen_number: Option<&str>,
    ) -> Result<PartyData, Error>;

    async fn get_decision_resource(&self) -> Result<DecisionResource, Error>;

    async fn get_info_object(&self, info_object_uri: &str) -> Result<InfoObject, Error>;

    async fn get_decision(&self, decision_uri: &str) -> Result<Decision, Error>;

    async fn get_decision_type(&self, decision_type_uri: &str) -> Result<DecisionType, Error>;

    /// Documents attached to a decision.
    async fn get_documents(&self, decision_uri: &str) -> Result<Vec<InfoObject>, Error>;

    async fn get_task(&self) -> Result<TaskObject, Error>;

    async fn get_message(&self) -> Result<MessageObject, Error>;

    async fn create_object(&self, data: serde_json::Value) -> Result<(), Error>;
}
