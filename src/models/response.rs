use serde::Serialize;

use crate::models::{
    domain::{Case, Decision, DecisionType},
    notify::NotifyData,
    party::PartyData,
};

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message,
        }
    }

    pub fn error(error: String, message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            message,
        }
    }
}

/// Outcome of gathering data for one event.
///
/// `follow_up` carries whatever the scenario needs after sending; it is handed
/// back to `process_data` by the caller instead of being kept on the scenario.
#[derive(Debug, Clone)]
pub struct GettingDataResponse {
    pub success: bool,
    pub message: String,
    pub content: Vec<NotifyData>,
    pub follow_up: FollowUp,
}

impl GettingDataResponse {
    pub fn success(content: Vec<NotifyData>, follow_up: FollowUp) -> Self {
        Self {
            success: true,
            message: "data gathered".to_string(),
            content,
            follow_up,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            content: Vec::new(),
            follow_up: FollowUp::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessingDataResponse {
    pub success: bool,
    pub message: String,
}

impl ProcessingDataResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Per-event context a scenario needs once the notifications went out.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FollowUp {
    #[default]
    None,
    DecisionAudit(DecisionContext),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionContext {
    pub case: Case,
    pub decision: Decision,
    pub decision_type: DecisionType,
    pub party: PartyData,
}
