use std::{
    collections::HashMap,
    fmt::{Display, Formatter, Result as FmtResult},
};

use anyhow::{Error, Result, anyhow};
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyMethod {
    Email,
    Sms,
}

impl Display for NotifyMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            NotifyMethod::Email => write!(f, "email"),
            NotifyMethod::Sms => write!(f, "sms"),
        }
    }
}

/// Partition of the configured templates, one per scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    CaseCreate,
    CaseUpdate,
    CaseClose,
    TaskAssigned,
    DecisionMade,
    MessageReceived,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 6] = [
        TemplateKind::CaseCreate,
        TemplateKind::CaseUpdate,
        TemplateKind::CaseClose,
        TemplateKind::TaskAssigned,
        TemplateKind::DecisionMade,
        TemplateKind::MessageReceived,
    ];
}

impl Display for TemplateKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            TemplateKind::CaseCreate => "case_create",
            TemplateKind::CaseUpdate => "case_update",
            TemplateKind::CaseClose => "case_close",
            TemplateKind::TaskAssigned => "task_assigned",
            TemplateKind::DecisionMade => "decision_made",
            TemplateKind::MessageReceived => "message_received",
        };
        write!(f, "{}", name)
    }
}

/// Template substitution values. Every value is a JSON string.
pub type Personalization = HashMap<String, serde_json::Value>;

/// One fully assembled outbound notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifyData {
    pub method: NotifyMethod,
    pub contact_details: String,
    pub template_id: Uuid,
    pub personalization: Personalization,
    pub reference: NotifyReference,
}

/// Correlates a delivery receipt with the event, case and party it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifyReference {
    #[serde(rename = "resource")]
    pub resource_uri: String,

    #[serde(rename = "event_created_at")]
    pub event_created_at: DateTime<Utc>,

    #[serde(rename = "case", skip_serializing_if = "Option::is_none", default)]
    pub case_uri: Option<String>,

    #[serde(rename = "party")]
    pub party_id: String,
}

impl NotifyReference {
    /// Encodes the reference into the opaque string handed to the provider.
    pub fn encode(&self) -> Result<String, Error> {
        let json = serde_json::to_vec(self)?;
        Ok(STANDARD.encode(json))
    }

    pub fn decode(encoded: &str) -> Result<Self, Error> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| anyhow!("Reference is not valid base64: {}", e))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| anyhow!("Reference is not a valid notify reference: {}", e))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplatePreview {
    pub subject: String,
    pub body: String,
}
