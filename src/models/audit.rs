use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    domain::{Identification, IdentificationKind},
    notify::NotifyMethod,
    status::DeliveryStatus,
};

/// Inbox message persisted after a decision notification went out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageAuditObject {
    #[serde(rename = "onderwerp")]
    pub subject: String,

    #[serde(rename = "berichtTekst")]
    pub body: String,

    #[serde(rename = "publicatiedatum")]
    pub published_at: DateTime<Utc>,

    #[serde(rename = "referentie")]
    pub reference: String,

    #[serde(rename = "bijlages")]
    pub attachments: Vec<String>,

    #[serde(rename = "handelingsperspectief")]
    pub action_perspective: String,

    #[serde(rename = "berichtType")]
    pub message_type: String,

    #[serde(rename = "isGeopend")]
    pub is_opened: bool,

    #[serde(rename = "identificatie")]
    pub identification: Identification,
}

impl MessageAuditObject {
    pub fn new(
        subject: String,
        body: String,
        reference: String,
        citizen_number: String,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            subject,
            body,
            published_at,
            reference,
            attachments: Vec::new(),
            action_perspective: "informeren".to_string(),
            message_type: "notificatie".to_string(),
            is_opened: false,
            identification: Identification {
                kind: IdentificationKind::Bsn,
                value: citizen_number,
            },
        }
    }

    pub fn with_attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = attachments;
        self
    }
}

/// Reconciled delivery receipt.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryAudit {
    pub notification_id: Uuid,
    pub method: NotifyMethod,
    pub status: DeliveryStatus,
    pub resource_uri: String,
    pub case_uri: Option<String>,
    pub party_id: String,
    pub error_message: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl DeliveryAudit {
    pub fn new(
        notification_id: Uuid,
        method: NotifyMethod,
        status: DeliveryStatus,
        resource_uri: String,
        party_id: String,
    ) -> Self {
        Self {
            notification_id,
            method,
            status,
            resource_uri,
            case_uri: None,
            party_id,
            error_message: None,
            completed_at: None,
        }
    }

    pub fn with_case(mut self, case_uri: Option<String>) -> Self {
        self.case_uri = case_uri;
        self
    }

    pub fn with_error(mut self, error: String) -> Self {
        self.error_message = Some(error);
        self
    }

    pub fn with_completed_at(mut self, completed_at: Option<DateTime<Utc>>) -> Self {
        self.completed_at = completed_at;
        self
    }
}
