use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{notify::NotifyMethod, status::DeliveryStatus};

/// Callback body the notification provider posts once a delivery settles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub id: Uuid,

    #[serde(default)]
    pub reference: Option<String>,

    pub to: String,

    pub status: DeliveryStatus,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,

    pub notification_type: NotifyMethod,

    pub template_id: Uuid,

    #[serde(default)]
    pub template_version: Option<u32>,
}
