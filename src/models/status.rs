use std::fmt::{Display, Formatter, Result};

use serde::{Deserialize, Serialize};

/// Delivery state reported by the notification provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryStatus {
    Created,
    Sending,
    Pending,
    Sent,
    Delivered,
    PermanentFailure,
    TemporaryFailure,
    TechnicalFailure,
    #[serde(other)]
    Unknown,
}

impl DeliveryStatus {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            DeliveryStatus::PermanentFailure
                | DeliveryStatus::TemporaryFailure
                | DeliveryStatus::TechnicalFailure
        )
    }

    pub fn is_final(&self) -> bool {
        matches!(self, DeliveryStatus::Delivered) || self.is_failure()
    }
}

impl Display for DeliveryStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            DeliveryStatus::Created => write!(f, "created"),
            DeliveryStatus::Sending => write!(f, "sending"),
            DeliveryStatus::Pending => write!(f, "pending"),
            DeliveryStatus::Sent => write!(f, "sent"),
            DeliveryStatus::Delivered => write!(f, "delivered"),
            DeliveryStatus::PermanentFailure => write!(f, "permanent-failure"),
            DeliveryStatus::TemporaryFailure => write!(f, "temporary-failure"),
            DeliveryStatus::TechnicalFailure => write!(f, "technical-failure"),
            DeliveryStatus::Unknown => write!(f, "unknown"),
        }
    }
}
