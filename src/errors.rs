use std::fmt::{Display, Formatter, Result as FmtResult};

use thiserror::Error;

/// Appended to every abort message.
pub const ABORT_SUFFIX: &str = "The notification will not be sent and should not be retried.";

pub const DELIVERY_METHOD_UNKNOWN: &str =
    "The delivery method of the citizen is unknown, no notification can be sent.";

pub const MISSING_DATA: &str = "There is no data to process.";

pub const DATA_PROCESSED: &str = "data processed";

/// Intentional "do not notify" outcome of a business rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbortSignal {
    reason: String,
}

impl AbortSignal {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn message(&self) -> String {
        format!("{} {}", self.reason, ABORT_SUFFIX)
    }

    pub fn not_whitelisted(identifier: &str, whitelist: &str) -> Self {
        Self::new(format!(
            "Do not send: the identifier '{}' is not whitelisted in {}.",
            identifier, whitelist
        ))
    }

    pub fn notification_not_expected(case_type: &str) -> Self {
        Self::new(format!(
            "Do not send: notifications are disabled for case type '{}'.",
            case_type
        ))
    }

    pub fn info_object_type_not_allowed(type_uuid: &str) -> Self {
        Self::new(format!(
            "Do not send: info object type '{}' is not allowed to send notifications.",
            type_uuid
        ))
    }

    pub fn info_object_not_publishable() -> Self {
        Self::new("Do not send: the info object is not definitive or is confidential.")
    }

    pub fn messages_disabled() -> Self {
        Self::new("Do not send: sending notifications about messages is disabled.")
    }

    pub fn task_not_open() -> Self {
        Self::new("Do not send: the task is not open.")
    }

    pub fn task_not_for_citizen() -> Self {
        Self::new("Do not send: the task is not assigned to a citizen.")
    }
}

impl Display for AbortSignal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.message())
    }
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("{0}")]
    Aborted(AbortSignal),

    #[error("No scenario is implemented for {0}")]
    NotImplemented(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("{}", DELIVERY_METHOD_UNKNOWN)]
    NotificationMethodUnknown,
}

/// Result of a gathering step: a business abort, an I/O failure, or a
/// strategy that must not run at all.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("{0}")]
    Abort(AbortSignal),

    #[error("scenario not implemented")]
    NotImplemented,

    #[error(transparent)]
    Failure(#[from] anyhow::Error),
}

impl From<AbortSignal> for StepError {
    fn from(signal: AbortSignal) -> Self {
        StepError::Abort(signal)
    }
}
