use std::fmt::{Display, Formatter, Result};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inbound webhook body sent by the notification routing component of the
/// case registries. Field names follow the wire format of that component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    #[serde(rename = "actie")]
    pub action: EventAction,

    #[serde(rename = "kanaal")]
    pub channel: EventChannel,

    pub resource: EventResource,

    #[serde(rename = "hoofdObject")]
    pub main_object_uri: String,

    #[serde(rename = "resourceUrl")]
    pub resource_uri: String,

    #[serde(rename = "aanmaakdatum")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "kenmerken", default)]
    pub attributes: EventAttributes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    Create,
    Update,
    PartialUpdate,
    Destroy,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventChannel {
    Zaken,
    Objecten,
    Besluiten,
    Documenten,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventResource {
    Zaak,
    Status,
    Rol,
    Object,
    Besluit,
    #[serde(rename = "besluitinformatieobject")]
    DecisionInfoObject,
    #[serde(other)]
    Unknown,
}

/// Optional routing attributes ("kenmerken") attached to an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventAttributes {
    #[serde(rename = "zaaktype", default, skip_serializing_if = "Option::is_none")]
    pub case_type_uri: Option<String>,

    #[serde(rename = "objectType", default, skip_serializing_if = "Option::is_none")]
    pub object_type_uri: Option<String>,

    #[serde(rename = "besluittype", default, skip_serializing_if = "Option::is_none")]
    pub decision_type_uri: Option<String>,

    #[serde(rename = "bronorganisatie", default, skip_serializing_if = "Option::is_none")]
    pub source_organization: Option<String>,
}

impl NotificationEvent {
    /// Trailing UUID segment of the object type URI, if present.
    pub fn object_type_uuid(&self) -> Option<&str> {
        self.attributes
            .object_type_uri
            .as_deref()
            .and_then(last_segment)
    }
}

impl Display for NotificationEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "{:?}/{:?}/{:?} ({})",
            self.channel, self.resource, self.action, self.resource_uri
        )
    }
}

pub fn last_segment(uri: &str) -> Option<&str> {
    uri.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}
