use std::{
    fmt::{Display, Formatter},
    path::Path,
};

use anyhow::{Error, Result, anyhow};
use dotenvy::{dotenv, dotenv_override, from_path_override};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::notify::{NotifyMethod, TemplateKind};

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    pub server_port: u16,
    pub workflow_version: u16,

    pub notify_api_base_url: String,
    pub notify_api_key: String,

    pub zaken_base_url: String,
    pub zgw_token: String,

    pub open_klant_base_url: String,
    pub open_klant_token: String,

    pub objects_base_url: String,
    pub objects_token: String,
    pub objecttypes_base_url: String,
    pub object_type_task_uuid: String,
    pub object_type_message_uuid: String,

    #[serde(default)]
    pub messages_allowed: bool,

    pub whitelist_case_create_ids: String,
    pub whitelist_case_update_ids: String,
    pub whitelist_case_close_ids: String,
    pub whitelist_task_assigned_ids: String,
    pub whitelist_decision_made_ids: String,
    pub whitelist_decision_info_object_type_uuids: String,

    pub template_email_case_create: String,
    pub template_email_case_update: String,
    pub template_email_case_close: String,
    pub template_email_task_assigned: String,
    pub template_email_decision_made: String,
    pub template_email_message_received: String,

    pub template_sms_case_create: String,
    pub template_sms_case_update: String,
    pub template_sms_case_close: String,
    pub template_sms_task_assigned: String,
    pub template_sms_decision_made: String,
    pub template_sms_message_received: String,
}

/// Selects which versioned set of registry adapters is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowVersion {
    V1,
    V2,
}

impl TryFrom<u16> for WorkflowVersion {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(WorkflowVersion::V1),
            2 => Ok(WorkflowVersion::V2),
            other => Err(anyhow!("Unsupported workflow version: {}", other)),
        }
    }
}

impl Display for WorkflowVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowVersion::V1 => write!(f, "1"),
            WorkflowVersion::V2 => write!(f, "2"),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();
        Self::from_env()
    }

    /// Re-reads `.env` for a running process.
    ///
    /// Values in the file replace the ones already in the environment; `load`
    /// never overwrites a variable that is already set.
    pub fn reload() -> Result<Self, Error> {
        dotenv_override().ok();
        Self::from_env()
    }

    /// Like `reload`, for an explicit env file. The file must exist.
    pub fn reload_from(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        from_path_override(path)
            .map_err(|e| anyhow!("Cannot read env file {}: {}", path.display(), e))?;
        Self::from_env()
    }

    fn from_env() -> Result<Self, Error> {
        let config = envy::from_env::<Self>()
            .map_err(|e| anyhow!("Invalid or missing environmental variable: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Builds a config from explicit key/value pairs (keys in upper snake case).
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let config = envy::from_iter::<_, Self>(
            vars.into_iter().map(|(k, v)| (k.into(), v.into())),
        )
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        self.workflow_version()?;

        for kind in TemplateKind::ALL {
            for method in [NotifyMethod::Email, NotifyMethod::Sms] {
                self.template_id(method, kind)?;
            }
        }

        Uuid::parse_str(&self.object_type_task_uuid)
            .map_err(|_| anyhow!("OBJECT_TYPE_TASK_UUID is not a valid UUID"))?;
        Uuid::parse_str(&self.object_type_message_uuid)
            .map_err(|_| anyhow!("OBJECT_TYPE_MESSAGE_UUID is not a valid UUID"))?;

        Ok(())
    }

    pub fn workflow_version(&self) -> Result<WorkflowVersion, Error> {
        WorkflowVersion::try_from(self.workflow_version)
    }

    pub fn template_id(&self, method: NotifyMethod, kind: TemplateKind) -> Result<Uuid, Error> {
        let raw = match (method, kind) {
            (NotifyMethod::Email, TemplateKind::CaseCreate) => &self.template_email_case_create,
            (NotifyMethod::Email, TemplateKind::CaseUpdate) => &self.template_email_case_update,
            (NotifyMethod::Email, TemplateKind::CaseClose) => &self.template_email_case_close,
            (NotifyMethod::Email, TemplateKind::TaskAssigned) => &self.template_email_task_assigned,
            (NotifyMethod::Email, TemplateKind::DecisionMade) => &self.template_email_decision_made,
            (NotifyMethod::Email, TemplateKind::MessageReceived) => {
                &self.template_email_message_received
            }
            (NotifyMethod::Sms, TemplateKind::CaseCreate) => &self.template_sms_case_create,
            (NotifyMethod::Sms, TemplateKind::CaseUpdate) => &self.template_sms_case_update,
            (NotifyMethod::Sms, TemplateKind::CaseClose) => &self.template_sms_case_close,
            (NotifyMethod::Sms, TemplateKind::TaskAssigned) => &self.template_sms_task_assigned,
            (NotifyMethod::Sms, TemplateKind::DecisionMade) => &self.template_sms_decision_made,
            (NotifyMethod::Sms, TemplateKind::MessageReceived) => {
                &self.template_sms_message_received
            }
        };

        Uuid::parse_str(raw.trim())
            .map_err(|_| anyhow!("Template id for {} / {} is not a valid UUID", method, kind))
    }

    pub fn message_object_type_url(&self) -> String {
        format!(
            "{}/objecttypes/{}",
            self.objecttypes_base_url.trim_end_matches('/'),
            self.object_type_message_uuid
        )
    }
}

/// Complete, valid variable set with every whitelist open except case creation.
#[cfg(test)]
pub(crate) fn test_vars(case_create_ids: &str) -> Vec<(String, String)> {
    const TEMPLATE: &str = "00000000-0000-0000-0000-00000000e001";
    const OBJECT_TYPE: &str = "38327774-7023-4f25-9386-acb0c6f10636";

    let mut vars = vec![
        ("SERVER_PORT", "8080".to_string()),
        ("WORKFLOW_VERSION", "2".to_string()),
        ("NOTIFY_API_BASE_URL", "https://notify.example".to_string()),
        ("NOTIFY_API_KEY", "key".to_string()),
        ("ZAKEN_BASE_URL", "https://zaken.example/zaken/api/v1".to_string()),
        ("ZGW_TOKEN", "token".to_string()),
        ("OPEN_KLANT_BASE_URL", "https://klant.example/klantinteracties/api/v1".to_string()),
        ("OPEN_KLANT_TOKEN", "token".to_string()),
        ("OBJECTS_BASE_URL", "https://objects.example/api/v2".to_string()),
        ("OBJECTS_TOKEN", "token".to_string()),
        ("OBJECTTYPES_BASE_URL", "https://objecttypes.example/api/v2".to_string()),
        ("OBJECT_TYPE_TASK_UUID", OBJECT_TYPE.to_string()),
        ("OBJECT_TYPE_MESSAGE_UUID", OBJECT_TYPE.to_string()),
        ("MESSAGES_ALLOWED", "true".to_string()),
        ("WHITELIST_CASE_CREATE_IDS", case_create_ids.to_string()),
        ("WHITELIST_CASE_UPDATE_IDS", "*".to_string()),
        ("WHITELIST_CASE_CLOSE_IDS", "*".to_string()),
        ("WHITELIST_TASK_ASSIGNED_IDS", "*".to_string()),
        ("WHITELIST_DECISION_MADE_IDS", "*".to_string()),
        ("WHITELIST_DECISION_INFO_OBJECT_TYPE_UUIDS", "*".to_string()),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect::<Vec<_>>();

    for kind in TemplateKind::ALL {
        for method in ["EMAIL", "SMS"] {
            vars.push((
                format!("TEMPLATE_{}_{}", method, kind.to_string().to_uppercase()),
                TEMPLATE.to_string(),
            ));
        }
    }

    vars
}
