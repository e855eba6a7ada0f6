use serde::{Deserialize, Serialize};

/// Contact preference of a citizen or organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionChannel {
    None,
    Email,
    Sms,
    Both,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DistributionChannel {
    /// Maps the numeric codes used by the registries; unmapped codes are `Unknown`.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => DistributionChannel::None,
            2 => DistributionChannel::Email,
            3 => DistributionChannel::Sms,
            4 => DistributionChannel::Both,
            _ => DistributionChannel::Unknown,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "geen" | "none" => DistributionChannel::None,
            "email" | "e-mail" => DistributionChannel::Email,
            "sms" => DistributionChannel::Sms,
            "beide" | "both" => DistributionChannel::Both,
            _ => DistributionChannel::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PartyData {
    /// Registry identifier of the party (URI or UUID, depending on the workflow).
    pub id: String,
    pub citizen_number: Option<String>,
    pub name: String,
    pub surname_prefix: String,
    pub surname: String,
    pub distribution_channel: DistributionChannel,
    pub email_address: String,
    pub telephone_number: String,
}

/// Intermediate value produced while gathering data for one event.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedData {
    pub party: PartyData,
    pub case_uri: Option<String>,
}

impl PreparedData {
    pub fn new(party: PartyData, case_uri: Option<String>) -> Self {
        Self { party, case_uri }
    }
}
