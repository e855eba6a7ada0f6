//! Records read from the case, catalogue, decision, document and objects
//! registries. Only the fields the scenarios consume are modelled.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub url: String,

    #[serde(rename = "identificatie")]
    pub identification: String,

    #[serde(rename = "omschrijving", default)]
    pub name: String,

    #[serde(rename = "zaaktype")]
    pub case_type_uri: String,

    #[serde(rename = "registratiedatum", default)]
    pub registration_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseType {
    pub url: String,

    #[serde(rename = "identificatie")]
    pub identification: String,

    #[serde(rename = "omschrijving", default)]
    pub name: String,

    #[serde(rename = "isNotificationExpected", default)]
    pub is_notification_expected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseStatus {
    pub url: String,

    #[serde(rename = "statustype")]
    pub status_type_uri: String,

    #[serde(rename = "datumStatusGezet")]
    pub set_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseStatusType {
    pub url: String,

    #[serde(rename = "omschrijving", default)]
    pub name: String,

    #[serde(rename = "isEindstatus", default)]
    pub is_final: bool,
}

/// Link between a decision and one of its documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResource {
    pub url: String,

    #[serde(rename = "besluit")]
    pub decision_uri: String,

    #[serde(rename = "informatieobject")]
    pub info_object_uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub url: String,

    #[serde(rename = "identificatie")]
    pub identification: String,

    #[serde(rename = "besluittype")]
    pub decision_type_uri: String,

    #[serde(rename = "zaak")]
    pub case_uri: String,

    #[serde(rename = "datum")]
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionType {
    pub url: String,

    #[serde(rename = "omschrijving", default)]
    pub name: String,

    #[serde(rename = "omschrijvingGeneriek", default)]
    pub generic_name: String,

    #[serde(rename = "publicatieIndicatie", default)]
    pub publication_indication: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoObjectStatus {
    InBewerking,
    TerVaststelling,
    Definitief,
    Gearchiveerd,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidentiality {
    Openbaar,
    BeperktOpenbaar,
    Intern,
    Zaakvertrouwelijk,
    Vertrouwelijk,
    Confidentieel,
    Geheim,
    ZeerGeheim,
    #[serde(other)]
    Unknown,
}

/// A document registered in the document registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoObject {
    pub url: String,

    #[serde(rename = "identificatie", default)]
    pub identification: String,

    #[serde(rename = "informatieobjecttype")]
    pub type_uri: String,

    pub status: InfoObjectStatus,

    #[serde(rename = "vertrouwelijkheidaanduiding")]
    pub confidentiality: Confidentiality,
}

impl InfoObject {
    pub fn is_definitive(&self) -> bool {
        self.status == InfoObjectStatus::Definitief
    }

    pub fn is_public(&self) -> bool {
        self.confidentiality == Confidentiality::Openbaar
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentificationKind {
    Bsn,
    Kvk,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identification {
    #[serde(rename = "type")]
    pub kind: IdentificationKind,

    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Open,
    Gesloten,
    #[serde(other)]
    Unknown,
}

/// Task assigned to a citizen, stored as the `record.data` of an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskObject {
    #[serde(rename = "titel")]
    pub title: String,

    pub status: TaskStatus,

    #[serde(rename = "verloopdatum", default)]
    pub expiration_date: Option<DateTime<Utc>>,

    #[serde(rename = "zaak")]
    pub case_uri: String,

    #[serde(rename = "identificatie")]
    pub identification: Identification,
}

/// Message placed in a citizen's inbox, stored as the `record.data` of an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageObject {
    #[serde(rename = "onderwerp")]
    pub subject: String,

    #[serde(rename = "handelingsperspectief", default)]
    pub action_perspective: String,

    #[serde(rename = "publicatiedatum")]
    pub published_at: DateTime<Utc>,

    #[serde(rename = "identificatie")]
    pub identification: Identification,
}
