use anyhow::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde_json::Value;

use crate::{
    config::Config,
    models::{
        notify::{NotifyData, NotifyMethod, NotifyReference, Personalization, TemplateKind},
        party::PartyData,
    },
};

const MONTHS: [&str; 12] = [
    "januari",
    "februari",
    "maart",
    "april",
    "mei",
    "juni",
    "juli",
    "augustus",
    "september",
    "oktober",
    "november",
    "december",
];

/// Formats a date as a Dutch long date, e.g. `7 maart 2025`.
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Collects template values; everything is stored as a string.
#[derive(Debug, Default)]
pub struct PersonalizationBuilder {
    values: Personalization,
}

impl PersonalizationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values
            .insert(key.to_string(), Value::String(value.into()));
        self
    }

    pub fn date(self, key: &str, date: NaiveDate) -> Self {
        self.text(key, format_date(date))
    }

    pub fn flag(self, key: &str, value: bool) -> Self {
        self.text(key, if value { "true" } else { "false" })
    }

    pub fn party(self, party: &PartyData) -> Self {
        self.text("klant.voornaam", party.name.as_str())
            .text("klant.voorvoegselAchternaam", party.surname_prefix.as_str())
            .text("klant.achternaam", party.surname.as_str())
    }

    pub fn build(self) -> Personalization {
        self.values
    }
}

/// Turns routed channels into `NotifyData` for one scenario.
pub struct NotifyDataBuilder<'a> {
    config: &'a Config,
    kind: TemplateKind,
    reference: NotifyReference,
}

impl<'a> NotifyDataBuilder<'a> {
    pub fn new(config: &'a Config, kind: TemplateKind, reference: NotifyReference) -> Self {
        Self {
            config,
            kind,
            reference,
        }
    }

    pub fn build(
        &self,
        method: NotifyMethod,
        contact_details: String,
        personalization: &Personalization,
    ) -> Result<NotifyData, Error> {
        Ok(NotifyData {
            method,
            contact_details,
            template_id: self.config.template_id(method, self.kind)?,
            personalization: personalization.clone(),
            reference: self.reference.clone(),
        })
    }

    pub fn build_all(
        &self,
        routed: Vec<(NotifyMethod, String)>,
        personalization: &Personalization,
    ) -> Result<Vec<NotifyData>, Error> {
        routed
            .into_iter()
            .map(|(method, contact)| self.build(method, contact, personalization))
            .collect()
    }
}
