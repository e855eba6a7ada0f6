use std::{sync::Arc, time::Duration};

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use tracing::{debug, info};

use crate::{
    clients::query::{DataQueryService, QueryContext},
    config::{Config, WorkflowVersion},
    models::{
        domain::{
            Case, CaseStatus, CaseStatusType, CaseType, Decision, DecisionResource, DecisionType,
            InfoObject, MessageObject, TaskObject,
        },
        event::NotificationEvent,
        party::{DistributionChannel, PartyData},
    },
};

#[derive(Debug, Clone)]
pub struct RegistrySettings {
    pub zaken_base_url: String,
    pub zgw_token: String,
    pub open_klant_base_url: String,
    pub open_klant_token: String,
    pub objects_base_url: String,
    pub objects_token: String,
    pub message_object_type_url: String,
}

impl RegistrySettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            zaken_base_url: config.zaken_base_url.trim_end_matches('/').to_string(),
            zgw_token: config.zgw_token.clone(),
            open_klant_base_url: config.open_klant_base_url.trim_end_matches('/').to_string(),
            open_klant_token: config.open_klant_token.clone(),
            objects_base_url: config.objects_base_url.trim_end_matches('/').to_string(),
            objects_token: config.objects_token.clone(),
            message_object_type_url: config.message_object_type_url(),
        }
    }
}

/// How parties are looked up; the only part of the registries that differs
/// between workflow versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyAdapter {
    /// Customer registry v1: `klanten` filtered by citizen number.
    Klanten,
    /// Customer registry v2: `partijen` with expanded digital addresses.
    Partijen,
}

impl From<WorkflowVersion> for PartyAdapter {
    fn from(version: WorkflowVersion) -> Self {
        match version {
            WorkflowVersion::V1 => PartyAdapter::Klanten,
            WorkflowVersion::V2 => PartyAdapter::Partijen,
        }
    }
}

pub struct RegistryQueryService {
    http_client: Client,
    settings: Arc<RegistrySettings>,
    party_adapter: PartyAdapter,
}

impl RegistryQueryService {
    pub fn for_version(config: &Config, version: WorkflowVersion) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        let party_adapter = PartyAdapter::from(version);
        info!(
            workflow_version = %version,
            adapter = ?party_adapter,
            "Registry adapters initialized"
        );

        Ok(Self {
            http_client,
            settings: Arc::new(RegistrySettings::from_config(config)),
            party_adapter,
        })
    }
}

impl DataQueryService for RegistryQueryService {
    fn from(&self, event: &NotificationEvent) -> Box<dyn QueryContext> {
        Box::new(RegistryQueryContext {
            http_client: self.http_client.clone(),
            settings: Arc::clone(&self.settings),
            party_adapter: self.party_adapter,
            event: event.clone(),
        })
    }
}

pub struct RegistryQueryContext {
    http_client: Client,
    settings: Arc<RegistrySettings>,
    party_adapter: PartyAdapter,
    event: NotificationEvent,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ObjectResponse<T> {
    record: ObjectRecord<T>,
}

#[derive(Debug, Deserialize)]
struct ObjectRecord<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct Role {
    #[serde(rename = "betrokkeneIdentificatie")]
    involved: RoleIdentification,
}

#[derive(Debug, Deserialize)]
struct RoleIdentification {
    #[serde(rename = "inpBsn", default)]
    citizen_number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Klant {
    url: String,
    #[serde(rename = "voornaam", default)]
    name: String,
    #[serde(rename = "voorvoegselAchternaam", default)]
    surname_prefix: String,
    #[serde(rename = "achternaam", default)]
    surname: String,
    #[serde(rename = "emailadres", default)]
    email_address: String,
    #[serde(rename = "telefoonnummer", default)]
    telephone_number: String,
    #[serde(rename = "aanmaakkanaal", default)]
    channel: String,
}

#[derive(Debug, Deserialize)]
struct Partij {
    uuid: String,
    #[serde(rename = "voorkeursDigitaalAdres", default)]
    preferred_address: Option<Reference>,
    #[serde(rename = "partijIdentificatie", default)]
    identification: Option<PartijIdentificatie>,
    #[serde(rename = "_expand", default)]
    expand: Option<PartijExpand>,
}

#[derive(Debug, Deserialize)]
struct Reference {
    uuid: String,
}

#[derive(Debug, Deserialize)]
struct PartijIdentificatie {
    #[serde(rename = "contactnaam", default)]
    contact_name: Option<ContactName>,
}

#[derive(Debug, Deserialize)]
struct ContactName {
    #[serde(rename = "voornaam", default)]
    name: String,
    #[serde(rename = "voorvoegselAchternaam", default)]
    surname_prefix: String,
    #[serde(rename = "achternaam", default)]
    surname: String,
}

#[derive(Debug, Deserialize)]
struct PartijExpand {
    #[serde(rename = "digitaleAdressen", default)]
    addresses: Vec<DigitalAddress>,
}

#[derive(Debug, Deserialize)]
struct DigitalAddress {
    uuid: String,
    #[serde(rename = "soortDigitaalAdres")]
    kind: String,
    #[serde(rename = "adres")]
    address: String,
}

impl RegistryQueryContext {
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        authorization: String,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        debug!(url, "Querying registry");

        let response = self
            .http_client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .header("Accept-Crs", "EPSG:4326")
            .query(query)
            .send()
            .await
            .map_err(|e| anyhow!("Registry request to {} failed: {}", url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Registry returned status {} for {}", status, url));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| anyhow!("Failed to parse registry response from {}: {}", url, e))
    }

    async fn get_zgw<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        self.get_json(url, format!("Bearer {}", self.settings.zgw_token), query)
            .await
    }

    async fn get_klant<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        self.get_json(url, format!("Token {}", self.settings.open_klant_token), query)
            .await
    }

    async fn get_object_data<T: DeserializeOwned>(&self, url: &str) -> Result<T, Error> {
        let object: ObjectResponse<T> = self
            .get_json(url, format!("Token {}", self.settings.objects_token), &[])
            .await?;
        Ok(object.record.data)
    }

    async fn citizen_number_for_case(&self, case_uri: &str) -> Result<String, Error> {
        let url = format!("{}/rollen", self.settings.zaken_base_url);
        let roles: Page<Role> = self
            .get_zgw(&url, &[("zaak", case_uri), ("omschrijvingGeneriek", "initiator")])
            .await?;

        roles
            .results
            .into_iter()
            .find_map(|role| role.involved.citizen_number)
            .ok_or_else(|| {
                anyhow!("No initiator with a citizen number found for case {}", case_uri)
            })
    }

    async fn klant_by_citizen_number(&self, citizen_number: &str) -> Result<PartyData, Error> {
        let url = format!("{}/klanten", self.settings.open_klant_base_url);
        let page: Page<Klant> = self
            .get_klant(&url, &[("subjectNatuurlijkPersoon__inpBsn", citizen_number)])
            .await?;

        let klant = page
            .results
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No party found for the given citizen number"))?;

        Ok(PartyData {
            id: klant.url,
            citizen_number: Some(citizen_number.to_string()),
            name: klant.name,
            surname_prefix: klant.surname_prefix,
            surname: klant.surname,
            distribution_channel: DistributionChannel::from_label(&klant.channel),
            email_address: klant.email_address,
            telephone_number: klant.telephone_number,
        })
    }

    async fn partij_by_citizen_number(&self, citizen_number: &str) -> Result<PartyData, Error> {
        let url = format!("{}/partijen", self.settings.open_klant_base_url);
        let page: Page<Partij> = self
            .get_klant(
                &url,
                &[
                    ("partijIdentificator__objectId", citizen_number),
                    ("expand", "digitaleAdressen"),
                ],
            )
            .await?;

        let partij = page
            .results
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No party found for the given citizen number"))?;

        Ok(partij_to_party(partij, citizen_number))
    }
}

fn partij_to_party(partij: Partij, citizen_number: &str) -> PartyData {
    let addresses = partij.expand.map(|e| e.addresses).unwrap_or_default();
    let email = addresses.iter().find(|a| a.kind == "email");
    let phone = addresses.iter().find(|a| a.kind == "telefoonnummer");

    let preferred = partij
        .preferred_address
        .as_ref()
        .and_then(|p| addresses.iter().find(|a| a.uuid == p.uuid));

    let distribution_channel = match (preferred, email, phone) {
        (Some(address), _, _) if address.kind == "email" => DistributionChannel::Email,
        (Some(address), _, _) if address.kind == "telefoonnummer" => DistributionChannel::Sms,
        (_, Some(_), Some(_)) => DistributionChannel::Both,
        (_, Some(_), None) => DistributionChannel::Email,
        (_, None, Some(_)) => DistributionChannel::Sms,
        (_, None, None) => DistributionChannel::Unknown,
    };

    let name = partij
        .identification
        .and_then(|i| i.contact_name)
        .unwrap_or(ContactName {
            name: String::new(),
            surname_prefix: String::new(),
            surname: String::new(),
        });

    PartyData {
        id: partij.uuid,
        citizen_number: Some(citizen_number.to_string()),
        name: name.name,
        surname_prefix: name.surname_prefix,
        surname: name.surname,
        distribution_channel,
        email_address: email.map(|a| a.address.clone()).unwrap_or_default(),
        telephone_number: phone.map(|a| a.address.clone()).unwrap_or_default(),
    }
}

/// Root of the API a resource URI belongs to, e.g. `.../api/v1` for
/// `.../api/v1/besluiten/{uuid}`.
fn api_root<'a>(uri: &'a str, collection: &str) -> Result<&'a str, Error> {
    let marker = format!("/{}/", collection);
    uri.rfind(&marker)
        .map(|index| &uri[..index])
        .ok_or_else(|| anyhow!("'{}' is not a {} resource", uri, collection))
}

#[async_trait]
impl QueryContext for RegistryQueryContext {
    async fn get_case(&self, case_uri: &str) -> Result<Case, Error> {
        self.get_zgw(case_uri, &[]).await
    }

    async fn get_case_type(&self, case_type_uri: &str) -> Result<CaseType, Error> {
        self.get_zgw(case_type_uri, &[]).await
    }

    async fn get_case_statuses(&self, case_uri: &str) -> Result<Vec<CaseStatus>, Error> {
        let url = format!("{}/statussen", self.settings.zaken_base_url);
        let page: Page<CaseStatus> = self.get_zgw(&url, &[("zaak", case_uri)]).await?;
        Ok(page.results)
    }

    async fn get_case_status_type(&self, status_type_uri: &str) -> Result<CaseStatusType, Error> {
        self.get_zgw(status_type_uri, &[]).await
    }

    async fn get_event_status(&self) -> Result<CaseStatus, Error> {
        self.get_zgw(&self.event.resource_uri, &[]).await
    }

    async fn get_party_data(
        &self,
        case_uri: Option<&str>,
        citizen_number: Option<&str>,
    ) -> Result<PartyData, Error> {
        let citizen_number = match (citizen_number, case_uri) {
            (Some(number), _) => number.to_string(),
            (None, Some(case_uri)) => self.citizen_number_for_case(case_uri).await?,
            (None, None) => {
                return Err(anyhow!("A case or citizen number is required to find a party"));
            }
        };

        match self.party_adapter {
            PartyAdapter::Klanten => self.klant_by_citizen_number(&citizen_number).await,
            PartyAdapter::Partijen => self.partij_by_citizen_number(&citizen_number).await,
        }
    }

    async fn get_decision_resource(&self) -> Result<DecisionResource, Error> {
        self.get_zgw(&self.event.resource_uri, &[]).await
    }

    async fn get_info_object(&self, info_object_uri: &str) -> Result<InfoObject, Error> {
        self.get_zgw(info_object_uri, &[]).await
    }

    async fn get_decision(&self, decision_uri: &str) -> Result<Decision, Error> {
        self.get_zgw(decision_uri, &[]).await
    }

    async fn get_decision_type(&self, decision_type_uri: &str) -> Result<DecisionType, Error> {
        self.get_zgw(decision_type_uri, &[]).await
    }

    async fn get_documents(&self, decision_uri: &str) -> Result<Vec<InfoObject>, Error> {
        let url = format!("{}/besluitinformatieobjecten", api_root(decision_uri, "besluiten")?);
        let links: Vec<DecisionResource> = self.get_zgw(&url, &[("besluit", decision_uri)]).await?;

        let mut documents = Vec::with_capacity(links.len());
        for link in links {
            documents.push(self.get_info_object(&link.info_object_uri).await?);
        }

        Ok(documents)
    }

    async fn get_task(&self) -> Result<TaskObject, Error> {
        self.get_object_data(&self.event.resource_uri).await
    }

    async fn get_message(&self) -> Result<MessageObject, Error> {
        self.get_object_data(&self.event.resource_uri).await
    }

    async fn create_object(&self, data: serde_json::Value) -> Result<(), Error> {
        let url = format!("{}/objects", self.settings.objects_base_url);
        let body = json!({
            "type": self.settings.message_object_type_url,
            "record": {
                "typeVersion": 1,
                "data": data,
                "startAt": Utc::now().date_naive(),
            },
        });

        let response = self
            .http_client
            .post(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Token {}", self.settings.objects_token),
            )
            .header("Content-Crs", "EPSG:4326")
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow!("Creating object failed: {}", e))?;

        let status = response.status();
        if status.is_success() {
            info!("Message object created");
            Ok(())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(anyhow!("Objects API returned status {}: {}", status, error_text))
        }
    }
}
