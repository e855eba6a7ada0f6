use std::{
    sync::{Arc, RwLock},
    time::Duration,
};

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    config::Config,
    models::notify::{NotifyData, Personalization, TemplatePreview},
};

/// Capability to hand notifications to the provider.
#[async_trait]
pub trait NotifySender: Send + Sync {
    async fn send_email(&self, data: &NotifyData) -> Result<(), Error>;

    async fn send_sms(&self, data: &NotifyData) -> Result<(), Error>;

    async fn generate_template_preview(&self, data: &NotifyData) -> Result<TemplatePreview, Error>;
}

#[derive(Debug, Serialize)]
struct EmailRequest<'a> {
    email_address: &'a str,
    template_id: Uuid,
    personalisation: &'a Personalization,
    reference: String,
}

#[derive(Debug, Serialize)]
struct SmsRequest<'a> {
    phone_number: &'a str,
    template_id: Uuid,
    personalisation: &'a Personalization,
    reference: String,
}

#[derive(Debug, Serialize)]
struct PreviewRequest<'a> {
    personalisation: &'a Personalization,
}

#[derive(Debug, Deserialize)]
struct PreviewResponse {
    #[serde(default)]
    subject: Option<String>,
    body: String,
}

#[derive(Debug, Deserialize)]
pub struct SendResponse {
    pub id: Uuid,
}

#[derive(Debug, Clone)]
pub struct NotifyClientSettings {
    pub base_url: String,
    pub api_key: String,
}

impl NotifyClientSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.notify_api_base_url.trim_end_matches('/').to_string(),
            api_key: config.notify_api_key.clone(),
        }
    }
}

pub struct NotifyClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl NotifyClient {
    pub fn new(settings: &NotifyClientSettings) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        info!(base_url = %settings.base_url, "Notify client initialized");

        Ok(Self {
            http_client,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::Response, Error> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| anyhow!("Notify request to {} failed: {}", path, e))?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, path, "Notify API rejected the request");
            Err(anyhow!("Notify API returned status {}: {}", status, error_text))
        }
    }
}

#[async_trait]
impl NotifySender for NotifyClient {
    async fn send_email(&self, data: &NotifyData) -> Result<(), Error> {
        debug!(template_id = %data.template_id, "Sending email notification");

        let request = EmailRequest {
            email_address: &data.contact_details,
            template_id: data.template_id,
            personalisation: &data.personalization,
            reference: data.reference.encode()?,
        };

        let response: SendResponse = self
            .post("/v2/notifications/email", &request)
            .await?
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse Notify response: {}", e))?;

        info!(notification_id = %response.id, "Email notification accepted by Notify");
        Ok(())
    }

    async fn send_sms(&self, data: &NotifyData) -> Result<(), Error> {
        debug!(template_id = %data.template_id, "Sending SMS notification");

        let request = SmsRequest {
            phone_number: &data.contact_details,
            template_id: data.template_id,
            personalisation: &data.personalization,
            reference: data.reference.encode()?,
        };

        let response: SendResponse = self
            .post("/v2/notifications/sms", &request)
            .await?
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse Notify response: {}", e))?;

        info!(notification_id = %response.id, "SMS notification accepted by Notify");
        Ok(())
    }

    async fn generate_template_preview(&self, data: &NotifyData) -> Result<TemplatePreview, Error> {
        let path = format!("/v2/template/{}/preview", data.template_id);
        let request = PreviewRequest {
            personalisation: &data.personalization,
        };

        let preview: PreviewResponse = self
            .post(&path, &request)
            .await?
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse template preview: {}", e))?;

        Ok(TemplatePreview {
            subject: preview.subject.unwrap_or_default(),
            body: preview.body,
        })
    }
}

/// Holds the single provider client shared by all events.
///
/// The client is built on first use and replaced only through `reload`.
pub struct NotifyClientCache {
    settings: RwLock<NotifyClientSettings>,
    client: RwLock<Option<Arc<NotifyClient>>>,
}

impl NotifyClientCache {
    pub fn new(settings: NotifyClientSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
            client: RwLock::new(None),
        }
    }

    pub fn client(&self) -> Result<Arc<NotifyClient>, Error> {
        if let Some(client) = self
            .client
            .read()
            .map_err(|_| anyhow!("Notify client cache is poisoned"))?
            .as_ref()
        {
            return Ok(Arc::clone(client));
        }

        let settings = self
            .settings
            .read()
            .map_err(|_| anyhow!("Notify client settings are poisoned"))?
            .clone();
        let client = Arc::new(NotifyClient::new(&settings)?);

        let mut slot = self
            .client
            .write()
            .map_err(|_| anyhow!("Notify client cache is poisoned"))?;
        *slot = Some(Arc::clone(&client));

        Ok(client)
    }

    /// Replaces the cached client, e.g. after a credential rotation.
    pub fn reload(&self, settings: NotifyClientSettings) -> Result<(), Error> {
        let client = Arc::new(NotifyClient::new(&settings)?);

        *self
            .settings
            .write()
            .map_err(|_| anyhow!("Notify client settings are poisoned"))? = settings;
        *self
            .client
            .write()
            .map_err(|_| anyhow!("Notify client cache is poisoned"))? = Some(client);

        info!("Notify client reloaded");
        Ok(())
    }
}

#[async_trait]
impl NotifySender for NotifyClientCache {
    async fn send_email(&self, data: &NotifyData) -> Result<(), Error> {
        self.client()?.send_email(data).await
    }

    async fn send_sms(&self, data: &NotifyData) -> Result<(), Error> {
        self.client()?.send_sms(data).await
    }

    async fn generate_template_preview(&self, data: &NotifyData) -> Result<TemplatePreview, Error> {
        self.client()?.generate_template_preview(data).await
    }
}
