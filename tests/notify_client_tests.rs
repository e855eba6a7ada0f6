use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use chrono::{TimeZone, Utc};
use notify_service::{
    clients::notify::{NotifyClient, NotifyClientCache, NotifyClientSettings, NotifySender},
    models::notify::{NotifyData, NotifyMethod, NotifyReference},
};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

use crate::common::{CASE_URI, EMAIL_CASE_CREATE, SMS_CASE_CREATE, template};

fn settings(server: &MockServer) -> NotifyClientSettings {
    NotifyClientSettings {
        base_url: server.uri(),
        api_key: "test-key".to_string(),
    }
}

fn notify_data(method: NotifyMethod, contact: &str, template_id: &str) -> NotifyData {
    let mut personalization = HashMap::new();
    personalization.insert(
        "zaak.identificatie".to_string(),
        Value::String("ZAAK-2026-0001".to_string()),
    );

    NotifyData {
        method,
        contact_details: contact.to_string(),
        template_id: template(template_id),
        personalization,
        reference: NotifyReference {
            resource_uri: "https://zaken.example/zaken/api/v1/zaken/9b1d".to_string(),
            event_created_at: Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap(),
            case_uri: Some(CASE_URI.to_string()),
            party_id: "party-1".to_string(),
        },
    }
}

fn accepted() -> ResponseTemplate {
    ResponseTemplate::new(201).set_body_json(json!({
        "id": "7b4a3c2e-1d0f-4e9a-8b7c-6d5e4f3a2b1c",
    }))
}

/// Test: Emails are posted with bearer auth, template, personalisation and reference
#[tokio::test]
async fn test_send_email_posts_expected_request() -> Result<()> {
    let server = MockServer::start().await;
    let data = notify_data(NotifyMethod::Email, "jan@example.nl", EMAIL_CASE_CREATE);

    Mock::given(method("POST"))
        .and(path("/v2/notifications/email"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "email_address": "jan@example.nl",
            "template_id": EMAIL_CASE_CREATE,
            "personalisation": { "zaak.identificatie": "ZAAK-2026-0001" },
            "reference": data.reference.encode()?,
        })))
        .respond_with(accepted())
        .expect(1)
        .mount(&server)
        .await;

    let client = NotifyClient::new(&settings(&server))?;
    client.send_email(&data).await?;

    Ok(())
}

/// Test: SMS messages use the phone number endpoint
#[tokio::test]
async fn test_send_sms_posts_phone_number() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/notifications/sms"))
        .and(body_partial_json(json!({
            "phone_number": "+31618758539",
            "template_id": SMS_CASE_CREATE,
        })))
        .respond_with(accepted())
        .expect(1)
        .mount(&server)
        .await;

    let client = NotifyClient::new(&settings(&server))?;
    client
        .send_sms(&notify_data(NotifyMethod::Sms, "+31618758539", SMS_CASE_CREATE))
        .await?;

    Ok(())
}

/// Test: Provider rejections keep the provider's own explanation
#[tokio::test]
async fn test_rejected_send_keeps_provider_message() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/notifications/sms"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string("phone_number Not a UK mobile number"),
        )
        .mount(&server)
        .await;

    let client = NotifyClient::new(&settings(&server))?;
    let result = client
        .send_sms(&notify_data(NotifyMethod::Sms, "+31618758539", SMS_CASE_CREATE))
        .await;

    let error = result.expect_err("A 400 response should fail the send").to_string();
    assert!(error.contains("400"));
    assert!(error.contains("phone_number Not a UK mobile number"));

    Ok(())
}

/// Test: Template previews return the rendered subject and body
#[tokio::test]
async fn test_template_preview_is_rendered_by_provider() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v2/template/{}/preview", EMAIL_CASE_CREATE)))
        .and(body_partial_json(json!({
            "personalisation": { "zaak.identificatie": "ZAAK-2026-0001" },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": EMAIL_CASE_CREATE,
            "type": "email",
            "version": 3,
            "subject": "Uw zaak ZAAK-2026-0001",
            "body": "Uw zaak is aangemaakt.",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = NotifyClient::new(&settings(&server))?;
    let preview = client
        .generate_template_preview(&notify_data(
            NotifyMethod::Email,
            "jan@example.nl",
            EMAIL_CASE_CREATE,
        ))
        .await?;

    assert_eq!(preview.subject, "Uw zaak ZAAK-2026-0001");
    assert_eq!(preview.body, "Uw zaak is aangemaakt.");

    Ok(())
}

/// Test: The cached client is reused until it is reloaded
#[tokio::test]
async fn test_client_cache_reuses_and_reloads() -> Result<()> {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/notifications/email"))
        .and(header("authorization", "Bearer rotated-key"))
        .respond_with(accepted())
        .expect(1)
        .mount(&second)
        .await;

    let cache = Arc::new(NotifyClientCache::new(settings(&first)));

    let a = cache.client()?;
    let b = cache.client()?;
    assert!(Arc::ptr_eq(&a, &b), "Client should be built once");

    cache.reload(NotifyClientSettings {
        base_url: second.uri(),
        api_key: "rotated-key".to_string(),
    })?;

    let c = cache.client()?;
    assert!(!Arc::ptr_eq(&a, &c), "Reload should replace the client");

    cache
        .send_email(&notify_data(NotifyMethod::Email, "jan@example.nl", EMAIL_CASE_CREATE))
        .await?;

    Ok(())
}
