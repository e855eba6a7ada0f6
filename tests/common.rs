use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use notify_service::{
    clients::{
        notify::NotifySender,
        query::{DataQueryService, QueryContext},
    },
    config::Config,
    models::{
        domain::{
            Case, CaseStatus, CaseStatusType, CaseType, Confidentiality, Decision,
            DecisionResource, DecisionType, Identification, IdentificationKind, InfoObject,
            InfoObjectStatus, MessageObject, TaskObject, TaskStatus,
        },
        event::{EventAction, EventAttributes, EventChannel, EventResource, NotificationEvent},
        notify::{NotifyData, TemplatePreview},
        party::{DistributionChannel, PartyData},
    },
    scenarios::{ScenarioDeps, whitelist::Whitelists},
};
use uuid::Uuid;

pub const EMAIL_CASE_CREATE: &str = "00000000-0000-0000-0000-00000000e001";
pub const EMAIL_CASE_UPDATE: &str = "00000000-0000-0000-0000-00000000e002";
pub const EMAIL_CASE_CLOSE: &str = "00000000-0000-0000-0000-00000000e003";
pub const EMAIL_TASK_ASSIGNED: &str = "00000000-0000-0000-0000-00000000e004";
pub const EMAIL_DECISION_MADE: &str = "00000000-0000-0000-0000-00000000e005";
pub const EMAIL_MESSAGE_RECEIVED: &str = "00000000-0000-0000-0000-00000000e006";
pub const SMS_CASE_CREATE: &str = "00000000-0000-0000-0000-00000000a001";
pub const SMS_CASE_UPDATE: &str = "00000000-0000-0000-0000-00000000a002";
pub const SMS_CASE_CLOSE: &str = "00000000-0000-0000-0000-00000000a003";
pub const SMS_TASK_ASSIGNED: &str = "00000000-0000-0000-0000-00000000a004";
pub const SMS_DECISION_MADE: &str = "00000000-0000-0000-0000-00000000a005";
pub const SMS_MESSAGE_RECEIVED: &str = "00000000-0000-0000-0000-00000000a006";

pub const TASK_OBJECT_TYPE: &str = "5f5a9c9b-2d49-4b4a-9b3a-0a4d7c2b1f10";
pub const MESSAGE_OBJECT_TYPE: &str = "38327774-7023-4f25-9386-acb0c6f10636";
pub const ALLOWED_INFO_OBJECT_TYPE: &str = "0a9e2b4c-6f1d-4c8e-8a3b-5d7f9e1c2b4a";

pub const CASE_URI: &str = "https://zaken.example/zaken/api/v1/zaken/9b1d";
pub const CASE_TYPE_URI: &str = "https://catalogi.example/catalogi/api/v1/zaaktypen/3c2a";
pub const CITIZEN_NUMBER: &str = "123456782";

pub fn base_vars() -> Vec<(String, String)> {
    [
        ("SERVER_PORT", "8080"),
        ("WORKFLOW_VERSION", "2"),
        ("NOTIFY_API_BASE_URL", "https://notify.example"),
        ("NOTIFY_API_KEY", "test-key"),
        ("ZAKEN_BASE_URL", "https://zaken.example/zaken/api/v1"),
        ("ZGW_TOKEN", "zgw-token"),
        ("OPEN_KLANT_BASE_URL", "https://klant.example/klantinteracties/api/v1"),
        ("OPEN_KLANT_TOKEN", "klant-token"),
        ("OBJECTS_BASE_URL", "https://objects.example/api/v2"),
        ("OBJECTS_TOKEN", "objects-token"),
        ("OBJECTTYPES_BASE_URL", "https://objecttypes.example/api/v2"),
        ("OBJECT_TYPE_TASK_UUID", TASK_OBJECT_TYPE),
        ("OBJECT_TYPE_MESSAGE_UUID", MESSAGE_OBJECT_TYPE),
        ("MESSAGES_ALLOWED", "true"),
        ("WHITELIST_CASE_CREATE_IDS", "*"),
        ("WHITELIST_CASE_UPDATE_IDS", "*"),
        ("WHITELIST_CASE_CLOSE_IDS", "*"),
        ("WHITELIST_TASK_ASSIGNED_IDS", "*"),
        ("WHITELIST_DECISION_MADE_IDS", "*"),
        ("WHITELIST_DECISION_INFO_OBJECT_TYPE_UUIDS", ALLOWED_INFO_OBJECT_TYPE),
        ("TEMPLATE_EMAIL_CASE_CREATE", EMAIL_CASE_CREATE),
        ("TEMPLATE_EMAIL_CASE_UPDATE", EMAIL_CASE_UPDATE),
        ("TEMPLATE_EMAIL_CASE_CLOSE", EMAIL_CASE_CLOSE),
        ("TEMPLATE_EMAIL_TASK_ASSIGNED", EMAIL_TASK_ASSIGNED),
        ("TEMPLATE_EMAIL_DECISION_MADE", EMAIL_DECISION_MADE),
        ("TEMPLATE_EMAIL_MESSAGE_RECEIVED", EMAIL_MESSAGE_RECEIVED),
        ("TEMPLATE_SMS_CASE_CREATE", SMS_CASE_CREATE),
        ("TEMPLATE_SMS_CASE_UPDATE", SMS_CASE_UPDATE),
        ("TEMPLATE_SMS_CASE_CLOSE", SMS_CASE_CLOSE),
        ("TEMPLATE_SMS_TASK_ASSIGNED", SMS_TASK_ASSIGNED),
        ("TEMPLATE_SMS_DECISION_MADE", SMS_DECISION_MADE),
        ("TEMPLATE_SMS_MESSAGE_RECEIVED", SMS_MESSAGE_RECEIVED),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Test configuration with every whitelist open, optionally overridden.
pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars = base_vars();
    for (key, value) in overrides {
        vars.retain(|(k, _)| k != key);
        vars.push((key.to_string(), value.to_string()));
    }

    Config::from_vars(vars).expect("test configuration must be valid")
}

pub fn deps(config: Config, sender: Arc<MockSender>) -> ScenarioDeps {
    let whitelists = Whitelists::from_config(&config);
    ScenarioDeps {
        config: Arc::new(config),
        whitelists: Arc::new(whitelists),
        sender,
    }
}

pub fn template(id: &str) -> Uuid {
    Uuid::parse_str(id).unwrap()
}

pub fn event(
    channel: EventChannel,
    resource: EventResource,
    main_object_uri: &str,
    resource_uri: &str,
) -> NotificationEvent {
    NotificationEvent {
        action: EventAction::Create,
        channel,
        resource,
        main_object_uri: main_object_uri.to_string(),
        resource_uri: resource_uri.to_string(),
        created_at: Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap(),
        attributes: EventAttributes::default(),
    }
}

pub fn case_event(resource: EventResource) -> NotificationEvent {
    let mut event = event(
        EventChannel::Zaken,
        resource,
        CASE_URI,
        "https://zaken.example/zaken/api/v1/statussen/77aa",
    );
    event.attributes.case_type_uri = Some(CASE_TYPE_URI.to_string());
    event
}

pub fn object_event(object_type: &str) -> NotificationEvent {
    let mut event = event(
        EventChannel::Objecten,
        EventResource::Object,
        "https://objects.example/api/v2/objects/4411",
        "https://objects.example/api/v2/objects/4411",
    );
    event.attributes.object_type_uri =
        Some(format!("https://objecttypes.example/api/v2/objecttypes/{}", object_type));
    event
}

pub fn decision_event() -> NotificationEvent {
    event(
        EventChannel::Besluiten,
        EventResource::DecisionInfoObject,
        "https://besluiten.example/besluiten/api/v1/besluiten/d1",
        "https://besluiten.example/besluiten/api/v1/besluitinformatieobjecten/bio1",
    )
}

pub fn case() -> Case {
    Case {
        url: CASE_URI.to_string(),
        identification: "ZAAK-2026-0001".to_string(),
        name: "Aanvraag parkeervergunning".to_string(),
        case_type_uri: CASE_TYPE_URI.to_string(),
        registration_date: NaiveDate::from_ymd_opt(2026, 10, 1),
    }
}

pub fn case_type(notification_expected: bool) -> CaseType {
    CaseType {
        url: CASE_TYPE_URI.to_string(),
        identification: "PARKEER-01".to_string(),
        name: "Parkeervergunning".to_string(),
        is_notification_expected: notification_expected,
    }
}

pub fn party(channel: DistributionChannel) -> PartyData {
    PartyData {
        id: "https://klant.example/klanten/1".to_string(),
        citizen_number: Some(CITIZEN_NUMBER.to_string()),
        name: "Jan".to_string(),
        surname_prefix: "van".to_string(),
        surname: "Dijk".to_string(),
        distribution_channel: channel,
        email_address: "jan@example.nl".to_string(),
        telephone_number: "0618758539".to_string(),
    }
}

pub fn status(status_type_uri: &str, day: u32) -> CaseStatus {
    CaseStatus {
        url: format!("https://zaken.example/zaken/api/v1/statussen/{}", day),
        status_type_uri: status_type_uri.to_string(),
        set_at: Utc.with_ymd_and_hms(2026, 10, day, 12, 0, 0).unwrap(),
    }
}

pub fn status_type(name: &str, is_final: bool) -> CaseStatusType {
    CaseStatusType {
        url: format!("https://catalogi.example/catalogi/api/v1/statustypen/{}", name),
        name: name.to_string(),
        is_final,
    }
}

pub fn info_object(
    url: &str,
    type_uuid: &str,
    status: InfoObjectStatus,
    confidentiality: Confidentiality,
) -> InfoObject {
    InfoObject {
        url: url.to_string(),
        identification: "DOC-1".to_string(),
        type_uri: format!(
            "https://catalogi.example/catalogi/api/v1/informatieobjecttypen/{}",
            type_uuid
        ),
        status,
        confidentiality,
    }
}

pub fn decision_resource() -> DecisionResource {
    DecisionResource {
        url: "https://besluiten.example/besluiten/api/v1/besluitinformatieobjecten/bio1"
            .to_string(),
        decision_uri: "https://besluiten.example/besluiten/api/v1/besluiten/d1".to_string(),
        info_object_uri:
            "https://documenten.example/documenten/api/v1/enkelvoudiginformatieobjecten/doc1"
                .to_string(),
    }
}

pub fn decision() -> Decision {
    Decision {
        url: "https://besluiten.example/besluiten/api/v1/besluiten/d1".to_string(),
        identification: "BESLUIT-2026-7".to_string(),
        decision_type_uri: "https://catalogi.example/catalogi/api/v1/besluittypen/bt1".to_string(),
        case_uri: CASE_URI.to_string(),
        date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
    }
}

pub fn decision_type() -> DecisionType {
    DecisionType {
        url: "https://catalogi.example/catalogi/api/v1/besluittypen/bt1".to_string(),
        name: "Vergunning verleend".to_string(),
        generic_name: "vergunning".to_string(),
        publication_indication: false,
    }
}

pub fn task(status: TaskStatus, with_expiration: bool) -> TaskObject {
    TaskObject {
        title: "Lever uw identiteitsbewijs aan".to_string(),
        status,
        expiration_date: with_expiration
            .then(|| Utc.with_ymd_and_hms(2026, 11, 5, 23, 0, 0).unwrap()),
        case_uri: CASE_URI.to_string(),
        identification: Identification {
            kind: IdentificationKind::Bsn,
            value: CITIZEN_NUMBER.to_string(),
        },
    }
}

pub fn message() -> MessageObject {
    MessageObject {
        subject: "Uw aanvraag is ontvangen".to_string(),
        action_perspective: "informeren".to_string(),
        published_at: Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap(),
        identification: Identification {
            kind: IdentificationKind::Bsn,
            value: CITIZEN_NUMBER.to_string(),
        },
    }
}

/// Canned registry answers plus a log of every query made.
#[derive(Default)]
pub struct MockRegistry {
    pub case: Option<Case>,
    pub case_type: Option<CaseType>,
    pub statuses: Vec<CaseStatus>,
    pub status_types: Vec<CaseStatusType>,
    pub event_status: Option<CaseStatus>,
    pub party: Option<PartyData>,
    pub decision_resource: Option<DecisionResource>,
    pub info_object: Option<InfoObject>,
    pub decision: Option<Decision>,
    pub decision_type: Option<DecisionType>,
    pub documents: Vec<InfoObject>,
    pub task: Option<TaskObject>,
    pub message: Option<MessageObject>,
    pub create_object_error: Option<String>,
    pub calls: Mutex<Vec<&'static str>>,
    pub created_objects: Mutex<Vec<serde_json::Value>>,
}

impl MockRegistry {
    /// A registry answering every case question for the given party.
    pub fn for_case(party: PartyData, notification_expected: bool) -> Self {
        Self {
            case: Some(case()),
            case_type: Some(case_type(notification_expected)),
            party: Some(party),
            ..Self::default()
        }
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, call: &str) -> bool {
        self.calls().iter().any(|c| *c == call)
    }

    pub fn created_objects(&self) -> Vec<serde_json::Value> {
        self.created_objects.lock().unwrap().clone()
    }
}

fn canned<T: Clone>(value: &Option<T>, what: &str) -> Result<T, Error> {
    value
        .clone()
        .ok_or_else(|| anyhow!("{} is not available in the registry", what))
}

pub struct MockContext(pub Arc<MockRegistry>);

#[async_trait]
impl QueryContext for MockContext {
    async fn get_case(&self, _case_uri: &str) -> Result<Case, Error> {
        self.0.record("get_case");
        canned(&self.0.case, "case")
    }

    async fn get_case_type(&self, _case_type_uri: &str) -> Result<CaseType, Error> {
        self.0.record("get_case_type");
        canned(&self.0.case_type, "case type")
    }

    async fn get_case_statuses(&self, _case_uri: &str) -> Result<Vec<CaseStatus>, Error> {
        self.0.record("get_case_statuses");
        Ok(self.0.statuses.clone())
    }

    async fn get_case_status_type(&self, status_type_uri: &str) -> Result<CaseStatusType, Error> {
        self.0.record("get_case_status_type");
        self.0
            .status_types
            .iter()
            .find(|t| t.url == status_type_uri)
            .cloned()
            .ok_or_else(|| anyhow!("status type {} is not available", status_type_uri))
    }

    async fn get_event_status(&self) -> Result<CaseStatus, Error> {
        self.0.record("get_event_status");
        canned(&self.0.event_status, "status")
    }

    async fn get_party_data(
        &self,
        _case_uri: Option<&str>,
        _citizen_number: Option<&str>,
    ) -> Result<PartyData, Error> {
        self.0.record("get_party_data");
        canned(&self.0.party, "party")
    }

    async fn get_decision_resource(&self) -> Result<DecisionResource, Error> {
        self.0.record("get_decision_resource");
        canned(&self.0.decision_resource, "decision resource")
    }

    async fn get_info_object(&self, _info_object_uri: &str) -> Result<InfoObject, Error> {
        self.0.record("get_info_object");
        canned(&self.0.info_object, "info object")
    }

    async fn get_decision(&self, _decision_uri: &str) -> Result<Decision, Error> {
        self.0.record("get_decision");
        canned(&self.0.decision, "decision")
    }

    async fn get_decision_type(&self, _decision_type_uri: &str) -> Result<DecisionType, Error> {
        self.0.record("get_decision_type");
        canned(&self.0.decision_type, "decision type")
    }

    async fn get_documents(&self, _decision_uri: &str) -> Result<Vec<InfoObject>, Error> {
        self.0.record("get_documents");
        Ok(self.0.documents.clone())
    }

    async fn get_task(&self) -> Result<TaskObject, Error> {
        self.0.record("get_task");
        canned(&self.0.task, "task")
    }

    async fn get_message(&self) -> Result<MessageObject, Error> {
        self.0.record("get_message");
        canned(&self.0.message, "message")
    }

    async fn create_object(&self, data: serde_json::Value) -> Result<(), Error> {
        self.0.record("create_object");
        if let Some(error) = &self.0.create_object_error {
            return Err(anyhow!("{}", error));
        }
        self.0.created_objects.lock().unwrap().push(data);
        Ok(())
    }
}

pub struct MockQueryService(pub Arc<MockRegistry>);

impl DataQueryService for MockQueryService {
    fn from(&self, _event: &NotificationEvent) -> Box<dyn QueryContext> {
        Box::new(MockContext(Arc::clone(&self.0)))
    }
}

/// Records sends; can be told to fail or to stall.
#[derive(Default)]
pub struct MockSender {
    pub email_error: Option<String>,
    pub sms_error: Option<String>,
    pub preview_error: Option<String>,
    pub delay: Option<Duration>,
    pub sent: Mutex<Vec<NotifyData>>,
    pub previews: AtomicUsize,
}

impl MockSender {
    pub fn sent(&self) -> Vec<NotifyData> {
        self.sent.lock().unwrap().clone()
    }

    pub fn previews(&self) -> usize {
        self.previews.load(Ordering::SeqCst)
    }

    async fn stall(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl NotifySender for MockSender {
    async fn send_email(&self, data: &NotifyData) -> Result<(), Error> {
        self.stall().await;
        if let Some(error) = &self.email_error {
            return Err(anyhow!("{}", error));
        }
        self.sent.lock().unwrap().push(data.clone());
        Ok(())
    }

    async fn send_sms(&self, data: &NotifyData) -> Result<(), Error> {
        self.stall().await;
        if let Some(error) = &self.sms_error {
            return Err(anyhow!("{}", error));
        }
        self.sent.lock().unwrap().push(data.clone());
        Ok(())
    }

    async fn generate_template_preview(
        &self,
        _data: &NotifyData,
    ) -> Result<TemplatePreview, Error> {
        self.previews.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.preview_error {
            return Err(anyhow!("{}", error));
        }
        Ok(TemplatePreview {
            subject: "Er is een besluit genomen".to_string(),
            body: "Beste Jan, er is een besluit genomen over uw zaak.".to_string(),
        })
    }
}
