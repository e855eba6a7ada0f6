use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use crate::{
    clients::query::QueryContext,
    errors::{AbortSignal, StepError},
    models::{
        audit::MessageAuditObject,
        event::{NotificationEvent, last_segment},
        notify::{NotifyData, NotifyMethod, TemplateKind},
        party::PreparedData,
        response::{DecisionContext, FollowUp},
    },
    scenarios::{
        Gathered, ScenarioDeps, ScenarioStrategy,
        common::{case_personalization, ensure_notification_expected, ensure_whitelisted},
    },
};

/// A document was attached to a decision on a citizen's case.
///
/// Once the notification is out, the rendered message is stored as an inbox
/// message that links the decision's definitive, public documents. The send
/// and the stored message are not atomic: a failure to store is reported as
/// a processing failure even though the citizen was already notified.
pub struct DecisionMadeScenario;

#[async_trait]
impl ScenarioStrategy for DecisionMadeScenario {
    fn name(&self) -> &'static str {
        "decision_made"
    }

    async fn gather(
        &self,
        deps: &ScenarioDeps,
        _event: &NotificationEvent,
        query: &dyn QueryContext,
    ) -> Result<Gathered, StepError> {
        let resource = query.get_decision_resource().await?;
        let info_object = query.get_info_object(&resource.info_object_uri).await?;

        let type_uuid = last_segment(&info_object.type_uri).unwrap_or_default();
        if !deps.whitelists.decision_info_object_types.is_allowed(type_uuid) {
            return Err(AbortSignal::info_object_type_not_allowed(type_uuid).into());
        }
        if !info_object.is_definitive() || !info_object.is_public() {
            return Err(AbortSignal::info_object_not_publishable().into());
        }

        let decision = query.get_decision(&resource.decision_uri).await?;
        let case = query.get_case(&decision.case_uri).await?;
        let case_type = query.get_case_type(&case.case_type_uri).await?;

        ensure_whitelisted(&deps.whitelists.decision_made, &case_type.identification)?;
        ensure_notification_expected(&case_type)?;

        let decision_type = query.get_decision_type(&decision.decision_type_uri).await?;
        let party = query.get_party_data(Some(&case.url), None).await?;

        let personalization = case_personalization(&case, &party)
            .text("besluit.identificatie", decision.identification.as_str())
            .text("besluit.omschrijving", decision_type.name.as_str())
            .date("besluit.datum", decision.date)
            .build();

        let case_uri = case.url.clone();
        let follow_up = FollowUp::DecisionAudit(DecisionContext {
            case,
            decision,
            decision_type,
            party: party.clone(),
        });

        Ok(Gathered {
            kind: TemplateKind::DecisionMade,
            personalization,
            prepared: PreparedData::new(party, Some(case_uri)),
            follow_up,
        })
    }

    async fn after_send(
        &self,
        deps: &ScenarioDeps,
        query: &dyn QueryContext,
        notify_data: &[NotifyData],
        follow_up: FollowUp,
    ) -> Result<(), Error> {
        let FollowUp::DecisionAudit(context) = follow_up else {
            return Err(anyhow!("Decision context is missing, the message cannot be stored"));
        };

        let source = notify_data
            .iter()
            .find(|data| data.method == NotifyMethod::Email)
            .or_else(|| notify_data.first())
            .ok_or_else(|| anyhow!("No notify data to render the message from"))?;

        let preview = deps.sender.generate_template_preview(source).await?;
        debug!(decision = %context.decision.identification, "Template preview generated");

        let attachments = query
            .get_documents(&context.decision.url)
            .await?
            .into_iter()
            .filter(|document| document.is_definitive() && document.is_public())
            .map(|document| document.url)
            .collect::<Vec<_>>();

        let citizen_number = context
            .party
            .citizen_number
            .clone()
            .ok_or_else(|| anyhow!("Party has no citizen number, the message cannot be stored"))?;

        let message = MessageAuditObject::new(
            preview.subject,
            preview.body,
            context.case.identification.clone(),
            citizen_number,
            Utc::now(),
        )
        .with_attachments(attachments);

        query.create_object(serde_json::to_value(&message)?).await?;

        info!(
            decision = %context.decision.identification,
            attachments = message.attachments.len(),
            "Decision message stored"
        );
        Ok(())
    }
}
