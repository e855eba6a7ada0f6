use async_trait::async_trait;

use crate::{
    clients::query::QueryContext,
    errors::{AbortSignal, StepError},
    models::{
        event::NotificationEvent, notify::TemplateKind, party::PreparedData, response::FollowUp,
    },
    scenarios::{Gathered, ScenarioDeps, ScenarioStrategy, builder::PersonalizationBuilder},
};

/// A message was placed in the citizen's inbox. Not linked to a case.
pub struct MessageReceivedScenario;

#[async_trait]
impl ScenarioStrategy for MessageReceivedScenario {
    fn name(&self) -> &'static str {
        "message_received"
    }

    async fn gather(
        &self,
        deps: &ScenarioDeps,
        _event: &NotificationEvent,
        query: &dyn QueryContext,
    ) -> Result<Gathered, StepError> {
        if !deps.config.messages_allowed {
            return Err(AbortSignal::messages_disabled().into());
        }

        let message = query.get_message().await?;
        let party = query
            .get_party_data(None, Some(&message.identification.value))
            .await?;

        let personalization = PersonalizationBuilder::new()
            .party(&party)
            .text("message.onderwerp", message.subject.as_str())
            .text("message.handelingsperspectief", message.action_perspective.as_str())
            .date("message.publicatiedatum", message.published_at.date_naive())
            .build();

        Ok(Gathered {
            kind: TemplateKind::MessageReceived,
            personalization,
            prepared: PreparedData::new(party, None),
            follow_up: FollowUp::None,
        })
    }
}
