use async_trait::async_trait;

use crate::{
    clients::query::QueryContext,
    errors::StepError,
    models::{
        event::NotificationEvent, notify::TemplateKind, party::PreparedData, response::FollowUp,
    },
    scenarios::{
        Gathered, ScenarioDeps, ScenarioStrategy,
        common::{case_personalization, gated_case},
    },
};

/// A new case was registered for a citizen.
pub struct CaseCreatedScenario;

#[async_trait]
impl ScenarioStrategy for CaseCreatedScenario {
    fn name(&self) -> &'static str {
        "case_created"
    }

    async fn gather(
        &self,
        deps: &ScenarioDeps,
        event: &NotificationEvent,
        query: &dyn QueryContext,
    ) -> Result<Gathered, StepError> {
        let (case, _) = gated_case(event, query, &deps.whitelists.case_create).await?;
        let party = query.get_party_data(Some(&case.url), None).await?;

        let mut personalization = case_personalization(&case, &party);
        if let Some(registered) = case.registration_date {
            personalization = personalization.date("zaak.registratiedatum", registered);
        }

        Ok(Gathered {
            kind: TemplateKind::CaseCreate,
            personalization: personalization.build(),
            prepared: PreparedData::new(party, Some(case.url)),
            follow_up: FollowUp::None,
        })
    }
}
