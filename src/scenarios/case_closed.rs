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

/// A case reached its final status.
pub struct CaseClosedScenario;

#[async_trait]
impl ScenarioStrategy for CaseClosedScenario {
    fn name(&self) -> &'static str {
        "case_closed"
    }

    async fn gather(
        &self,
        deps: &ScenarioDeps,
        event: &NotificationEvent,
        query: &dyn QueryContext,
    ) -> Result<Gathered, StepError> {
        let (case, _) = gated_case(event, query, &deps.whitelists.case_close).await?;
        let party = query.get_party_data(Some(&case.url), None).await?;

        Ok(Gathered {
            kind: TemplateKind::CaseClose,
            personalization: case_personalization(&case, &party).build(),
            prepared: PreparedData::new(party, Some(case.url)),
            follow_up: FollowUp::None,
        })
    }
}
