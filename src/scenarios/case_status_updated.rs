use anyhow::anyhow;
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

/// A case received a new, non-final status.
pub struct CaseStatusUpdatedScenario;

#[async_trait]
impl ScenarioStrategy for CaseStatusUpdatedScenario {
    fn name(&self) -> &'static str {
        "case_status_updated"
    }

    async fn gather(
        &self,
        deps: &ScenarioDeps,
        event: &NotificationEvent,
        query: &dyn QueryContext,
    ) -> Result<Gathered, StepError> {
        let (case, _) = gated_case(event, query, &deps.whitelists.case_update).await?;

        let statuses = query.get_case_statuses(&case.url).await?;
        let latest = statuses
            .iter()
            .max_by_key(|status| status.set_at)
            .ok_or_else(|| anyhow!("Case {} has no statuses", case.identification))?;
        let status_type = query.get_case_status_type(&latest.status_type_uri).await?;

        let party = query.get_party_data(Some(&case.url), None).await?;

        let personalization = case_personalization(&case, &party)
            .text("status.omschrijving", status_type.name)
            .build();

        Ok(Gathered {
            kind: TemplateKind::CaseUpdate,
            personalization,
            prepared: PreparedData::new(party, Some(case.url)),
            follow_up: FollowUp::None,
        })
    }
}
