use async_trait::async_trait;

use crate::{
    clients::query::QueryContext,
    errors::{AbortSignal, StepError},
    models::{
        domain::{IdentificationKind, TaskStatus},
        event::NotificationEvent,
        notify::TemplateKind,
        party::PreparedData,
        response::FollowUp,
    },
    scenarios::{
        Gathered, ScenarioDeps, ScenarioStrategy,
        common::{case_personalization, ensure_notification_expected, ensure_whitelisted},
    },
};

/// A task was assigned to a citizen in the context of a case.
pub struct TaskAssignedScenario;

#[async_trait]
impl ScenarioStrategy for TaskAssignedScenario {
    fn name(&self) -> &'static str {
        "task_assigned"
    }

    async fn gather(
        &self,
        deps: &ScenarioDeps,
        _event: &NotificationEvent,
        query: &dyn QueryContext,
    ) -> Result<Gathered, StepError> {
        let task = query.get_task().await?;

        if task.status != TaskStatus::Open {
            return Err(AbortSignal::task_not_open().into());
        }
        if task.identification.kind != IdentificationKind::Bsn {
            return Err(AbortSignal::task_not_for_citizen().into());
        }

        let case = query.get_case(&task.case_uri).await?;
        let case_type = query.get_case_type(&case.case_type_uri).await?;

        ensure_whitelisted(&deps.whitelists.task_assigned, &case_type.identification)?;
        ensure_notification_expected(&case_type)?;

        let party = query
            .get_party_data(None, Some(&task.identification.value))
            .await?;

        let mut personalization = case_personalization(&case, &party)
            .text("taak.titel", task.title.as_str())
            .flag("taak.heeft_verloopdatum", task.expiration_date.is_some());
        personalization = match task.expiration_date {
            Some(expires) => personalization.date("taak.verloopdatum", expires.date_naive()),
            None => personalization.text("taak.verloopdatum", ""),
        };

        Ok(Gathered {
            kind: TemplateKind::TaskAssigned,
            personalization: personalization.build(),
            prepared: PreparedData::new(party, Some(case.url)),
            follow_up: FollowUp::None,
        })
    }
}
