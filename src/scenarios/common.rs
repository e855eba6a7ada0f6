use crate::{
    clients::query::QueryContext,
    errors::{AbortSignal, StepError},
    models::{
        domain::{Case, CaseType},
        event::NotificationEvent,
        party::PartyData,
    },
    scenarios::{builder::PersonalizationBuilder, whitelist::WhitelistGate},
};

pub(crate) fn ensure_whitelisted(
    gate: &WhitelistGate,
    identifier: &str,
) -> Result<(), AbortSignal> {
    if gate.is_allowed(identifier) {
        Ok(())
    } else {
        Err(AbortSignal::not_whitelisted(identifier, gate.name()))
    }
}

pub(crate) fn ensure_notification_expected(case_type: &CaseType) -> Result<(), AbortSignal> {
    if case_type.is_notification_expected {
        Ok(())
    } else {
        Err(AbortSignal::notification_not_expected(&case_type.identification))
    }
}

/// Case type gate shared by every case-driven scenario.
///
/// Uses the case type from the event attributes when present, so the case
/// itself is only fetched after the gates pass.
pub(crate) async fn gated_case(
    event: &NotificationEvent,
    query: &dyn QueryContext,
    gate: &WhitelistGate,
) -> Result<(Case, CaseType), StepError> {
    let (case, case_type) = match event.attributes.case_type_uri.as_deref() {
        Some(case_type_uri) => (None, query.get_case_type(case_type_uri).await?),
        None => {
            let case = query.get_case(&event.main_object_uri).await?;
            let case_type = query.get_case_type(&case.case_type_uri).await?;
            (Some(case), case_type)
        }
    };

    ensure_whitelisted(gate, &case_type.identification)?;
    ensure_notification_expected(&case_type)?;

    let case = match case {
        Some(case) => case,
        None => query.get_case(&event.main_object_uri).await?,
    };

    Ok((case, case_type))
}

pub(crate) fn case_personalization(case: &Case, party: &PartyData) -> PersonalizationBuilder {
    PersonalizationBuilder::new()
        .party(party)
        .text("zaak.identificatie", case.identification.as_str())
        .text("zaak.omschrijving", case.name.as_str())
}
