use crate::{
    errors::RoutingError,
    models::{
        notify::NotifyMethod,
        party::{DistributionChannel, PartyData},
    },
};

const COUNTRY_CODE: &str = "+31";

/// Maps a party's distribution channel onto the notifications to send.
///
/// `Both` always yields email before SMS. `None` yields nothing, which is a
/// valid outcome; `Unknown` is an error because the profile is incomplete.
pub fn route(
    channel: DistributionChannel,
    contact: &PartyData,
) -> Result<Vec<(NotifyMethod, String)>, RoutingError> {
    match channel {
        DistributionChannel::Email => {
            Ok(vec![(NotifyMethod::Email, contact.email_address.clone())])
        }
        DistributionChannel::Sms => Ok(vec![(
            NotifyMethod::Sms,
            normalize_mobile_number(&contact.telephone_number),
        )]),
        DistributionChannel::Both => Ok(vec![
            (NotifyMethod::Email, contact.email_address.clone()),
            (
                NotifyMethod::Sms,
                normalize_mobile_number(&contact.telephone_number),
            ),
        ]),
        DistributionChannel::None => Ok(Vec::new()),
        DistributionChannel::Unknown => Err(RoutingError::NotificationMethodUnknown),
    }
}

/// Rewrites a national number (`06...`) into international form (`+316...`).
/// Numbers that already carry a `+` are returned unchanged.
pub fn normalize_mobile_number(number: &str) -> String {
    let number = number.trim();

    if number.starts_with('+') {
        return number.to_string();
    }

    if let Some(rest) = number.strip_prefix("00") {
        return format!("+{}", rest);
    }

    match number.strip_prefix('0') {
        Some(rest) => format!("{}{}", COUNTRY_CODE, rest),
        None => number.to_string(),
    }
}
