//! Turns raw per-item fields into clean, numbered provider records.

use crate::models::{PricingGroup, ProviderRecord, RawProviderFields};

use super::text::normalize_whitespace;

/// A regular price left at zero falls back to the promotional one: a provider
/// without a distinct regular price is quoted at its promotional price.
pub fn apply_fallback(promotional: &PricingGroup, regular: PricingGroup) -> PricingGroup {
    let pick = |regular: f64, promotional: f64| if regular == 0.0 { promotional } else { regular };

    PricingGroup {
        fee: pick(regular.fee, promotional.fee),
        exchange_rate: pick(regular.exchange_rate, promotional.exchange_rate),
        recipient_gets: pick(regular.recipient_gets, promotional.recipient_gets),
    }
}

/// Cleans every record, drops the nameless ones and numbers the rest from 1 in order.
pub fn normalize(raw: Vec<RawProviderFields>) -> Vec<ProviderRecord> {
    raw.into_iter()
        .filter_map(clean)
        .zip(1u32..)
        .map(|(record, id)| ProviderRecord { id, ..record })
        .collect()
}

fn clean(raw: RawProviderFields) -> Option<ProviderRecord> {
    let name = normalize_whitespace(raw.name.as_deref().unwrap_or_default());
    if name.is_empty() {
        return None;
    }

    let promotional = PricingGroup::from(&raw.promotional);
    let regular = apply_fallback(&promotional, PricingGroup::from(&raw.regular));

    Some(ProviderRecord {
        id: 0,
        name,
        logo: normalize_whitespace(raw.logo.as_deref().unwrap_or_default()),
        monito_score: raw.monito_score.unwrap_or(0.0),
        transfer_time: normalize_whitespace(raw.transfer_time.as_deref().unwrap_or_default()),
        best_deal: raw.best_deal,
        promotional,
        regular,
    })
}
