// IHT valuation check: estimated valuation = EBITDA x multiple, passing
// when the check is enabled and the estimate reaches the threshold.

use shared::utils::{format_amount, parse_amount};

use super::multiple_text;
use crate::fields::{ids, FieldStore, Indicator};

/// Outcome of a recomputation, returned for callers that want to inspect
/// the result (the store is already updated).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IhtOutcome {
    pub enabled: bool,
    pub estimate: f64,
    pub pass: bool,
}

/// Recompute the IHT estimate and pass/fail indicator from current field
/// state. No-op when the page does not carry the IHT block.
pub fn recompute(fields: &mut dyn FieldStore) -> Option<IhtOutcome> {
    let enable_raw = fields.value(ids::IHT_ENABLE)?;
    let ebitda_raw = fields.value(ids::IHT_EBITDA_TY)?;
    let threshold_raw = fields.value(ids::IHT_VALUATION_THRESHOLD)?;
    if !fields.exists(ids::IHT_EST_VALUATION) {
        return None;
    }

    let enabled = enable_raw == "Yes";
    let ebitda = parse_amount(&ebitda_raw);
    let threshold = parse_amount(&threshold_raw);
    let multiple = checked_multiple(fields);

    // keep the visible multiple in step with whichever source supplied it
    fields.set_value(ids::IHT_MULTIPLE, &multiple_text(multiple));

    let estimate = ebitda * multiple;
    let text = if enabled { format_amount(estimate) } else { String::new() };
    fields.set_value(ids::IHT_EST_VALUATION, &text);

    let pass = enabled && estimate >= threshold;
    let state = if !enabled {
        Indicator::Blank
    } else if pass {
        Indicator::Pass
    } else {
        Indicator::Fail
    };
    fields.set_indicator(ids::IHT_RISK_ICON, state);

    Some(IhtOutcome { enabled, estimate, pass })
}

/// The multiple the check runs against: the valuation-adjustment field when
/// the page has one, otherwise the IHT multiple field, otherwise 3.
fn checked_multiple(fields: &dyn FieldStore) -> f64 {
    match fields.value(ids::VAL_ADJ) {
        Some(raw) => parse_amount(&raw),
        None => fields
            .value(ids::IHT_MULTIPLE)
            .map(|raw| parse_amount(&raw))
            .unwrap_or(3.0),
    }
}
