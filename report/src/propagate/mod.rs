// Derived-field propagation.
//
// A single "multiple" scalar is mirrored into two fields and drives every
// valuation figure on the page: each profit impact times the multiple gives
// the matching valuation impact, and EBITDA times the multiple gives the
// IHT estimated valuation. Everything is recomputed in full on each
// triggering event; the field store is the only state.

pub mod iht;

use shared::utils::{format_amount, parse_amount, parse_numeric};

use crate::fields::{ids, FieldStore};

/// Profit-impact field paired with the valuation-impact field it feeds.
#[derive(Debug, Clone, Copy)]
pub struct ImpactPair {
    pub profit: &'static str,
    pub valuation: &'static str,
}

pub const VALUATION_PAIRS: [ImpactPair; 4] = [
    ImpactPair { profit: ids::REVENUE_PROFIT_IMPACT, valuation: ids::REVENUE_VAL_IMPACT },
    ImpactPair { profit: ids::GM_PROFIT_IMPACT, valuation: ids::GM_VAL_IMPACT },
    ImpactPair { profit: ids::OVERHEADS_PROFIT_IMPACT, valuation: ids::OVERHEADS_VAL_IMPACT },
    ImpactPair { profit: ids::OVERHEAD_PCT_PROFIT_IMPACT, valuation: ids::OVERHEAD_PCT_VAL_IMPACT },
];

/// Read the shared multiple from the page: the primary field wins when it
/// is present and editable, then the secondary, then whichever of the two
/// exists at all. A blank field reads as zero; a non-numeric value is
/// unset.
pub fn current_multiple(fields: &dyn FieldStore) -> Option<f64> {
    let primary = fields.value(ids::OPP_MULTIPLE);
    let secondary = fields.value(ids::IHT_MULTIPLE);

    let source = if primary.is_some() && !fields.is_disabled(ids::OPP_MULTIPLE) {
        primary
    } else if secondary.is_some() && !fields.is_disabled(ids::IHT_MULTIPLE) {
        secondary
    } else {
        primary.or(secondary)
    };

    parse_numeric(&source?)
}

/// Write the multiple into both mirror fields. Keeps the invariant that the
/// mirrors always show the last value entered in either.
pub fn mirror_multiple(fields: &mut dyn FieldStore, multiple: f64) {
    let text = multiple_text(multiple);
    fields.set_value(ids::OPP_MULTIPLE, &text);
    fields.set_value(ids::IHT_MULTIPLE, &text);
}

/// Recompute every field derived from the multiple. A finite multiple is
/// mirrored and propagated; an unset/non-finite one clears all valuation
/// impacts and the IHT estimate.
pub fn propagate(fields: &mut dyn FieldStore, multiple: Option<f64>) {
    let multiple = multiple.filter(|m| m.is_finite());
    if let Some(m) = multiple {
        mirror_multiple(fields, m);
    }
    update_valuation_impacts(fields, multiple);
    update_iht_estimate(fields, multiple);
}

/// Full refresh from current field state: read the multiple, propagate and
/// rerun the IHT check. When the multiple is unset the whole pass aborts
/// and prior field values stay intact.
pub fn refresh_derived(fields: &mut dyn FieldStore) {
    let Some(multiple) = current_multiple(fields) else {
        return;
    };
    propagate(fields, Some(multiple));
    // the estimate changed, so the pass/fail indicator may flip
    iht::recompute(fields);
}

fn update_valuation_impacts(fields: &mut dyn FieldStore, multiple: Option<f64>) {
    for pair in VALUATION_PAIRS {
        let Some(profit_raw) = fields.value(pair.profit) else {
            continue;
        };
        if !fields.exists(pair.valuation) {
            continue;
        }

        match multiple {
            Some(m) if !profit_raw.trim().is_empty() => {
                let valuation = parse_amount(&profit_raw) * m;
                fields.set_value(pair.valuation, &format_amount(valuation));
            }
            _ => {
                fields.clear(pair.valuation);
            }
        }
    }
}

fn update_iht_estimate(fields: &mut dyn FieldStore, multiple: Option<f64>) {
    let Some(ebitda_raw) = fields.value(ids::IHT_EBITDA_TY) else {
        return;
    };
    if !fields.exists(ids::IHT_EST_VALUATION) {
        return;
    }

    match multiple {
        Some(m) => {
            let estimate = parse_amount(&ebitda_raw) * m;
            let text = if estimate.is_finite() { format_amount(estimate) } else { String::new() };
            fields.set_value(ids::IHT_EST_VALUATION, &text);
        }
        None => {
            fields.clear(ids::IHT_EST_VALUATION);
        }
    }
}

pub(crate) fn multiple_text(multiple: f64) -> String {
    if multiple.fract() == 0.0 && multiple.abs() < 1e15 {
        format!("{}", multiple as i64)
    } else {
        format!("{}", multiple)
    }
}
