// Metric catalog: one descriptor per server-evaluated metric, naming the
// fields read from the page, the form keys posted, and the response keys
// written back. The catalog is the single place the page/server contract
// lives; the evaluation service is generic over it.

pub mod catalog;

pub use catalog::{descriptor, CATALOG, PERFORMANCE_METRICS, WORKING_CAPITAL_METRICS};

use shared::models::Toggle;

use crate::fields::{ids, FieldStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricId {
    Revenue,
    GrossMargin,
    OverheadValue,
    OverheadPercent,
    Ebitda,
    NewCustomers,
    Retention,
    CashPosition,
    DebtorDays,
    CreditorDays,
    StockDays,
}

impl MetricId {
    pub const ALL: [MetricId; 11] = [
        MetricId::Revenue,
        MetricId::GrossMargin,
        MetricId::OverheadValue,
        MetricId::OverheadPercent,
        MetricId::Ebitda,
        MetricId::NewCustomers,
        MetricId::Retention,
        MetricId::CashPosition,
        MetricId::DebtorDays,
        MetricId::CreditorDays,
        MetricId::StockDays,
    ];

    /// Short key used in endpoint tables and logs.
    pub fn key(&self) -> &'static str {
        match self {
            MetricId::Revenue => "revenue",
            MetricId::GrossMargin => "gm",
            MetricId::OverheadValue => "oh_val",
            MetricId::OverheadPercent => "oh_pct",
            MetricId::Ebitda => "ebitda",
            MetricId::NewCustomers => "newcust",
            MetricId::Retention => "retention",
            MetricId::CashPosition => "cash",
            MetricId::DebtorDays => "debtordays",
            MetricId::CreditorDays => "creditordays",
            MetricId::StockDays => "stockdays",
        }
    }
}

/// How the evaluation period is sourced for a metric.
#[derive(Debug, Clone, Copy)]
pub enum PeriodSpec {
    /// Posts the shared period field; the request is skipped if the page
    /// has no period field.
    Shared { key: &'static str },
    /// Posts a hardcoded period (EBITDA always evaluates over 12 months).
    Fixed { key: &'static str, value: &'static str },
    /// No period in the form (working-capital metrics).
    Omitted,
}

/// Response key written into a page field, optionally amount-formatted on
/// the way in.
#[derive(Debug, Clone, Copy)]
pub struct OutputMap {
    pub key: &'static str,
    pub field: &'static str,
    pub amount: bool,
}

/// Response key driving the metric's tick/cross indicator.
#[derive(Debug, Clone, Copy)]
pub struct FlagMap {
    pub key: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct MetricDescriptor {
    pub id: MetricId,
    /// Field name the save payload uses for this metric's criteria row.
    pub display_name: &'static str,
    pub enable_field: &'static str,
    pub enable_key: &'static str,
    /// Whether the enabled value is normalized to Yes/No before posting.
    /// The revenue endpoint historically receives the raw value.
    pub normalize_enable: bool,
    pub dir_field: &'static str,
    pub dir_key: &'static str,
    pub threshold_field: &'static str,
    pub threshold_key: &'static str,
    pub period: PeriodSpec,
    /// Include the valuation-adjustment field when present and non-empty.
    pub sends_val_adj: bool,
    /// Counted by the busy gauge while the request is in flight.
    pub slow: bool,
    pub flag: FlagMap,
    pub outputs: &'static [OutputMap],
    /// Re-derive multiple-driven fields after applying the response.
    pub refresh_derived: bool,
    /// Rerun the IHT check after applying (EBITDA feeds its estimate).
    pub recompute_iht: bool,
}

impl MetricDescriptor {
    /// Assemble the form body for this metric from current field state.
    /// `None` when any required input field is missing from the page, in
    /// which case the evaluation is skipped outright.
    pub fn build_form(&self, fields: &dyn FieldStore) -> Option<Vec<(String, String)>> {
        let enable = fields.value(self.enable_field)?;
        let shared_period = match self.period {
            PeriodSpec::Shared { .. } => Some(fields.value(ids::P_PERIOD)?),
            _ => None,
        };
        let dir = fields.value(self.dir_field)?;
        let threshold = fields.value(self.threshold_field)?;

        let enable = if self.normalize_enable {
            normalize_enable_value(&enable)
        } else {
            enable
        };

        let mut form = Vec::with_capacity(6);
        form.push((self.enable_key.to_string(), enable));
        if let PeriodSpec::Shared { key } = self.period {
            form.push((key.to_string(), shared_period.unwrap_or_default()));
        }
        form.push((self.dir_key.to_string(), dir));
        form.push((self.threshold_key.to_string(), threshold));
        if let PeriodSpec::Fixed { key, value } = self.period {
            form.push((key.to_string(), value.to_string()));
        }
        if self.sends_val_adj {
            if let Some(adj) = fields.value(ids::VAL_ADJ) {
                if !adj.is_empty() {
                    form.push((ids::VAL_ADJ.to_string(), adj));
                }
            }
        }
        Some(form)
    }
}

/// Yes/No normalization applied before posting enable values; unrecognized
/// spellings pass through untouched.
pub fn normalize_enable_value(raw: &str) -> String {
    match Toggle::from_loose(raw) {
        Some(toggle) => toggle.as_str().to_string(),
        None => raw.to_string(),
    }
}
