// Domain models shared between the report engine and its consumers.
use serde::{Deserialize, Serialize};

/// Enablement toggle as the report represents it on the wire ("Yes"/"No").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Toggle {
    Yes,
    No,
}

impl Toggle {
    /// Lenient parse covering the spellings the form layer produces
    /// (y/yes/true/1 and n/no/false/0, any case). Anything else is
    /// unrecognized and left to the caller's default.
    pub fn from_loose(value: &str) -> Option<Toggle> {
        match value.trim().to_lowercase().as_str() {
            "y" | "yes" | "true" | "1" => Some(Toggle::Yes),
            "n" | "no" | "false" | "0" => Some(Toggle::No),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Toggle::Yes => "Yes",
            Toggle::No => "No",
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, Toggle::Yes)
    }
}

/// Direction of acceptable variance for a metric threshold.
/// Serialized with the sign-mode symbols the server expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "+/-")]
    Either,
    #[serde(rename = "+")]
    Above,
    #[serde(rename = "-")]
    Below,
}

impl Direction {
    pub fn from_symbol(value: &str) -> Option<Direction> {
        match value.trim() {
            "+/-" => Some(Direction::Either),
            "+" => Some(Direction::Above),
            "-" => Some(Direction::Below),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> &'static str {
        match self {
            Direction::Either => "+/-",
            Direction::Above => "+",
            Direction::Below => "-",
        }
    }
}

/// A readiness/suitability check row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckItem {
    pub enable: Toggle,
    pub field_name: String,
}

/// One point of the monthly sales series feeding the sales chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesPoint {
    pub offset: String,
    pub sales_month: f64,
    #[serde(default, alias = "sales_rolling_12_months")]
    pub rolling_12: f64,
}

// ---------------------------------------------------------------------------
// Save-config payload. Field names and nesting match the server contract.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceItem {
    pub enable: Toggle,
    pub dir: Direction,
    pub field_name: String,
    pub threshold_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingCapitalItem {
    pub enable: Toggle,
    pub dir: Direction,
    pub field_name: String,
    pub var_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSection {
    pub items: Vec<PerformanceItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingCapitalSection {
    pub items: Vec<WorkingCapitalItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IhtConfig {
    pub enable: Toggle,
    pub valuation_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecksSection {
    pub checks: Vec<CheckItem>,
    pub target_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunityConfig {
    pub time_period: u32,
    pub multiple: f64,
    pub target_percent: f64,
    pub performance: PerformanceSection,
    pub working_capital: WorkingCapitalSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub p_period: u32,
    pub multiple: f64,
    #[serde(rename = "IHT")]
    pub iht: IhtConfig,
    #[serde(rename = "Readiness")]
    pub readiness: ChecksSection,
    #[serde(rename = "Opportunity")]
    pub opportunity: OpportunityConfig,
    #[serde(rename = "Suitability")]
    pub suitability: ChecksSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavePayload {
    pub company_id: i64,
    pub version: i64,
    pub config: ReportConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_flag: Option<bool>,
}
