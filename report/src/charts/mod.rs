// Chart models for the report page. Rendering is an external concern; the
// engine only builds the specs and hands them to a `ChartRenderer`.

use shared::models::SalesPoint;

use crate::fields::{ids, FieldStore};
use crate::page::PageContext;

pub const DONUT_GREEN_DONE: &str = "#22c55e";
pub const DONUT_GREEN_REST: &str = "#bbf7d0";
pub const DONUT_YELLOW_DONE: &str = "#f59e0b";
pub const DONUT_YELLOW_REST: &str = "#fde68a";

pub const SALES_BAR_COLOR: &str = "#16a34a";
pub const SALES_LINE_COLOR: &str = "#22c55e";

pub const SUITABILITY_DONUT_ANCHOR: &str = "kpiSuitabilityChart";
pub const OPPORTUNITY_DONUT_ANCHOR: &str = "kpiOpportunityChart";
pub const READINESS_DONUT_ANCHOR: &str = "kpiReadinessChart";
pub const SALES_CHART_ANCHOR: &str = "salesChart";

/// Two-segment donut with a centered percentage label. Green when the raw
/// score reaches its target, yellow otherwise; the drawn value is clamped
/// to 0..=100 but the color comparison uses the raw score.
#[derive(Debug, Clone, PartialEq)]
pub struct DonutSpec {
    pub value: f64,
    pub done_color: &'static str,
    pub rest_color: &'static str,
    pub center_text: String,
}

impl DonutSpec {
    pub fn new(score: f64, target: f64) -> DonutSpec {
        let value = score.clamp(0.0, 100.0);
        let (done_color, rest_color) = if score >= target {
            (DONUT_GREEN_DONE, DONUT_GREEN_REST)
        } else {
            (DONUT_YELLOW_DONE, DONUT_YELLOW_REST)
        };
        DonutSpec {
            value,
            done_color,
            rest_color,
            center_text: format!("{}%", percent_label(value)),
        }
    }

    pub fn segments(&self) -> [f64; 2] {
        [self.value, 100.0 - self.value]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiDonut {
    pub anchor: &'static str,
    pub spec: DonutSpec,
}

/// Build the three KPI donuts. Each target comes from its page field when
/// present and non-blank, falling back to the page-context default.
pub fn build_kpi_donuts(fields: &dyn FieldStore, page: &PageContext) -> Vec<KpiDonut> {
    let target = |field: &str, fallback: f64| match fields.value(field) {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => fallback,
    };

    vec![
        KpiDonut {
            anchor: SUITABILITY_DONUT_ANCHOR,
            spec: DonutSpec::new(
                page.scores.suitability,
                target(ids::TARGET_SUITABILITY, page.targets.suitability),
            ),
        },
        KpiDonut {
            anchor: OPPORTUNITY_DONUT_ANCHOR,
            spec: DonutSpec::new(
                page.scores.opportunity,
                target(ids::TARGET_OPPORTUNITY, page.targets.opportunity),
            ),
        },
        KpiDonut {
            anchor: READINESS_DONUT_ANCHOR,
            spec: DonutSpec::new(
                page.scores.readiness,
                target(ids::TARGET_READINESS, page.targets.readiness),
            ),
        },
    ]
}

/// Monthly sales bars with the rolling-12-months line overlaid.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesChartSpec {
    pub labels: Vec<String>,
    pub monthly: Vec<f64>,
    pub rolling: Vec<f64>,
    pub bar_color: &'static str,
    pub line_color: &'static str,
}

impl SalesChartSpec {
    pub fn from_points(points: &[SalesPoint]) -> SalesChartSpec {
        SalesChartSpec {
            labels: points.iter().map(|p| p.offset.clone()).collect(),
            monthly: points.iter().map(|p| p.sales_month).collect(),
            rolling: points.iter().map(|p| p.rolling_12).collect(),
            bar_color: SALES_BAR_COLOR,
            line_color: SALES_LINE_COLOR,
        }
    }
}

/// Traffic-light tone for a KPI box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Yellow,
    Red,
}

/// Coloring rule attached to a KPI box; maps its Yes/No value to a tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpiRule {
    YesGreenNoYellow,
    NoGreenYesYellow,
    YesRedNoGreen,
}

impl KpiRule {
    pub fn from_attr(attr: &str) -> Option<KpiRule> {
        match attr {
            "yes-green-no-yellow" => Some(KpiRule::YesGreenNoYellow),
            "no-green-yes-yellow" => Some(KpiRule::NoGreenYesYellow),
            "yes-red-no-green" => Some(KpiRule::YesRedNoGreen),
            _ => None,
        }
    }

    pub fn tone(&self, value: &str) -> Option<Tone> {
        let normalized = value.trim().to_lowercase();
        match (self, normalized.as_str()) {
            (KpiRule::YesGreenNoYellow, "yes") => Some(Tone::Green),
            (KpiRule::YesGreenNoYellow, "no") => Some(Tone::Yellow),
            (KpiRule::NoGreenYesYellow, "no") => Some(Tone::Green),
            (KpiRule::NoGreenYesYellow, "yes") => Some(Tone::Yellow),
            (KpiRule::YesRedNoGreen, "yes") => Some(Tone::Red),
            (KpiRule::YesRedNoGreen, "no") => Some(Tone::Green),
            _ => None,
        }
    }
}

/// External rendering collaborator.
pub trait ChartRenderer: Send + Sync {
    fn render_donut(&self, anchor: &str, spec: &DonutSpec);
    fn render_sales(&self, anchor: &str, spec: &SalesChartSpec);
}

/// Renderer that just logs what would be drawn; the headless driver's
/// stand-in for a real charting backend.
pub struct TracingRenderer;

impl ChartRenderer for TracingRenderer {
    fn render_donut(&self, anchor: &str, spec: &DonutSpec) {
        tracing::info!(
            anchor,
            value = spec.value,
            done = spec.done_color,
            label = %spec.center_text,
            "donut"
        );
    }

    fn render_sales(&self, anchor: &str, spec: &SalesChartSpec) {
        tracing::info!(anchor, points = spec.labels.len(), "sales chart");
    }
}

fn percent_label(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
