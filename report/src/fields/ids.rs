// Field ids shared across the propagator, the IHT check, the donut targets
// and the save builder. Per-metric input/output ids live in the metric
// catalog next to the form keys they are posted with.

pub const P_PERIOD: &str = "p_period";

pub const OPP_MULTIPLE: &str = "opp_multiple";
pub const IHT_MULTIPLE: &str = "iht_multiple";
pub const VAL_ADJ: &str = "val_adj";

pub const IHT_ENABLE: &str = "iht_enable";
pub const IHT_EBITDA_TY: &str = "iht_ebitda_ty";
pub const IHT_VALUATION_THRESHOLD: &str = "iht_valuation_threshold";
pub const IHT_EST_VALUATION: &str = "iht_est_valuation";
pub const IHT_RISK_ICON: &str = "iht_risk_icon";

pub const TARGET_SUITABILITY: &str = "target_suitability";
pub const TARGET_OPPORTUNITY: &str = "target_opportunity";
pub const TARGET_READINESS: &str = "target_readiness";

pub const REVENUE_PROFIT_IMPACT: &str = "opp_Revenue_Impact_Profit";
pub const REVENUE_VAL_IMPACT: &str = "opp_Revenue_val_impact";
pub const GM_PROFIT_IMPACT: &str = "opp_gm_profit_impact";
pub const GM_VAL_IMPACT: &str = "opp_gm_val_impact";
pub const OVERHEADS_PROFIT_IMPACT: &str = "opp_Overheads_profit_impact";
pub const OVERHEADS_VAL_IMPACT: &str = "opp_Overheads_val_impact";
pub const OVERHEAD_PCT_PROFIT_IMPACT: &str = "opp_Overhead_pct_profit_impact";
pub const OVERHEAD_PCT_VAL_IMPACT: &str = "opp_Overhead_pct_val_impact";
