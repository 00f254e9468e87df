// The eleven metric descriptors. Ordering matches MetricId so lookups are
// a straight index.

use super::{FlagMap, MetricDescriptor, MetricId, OutputMap, PeriodSpec};
use crate::fields::ids;

const REVENUE_OUTPUTS: &[OutputMap] = &[
    OutputMap { key: "rev_profit_impact", field: ids::REVENUE_PROFIT_IMPACT, amount: false },
    OutputMap { key: "rev_val_impact", field: ids::REVENUE_VAL_IMPACT, amount: false },
];

const GM_OUTPUTS: &[OutputMap] = &[
    OutputMap { key: "gm_last_12", field: "opp_gm_last12", amount: false },
    OutputMap { key: "gm_last_6", field: "opp_gm_last6", amount: false },
    OutputMap { key: "gm_last_3", field: "opp_gm_last3", amount: false },
    OutputMap { key: "gm_profit_impact", field: ids::GM_PROFIT_IMPACT, amount: false },
    OutputMap { key: "gm_val_impact", field: ids::GM_VAL_IMPACT, amount: false },
];

const OH_VAL_OUTPUTS: &[OutputMap] = &[
    OutputMap { key: "oh_val_profit_impact", field: ids::OVERHEADS_PROFIT_IMPACT, amount: false },
    OutputMap { key: "oh_val_val_impact", field: ids::OVERHEADS_VAL_IMPACT, amount: false },
];

const OH_PCT_OUTPUTS: &[OutputMap] = &[
    OutputMap { key: "oh_pct_last_12", field: "opp_ohp_last12", amount: false },
    OutputMap { key: "oh_pct_last_6", field: "opp_ohp_last6", amount: false },
    OutputMap { key: "oh_pct_last_3", field: "opp_ohp_last3", amount: false },
    OutputMap { key: "oh_pct_profit_impact", field: ids::OVERHEAD_PCT_PROFIT_IMPACT, amount: false },
    OutputMap { key: "oh_pct_val_impact", field: ids::OVERHEAD_PCT_VAL_IMPACT, amount: false },
];

const EBITDA_OUTPUTS: &[OutputMap] = &[
    OutputMap { key: "ebitda_ty", field: "opp_ebitda_ty_12m", amount: true },
    OutputMap { key: "ebitda_ly", field: "opp_ebitda_ly_12m", amount: true },
    OutputMap { key: "ebitda_var_pct", field: "opp_ebitda_var_pct", amount: false },
    OutputMap { key: "ebitda_var_val", field: "opp_ebitda_var_val", amount: true },
    OutputMap { key: "ebitda_impact", field: "opp_ebitda_impact", amount: false },
];

const NEWCUST_OUTPUTS: &[OutputMap] = &[
    OutputMap { key: "newcust_ty", field: "opp_ncust_ty", amount: false },
    OutputMap { key: "newcust_ly", field: "opp_ncust_ly", amount: false },
    OutputMap { key: "newcust_var_pct", field: "opp_ncust_var_pct", amount: false },
];

const RETENTION_OUTPUTS: &[OutputMap] = &[
    OutputMap { key: "retention_ty", field: "opp_ret_ty", amount: false },
    OutputMap { key: "retention_ly", field: "opp_ret_ly", amount: false },
    OutputMap { key: "retention_var_pct", field: "opp_ret_var_pct", amount: false },
];

const CASH_OUTPUTS: &[OutputMap] = &[
    OutputMap { key: "cash_ty", field: "opp_cp_ty", amount: true },
    OutputMap { key: "cash_ly", field: "opp_cp_ly", amount: true },
    OutputMap { key: "cash_var_pct", field: "opp_cp_var_pct", amount: false },
    OutputMap { key: "cash_var_val", field: "opp_cp_var_val", amount: true },
];

const DEBTOR_OUTPUTS: &[OutputMap] = &[
    OutputMap { key: "debtordays_ty", field: "opp_dd_ty", amount: true },
    OutputMap { key: "debtordays_ly", field: "opp_dd_ly", amount: true },
    OutputMap { key: "debtordays_var_pct", field: "opp_dd_var_pct", amount: false },
    OutputMap { key: "debtordays_var_val", field: "opp_dd_var_val", amount: true },
];

const CREDITOR_OUTPUTS: &[OutputMap] = &[
    OutputMap { key: "creditordays_ty", field: "opp_cd_ty", amount: true },
    OutputMap { key: "creditordays_ly", field: "opp_cd_ly", amount: true },
    OutputMap { key: "creditordays_var_pct", field: "opp_cd_var_pct", amount: false },
    OutputMap { key: "creditordays_var_val", field: "opp_cd_var_val", amount: true },
];

const STOCK_OUTPUTS: &[OutputMap] = &[
    OutputMap { key: "stockdays_ty", field: "opp_sd_ty", amount: true },
    OutputMap { key: "stockdays_ly", field: "opp_sd_ly", amount: true },
    OutputMap { key: "stockdays_var_pct", field: "opp_sd_var_pct", amount: false },
    OutputMap { key: "stockdays_var_val", field: "opp_sd_var_val", amount: true },
];

pub static CATALOG: [MetricDescriptor; 11] = [
    MetricDescriptor {
        id: MetricId::Revenue,
        display_name: "Revenue",
        enable_field: "p_revenue_enable",
        enable_key: "rev_enabled",
        normalize_enable: false,
        dir_field: "p_revenue_sign_mode",
        dir_key: "rev_dir",
        threshold_field: "p_revenue_threshold_percent",
        threshold_key: "rev_threshold",
        period: PeriodSpec::Shared { key: "rev_period" },
        sends_val_adj: false,
        slow: true,
        flag: FlagMap { key: "rev_flag", icon: "opp_rev_flag_icon" },
        outputs: REVENUE_OUTPUTS,
        refresh_derived: true,
        recompute_iht: false,
    },
    MetricDescriptor {
        id: MetricId::GrossMargin,
        display_name: "Gross Margin %",
        enable_field: "p_gm_enable",
        enable_key: "gm_enabled",
        normalize_enable: true,
        dir_field: "p_gm_sign_mode",
        dir_key: "gm_dir",
        threshold_field: "p_gm_threshold_percent",
        threshold_key: "gm_threshold",
        period: PeriodSpec::Shared { key: "gm_period" },
        sends_val_adj: false,
        slow: true,
        flag: FlagMap { key: "gm_flag", icon: "opp_gm_flag_icon" },
        outputs: GM_OUTPUTS,
        refresh_derived: true,
        recompute_iht: false,
    },
    MetricDescriptor {
        id: MetricId::OverheadValue,
        display_name: "Overhead £",
        enable_field: "p_oh_enable",
        enable_key: "oh_val_enabled",
        normalize_enable: true,
        dir_field: "p_oh_sign_mode",
        dir_key: "oh_val_dir",
        threshold_field: "p_oh_threshold_percent",
        threshold_key: "oh_val_threshold",
        period: PeriodSpec::Shared { key: "oh_val_period" },
        sends_val_adj: true,
        slow: true,
        flag: FlagMap { key: "oh_val_flag", icon: "opp_oh_flag_icon" },
        outputs: OH_VAL_OUTPUTS,
        refresh_derived: true,
        recompute_iht: false,
    },
    MetricDescriptor {
        id: MetricId::OverheadPercent,
        display_name: "Overhead %",
        enable_field: "p_oh_pct_enable",
        enable_key: "oh_pct_enabled",
        normalize_enable: true,
        dir_field: "p_oh_pct_sign_mode",
        dir_key: "oh_pct_dir",
        threshold_field: "p_oh_pct_threshold_percent",
        threshold_key: "oh_pct_threshold",
        period: PeriodSpec::Shared { key: "oh_pct_period" },
        sends_val_adj: true,
        slow: true,
        flag: FlagMap { key: "oh_pct_flag", icon: "opp_ohp_flag_icon" },
        outputs: OH_PCT_OUTPUTS,
        refresh_derived: true,
        recompute_iht: false,
    },
    MetricDescriptor {
        id: MetricId::Ebitda,
        display_name: "EBITDA £",
        enable_field: "p_ebitda_enable",
        enable_key: "ebitda_enabled",
        normalize_enable: true,
        dir_field: "p_ebitda_sign_mode",
        dir_key: "ebitda_dir",
        threshold_field: "p_ebitda_threshold_percent",
        threshold_key: "ebitda_threshold",
        period: PeriodSpec::Fixed { key: "ebitda_period", value: "12" },
        sends_val_adj: false,
        slow: false,
        flag: FlagMap { key: "ebitda_flag", icon: "opp_eb_flag_icon" },
        outputs: EBITDA_OUTPUTS,
        refresh_derived: true,
        recompute_iht: true,
    },
    MetricDescriptor {
        id: MetricId::NewCustomers,
        display_name: "New Customers",
        enable_field: "p_ncust_enable",
        enable_key: "newcust_enabled",
        normalize_enable: true,
        dir_field: "p_ncust_sign_mode",
        dir_key: "newcust_dir",
        threshold_field: "p_ncust_threshold_percent",
        threshold_key: "newcust_threshold",
        period: PeriodSpec::Shared { key: "newcust_period" },
        sends_val_adj: false,
        slow: false,
        flag: FlagMap { key: "newcust_flag", icon: "opp_nc_flag_icon" },
        outputs: NEWCUST_OUTPUTS,
        refresh_derived: false,
        recompute_iht: false,
    },
    MetricDescriptor {
        id: MetricId::Retention,
        display_name: "Client Retention",
        enable_field: "p_retention_enable",
        enable_key: "retention_enabled",
        normalize_enable: true,
        dir_field: "p_retention_sign_mode",
        dir_key: "retention_dir",
        threshold_field: "p_retention_threshold_percent",
        threshold_key: "retention_threshold",
        period: PeriodSpec::Shared { key: "retention_period" },
        sends_val_adj: false,
        slow: false,
        flag: FlagMap { key: "retention_flag", icon: "opp_ret_flag_icon" },
        outputs: RETENTION_OUTPUTS,
        refresh_derived: false,
        recompute_iht: false,
    },
    MetricDescriptor {
        id: MetricId::CashPosition,
        display_name: "Cash Position",
        enable_field: "p_cp_enable",
        enable_key: "cash_enabled",
        normalize_enable: true,
        dir_field: "p_cp_sign_mode",
        dir_key: "cash_dir",
        threshold_field: "p_cp_var_percent",
        threshold_key: "cash_threshold",
        period: PeriodSpec::Omitted,
        sends_val_adj: false,
        slow: false,
        flag: FlagMap { key: "cash_flag", icon: "opp_cp_flag_icon" },
        outputs: CASH_OUTPUTS,
        refresh_derived: false,
        recompute_iht: false,
    },
    MetricDescriptor {
        id: MetricId::DebtorDays,
        display_name: "Debtor Days",
        enable_field: "p_ddays_enable",
        enable_key: "debtordays_enabled",
        normalize_enable: true,
        dir_field: "p_ddays_sign_mode",
        dir_key: "debtordays_dir",
        threshold_field: "p_ddays_var_percent",
        threshold_key: "debtordays_threshold",
        period: PeriodSpec::Omitted,
        sends_val_adj: false,
        slow: false,
        flag: FlagMap { key: "debtordays_flag", icon: "opp_dd_flag_icon" },
        outputs: DEBTOR_OUTPUTS,
        refresh_derived: false,
        recompute_iht: false,
    },
    MetricDescriptor {
        id: MetricId::CreditorDays,
        display_name: "Creditor Days",
        enable_field: "p_cdays_enable",
        enable_key: "creditordays_enabled",
        normalize_enable: true,
        dir_field: "p_cdays_sign_mode",
        dir_key: "creditordays_dir",
        threshold_field: "p_cdays_var_percent",
        threshold_key: "creditordays_threshold",
        period: PeriodSpec::Omitted,
        sends_val_adj: false,
        slow: false,
        flag: FlagMap { key: "creditordays_flag", icon: "opp_cd_flag_icon" },
        outputs: CREDITOR_OUTPUTS,
        refresh_derived: false,
        recompute_iht: false,
    },
    MetricDescriptor {
        id: MetricId::StockDays,
        display_name: "Stock Days",
        enable_field: "p_sdays_enable",
        enable_key: "stockdays_enabled",
        normalize_enable: true,
        dir_field: "p_sdays_sign_mode",
        dir_key: "stockdays_dir",
        threshold_field: "p_sdays_var_percent",
        threshold_key: "stockdays_threshold",
        period: PeriodSpec::Omitted,
        sends_val_adj: false,
        slow: false,
        flag: FlagMap { key: "stockdays_flag", icon: "opp_sd_flag_icon" },
        outputs: STOCK_OUTPUTS,
        refresh_derived: false,
        recompute_iht: false,
    },
];

/// Metrics that make up the save payload's performance criteria, in row
/// order.
pub const PERFORMANCE_METRICS: [MetricId; 7] = [
    MetricId::Revenue,
    MetricId::GrossMargin,
    MetricId::OverheadValue,
    MetricId::OverheadPercent,
    MetricId::Ebitda,
    MetricId::NewCustomers,
    MetricId::Retention,
];

/// Metrics that make up the save payload's working-capital criteria.
pub const WORKING_CAPITAL_METRICS: [MetricId; 4] = [
    MetricId::CashPosition,
    MetricId::DebtorDays,
    MetricId::CreditorDays,
    MetricId::StockDays,
];

pub fn descriptor(id: MetricId) -> &'static MetricDescriptor {
    &CATALOG[id as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FieldStore, MemoryFieldStore};

    #[test]
    fn test_catalog_order_matches_metric_ids() {
        for (index, id) in MetricId::ALL.iter().enumerate() {
            assert_eq!(CATALOG[index].id, *id);
            assert_eq!(descriptor(*id).id, *id);
        }
    }

    fn revenue_page() -> MemoryFieldStore {
        let mut store = MemoryFieldStore::new();
        store.insert_field("p_revenue_enable", "y");
        store.insert_field(ids::P_PERIOD, "12");
        store.insert_field("p_revenue_sign_mode", "+/-");
        store.insert_field("p_revenue_threshold_percent", "15.00");
        store
    }

    #[test]
    fn test_revenue_form_posts_raw_enable() {
        let store = revenue_page();
        let form = descriptor(MetricId::Revenue).build_form(&store).unwrap();
        assert_eq!(
            form,
            vec![
                ("rev_enabled".to_string(), "y".to_string()),
                ("rev_period".to_string(), "12".to_string()),
                ("rev_dir".to_string(), "+/-".to_string()),
                ("rev_threshold".to_string(), "15.00".to_string()),
            ]
        );
    }

    #[test]
    fn test_gm_form_normalizes_enable() {
        let mut store = MemoryFieldStore::new();
        store.insert_field("p_gm_enable", "y");
        store.insert_field(ids::P_PERIOD, "6");
        store.insert_field("p_gm_sign_mode", "+");
        store.insert_field("p_gm_threshold_percent", "2");
        let form = descriptor(MetricId::GrossMargin).build_form(&store).unwrap();
        assert_eq!(form[0], ("gm_enabled".to_string(), "Yes".to_string()));
    }

    #[test]
    fn test_ebitda_form_uses_fixed_period() {
        let mut store = MemoryFieldStore::new();
        store.insert_field("p_ebitda_enable", "Yes");
        store.insert_field("p_ebitda_sign_mode", "-");
        store.insert_field("p_ebitda_threshold_percent", "1");
        // no shared period field needed
        let form = descriptor(MetricId::Ebitda).build_form(&store).unwrap();
        assert_eq!(
            form.last().unwrap(),
            &("ebitda_period".to_string(), "12".to_string())
        );
    }

    #[test]
    fn test_missing_input_skips_form() {
        let mut store = revenue_page();
        store.remove_field("p_revenue_threshold_percent");
        assert!(descriptor(MetricId::Revenue).build_form(&store).is_none());
    }

    #[test]
    fn test_missing_shared_period_skips_form() {
        let mut store = revenue_page();
        store.remove_field(ids::P_PERIOD);
        assert!(descriptor(MetricId::Revenue).build_form(&store).is_none());
    }

    #[test]
    fn test_overhead_form_includes_val_adj_when_set() {
        let mut store = MemoryFieldStore::new();
        store.insert_field("p_oh_enable", "Yes");
        store.insert_field(ids::P_PERIOD, "12");
        store.insert_field("p_oh_sign_mode", "-");
        store.insert_field("p_oh_threshold_percent", "1");
        store.insert_field(ids::VAL_ADJ, "4");
        let desc = descriptor(MetricId::OverheadValue);
        let form = desc.build_form(&store).unwrap();
        assert_eq!(form.last().unwrap(), &("val_adj".to_string(), "4".to_string()));

        // blank adjustment is left out entirely
        store.set_value(ids::VAL_ADJ, "");
        let form = desc.build_form(&store).unwrap();
        assert!(!form.iter().any(|(k, _)| k == "val_adj"));
    }
}
