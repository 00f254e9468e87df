// Handler for the save operation: assemble the full config payload from
// current field state and page context, then POST it as JSON.

use std::sync::Arc;

use serde_json::Value;
use shared::models::{
    ChecksSection, Direction, IhtConfig, OpportunityConfig, PerformanceItem, PerformanceSection,
    ReportConfig, SavePayload, Toggle, WorkingCapitalItem, WorkingCapitalSection,
};
use shared::utils::clean_number;
use tokio::sync::RwLock;

use crate::config::Endpoints;
use crate::error::ReportError;
use crate::fields::{ids, FieldStore, MemoryFieldStore};
use crate::metrics::{descriptor, PERFORMANCE_METRICS, WORKING_CAPITAL_METRICS};
use crate::page::PageContext;
use crate::services::transport::Transport;

pub async fn handle_save(
    fields: &Arc<RwLock<MemoryFieldStore>>,
    page: &PageContext,
    transport: &dyn Transport,
    endpoints: &Endpoints,
    reset_flag: Option<bool>,
) -> Result<(), ReportError> {
    let config = {
        let store = fields.read().await;
        build_config(&*store, page)
    };
    let payload = SavePayload {
        company_id: page.company_id,
        version: page.version,
        config,
        reset_flag,
    };
    let body = serde_json::to_value(&payload)?;

    tracing::info!(company_id = page.company_id, version = page.version, "saving report config");
    let response = transport.post_json(&endpoints.save_config, &body).await?;

    if response.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        Ok(())
    } else {
        let message = response
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("Save failed.")
            .to_string();
        Err(ReportError::SaveRejected(message))
    }
}

/// Build the config tree the save endpoint expects. Blank or absent
/// inputs take the documented defaults; criteria rows come straight from
/// the metric catalog so the save payload and the evaluation requests can
/// never disagree about field ids.
pub fn build_config(fields: &dyn FieldStore, page: &PageContext) -> ReportConfig {
    let number = |id: &str, fallback: f64| {
        fields
            .value(id)
            .map(|raw| clean_number(&raw, fallback))
            .unwrap_or(fallback)
    };

    let target_suitability = number(ids::TARGET_SUITABILITY, 50.0);
    let target_opportunity = number(ids::TARGET_OPPORTUNITY, 35.0);
    let target_readiness = number(ids::TARGET_READINESS, 25.0);

    let time_period = number(ids::P_PERIOD, 12.0) as u32;
    // the valuation adjustment wins over the visible multiple when the
    // page carries one at all, even blank
    let multiple = fields
        .value(ids::VAL_ADJ)
        .or_else(|| fields.value(ids::OPP_MULTIPLE))
        .map(|raw| clean_number(&raw, 3.0))
        .unwrap_or(3.0);

    let performance = PerformanceSection {
        items: PERFORMANCE_METRICS
            .iter()
            .map(|id| {
                let desc = descriptor(*id);
                PerformanceItem {
                    enable: toggle(fields, desc.enable_field),
                    dir: direction(fields, desc.dir_field),
                    field_name: desc.display_name.to_string(),
                    threshold_percent: number(desc.threshold_field, 1.0),
                }
            })
            .collect(),
    };

    let working_capital = WorkingCapitalSection {
        items: WORKING_CAPITAL_METRICS
            .iter()
            .map(|id| {
                let desc = descriptor(*id);
                WorkingCapitalItem {
                    enable: toggle(fields, desc.enable_field),
                    dir: direction(fields, desc.dir_field),
                    field_name: desc.display_name.to_string(),
                    var_percent: number(desc.threshold_field, 1.0),
                }
            })
            .collect(),
    };

    ReportConfig {
        p_period: time_period,
        multiple,
        iht: IhtConfig {
            enable: toggle(fields, ids::IHT_ENABLE),
            valuation_threshold: number(ids::IHT_VALUATION_THRESHOLD, 900_000.0),
        },
        readiness: ChecksSection {
            checks: page.readiness_checks.clone(),
            target_percent: target_readiness,
        },
        opportunity: OpportunityConfig {
            time_period,
            multiple,
            target_percent: target_opportunity,
            performance,
            working_capital,
        },
        suitability: ChecksSection {
            checks: page.suitability_checks.clone(),
            target_percent: target_suitability,
        },
    }
}

fn toggle(fields: &dyn FieldStore, id: &str) -> Toggle {
    fields
        .value(id)
        .and_then(|raw| Toggle::from_loose(&raw))
        .unwrap_or(Toggle::No)
}

fn direction(fields: &dyn FieldStore, id: &str) -> Direction {
    fields
        .value(id)
        .and_then(|raw| Direction::from_symbol(&raw))
        .unwrap_or(Direction::Below)
}
