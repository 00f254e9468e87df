// Edit dispatch: maps a field edit to the work it triggers (metric
// re-evaluations, derived-field refreshes, IHT recomputes, donut
// rebuilds), debouncing keystrokes so each field fires one request.

pub mod debounce;

pub use debounce::Debouncer;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::ReportSettings;
use crate::fields::ids;
use crate::metrics::{MetricId, PeriodSpec, CATALOG};
use crate::services::report_service::ReportService;

/// How the edit arrived: still typing (debounced) or committed (enter,
/// focus loss, select change; runs immediately).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Typing,
    Committed,
}

/// Metrics re-evaluated when a field changes. The shared period field
/// drives every period-driven metric; otherwise the catalog says which
/// metric owns the field.
pub fn affected_metrics(field_id: &str) -> Vec<MetricId> {
    if field_id == ids::P_PERIOD {
        return CATALOG
            .iter()
            .filter(|d| matches!(d.period, PeriodSpec::Shared { .. }))
            .map(|d| d.id)
            .collect();
    }
    CATALOG
        .iter()
        .filter(|d| {
            d.enable_field == field_id
                || d.dir_field == field_id
                || d.threshold_field == field_id
        })
        .map(|d| d.id)
        .collect()
}

fn is_multiple_field(field_id: &str) -> bool {
    field_id == ids::OPP_MULTIPLE || field_id == ids::IHT_MULTIPLE
}

fn is_iht_input(field_id: &str) -> bool {
    field_id == ids::IHT_ENABLE
        || field_id == ids::IHT_VALUATION_THRESHOLD
        || field_id == ids::VAL_ADJ
}

fn is_target_field(field_id: &str) -> bool {
    field_id == ids::TARGET_SUITABILITY
        || field_id == ids::TARGET_OPPORTUNITY
        || field_id == ids::TARGET_READINESS
}

pub struct Dispatcher {
    service: Arc<ReportService>,
    debouncer: Mutex<Debouncer>,
    threshold_delay: Duration,
    multiple_delay: Duration,
}

impl Dispatcher {
    pub fn new(service: Arc<ReportService>, settings: &ReportSettings) -> Self {
        Dispatcher {
            service,
            debouncer: Mutex::new(Debouncer::new()),
            threshold_delay: Duration::from_millis(settings.threshold_debounce_ms),
            multiple_delay: Duration::from_millis(settings.multiple_debounce_ms),
        }
    }

    /// React to one field edit. Must run inside a tokio runtime; the
    /// triggered work is fire-and-forget and completion order between
    /// concurrent requests is not defined.
    pub fn field_edited(&self, field_id: &str, kind: EditKind) {
        if is_multiple_field(field_id) {
            let service = Arc::clone(&self.service);
            let work = async move { service.refresh_derived().await };
            let mut debouncer = self.debouncer.lock().unwrap();
            match kind {
                EditKind::Typing => debouncer.schedule(field_id, self.multiple_delay, work),
                EditKind::Committed => debouncer.fire_now(field_id, work),
            }
            return;
        }

        if is_iht_input(field_id) {
            let service = Arc::clone(&self.service);
            let mut debouncer = self.debouncer.lock().unwrap();
            debouncer.fire_now(field_id, async move { service.recompute_iht().await });
        }

        if is_target_field(field_id) {
            let service = Arc::clone(&self.service);
            let mut debouncer = self.debouncer.lock().unwrap();
            debouncer.fire_now(field_id, async move { service.render_donuts().await });
        }

        for metric in affected_metrics(field_id) {
            let service = Arc::clone(&self.service);
            let work = async move {
                service.evaluate(metric).await;
            };
            let key = format!("{}:{}", field_id, metric.key());
            let mut debouncer = self.debouncer.lock().unwrap();
            match kind {
                EditKind::Typing => debouncer.schedule(&key, self.threshold_delay, work),
                EditKind::Committed => debouncer.fire_now(&key, work),
            }
        }
    }
}
