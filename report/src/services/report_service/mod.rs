// Report service: owns the field store, the endpoint table and the
// collaborators, and exposes the page's operations: per-metric
// evaluation, derived-field refresh, chart rebuilds and save.

pub mod evaluate_metric;
pub mod save_config;

pub use evaluate_metric::EvalOutcome;

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::charts::{self, ChartRenderer, SalesChartSpec};
use crate::config::Endpoints;
use crate::error::ReportError;
use crate::fields::MemoryFieldStore;
use crate::metrics::{self, MetricId};
use crate::page::PageContext;
use crate::propagate::{self, iht};
use crate::services::progress::ProgressGauge;
use crate::services::transport::Transport;

pub struct ReportService {
    endpoints: Endpoints,
    page: PageContext,
    fields: Arc<RwLock<MemoryFieldStore>>,
    transport: Arc<dyn Transport>,
    renderer: Arc<dyn ChartRenderer>,
    progress: Arc<ProgressGauge>,
}

impl ReportService {
    pub fn new(
        endpoints: Endpoints,
        page: PageContext,
        fields: MemoryFieldStore,
        transport: Arc<dyn Transport>,
        renderer: Arc<dyn ChartRenderer>,
    ) -> Self {
        ReportService {
            endpoints,
            page,
            fields: Arc::new(RwLock::new(fields)),
            transport,
            renderer,
            progress: ProgressGauge::new(),
        }
    }

    pub fn fields(&self) -> Arc<RwLock<MemoryFieldStore>> {
        Arc::clone(&self.fields)
    }

    pub fn page(&self) -> &PageContext {
        &self.page
    }

    pub fn progress(&self) -> Arc<ProgressGauge> {
        Arc::clone(&self.progress)
    }

    /// Evaluate one metric against the server and fold the response into
    /// the page. Network and decode failures are swallowed here: the page
    /// simply does not update, prior values stay intact.
    pub async fn evaluate(&self, id: MetricId) -> EvalOutcome {
        let descriptor = metrics::descriptor(id);
        let request_id = Uuid::new_v4();
        let _busy = descriptor.slow.then(|| self.progress.begin());

        tracing::debug!(metric = id.key(), %request_id, "evaluating metric criteria");
        let result = evaluate_metric::handle_evaluate(
            descriptor,
            &self.fields,
            self.transport.as_ref(),
            &self.endpoints,
        )
        .await;

        match result {
            Ok(EvalOutcome::Applied) => {
                let mut fields = self.fields.write().await;
                if descriptor.recompute_iht {
                    iht::recompute(&mut *fields);
                }
                if descriptor.refresh_derived {
                    propagate::refresh_derived(&mut *fields);
                }
                drop(fields);
                tracing::debug!(metric = id.key(), %request_id, "metric response applied");
                EvalOutcome::Applied
            }
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::warn!(metric = id.key(), %request_id, %error, "metric evaluation failed");
                EvalOutcome::Failed
            }
        }
    }

    /// Fire every metric evaluation concurrently. Completion order is not
    /// defined; results come back sorted by metric for the caller's
    /// convenience.
    pub async fn evaluate_all(self: Arc<Self>) -> Vec<(MetricId, EvalOutcome)> {
        let mut join_set = tokio::task::JoinSet::new();
        for id in MetricId::ALL {
            let service = Arc::clone(&self);
            join_set.spawn(async move { (id, service.evaluate(id).await) });
        }

        let mut results = Vec::with_capacity(MetricId::ALL.len());
        while let Some(joined) = join_set.join_next().await {
            if let Ok(pair) = joined {
                results.push(pair);
            }
        }
        results.sort_by_key(|(id, _)| *id as usize);
        results
    }

    /// Re-derive every multiple-driven field from current state.
    pub async fn refresh_derived(&self) {
        let mut fields = self.fields.write().await;
        propagate::refresh_derived(&mut *fields);
    }

    /// Rerun the IHT estimate/indicator alone.
    pub async fn recompute_iht(&self) {
        let mut fields = self.fields.write().await;
        iht::recompute(&mut *fields);
    }

    pub async fn render_donuts(&self) {
        let fields = self.fields.read().await;
        for donut in charts::build_kpi_donuts(&*fields, &self.page) {
            self.renderer.render_donut(donut.anchor, &donut.spec);
        }
    }

    pub async fn render_sales(&self) {
        let spec = SalesChartSpec::from_points(&self.page.sales);
        self.renderer.render_sales(charts::SALES_CHART_ANCHOR, &spec);
    }

    /// Save the assembled config. Unlike metric evaluations, failures are
    /// surfaced to the caller.
    pub async fn save(&self, reset_flag: Option<bool>) -> Result<(), ReportError> {
        save_config::handle_save(
            &self.fields,
            &self.page,
            self.transport.as_ref(),
            &self.endpoints,
            reset_flag,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{DonutSpec, SalesChartSpec};
    use crate::fields::{ids, FieldStore, Indicator};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct NullRenderer;

    impl ChartRenderer for NullRenderer {
        fn render_donut(&self, _anchor: &str, _spec: &DonutSpec) {}
        fn render_sales(&self, _anchor: &str, _spec: &SalesChartSpec) {}
    }

    /// Canned-response transport; URLs without a stubbed response fail the
    /// way a dead network would.
    #[derive(Default)]
    struct StubTransport {
        responses: HashMap<String, Value>,
        form_calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
        json_calls: Mutex<Vec<(String, Value)>>,
    }

    impl StubTransport {
        fn with_response(mut self, url: &str, response: Value) -> Self {
            self.responses.insert(url.to_string(), response);
            self
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn post_form(
            &self,
            url: &str,
            form: &[(String, String)],
        ) -> Result<Value, ReportError> {
            self.form_calls
                .lock()
                .unwrap()
                .push((url.to_string(), form.to_vec()));
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| ReportError::Config(format!("connection refused: {url}")))
        }

        async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ReportError> {
            self.json_calls
                .lock()
                .unwrap()
                .push((url.to_string(), body.clone()));
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| ReportError::Config(format!("connection refused: {url}")))
        }
    }

    fn endpoints() -> Endpoints {
        Endpoints::for_client("http://test", 5)
    }

    fn page() -> PageContext {
        serde_json::from_str(r#"{"company_id": 5, "version": 1}"#).unwrap()
    }

    fn revenue_page() -> MemoryFieldStore {
        let mut store = MemoryFieldStore::new();
        store.insert_field("p_revenue_enable", "Yes");
        store.insert_field(ids::P_PERIOD, "12");
        store.insert_field("p_revenue_sign_mode", "+/-");
        store.insert_field("p_revenue_threshold_percent", "15");
        store.insert_field(ids::REVENUE_PROFIT_IMPACT, "");
        store.insert_field(ids::REVENUE_VAL_IMPACT, "");
        store.insert_field(ids::OPP_MULTIPLE, "4");
        store.insert_field(ids::IHT_MULTIPLE, "");
        store.insert_indicator("opp_rev_flag_icon");
        store
    }

    fn service(store: MemoryFieldStore, transport: StubTransport) -> Arc<ReportService> {
        Arc::new(ReportService::new(
            endpoints(),
            page(),
            store,
            Arc::new(transport),
            Arc::new(NullRenderer),
        ))
    }

    #[tokio::test]
    async fn test_evaluate_applies_response_and_rederives() {
        let url = endpoints().metric_url(MetricId::Revenue).to_string();
        let transport = StubTransport::default().with_response(
            &url,
            json!({"ok": true, "rev_flag": "Yes", "rev_profit_impact": "10000", "rev_val_impact": ""}),
        );
        let service = service(revenue_page(), transport);

        let outcome = service.evaluate(MetricId::Revenue).await;
        assert_eq!(outcome, EvalOutcome::Applied);

        let fields = service.fields();
        let fields = fields.read().await;
        assert_eq!(fields.indicator("opp_rev_flag_icon"), Some(Indicator::Pass));
        assert_eq!(fields.value(ids::REVENUE_PROFIT_IMPACT).as_deref(), Some("10000"));
        // the derived pass recomputed the valuation impact from the fresh
        // profit impact and the shared multiple
        assert_eq!(fields.value(ids::REVENUE_VAL_IMPACT).as_deref(), Some("40,000"));
        assert_eq!(fields.value(ids::IHT_MULTIPLE).as_deref(), Some("4"));
    }

    #[tokio::test]
    async fn test_evaluate_posts_expected_form() {
        let url = endpoints().metric_url(MetricId::Revenue).to_string();
        let transport =
            Arc::new(StubTransport::default().with_response(&url, json!({"ok": false})));
        let service = Arc::new(ReportService::new(
            endpoints(),
            page(),
            revenue_page(),
            Arc::clone(&transport) as Arc<dyn Transport>,
            Arc::new(NullRenderer),
        ));

        service.evaluate(MetricId::Revenue).await;

        let calls = transport.form_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (called_url, form) = &calls[0];
        assert_eq!(called_url, &url);
        assert_eq!(
            form,
            &vec![
                ("rev_enabled".to_string(), "Yes".to_string()),
                ("rev_period".to_string(), "12".to_string()),
                ("rev_dir".to_string(), "+/-".to_string()),
                ("rev_threshold".to_string(), "15".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_declined_response_leaves_fields_untouched() {
        let url = endpoints().metric_url(MetricId::Revenue).to_string();
        let transport =
            StubTransport::default().with_response(&url, json!({"ok": false, "error": "bad period"}));
        let mut store = revenue_page();
        store.set_value(ids::REVENUE_PROFIT_IMPACT, "999");
        let service = service(store, transport);

        let outcome = service.evaluate(MetricId::Revenue).await;
        assert_eq!(outcome, EvalOutcome::Declined);
        let fields = service.fields();
        let fields = fields.read().await;
        assert_eq!(fields.value(ids::REVENUE_PROFIT_IMPACT).as_deref(), Some("999"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_swallowed() {
        // no canned response at all: every call errors
        let service = service(revenue_page(), StubTransport::default());
        let outcome = service.evaluate(MetricId::Revenue).await;
        assert_eq!(outcome, EvalOutcome::Failed);
        let fields = service.fields();
        let fields = fields.read().await;
        assert_eq!(fields.value(ids::REVENUE_PROFIT_IMPACT).as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_missing_inputs_skip_without_posting() {
        let service = service(MemoryFieldStore::new(), StubTransport::default());
        let outcome = service.evaluate(MetricId::Revenue).await;
        assert_eq!(outcome, EvalOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_ebitda_response_recomputes_iht() {
        let url = endpoints().metric_url(MetricId::Ebitda).to_string();
        let transport = StubTransport::default().with_response(
            &url,
            json!({"ok": true, "ebitda_ty": 512345.6, "ebitda_flag": "Yes"}),
        );

        let mut store = MemoryFieldStore::new();
        store.insert_field("p_ebitda_enable", "Yes");
        store.insert_field("p_ebitda_sign_mode", "+");
        store.insert_field("p_ebitda_threshold_percent", "1");
        store.insert_field("opp_ebitda_ty_12m", "");
        store.insert_indicator("opp_eb_flag_icon");
        store.insert_field(ids::IHT_ENABLE, "Yes");
        store.insert_field(ids::IHT_EBITDA_TY, "500000");
        store.insert_field(ids::IHT_VALUATION_THRESHOLD, "900000");
        store.insert_field(ids::IHT_MULTIPLE, "3");
        store.insert_field(ids::IHT_EST_VALUATION, "");
        store.insert_indicator(ids::IHT_RISK_ICON);

        let service = service(store, transport);
        let outcome = service.evaluate(MetricId::Ebitda).await;
        assert_eq!(outcome, EvalOutcome::Applied);

        let fields = service.fields();
        let fields = fields.read().await;
        assert_eq!(fields.value("opp_ebitda_ty_12m").as_deref(), Some("512,346"));
        assert_eq!(fields.value(ids::IHT_EST_VALUATION).as_deref(), Some("1,500,000"));
        assert_eq!(fields.indicator(ids::IHT_RISK_ICON), Some(Indicator::Pass));
    }

    #[tokio::test]
    async fn test_evaluate_all_reports_every_metric() {
        let service = service(MemoryFieldStore::new(), StubTransport::default());
        let results = Arc::clone(&service).evaluate_all().await;
        assert_eq!(results.len(), MetricId::ALL.len());
        // nothing on the page: everything skips
        assert!(results.iter().all(|(_, outcome)| *outcome == EvalOutcome::Skipped));
        let ids_in_order: Vec<MetricId> = results.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids_in_order, MetricId::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_save_posts_payload_and_accepts_ok() {
        let save_url = endpoints().save_config.clone();
        let transport =
            Arc::new(StubTransport::default().with_response(&save_url, json!({"ok": true})));
        let service = Arc::new(ReportService::new(
            endpoints(),
            page(),
            MemoryFieldStore::new(),
            Arc::clone(&transport) as Arc<dyn Transport>,
            Arc::new(NullRenderer),
        ));

        service.save(Some(true)).await.unwrap();

        let calls = transport.json_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (called_url, body) = &calls[0];
        assert_eq!(called_url, &save_url);
        assert_eq!(body["company_id"], 5);
        assert_eq!(body["version"], 1);
        assert_eq!(body["reset_flag"], true);
        assert_eq!(body["config"]["p_period"], 12);
        assert_eq!(body["config"]["Opportunity"]["performance"]["items"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_save_rejected_surfaces_server_error() {
        let save_url = endpoints().save_config.clone();
        let transport = StubTransport::default()
            .with_response(&save_url, json!({"ok": false, "error": "Version conflict"}));
        let service = service(MemoryFieldStore::new(), transport);

        match service.save(None).await {
            Err(ReportError::SaveRejected(message)) => assert_eq!(message, "Version conflict"),
            other => panic!("expected SaveRejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_gauge_settles_after_slow_metric() {
        let service = service(revenue_page(), StubTransport::default());
        let gauge = service.progress();
        service.evaluate(MetricId::Revenue).await;
        assert!(!gauge.is_busy());
    }
}
