// Handler for a single per-metric evaluation round-trip: build the form
// from current field state, post it, write the response back.

use std::sync::Arc;

use serde_json::Value;
use shared::utils::format_amount_field;
use tokio::sync::RwLock;

use crate::config::Endpoints;
use crate::error::ReportError;
use crate::fields::{FieldStore, Indicator, MemoryFieldStore};
use crate::metrics::MetricDescriptor;
use crate::services::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalOutcome {
    /// Response applied to the field store.
    Applied,
    /// A required input field is missing from the page; nothing was sent.
    Skipped,
    /// The server answered without `ok`; fields left untouched.
    Declined,
    /// Transport or decode failure, swallowed by the caller.
    Failed,
}

pub async fn handle_evaluate(
    descriptor: &MetricDescriptor,
    fields: &Arc<RwLock<MemoryFieldStore>>,
    transport: &dyn Transport,
    endpoints: &Endpoints,
) -> Result<EvalOutcome, ReportError> {
    let form = {
        let store = fields.read().await;
        descriptor.build_form(&*store)
    };
    let Some(form) = form else {
        tracing::debug!(metric = descriptor.id.key(), "required input fields missing, skipping");
        return Ok(EvalOutcome::Skipped);
    };

    let url = endpoints.metric_url(descriptor.id);
    let response = transport.post_form(url, &form).await?;

    if !response.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        tracing::debug!(metric = descriptor.id.key(), "server declined evaluation");
        return Ok(EvalOutcome::Declined);
    }

    let mut store = fields.write().await;
    apply_response(descriptor, &response, &mut *store);
    Ok(EvalOutcome::Applied)
}

/// Write the mapped response values into the page. Missing keys clear
/// their field; absent fields are skipped by the store itself.
pub(crate) fn apply_response(
    descriptor: &MetricDescriptor,
    response: &Value,
    fields: &mut dyn FieldStore,
) {
    for output in descriptor.outputs {
        let text = field_text(response.get(output.key));
        let text = if output.amount { format_amount_field(&text) } else { text };
        fields.set_value(output.field, &text);
    }

    let flag = field_text(response.get(descriptor.flag.key));
    fields.set_indicator(descriptor.flag.icon, Indicator::from_flag(&flag));
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}
