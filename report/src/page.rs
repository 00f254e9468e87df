// Page-scoped context: everything the server renders into the report page
// besides the form fields themselves. This replaces the page-level globals
// the report used to hang scores and ids on; the engine receives it
// explicitly.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use shared::models::{CheckItem, SalesPoint};

use crate::error::ReportError;
use crate::fields::MemoryFieldStore;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Scores {
    #[serde(default)]
    pub suitability: f64,
    #[serde(default)]
    pub opportunity: f64,
    #[serde(default)]
    pub readiness: f64,
}

/// Donut targets used when the matching target field is absent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Targets {
    #[serde(default = "default_target")]
    pub suitability: f64,
    #[serde(default = "default_target")]
    pub opportunity: f64,
    #[serde(default = "default_target")]
    pub readiness: f64,
}

fn default_target() -> f64 {
    50.0
}

impl Default for Targets {
    fn default() -> Self {
        Targets { suitability: 50.0, opportunity: 50.0, readiness: 50.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContext {
    pub company_id: i64,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub scores: Scores,
    #[serde(default)]
    pub targets: Targets,
    #[serde(default)]
    pub readiness_checks: Vec<CheckItem>,
    #[serde(default)]
    pub suitability_checks: Vec<CheckItem>,
    #[serde(default)]
    pub sales: Vec<SalesPoint>,
}

/// Serialized page state for the headless driver: the context above plus
/// the form fields the page carries. Only listed fields exist; writes to
/// anything else stay no-ops.
#[derive(Debug, Clone, Deserialize)]
pub struct PageSnapshot {
    pub page: PageContext,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub disabled: Vec<String>,
    #[serde(default)]
    pub indicators: Vec<String>,
}

impl PageSnapshot {
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn into_parts(self) -> (PageContext, MemoryFieldStore) {
        let mut store = MemoryFieldStore::new();
        for (id, value) in &self.fields {
            if self.disabled.iter().any(|d| d == id) {
                store.insert_disabled_field(id, value);
            } else {
                store.insert_field(id, value);
            }
        }
        for id in &self.indicators {
            store.insert_indicator(id);
        }
        (self.page, store)
    }
}
