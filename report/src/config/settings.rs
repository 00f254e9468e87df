// Engine settings, loadable from a JSON file with sensible defaults for
// local development against a dev server.

use std::path::Path;

use serde::Deserialize;

use crate::error::ReportError;
use crate::metrics::MetricId;

#[derive(Debug, Deserialize, Clone)]
pub struct ReportSettings {
    pub base_url: String,
    pub client_id: i64,
    /// Debounce window for threshold edits, milliseconds.
    #[serde(default = "default_threshold_debounce_ms")]
    pub threshold_debounce_ms: u64,
    /// Debounce window for multiple edits, milliseconds.
    #[serde(default = "default_multiple_debounce_ms")]
    pub multiple_debounce_ms: u64,
}

fn default_threshold_debounce_ms() -> u64 {
    500
}

fn default_multiple_debounce_ms() -> u64 {
    150
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            base_url: "http://localhost:8000".to_string(),
            client_id: 1,
            threshold_debounce_ms: default_threshold_debounce_ms(),
            multiple_debounce_ms: default_multiple_debounce_ms(),
        }
    }
}

impl ReportSettings {
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let raw = std::fs::read_to_string(path)?;
        let settings: ReportSettings = serde_json::from_str(&raw)?;
        if settings.base_url.trim().is_empty() {
            return Err(ReportError::Config("base_url must not be empty".to_string()));
        }
        Ok(settings)
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::for_client(&self.base_url, self.client_id)
    }
}

/// Fully-resolved endpoint table: one evaluation URL per metric plus the
/// save-config URL.
#[derive(Debug, Clone)]
pub struct Endpoints {
    urls: [String; 11],
    pub save_config: String,
}

impl Endpoints {
    pub fn for_client(base_url: &str, client_id: i64) -> Endpoints {
        let base = base_url.trim_end_matches('/');
        let ajax = |segment: &str| format!("{base}/caam/clients/{client_id}/ajax/{segment}/");
        Endpoints {
            urls: [
                ajax("revenue"),
                ajax("gm"),
                ajax("oh-val"),
                ajax("oh-pct"),
                ajax("ebitda"),
                ajax("newcust"),
                ajax("retention"),
                ajax("cash"),
                ajax("debtordays"),
                ajax("creditordays"),
                ajax("stockdays"),
            ],
            save_config: ajax("save-config"),
        }
    }

    pub fn metric_url(&self, id: MetricId) -> &str {
        &self.urls[id as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_settings_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"base_url": "https://reports.example.com/", "client_id": 9}}"#).unwrap();
        file.flush().unwrap();
        let settings = ReportSettings::load(file.path()).unwrap();
        assert_eq!(settings.client_id, 9);
        // debounce windows fall back to defaults
        assert_eq!(settings.threshold_debounce_ms, 500);
        assert_eq!(settings.multiple_debounce_ms, 150);
    }

    #[test]
    fn test_load_rejects_blank_base_url() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"base_url": "  ", "client_id": 9}}"#).unwrap();
        file.flush().unwrap();
        assert!(matches!(
            ReportSettings::load(file.path()),
            Err(ReportError::Config(_))
        ));
    }

    #[test]
    fn test_endpoint_urls_per_metric() {
        let endpoints = Endpoints::for_client("https://reports.example.com/", 9);
        assert_eq!(
            endpoints.metric_url(MetricId::Revenue),
            "https://reports.example.com/caam/clients/9/ajax/revenue/"
        );
        assert_eq!(
            endpoints.metric_url(MetricId::StockDays),
            "https://reports.example.com/caam/clients/9/ajax/stockdays/"
        );
        assert_eq!(
            endpoints.save_config,
            "https://reports.example.com/caam/clients/9/ajax/save-config/"
        );
    }
}
