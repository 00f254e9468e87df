// HTTP collaborator behind a trait so the engine is testable without a
// network. The server replies with JSON bodies on success and failure
// alike; status handling is left to the payload's `ok` flag.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ReportError;

#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a form body, returning the parsed JSON response.
    async fn post_form(&self, url: &str, form: &[(String, String)]) -> Result<Value, ReportError>;

    /// POST a JSON body, returning the parsed JSON response.
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ReportError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        HttpTransport { client: reqwest::Client::new() }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(&self, url: &str, form: &[(String, String)]) -> Result<Value, ReportError> {
        let response = self.client.post(url).form(&form).send().await?;
        Ok(response.json::<Value>().await?)
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ReportError> {
        let response = self.client.post(url).json(body).send().await?;
        Ok(response.json::<Value>().await?)
    }
}
