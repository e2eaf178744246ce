use crate::error::ClientError;
use crate::types::ClientConfig;
use chaos_types::{ProxyConfiguration, TrafficLog};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use validator::Validate;

const CONFIG_PATH: &str = "/api/config";
const ACTIVITY_PATH: &str = "/api/activity";

/// Thin wrapper over the engine's two admin endpoints.
#[derive(Debug, Clone)]
pub struct AdminClient {
    client: Client,
    config: ClientConfig,
}

impl AdminClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// `GET /api/config`. Returns the raw document; fields may be a subset.
    pub async fn fetch_config(&self) -> Result<Value, ClientError> {
        let resp = self
            .client
            .get(self.url(CONFIG_PATH))
            .send()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;
        let resp = check_status(resp).await?;
        resp.json().await.map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// `POST /api/config` with the complete configuration. The response body
    /// is not read.
    pub async fn push_config(&self, config: &ProxyConfiguration) -> Result<(), ClientError> {
        let resp = self
            .client
            .post(self.url(CONFIG_PATH))
            .header("Content-Type", "application/json")
            .json(config)
            .send()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;
        check_status(resp).await?;
        Ok(())
    }

    /// `GET /api/activity`. The engine sends `null` while its log is empty.
    pub async fn fetch_activity(&self) -> Result<Vec<TrafficLog>, ClientError> {
        let resp = self
            .client
            .get(self.url(ACTIVITY_PATH))
            .send()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;
        let resp = check_status(resp).await?;
        let logs: Option<Vec<TrafficLog>> =
            resp.json().await.map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        Ok(logs.unwrap_or_default())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.origin(), path)
    }
}

async fn check_status(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(ClientError::ServerError { status: status.as_u16(), message })
}
