use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::{
    config::DEFAULT_BASE_URL,
    error::WeatherError,
    model::{QueryInput, QueryMode, WeatherResult},
    normalize::{api_error_message, normalize},
    request::RequestBuilder,
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct WeatherstackProvider {
    builder: RequestBuilder,
    base_url: String,
    http: Client,
}

impl WeatherstackProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            builder: RequestBuilder::new(api_key),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_json(&self, mode: QueryMode, input: &QueryInput) -> Result<Value, WeatherError> {
        let request = self.builder.build(mode, input)?;
        let url = request.url(&self.base_url)?;

        debug!(%mode, url = %request.redacted_url(&self.base_url), "sending weatherstack request");

        let res = self.http.get(url).send().await.map_err(|e| {
            WeatherError::Transport(format!("Failed to send request to weatherstack ({mode}): {e}"))
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::Transport(format!(
                "Failed to read weatherstack {mode} response body: {e}"
            ))
        })?;

        debug!(%mode, %status, bytes = body.len(), "received weatherstack response");

        let parsed: Option<Value> = serde_json::from_str(&body).ok();

        match parsed {
            Some(raw) if status.is_success() || api_error_message(&raw).is_some() => Ok(raw),
            Some(_) => Err(WeatherError::Transport(format!(
                "weatherstack {mode} request failed with status {status}: {}",
                truncate_body(&body),
            ))),
            None => Err(WeatherError::Transport(format!(
                "weatherstack {mode} response (status {status}) was not valid JSON: {}",
                truncate_body(&body),
            ))),
        }
    }
}

#[async_trait]
impl WeatherProvider for WeatherstackProvider {
    async fn get_weather(
        &self,
        mode: QueryMode,
        input: &QueryInput,
    ) -> Result<WeatherResult, WeatherError> {
        let raw = self.fetch_json(mode, input).await?;
        normalize(mode, &raw)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
