//! HTTP client for the match-analysis API.

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::converter::DataConverter;
use super::types::{
    AnalysisListResponse, ApiStatus, CollectLinksResponse, CollectionInfo, DataAnalysis, Envelope,
    LatestLinksResponse, MatchLink, ScreenshotAnalysis, ScreenshotCapture,
};

/// Latest collected links with the collection they came from.
#[derive(Debug, Clone, Default)]
pub struct LatestLinks {
    pub matches: Vec<MatchLink>,
    pub collection: Option<CollectionInfo>,
}

/// A page of analyses plus the server-side total, when reported.
#[derive(Debug, Clone, Default)]
pub struct AnalysisPage {
    pub analyses: Vec<ScreenshotAnalysis>,
    pub total: Option<u64>,
}

/// Operations the application needs from the analysis service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchApi: Send + Sync {
    /// Service status (`GET /`).
    async fn status(&self) -> Result<ApiStatus>;

    /// Last collected match list.
    async fn latest_links(&self) -> Result<LatestLinks>;

    /// Trigger a fresh collection. Long-running.
    async fn collect_links(&self) -> Result<Vec<MatchLink>>;

    /// Page of all analyses, newest first.
    async fn screenshot_analyses(&self, limit: u32) -> Result<AnalysisPage>;

    /// Page of analyses for one match.
    async fn match_screenshot_analyses(&self, match_id: &str, limit: u32)
    -> Result<AnalysisPage>;

    /// Generate a screenshot-based analysis for a match.
    async fn generate_screenshot_analysis(&self, match_id: &str) -> Result<DataAnalysis>;

    /// Capture a raw screenshot of a match page.
    async fn capture_screenshot(&self, match_id: &str) -> Result<ScreenshotCapture>;

    /// Generate an analysis from scraped match data.
    async fn generate_data_analysis(&self, match_id: &str) -> Result<DataAnalysis>;
}

/// Request timeout classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallClass {
    Default,
    Extended,
}

/// Calls under `/match/{id}/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchAction {
    Analyses,
    ScreenshotAnalysis,
    Screenshot,
    DataAnalysis,
}

impl MatchAction {
    fn path(self) -> &'static str {
        match self {
            Self::Analyses => "screenshot-analyses",
            Self::ScreenshotAnalysis => "screenshot-analysis",
            Self::Screenshot => "screenshot",
            Self::DataAnalysis => "data-analysis",
        }
    }

    /// The POST calls drive a browser or a model on the service side.
    fn class(self) -> CallClass {
        match self {
            Self::Analyses => CallClass::Default,
            Self::ScreenshotAnalysis | Self::Screenshot | Self::DataAnalysis => CallClass::Extended,
        }
    }
}

/// Builder for creating an API client.
pub struct ApiClientBuilder {
    config: ApiConfig,
}

impl ApiClientBuilder {
    /// Create a new builder with default config.
    pub fn new() -> Self {
        Self {
            config: ApiConfig::default(),
        }
    }

    /// Set the API configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Build the API client.
    pub fn build(self) -> Result<ApiClient> {
        ApiClient::new(self.config)
    }
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// reqwest-backed implementation of [`MatchApi`].
#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: reqwest::Client,
    base_url: String,
    base: Url,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(config: ApiConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(Error::config("api.base_url is empty"));
        }

        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)
            .map_err(|e| Error::config(format!("invalid api.base_url {base_url:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(Error::config(format!("api.base_url {base_url:?} cannot hold paths")));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            base,
            config,
            http,
        })
    }

    /// The normalized base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Append path segments to the base URL, encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Build the URL for `/match/{id}/{action}` with the id encoded as one segment.
    pub fn match_url(&self, match_id: &str, action: MatchAction) -> Url {
        self.endpoint(&["match", match_id, action.path()])
    }

    fn with_limit(mut url: Url, limit: u32) -> Url {
        url.query_pairs_mut().append_pair("limit", &limit.to_string());
        url
    }

    fn timeout_secs(&self, class: CallClass) -> u64 {
        match class {
            CallClass::Default => self.config.timeout_secs,
            CallClass::Extended => self.config.long_timeout_secs,
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        class: CallClass,
    ) -> Result<T> {
        let timeout = self.timeout_secs(class);
        tracing::debug!(%method, %url, timeout, "API request");

        let response = self
            .http
            .request(method.clone(), url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .timeout(Duration::from_secs(timeout))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(timeout)
                } else {
                    Error::Request(e)
                }
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(%method, %url, status = status.as_u16(), "API request failed");
            return Err(error_from_body(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Map a non-2xx body to an error, preferring FastAPI's `detail` field.
fn error_from_body(status: StatusCode, body: &str) -> Error {
    #[derive(serde::Deserialize)]
    struct Detail {
        detail: Option<serde_json::Value>,
        message: Option<String>,
    }

    let message = serde_json::from_str::<Detail>(body)
        .ok()
        .and_then(|d| {
            d.detail
                .map(|v| match v {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .or(d.message)
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                trimmed.to_string()
            }
        });

    Error::http(status.as_u16(), message)
}

#[async_trait]
impl MatchApi for ApiClient {
    async fn status(&self) -> Result<ApiStatus> {
        self.request(Method::GET, self.endpoint(&[]), CallClass::Default)
            .await
    }

    async fn latest_links(&self) -> Result<LatestLinks> {
        let response: LatestLinksResponse = self
            .request(
                Method::GET,
                self.endpoint(&["sofascore", "latest-links"]),
                CallClass::Default,
            )
            .await?;

        let collection = response.collection_info;
        let data = response.envelope.into_data()?;
        Ok(LatestLinks {
            matches: DataConverter::normalize_links(data.filtered_links),
            collection,
        })
    }

    async fn collect_links(&self) -> Result<Vec<MatchLink>> {
        let response: CollectLinksResponse = self
            .request(
                Method::POST,
                self.endpoint(&["sofascore", "collect-links"]),
                CallClass::Extended,
            )
            .await?;

        let total = response.total_links;
        let links = response.envelope.into_data()?.into_links();
        tracing::info!(links = links.len(), total, "Link collection finished");
        Ok(DataConverter::normalize_links(links))
    }

    async fn screenshot_analyses(&self, limit: u32) -> Result<AnalysisPage> {
        let response: AnalysisListResponse = self
            .request(
                Method::GET,
                Self::with_limit(self.endpoint(&["screenshot-analyses"]), limit),
                CallClass::Default,
            )
            .await?;

        let total = response.total_analyses;
        Ok(AnalysisPage {
            analyses: DataConverter::clean_analyses(response.envelope.into_data()?),
            total,
        })
    }

    async fn match_screenshot_analyses(
        &self,
        match_id: &str,
        limit: u32,
    ) -> Result<AnalysisPage> {
        let action = MatchAction::Analyses;
        let url = Self::with_limit(self.match_url(match_id, action), limit);
        let response: AnalysisListResponse =
            self.request(Method::GET, url, action.class()).await?;

        let total = response.total_analyses;
        Ok(AnalysisPage {
            analyses: DataConverter::clean_analyses(response.envelope.into_data()?),
            total,
        })
    }

    async fn generate_screenshot_analysis(&self, match_id: &str) -> Result<DataAnalysis> {
        let envelope: Envelope<DataAnalysis> = self
            .request(
                Method::POST,
                self.match_url(match_id, MatchAction::ScreenshotAnalysis),
                MatchAction::ScreenshotAnalysis.class(),
            )
            .await?;

        let received_at = envelope.timestamp;
        Ok(DataConverter::stamp_analysis(envelope.into_data()?, match_id, received_at))
    }

    async fn capture_screenshot(&self, match_id: &str) -> Result<ScreenshotCapture> {
        let envelope: Envelope<ScreenshotCapture> = self
            .request(
                Method::POST,
                self.match_url(match_id, MatchAction::Screenshot),
                MatchAction::Screenshot.class(),
            )
            .await?;
        envelope.into_data()
    }

    async fn generate_data_analysis(&self, match_id: &str) -> Result<DataAnalysis> {
        let envelope: Envelope<DataAnalysis> = self
            .request(
                Method::POST,
                self.match_url(match_id, MatchAction::DataAnalysis),
                MatchAction::DataAnalysis.class(),
            )
            .await?;

        let received_at = envelope.timestamp;
        Ok(DataConverter::stamp_analysis(envelope.into_data()?, match_id, received_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client() -> ApiClient {
        ApiClientBuilder::new()
            .base_url("http://localhost:8000/")
            .build()
            .unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash() {
        assert_eq!(client().base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let result = ApiClientBuilder::new().base_url("  ").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = ApiClientBuilder::new().base_url("localhost 8000").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_match_url_encodes_identifier() {
        let client = client();
        assert_eq!(
            client
                .match_url("12436870", MatchAction::ScreenshotAnalysis)
                .as_str(),
            "http://localhost:8000/match/12436870/screenshot-analysis"
        );
        assert_eq!(
            client
                .match_url("https://x.com/a b#id:1", MatchAction::Screenshot)
                .as_str(),
            "http://localhost:8000/match/https:%2F%2Fx.com%2Fa%20b%23id:1/screenshot"
        );
    }

    #[test]
    fn test_endpoints_keep_base_path() {
        let client = ApiClientBuilder::new()
            .base_url("http://localhost:8000/api/")
            .build()
            .unwrap();
        assert_eq!(
            client.endpoint(&["sofascore", "latest-links"]).as_str(),
            "http://localhost:8000/api/sofascore/latest-links"
        );
        assert_eq!(
            ApiClient::with_limit(client.match_url("7", MatchAction::Analyses), 10).as_str(),
            "http://localhost:8000/api/match/7/screenshot-analyses?limit=10"
        );
    }

    #[test]
    fn test_timeout_classes() {
        let client = client();
        assert_eq!(client.timeout_secs(CallClass::Default), 30);
        assert_eq!(client.timeout_secs(CallClass::Extended), 180);

        assert_eq!(MatchAction::Analyses.class(), CallClass::Default);
        for action in [
            MatchAction::ScreenshotAnalysis,
            MatchAction::Screenshot,
            MatchAction::DataAnalysis,
        ] {
            assert_eq!(action.class(), CallClass::Extended);
        }
    }

    #[test]
    fn test_error_from_fastapi_detail() {
        let err = error_from_body(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "Match ID deve ser um número válido"}"#,
        );
        assert_eq!(err.to_string(), "HTTP 400: Match ID deve ser um número válido");
    }

    #[test]
    fn test_error_from_plain_body() {
        let err = error_from_body(StatusCode::BAD_GATEWAY, "");
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");

        let err = error_from_body(StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded");
        assert_eq!(err.to_string(), "HTTP 500: upstream exploded");
    }

    #[test]
    fn test_unreachable_service_is_recoverable() {
        let client = ApiClientBuilder::new()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        let err = tokio_test::block_on(client.status()).unwrap_err();
        assert!(err.is_recoverable());
    }
}
