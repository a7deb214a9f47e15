//! ArcGIS REST feature service client

use async_trait::async_trait;
use aoiscan_core::config::LayeredConfig;
use aoiscan_core::error::{AoiscanError, Result};
use aoiscan_core::models::{AttributeMap, FeatureSet, LayerHandle, LayerQuery};
use aoiscan_core::ports::FeatureService;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;
use url::form_urlencoded;
use url::Url;

use crate::esri::{self, LayerInfo, QueryPage};

/// Longest wait between two attempts
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Settings for the REST client
#[derive(Debug, Clone)]
pub struct ArcGisConfig {
    /// Timeout of a single HTTP request
    pub request_timeout: Duration,

    /// Retries after the first attempt for transient failures
    pub max_retries: u32,

    /// Features kept per layer; further pages are not requested
    pub max_features: usize,

    /// Delay before the first retry, doubled on each further retry
    pub initial_backoff: Duration,
}

impl Default for ArcGisConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            max_features: 10_000,
            initial_backoff: Duration::from_millis(250),
        }
    }
}

impl ArcGisConfig {
    pub fn from_layered(config: &LayeredConfig) -> Self {
        Self {
            request_timeout: Duration::from_secs(config.request_timeout_secs.value),
            max_retries: config.max_retries.value,
            max_features: config.max_features_per_layer.value,
            ..Default::default()
        }
    }
}

/// Feature service backed by ArcGIS FeatureServer/MapServer layers
#[derive(Debug, Clone)]
pub struct ArcGisFeatureService {
    client: Client,
    config: ArcGisConfig,
}

/// Outcome of a single HTTP attempt
enum Attempt {
    Done(String),
    Retry(String),
    Fail(String),
}

impl ArcGisFeatureService {
    /// Create a new client
    pub fn new(config: ArcGisConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("aoiscan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AoiscanError::ConfigInvalid {
                key: "http_client".to_string(),
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ArcGisConfig {
        &self.config
    }

    /// Parse a layer URL, accepting only http and https endpoints
    fn parse_http_url(url: &str) -> std::result::Result<Url, String> {
        let parsed = Url::parse(url).map_err(|e| format!("invalid layer URL: {}", e))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            scheme => Err(format!("unsupported layer URL scheme '{}'", scheme)),
        }
    }

    fn layer_info_url(url: &str) -> std::result::Result<Url, String> {
        let mut parsed = Self::parse_http_url(url)?;
        parsed.query_pairs_mut().append_pair("f", "json");
        Ok(parsed)
    }

    fn query_url(url: &str) -> std::result::Result<Url, String> {
        let base = url.split('?').next().unwrap_or(url).trim_end_matches('/');
        Self::parse_http_url(&format!("{}/query", base))
    }

    /// Form body of one query page
    fn query_body(query: &LayerQuery, page: Option<(usize, usize)>) -> String {
        let mut form = form_urlencoded::Serializer::new(String::new());
        form.append_pair("where", "1=1")
            .append_pair("outFields", &query.out_fields_param())
            .append_pair("returnGeometry", if query.return_geometry { "true" } else { "false" })
            .append_pair("f", "json");

        if let Some(area) = &query.area {
            let (geometry, geometry_type) = esri::encode_area(area);
            form.append_pair("geometry", &geometry)
                .append_pair("geometryType", geometry_type)
                .append_pair("inSR", &esri::WGS84_WKID.to_string())
                .append_pair("spatialRel", esri::SPATIAL_REL_INTERSECTS);
        }

        if let Some((offset, count)) = page {
            form.append_pair("resultOffset", &offset.to_string())
                .append_pair("resultRecordCount", &count.to_string());
        }

        form.finish()
    }

    async fn attempt(&self, request: reqwest::RequestBuilder) -> Attempt {
        match request.send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    match response.text().await {
                        Ok(body) => Attempt::Done(body),
                        Err(e) => Attempt::Retry(format!("failed to read response: {}", e)),
                    }
                } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                    Attempt::Retry(format!("HTTP {}", status))
                } else {
                    Attempt::Fail(format!("HTTP {}", status))
                }
            }
            Err(e) if e.is_timeout() || e.is_connect() => Attempt::Retry(e.to_string()),
            Err(e) => Attempt::Fail(e.to_string()),
        }
    }

    /// Delay before retry number `attempt` (1-based), doubling up to [`MAX_BACKOFF`]
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.config.initial_backoff.saturating_mul(factor).min(MAX_BACKOFF)
    }

    /// Execute a request with exponential backoff retry
    async fn execute_with_retry(
        &self,
        request: reqwest::RequestBuilder,
    ) -> std::result::Result<String, String> {
        let mut last_err = String::from("request was not sent");

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let backoff = self.backoff_delay(attempt);
                tracing::debug!(attempt, backoff_ms = backoff.as_millis() as u64, "Retrying request");
                tokio::time::sleep(backoff).await;
            }

            let Some(cloned) = request.try_clone() else {
                return Err("request body cannot be retried".to_string());
            };

            match self.attempt(cloned).await {
                Attempt::Done(body) => return Ok(body),
                Attempt::Retry(reason) => last_err = reason,
                Attempt::Fail(reason) => return Err(reason),
            }
        }

        Err(last_err)
    }

    async fn fetch_page(
        &self,
        url: &Url,
        body: String,
    ) -> std::result::Result<QueryPage, String> {
        let request = self
            .client
            .post(url.clone())
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body);

        let text = self.execute_with_retry(request).await?;
        esri::decode(&text)
    }
}

#[async_trait]
impl FeatureService for ArcGisFeatureService {
    async fn load_layer(&self, url: &str) -> Result<LayerHandle> {
        let load_err = |reason: String| AoiscanError::LayerLoad { url: url.to_string(), reason };

        let info_url = Self::layer_info_url(url).map_err(load_err)?;
        let text = self.execute_with_retry(self.client.get(info_url)).await.map_err(load_err)?;
        let info: LayerInfo = esri::decode(&text).map_err(load_err)?;

        tracing::debug!(
            url,
            title = info.name.as_deref().unwrap_or(""),
            geometry_type = info.geometry_type.as_deref().unwrap_or(""),
            "Layer loaded"
        );

        Ok(LayerHandle {
            url: url.to_string(),
            title: info.name,
            geometry_type: info.geometry_type,
            max_record_count: info.max_record_count,
        })
    }

    async fn query_intersecting(&self, layer: &LayerHandle, query: &LayerQuery) -> Result<FeatureSet> {
        let query_err =
            |reason: String| AoiscanError::LayerQuery { url: layer.url.clone(), reason };

        let query_url = Self::query_url(&layer.url).map_err(query_err)?;
        let max = self.config.max_features;

        let mut features: Vec<AttributeMap> = Vec::new();
        let mut page = self.fetch_page(&query_url, Self::query_body(query, None)).await.map_err(query_err)?;

        loop {
            let received = page.features.len();
            features.extend(page.features.into_iter().map(|f| f.attributes));

            if !page.exceeded_transfer_limit || received == 0 {
                break;
            }
            if features.len() >= max {
                tracing::warn!(
                    url = %layer.url,
                    max_features = max,
                    "Layer has more features than the configured maximum; results truncated"
                );
                break;
            }

            let page_size = layer.max_record_count.unwrap_or(received).max(1);
            let count = page_size.min(max - features.len());
            tracing::debug!(url = %layer.url, offset = features.len(), count, "Requesting next page");
            page = self
                .fetch_page(&query_url, Self::query_body(query, Some((features.len(), count))))
                .await
                .map_err(query_err)?;
        }

        features.truncate(max);

        Ok(FeatureSet { title: layer.title.clone(), features })
    }
}
