//! Main API client implementation.

use crate::api::{AccountApi, CertificateApi, DnsApi, HostApi, OrgApi, SearchApi};
use crate::config::RetryConfig;
use reqwest::Client as HttpClient;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use scout_core::{ApiError, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Public API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.shodan.io";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// API client. Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    api_key: String,
    base_url: Url,
    timeout: Duration,
    retry: RetryConfig,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Client with default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(api_key).build()
    }

    #[must_use]
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Host lookup endpoints
    #[must_use]
    pub const fn host(&self) -> HostApi<'_> {
        HostApi::new(self)
    }

    /// Search and aggregation endpoints
    #[must_use]
    pub const fn search(&self) -> SearchApi<'_> {
        SearchApi::new(self)
    }

    /// Certificate lookups
    #[must_use]
    pub const fn certificates(&self) -> CertificateApi<'_> {
        CertificateApi::new(self)
    }

    /// Domain and DNS record endpoints
    #[must_use]
    pub const fn dns(&self) -> DnsApi<'_> {
        DnsApi::new(self)
    }

    /// Account and credit endpoints
    #[must_use]
    pub const fn account(&self) -> AccountApi<'_> {
        AccountApi::new(self)
    }

    /// Organization endpoints
    #[must_use]
    pub const fn org(&self) -> OrgApi<'_> {
        OrgApi::new(self)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_with_query(path, &[]).await
    }

    /// GET with query parameters, retried according to the client's [`RetryConfig`]
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.build_url(path, params)?;
        let retry = &self.inner.retry;
        let mut attempt = 0;

        loop {
            debug!(path, attempt, "GET request");
            match self.send_get(&url).await {
                Err(err) if attempt < retry.max_retries && self.should_retry(&err) => {
                    let wait = match &err {
                        ApiError::RateLimited { retry_after: Some(secs) } => {
                            Duration::from_secs(*secs).min(retry.max_backoff)
                        }
                        _ => retry.backoff_for(attempt),
                    };
                    warn!(path, attempt, error = %err, ?wait, "retrying request");
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    fn should_retry(&self, err: &ApiError) -> bool {
        match err {
            ApiError::RateLimited { .. } => self.inner.retry.retry_on_rate_limit,
            other => other.is_retryable(),
        }
    }

    async fn send_get<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let response = self
            .inner
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if status.is_success() {
            let body = response.text().await.map_err(|e| self.transport_error(&e))?;
            serde_json::from_str(&body).map_err(ApiError::Json)
        } else {
            Err(Self::status_error(status, response).await)
        }
    }

    fn transport_error(&self, err: &reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.inner.timeout.as_secs())
        } else {
            ApiError::Http(err.to_string())
        }
    }

    /// Full URL for `path` with the key and `params` in the query string
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = self
            .inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("key", &self.inner.api_key)
            .extend_pairs(params);

        Ok(url)
    }

    async fn status_error(status: StatusCode, response: reqwest::Response) -> ApiError {
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());

        let body = response.text().await.unwrap_or_default();

        // The API wraps most failures as {"error": "..."}
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or(body);

        match status.as_u16() {
            401 | 403 => ApiError::Unauthorized,
            402 => ApiError::InsufficientCredits,
            404 => ApiError::NotFound { resource: message },
            429 => ApiError::RateLimited { retry_after },
            code => ApiError::Api { code, message },
        }
    }
}

/// Builder for configuring a [`Client`]
#[derive(Debug)]
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
    user_agent: String,
    retry: RetryConfig,
}

impl ClientBuilder {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("scout/{}", env!("CARGO_PKG_VERSION")),
            retry: RetryConfig::default(),
        }
    }

    /// Point the client somewhere else (mock servers, proxies)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    #[must_use]
    pub const fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    pub fn build(self) -> Result<Client> {
        // `Url::join` drops the last segment unless the base ends with '/'
        let mut base = self.base_url;
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| ApiError::Http(e.to_string()))?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                http,
                api_key: self.api_key,
                base_url,
                timeout: self.timeout,
                retry: self.retry,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_keeps_base_path() {
        let client = Client::builder("k3y")
            .base_url("http://localhost:9000/api")
            .build()
            .unwrap();
        let url = client
            .build_url("/shodan/host/search", &[("query", "port:22 country:DE")])
            .unwrap();
        assert_eq!(url.path(), "/api/shodan/host/search");
        assert_eq!(
            url.query(),
            Some("key=k3y&query=port%3A22+country%3ADE")
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = Client::builder("k").base_url("not a url").build().unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_debug_hides_key() {
        let client = Client::new("super-secret").unwrap();
        assert!(!format!("{client:?}").contains("super-secret"));
    }
}
