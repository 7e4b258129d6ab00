//! Main client for the inventory SDK.

use crate::api::{SnapshotsApi, SystemApi, TablesApi};
use crate::config::{api_root, ClientConfig, RetryConfig, DEFAULT_API_VERSION, DEFAULT_PAGE_SIZE, DEFAULT_SNAPSHOT};
use crate::error::{InventoryError, InventoryResult};
use crate::transport::HttpTransport;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Client for the network inventory API.
#[derive(Clone)]
pub struct InventoryClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl InventoryClient {
    /// Create a new client builder.
    pub fn builder() -> InventoryClientBuilder {
        InventoryClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> InventoryResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    /// Server URL the client was built with.
    pub fn server_url(&self) -> &Url {
        &self.config.server_url
    }

    /// Snapshot queried by default.
    pub fn snapshot_id(&self) -> &str {
        &self.config.snapshot_id
    }

    /// Get the system API.
    pub fn system(&self) -> SystemApi<'_> {
        SystemApi::new(self)
    }

    /// Get the snapshots API.
    pub fn snapshots(&self) -> SnapshotsApi<'_> {
        SnapshotsApi::new(self)
    }

    /// Get the tables API.
    pub fn tables(&self) -> TablesApi<'_> {
        TablesApi::new(self)
    }
}

/// Builder for creating an InventoryClient.
pub struct InventoryClientBuilder {
    base_url: Option<String>,
    api_token: Option<String>,
    api_version: String,
    snapshot_id: String,
    timeout: Duration,
    retry_config: RetryConfig,
    accept_invalid_certs: bool,
    page_size: u32,
}

impl InventoryClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            snapshot_id: DEFAULT_SNAPSHOT.to_string(),
            timeout: Duration::from_secs(15),
            retry_config: RetryConfig::no_retry(),
            accept_invalid_certs: false,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the server URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API token.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the API version used for bare server URLs.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the default snapshot.
    pub fn snapshot_id(mut self, snapshot_id: impl Into<String>) -> Self {
        self.snapshot_id = snapshot_id.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Skip TLS certificate verification.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Set the number of rows fetched per table page.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Build the client.
    pub fn build(self) -> InventoryResult<InventoryClient> {
        let base_url_str = self
            .base_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| InventoryError::Config("base_url is required".to_string()))?;

        let api_token = self
            .api_token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| InventoryError::Config("api_token is required".to_string()))?;

        if self.page_size == 0 {
            return Err(InventoryError::Config("page_size must be positive".to_string()));
        }

        let server_url = Url::parse(&base_url_str)?;
        let api_url = api_root(&server_url, &self.api_version)?;

        let config = ClientConfig {
            server_url,
            api_url,
            api_token,
            snapshot_id: self.snapshot_id,
            timeout: self.timeout,
            retry_config: self.retry_config,
            accept_invalid_certs: self.accept_invalid_certs,
            page_size: self.page_size,
        };

        InventoryClient::from_config(config)
    }
}

impl Default for InventoryClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Filters, Table, TableQuery};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> InventoryClient {
        InventoryClient::builder()
            .base_url(server.uri())
            .api_token("token")
            .page_size(2)
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_url_and_token() {
        assert!(matches!(
            InventoryClient::builder().api_token("t").build(),
            Err(InventoryError::Config(_))
        ));
        assert!(matches!(
            InventoryClient::builder().base_url("https://ipf.example.com").build(),
            Err(InventoryError::Config(_))
        ));
        assert!(matches!(
            InventoryClient::builder()
                .base_url("not a url")
                .api_token("t")
                .build(),
            Err(InventoryError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_builder_defaults() {
        let client = InventoryClient::builder()
            .base_url("https://ipf.example.com")
            .api_token("t")
            .build()
            .unwrap();

        assert_eq!(client.snapshot_id(), "$last");
        assert_eq!(client.server_url().as_str(), "https://ipf.example.com/");
    }

    #[tokio::test]
    async fn test_os_version() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v6.8/os/version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "6.8.3"})))
            .mount(&server)
            .await;

        let version = client_for(&server).system().os_version().await.unwrap();
        assert_eq!(version.version, "6.8.3");
    }

    #[tokio::test]
    async fn test_resolve_last_snapshot() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v6.8/snapshots"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "old", "name": "Monday", "state": "loaded", "locked": false, "tsEnd": 1},
                {"id": "new", "name": "Friday", "state": "loaded", "locked": false, "tsEnd": 5},
                {"id": "gone", "name": null, "state": "unloaded", "locked": false, "tsEnd": 9}
            ])))
            .mount(&server)
            .await;

        let snapshot = client_for(&server)
            .snapshots()
            .resolve("$last")
            .await
            .unwrap();
        assert_eq!(snapshot.id, "new");
        assert_eq!(snapshot.display_name(), "Friday");
    }

    #[tokio::test]
    async fn test_fetch_pages_until_short_page() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v6.8/tables/management/ntp/sources"))
            .and(body_partial_json(json!({"pagination": {"limit": 2, "start": 0}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"source": "a"}, {"source": "b"}],
                "_meta": {"limit": 2, "start": 0}
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/v6.8/tables/management/ntp/sources"))
            .and(body_partial_json(json!({"pagination": {"limit": 2, "start": 2}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"source": "a"}],
                "_meta": {"limit": 2, "start": 2}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let rows = client_for(&server)
            .tables()
            .fetch(Table::NtpSources, &TableQuery::new(["hostname", "source"]))
            .await
            .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2]["source"], json!("a"));
    }

    #[tokio::test]
    async fn test_fetch_stops_at_reported_count() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v6.8/tables/inventory/sites"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"siteName": "L1"}, {"siteName": "L2"}],
                "_meta": {"count": 2}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let rows = client_for(&server)
            .tables()
            .fetch(Table::Sites, &TableQuery::new(["siteName"]))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_sends_snapshot_and_filters() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v6.8/tables/inventory/devices"))
            .and(body_partial_json(json!({
                "columns": ["hostname"],
                "snapshot": "abc",
                "filters": {"siteName": ["eq", "L35"]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"hostname": "sw1"}],
                "_meta": {"count": 1}
            })))
            .mount(&server)
            .await;

        let query = TableQuery::new(["hostname"])
            .filters(Filters::site(&["L35"]))
            .snapshot("abc");
        let rows = client_for(&server)
            .tables()
            .fetch(Table::Devices, &query)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_count_reads_meta() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v6.8/tables/inventory/devices"))
            .and(body_partial_json(json!({
                "snapshot": "$last",
                "pagination": {"limit": 1, "start": 0}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "1"}],
                "_meta": {"count": 321, "limit": 1, "start": 0}
            })))
            .mount(&server)
            .await;

        let count = client_for(&server)
            .tables()
            .count(Table::Devices, &Filters::new(), None)
            .await
            .unwrap();
        assert_eq!(count, 321);
    }
}
