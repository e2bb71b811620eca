use crate::error::ApiError;
use async_trait::async_trait;
use configuration::settings::UpstreamConfig;
use core_types::{Customer, HealthStatus, Product, Source};
use serde::de::DeserializeOwned;
use std::time::Duration;
use uuid::Uuid;

pub mod error;
pub mod responses;

// --- Public API ---
pub use responses::{CustomerList, ProductList, SaleList, SourcePayload, SourceStatistics};

/// The uniform interface the dashboard uses to talk to one upstream service.
///
/// Every call is a single round trip with a bounded timeout and no retries.
/// Whether a failure is acceptable is the caller's decision.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Which service this client talks to.
    fn source(&self) -> Source;

    /// `GET /<entity>`: the items plus the statistics the service computed.
    async fn list(&self) -> Result<SourcePayload, ApiError>;

    /// `GET /saude`.
    async fn health(&self) -> Result<HealthStatus, ApiError>;

    /// `GET /estatisticas`: the statistics object alone.
    async fn statistics(&self) -> Result<SourceStatistics, ApiError>;
}

/// Point lookups the sales service needs to price and attribute a new sale.
#[async_trait]
pub trait Lookup: Send + Sync {
    async fn customer(&self, id: Uuid) -> Result<Customer, ApiError>;
    async fn product(&self, id: Uuid) -> Result<Product, ApiError>;
}

/// A concrete `Upstream` speaking HTTP/JSON to one service.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    source: Source,
    base_url: String,
    client: reqwest::Client,
}

impl HttpUpstream {
    pub fn new(
        source: Source,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;

        Ok(Self {
            source,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Builds the client for `source` from the `[upstream]` settings.
    pub fn from_config(source: Source, config: &UpstreamConfig) -> Result<Self, ApiError> {
        Self::new(source, config.base_url(source), config.timeout())
    }

    /// `GET /<entity>/:id`.
    pub async fn find<T: DeserializeOwned>(&self, id: Uuid) -> Result<T, ApiError> {
        self.get_json(&format!("{}/{}", self.source.collection_path(), id))
            .await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(source = %self.source, %url, status = status.as_u16(), "Upstream returned an error status.");
            return Err(ApiError::Upstream {
                url,
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::from_transport(&url, e))?;

        serde_json::from_str::<T>(&text).map_err(|e| ApiError::Deserialization {
            url,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    fn source(&self) -> Source {
        self.source
    }

    async fn list(&self) -> Result<SourcePayload, ApiError> {
        let path = self.source.collection_path();
        let payload = match self.source {
            Source::Products => SourcePayload::Products(self.get_json(path).await?),
            Source::Customers => SourcePayload::Customers(self.get_json(path).await?),
            Source::Sales => SourcePayload::Sales(self.get_json(path).await?),
        };
        Ok(payload)
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_json("/saude").await
    }

    async fn statistics(&self) -> Result<SourceStatistics, ApiError> {
        let stats = match self.source {
            Source::Products => SourceStatistics::Products(self.get_json("/estatisticas").await?),
            Source::Customers => {
                SourceStatistics::Customers(self.get_json("/estatisticas").await?)
            }
            Source::Sales => SourceStatistics::Sales(self.get_json("/estatisticas").await?),
        };
        Ok(stats)
    }
}

/// The customers and products services, seen as a lookup table.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    customers: HttpUpstream,
    products: HttpUpstream,
}

impl CatalogClient {
    pub fn new(customers: HttpUpstream, products: HttpUpstream) -> Self {
        Self {
            customers,
            products,
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, ApiError> {
        Ok(Self::new(
            HttpUpstream::from_config(Source::Customers, config)?,
            HttpUpstream::from_config(Source::Products, config)?,
        ))
    }
}

#[async_trait]
impl Lookup for CatalogClient {
    async fn customer(&self, id: Uuid) -> Result<Customer, ApiError> {
        self.customers.find(id).await
    }

    async fn product(&self, id: Uuid) -> Result<Product, ApiError> {
        self.products.find(id).await
    }
}
