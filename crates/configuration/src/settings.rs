use core_types::Source;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for every binary in the workspace.
///
/// Every section has defaults, so an empty file (or no file at all) yields a
/// configuration that runs all four servers on localhost.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub upstream: UpstreamConfig,
    pub offload: OffloadConfig,
    pub server: ServerConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

/// Where the dashboard (and the sales service) find the other services.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub products_url: String,
    pub customers_url: String,
    pub sales_url: String,
    /// Bound on every single upstream round trip.
    pub timeout_secs: u64,
    /// Bound on the concurrent customer/product lookups made while creating a sale.
    pub lookup_timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn base_url(&self, source: Source) -> &str {
        match source {
            Source::Products => &self.products_url,
            Source::Customers => &self.customers_url,
            Source::Sales => &self.sales_url,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            products_url: "http://localhost:3001".to_string(),
            customers_url: "http://localhost:3002".to_string(),
            sales_url: "http://localhost:3003".to_string(),
            timeout_secs: 10,
            lookup_timeout_secs: 5,
        }
    }
}

/// Sizing of the statistics worker pool each service runs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OffloadConfig {
    pub workers: usize,
    pub queue_capacity: usize,
}

impl Default for OffloadConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            queue_capacity: 64,
        }
    }
}

/// Bind addresses of the four servers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub products: SocketAddr,
    pub customers: SocketAddr,
    pub sales: SocketAddr,
    pub dashboard: SocketAddr,
}

impl ServerConfig {
    pub fn bind_addr(&self, source: Source) -> SocketAddr {
        match source {
            Source::Products => self.products,
            Source::Customers => self.customers,
            Source::Sales => self.sales,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            products: SocketAddr::from(([0, 0, 0, 0], 3001)),
            customers: SocketAddr::from(([0, 0, 0, 0], 3002)),
            sales: SocketAddr::from(([0, 0, 0, 0], 3003)),
            dashboard: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

/// Which sales the dashboard's revenue figures cover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum MetricWindow {
    /// Every sale ever recorded.
    #[default]
    Lifetime,
    /// Only sales made in the current calendar month (UTC).
    CurrentMonth,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub window: MetricWindow,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,tower_http=debug".to_string(),
            directory: None,
            file_prefix: "vendas.log".to_string(),
        }
    }
}
