use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One independently deployed upstream service.
///
/// The ordering (`Products < Customers < Sales`) is the order the dashboard
/// lists sources in; it has nothing to do with completion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Products,
    Customers,
    Sales,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Products, Source::Customers, Source::Sales];

    /// The service name reported by `/saude`.
    pub fn service_name(&self) -> &'static str {
        match self {
            Source::Products => "servico-produtos",
            Source::Customers => "servico-clientes",
            Source::Sales => "servico-vendas",
        }
    }

    /// The collection path segment, e.g. `/produtos`.
    pub fn collection_path(&self) -> &'static str {
        match self {
            Source::Products => "/produtos",
            Source::Customers => "/clientes",
            Source::Sales => "/vendas",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Products => "products",
            Source::Customers => "customers",
            Source::Sales => "sales",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "products" | "produtos" => Ok(Source::Products),
            "customers" | "clientes" => Ok(Source::Customers),
            "sales" | "vendas" => Ok(Source::Sales),
            other => Err(CoreError::UnknownSource(other.to_string())),
        }
    }
}
