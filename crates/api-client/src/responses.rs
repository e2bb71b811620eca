use analytics::{CustomerDigest, StatisticsResult};
use core_types::{Customer, ListResponse, Product, Sale, Source};
use serde::{Deserialize, Serialize};

// The three list envelopes, as each service serializes them.
pub type ProductList = ListResponse<Product, StatisticsResult>;
pub type CustomerList = ListResponse<Customer, CustomerDigest>;
pub type SaleList = ListResponse<Sale, StatisticsResult>;

/// The decoded body of one source's `GET /<entity>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum SourcePayload {
    Products(ProductList),
    Customers(CustomerList),
    Sales(SaleList),
}

impl SourcePayload {
    pub fn source(&self) -> Source {
        match self {
            SourcePayload::Products(_) => Source::Products,
            SourcePayload::Customers(_) => Source::Customers,
            SourcePayload::Sales(_) => Source::Sales,
        }
    }
}

/// The decoded body of one source's `GET /estatisticas`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum SourceStatistics {
    Products(StatisticsResult),
    Customers(CustomerDigest),
    Sales(StatisticsResult),
}
