use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The envelope every service returns from `GET /<entity>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T, S> {
    pub items: Vec<T>,
    pub statistics: S,
    pub total: usize,
}

impl<T, S> ListResponse<T, S> {
    pub fn new(items: Vec<T>, statistics: S) -> Self {
        let total = items.len();
        Self {
            items,
            statistics,
            total,
        }
    }
}

/// The body of `GET /saude`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthStatus {
    pub fn ok(service: &str) -> Self {
        Self {
            status: "OK".to_string(),
            service: service.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}
