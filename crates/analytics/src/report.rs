use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Descriptive statistics of one `NumericSeries` snapshot.
///
/// Every monetary figure is rounded to two decimal places. The struct has no
/// setters; it is built once by `compute_statistics` and then only read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResult {
    pub count: usize,
    pub sum: Decimal,
    pub mean: Decimal,
    pub min: Decimal,
    pub max: Decimal,
    pub median: Decimal,
    pub stddev: Decimal,
    pub computed_at: DateTime<Utc>,
}

impl StatisticsResult {
    /// The result for an empty series: every field zero.
    pub fn empty() -> Self {
        Self {
            count: 0,
            sum: Decimal::ZERO,
            mean: Decimal::ZERO,
            min: Decimal::ZERO,
            max: Decimal::ZERO,
            median: Decimal::ZERO,
            stddev: Decimal::ZERO,
            computed_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for StatisticsResult {
    fn default() -> Self {
        Self::empty()
    }
}
