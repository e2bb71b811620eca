use chrono::{DateTime, Utc};
use core_types::Customer;
use serde::{Deserialize, Serialize};

/// Minimum number of characters a phone needs to count as valid.
const MIN_PHONE_LEN: usize = 10;

/// What the customers service reports alongside its list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDigest {
    pub total_customers: usize,
    pub valid_phones: usize,
    pub report: String,
    pub generated_at: DateTime<Utc>,
}

impl CustomerDigest {
    pub fn empty() -> Self {
        Self {
            total_customers: 0,
            valid_phones: 0,
            report: String::new(),
            generated_at: Utc::now(),
        }
    }
}

impl Default for CustomerDigest {
    fn default() -> Self {
        Self::empty()
    }
}

/// Counts customers and well-formed phone numbers over a snapshot.
pub fn digest_customers(customers: &[Customer]) -> CustomerDigest {
    let valid_phones = customers
        .iter()
        .filter(|c| c.phone.chars().count() >= MIN_PHONE_LEN)
        .count();

    CustomerDigest {
        total_customers: customers.len(),
        valid_phones,
        report: format!("Report generated for {} customers", customers.len()),
        generated_at: Utc::now(),
    }
}
