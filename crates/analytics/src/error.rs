use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Monetary series must be non-negative, found {value} at position {index}")]
    NegativeValue { index: usize, value: String },

    #[error("The {0} of the series falls outside the representable decimal range")]
    Overflow(&'static str),
}
