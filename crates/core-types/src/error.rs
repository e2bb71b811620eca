use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Amount out of range: the {0} exceeds the representable value")]
    AmountOutOfRange(String),

    #[error("Unknown source: {0}")]
    UnknownSource(String),
}
