use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("No record with id {0}")]
    NotFound(Uuid),

    #[error("A record with id {0} already exists")]
    Duplicate(Uuid),
}
