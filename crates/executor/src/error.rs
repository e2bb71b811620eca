use thiserror::Error;

#[derive(Error, Debug)]
pub enum OffloadError {
    /// The offloaded unit terminated abnormally before producing a value.
    #[error("Offloaded computation terminated abnormally: {reason}")]
    ExecutionFault { reason: String },

    #[error("The offload pool is shut down and accepts no more work")]
    PoolClosed,

    #[error("Invalid offload pool configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to spawn an offload worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}
