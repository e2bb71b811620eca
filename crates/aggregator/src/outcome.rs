use api_client::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Why one upstream call did not produce a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FaultKind {
    /// No connection, or the connection broke.
    Network,
    /// The call exceeded its time bound.
    Timeout,
    /// The upstream answered with a non-2xx status.
    UpstreamError { status: u16 },
    /// The upstream answered 2xx with a body we could not read.
    Decode,
    /// The branch's task died before settling.
    Aborted,
}

/// A classified failure plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReason {
    #[serde(flatten)]
    pub kind: FaultKind,
    pub message: String,
}

impl FailureReason {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(limit: Duration) -> Self {
        Self::new(
            FaultKind::Timeout,
            format!("no answer within {} ms", limit.as_millis()),
        )
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Network, message)
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<ApiError> for FailureReason {
    fn from(err: ApiError) -> Self {
        let kind = match &err {
            ApiError::Network { .. } | ApiError::ClientBuild(_) => FaultKind::Network,
            ApiError::Timeout { .. } => FaultKind::Timeout,
            ApiError::Upstream { status, .. } => FaultKind::UpstreamError { status: *status },
            ApiError::Deserialization { .. } => FaultKind::Decode,
        };
        Self::new(kind, err.to_string())
    }
}

/// The terminal state of one upstream call. Exactly one variant holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "value", rename_all = "lowercase")]
pub enum SourceOutcome<T> {
    Success(T),
    Failure(FailureReason),
}

impl<T> SourceOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, SourceOutcome::Success(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            SourceOutcome::Success(value) => Some(value),
            SourceOutcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            SourceOutcome::Success(_) => None,
            SourceOutcome::Failure(reason) => Some(reason),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> SourceOutcome<U> {
        match self {
            SourceOutcome::Success(value) => SourceOutcome::Success(f(value)),
            SourceOutcome::Failure(reason) => SourceOutcome::Failure(reason),
        }
    }
}

impl<T, E: Into<FailureReason>> From<Result<T, E>> for SourceOutcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => SourceOutcome::Success(value),
            Err(err) => SourceOutcome::Failure(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_are_classified() {
        let timeout: FailureReason = ApiError::Timeout {
            url: "http://clientes/clientes".into(),
        }
        .into();
        assert_eq!(timeout.kind, FaultKind::Timeout);

        let status: FailureReason = ApiError::Upstream {
            url: "http://vendas/vendas".into(),
            status: 503,
        }
        .into();
        assert_eq!(status.kind, FaultKind::UpstreamError { status: 503 });

        let refused: FailureReason = ApiError::Network {
            url: "http://produtos/produtos".into(),
            message: "connection refused".into(),
        }
        .into();
        assert_eq!(refused.kind, FaultKind::Network);
    }

    #[test]
    fn outcome_serializes_with_explicit_tag() {
        let failed: SourceOutcome<u32> =
            SourceOutcome::Failure(FailureReason::new(FaultKind::UpstreamError { status: 502 }, "bad gateway"));
        let json = serde_json::to_value(&failed).unwrap();

        assert_eq!(json["outcome"], "failure");
        assert_eq!(json["value"]["kind"], "upstream_error");
        assert_eq!(json["value"]["status"], 502);
        assert_eq!(json["value"]["message"], "bad gateway");
    }
}
