use crate::outcome::{FailureReason, FaultKind, SourceOutcome};
use futures::future::{join_all, BoxFuture};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::time::Duration;

/// One branch of a fan-out: a boxed, `'static` future resolving to the
/// source's payload or its error.
pub type SourceCall<T, E> = BoxFuture<'static, Result<T, E>>;

/// Runs fan-outs with an optional deadline per branch.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gatherer {
    per_call_timeout: Option<Duration>,
}

impl Gatherer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds every branch independently. An expired branch settles as
    /// `Failure(Timeout)`; its siblings keep running.
    pub fn with_timeout(limit: Duration) -> Self {
        Self {
            per_call_timeout: Some(limit),
        }
    }

    pub fn per_call_timeout(&self) -> Option<Duration> {
        self.per_call_timeout
    }

    /// Launches every call as its own task and waits for all of them to settle.
    ///
    /// The result holds exactly one outcome per key. No failure (error,
    /// deadline, or a panic inside a branch) cancels or short-circuits the
    /// others, and this function itself never fails. Keys are expected to be
    /// distinct; if one repeats, the later call's outcome is kept.
    pub async fn gather<K, T, E, I>(&self, calls: I) -> BTreeMap<K, SourceOutcome<T>>
    where
        K: Ord + Debug,
        T: Send + 'static,
        E: Into<FailureReason> + Send + 'static,
        I: IntoIterator<Item = (K, SourceCall<T, E>)>,
    {
        let deadline = self.per_call_timeout;

        let (keys, handles): (Vec<K>, Vec<_>) = calls
            .into_iter()
            .map(|(key, call)| {
                let handle = tokio::spawn(async move {
                    let result = match deadline {
                        Some(limit) => match tokio::time::timeout(limit, call).await {
                            Ok(result) => result.map_err(Into::into),
                            Err(_) => Err(FailureReason::timeout(limit)),
                        },
                        None => call.await.map_err(Into::into),
                    };
                    SourceOutcome::from(result)
                });
                (key, handle)
            })
            .unzip();

        // The only suspension point: every branch has reached a terminal state after this.
        let settled = join_all(handles).await;

        keys.into_iter()
            .zip(settled)
            .map(|(key, joined)| {
                let outcome = joined.unwrap_or_else(|e| {
                    SourceOutcome::Failure(FailureReason::new(
                        FaultKind::Aborted,
                        format!("branch task failed: {}", e),
                    ))
                });
                if let SourceOutcome::Failure(reason) = &outcome {
                    tracing::warn!(source = ?key, kind = ?reason.kind, reason = %reason, "Upstream call failed; continuing without it.");
                }
                (key, outcome)
            })
            .collect()
    }
}

/// `Gatherer::new().gather(calls)`: settle-all with no extra deadline.
pub async fn gather_all<K, T, E, I>(calls: I) -> BTreeMap<K, SourceOutcome<T>>
where
    K: Ord + Debug,
    T: Send + 'static,
    E: Into<FailureReason> + Send + 'static,
    I: IntoIterator<Item = (K, SourceCall<T, E>)>,
{
    Gatherer::new().gather(calls).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use tokio::time::{sleep, Instant};

    fn ok_after(ms: u64, value: u32) -> SourceCall<u32, FailureReason> {
        async move {
            sleep(Duration::from_millis(ms)).await;
            Ok(value)
        }
        .boxed()
    }

    fn fail_after(ms: u64) -> SourceCall<u32, FailureReason> {
        async move {
            sleep(Duration::from_millis(ms)).await;
            Err(FailureReason::network("connection refused"))
        }
        .boxed()
    }

    #[tokio::test(start_paused = true)]
    async fn every_source_settles_even_when_some_fail() {
        let started = Instant::now();

        let outcomes = gather_all(vec![
            ("a", fail_after(5)),
            ("b", ok_after(200, 2)),
            ("c", fail_after(50)),
            ("d", ok_after(10, 4)),
        ])
        .await;

        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes["b"], SourceOutcome::Success(2));
        assert_eq!(outcomes["d"], SourceOutcome::Success(4));
        assert_eq!(outcomes["a"].failure().unwrap().kind, FaultKind::Network);
        assert_eq!(outcomes["c"].failure().unwrap().kind, FaultKind::Network);
        // Returned only after the slowest branch settled.
        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn branches_run_concurrently_not_in_sequence() {
        let started = Instant::now();

        let outcomes = gather_all(vec![
            (1, ok_after(100, 1)),
            (2, ok_after(100, 2)),
            (3, ok_after(100, 3)),
        ])
        .await;

        assert_eq!(outcomes.len(), 3);
        assert!(started.elapsed() < Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_branch_becomes_a_timeout_without_cancelling_siblings() {
        let gatherer = Gatherer::with_timeout(Duration::from_secs(10));

        let outcomes = gatherer
            .gather(vec![
                ("fast", ok_after(10, 1)),
                ("stuck", ok_after(60_000, 2)),
                ("slowish", ok_after(9_000, 3)),
            ])
            .await;

        assert_eq!(outcomes["fast"], SourceOutcome::Success(1));
        assert_eq!(outcomes["slowish"], SourceOutcome::Success(3));
        assert_eq!(outcomes["stuck"].failure().unwrap().kind, FaultKind::Timeout);
    }

    #[tokio::test]
    async fn panicking_branch_is_contained() {
        let boom: SourceCall<u32, FailureReason> = async { panic!("branch exploded") }.boxed();

        let outcomes = gather_all(vec![("boom", boom), ("fine", ok_after(0, 7))]).await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes["fine"], SourceOutcome::Success(7));
        assert_eq!(outcomes["boom"].failure().unwrap().kind, FaultKind::Aborted);
    }

    #[tokio::test]
    async fn all_failing_still_yields_one_outcome_each() {
        let outcomes = gather_all(vec![("x", fail_after(0)), ("y", fail_after(0)), ("z", fail_after(0))]).await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.values().all(|o| !o.is_success()));
    }

    #[tokio::test]
    async fn empty_fan_out_is_empty() {
        let outcomes = gather_all(Vec::<(u8, SourceCall<u32, FailureReason>)>::new()).await;
        assert!(outcomes.is_empty());
    }
}
