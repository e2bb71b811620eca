use crate::error::OffloadError;
use configuration::settings::OffloadConfig;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tokio::sync::{mpsc, oneshot};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A fixed pool of OS threads fed by a bounded job queue.
///
/// Share it behind an `Arc`; `run` only needs `&self`.
pub struct OffloadExecutor {
    queue: Option<mpsc::Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl OffloadExecutor {
    /// Spawns `config.workers` threads sharing a queue of `config.queue_capacity` slots.
    pub fn new(config: &OffloadConfig) -> Result<Self, OffloadError> {
        if config.workers == 0 {
            return Err(OffloadError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        if config.queue_capacity == 0 {
            return Err(OffloadError::InvalidConfig(
                "queue_capacity must be at least 1".to_string(),
            ));
        }

        let (sender, receiver) = mpsc::channel::<Job>(config.queue_capacity);
        let receiver = Arc::new(Mutex::new(receiver));

        let mut workers = Vec::with_capacity(config.workers);
        for index in 0..config.workers {
            let receiver = Arc::clone(&receiver);
            let handle = thread::Builder::new()
                .name(format!("offload-{}", index))
                .spawn(move || worker_loop(index, receiver))?;
            workers.push(handle);
        }

        tracing::info!(
            workers = config.workers,
            queue_capacity = config.queue_capacity,
            "Offload pool started."
        );

        Ok(Self {
            queue: Some(sender),
            workers,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Runs `f(input)` on a pool thread and resolves once it has finished.
    ///
    /// `input` is moved into the job, so callers hand over an owned snapshot.
    /// A panic inside `f` resolves to `OffloadError::ExecutionFault` carrying
    /// the panic message; the worker thread survives and takes the next job.
    pub async fn run<F, I, T>(&self, f: F, input: I) -> Result<T, OffloadError>
    where
        F: FnOnce(I) -> T + Send + 'static,
        I: Send + 'static,
        T: Send + 'static,
    {
        let queue = self.queue.as_ref().ok_or(OffloadError::PoolClosed)?;
        let (result_tx, result_rx) = oneshot::channel::<Result<T, String>>();

        let job: Job = Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(move || f(input)));
            // The caller may have given up waiting; nothing to do then.
            let _ = result_tx.send(outcome.map_err(|payload| panic_message(payload.as_ref())));
        });

        queue.send(job).await.map_err(|_| OffloadError::PoolClosed)?;

        match result_rx.await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(reason)) => {
                tracing::error!(%reason, "Offloaded computation panicked.");
                Err(OffloadError::ExecutionFault { reason })
            }
            Err(_) => Err(OffloadError::ExecutionFault {
                reason: "offloaded unit exited without reporting a result".to_string(),
            }),
        }
    }

    /// Closes the queue and waits for every worker to drain and exit.
    ///
    /// Jobs already queued still run. Later calls to `run` fail with `PoolClosed`.
    pub fn shutdown(&mut self) {
        if self.queue.take().is_none() {
            return;
        }
        for handle in self.workers.drain(..) {
            let name = handle.thread().name().unwrap_or("offload").to_string();
            if handle.join().is_err() {
                tracing::warn!(worker = %name, "Offload worker exited by panicking.");
            }
        }
        tracing::info!("Offload pool shut down.");
    }
}

impl Drop for OffloadExecutor {
    /// Closes the queue without waiting. Workers finish the jobs already
    /// queued and then exit on their own; only `shutdown` joins them.
    fn drop(&mut self) {
        if self.queue.take().is_some() {
            tracing::debug!(workers = self.workers.len(), "Offload pool detached.");
        }
    }
}

fn worker_loop(index: usize, receiver: Arc<Mutex<mpsc::Receiver<Job>>>) {
    loop {
        let next = {
            // Jobs never panic through (they catch_unwind), so poisoning is not
            // expected; recover the guard rather than killing the worker.
            let mut guard = match receiver.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.blocking_recv()
        };

        match next {
            Some(job) => job(),
            None => break,
        }
    }
    tracing::debug!(worker = index, "Offload worker stopped.");
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
