//! Worker task logic for the parallel bucket scan
//!
//! Each worker:
//! - Owns an exclusive probe client (clients are never shared)
//! - Pulls candidate names from the work queue
//! - Probes, classifies, and reports the outcome
//! - Optionally lists objects and writes found buckets to the sink
//! - Acknowledges each candidate when fully processed

use crate::config::ScanConfig;
use crate::probe::{ListResponse, Probe, LIST_KEY_CAP};
use crate::report;
use crate::scanner::classify::{classify, ProbeOutcome};
use crate::scanner::queue::WorkQueueReceiver;
use crate::sink::SinkHandle;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Statistics collected by a worker
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Buckets confirmed to exist
    pub found: AtomicU64,

    /// Candidates that do not exist
    pub not_found: AtomicU64,

    /// Candidates whose probe errored
    pub errors: AtomicU64,
}

impl WorkerStats {
    fn record_found(&self) {
        self.found.fetch_add(1, Ordering::Relaxed);
    }

    fn record_not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }
}

/// A worker task that processes candidates from the queue
pub struct Worker {
    /// Worker ID
    id: usize,

    /// Task handle
    handle: Option<JoinHandle<()>>,

    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a new worker task
    pub fn spawn(
        id: usize,
        config: Arc<ScanConfig>,
        probe: Box<dyn Probe>,
        queue_rx: WorkQueueReceiver,
        sink: Option<SinkHandle>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        let stats = Arc::new(WorkerStats::default());
        let stats_clone = Arc::clone(&stats);

        let handle = tokio::spawn(async move {
            worker_loop(id, config, probe, queue_rx, sink, shutdown, stats_clone).await;
        });

        Self {
            id,
            handle: Some(handle),
            stats,
        }
    }

    /// Get worker statistics
    pub fn stats(&self) -> &WorkerStats {
        &self.stats
    }

    /// Wait for the worker to finish
    pub async fn join(mut self) -> Result<(), crate::error::ScanError> {
        if let Some(handle) = self.handle.take() {
            handle
                .await
                .map_err(|_| crate::error::ScanError::WorkerPanicked { id: self.id })?;
        }
        Ok(())
    }
}

/// Main worker loop
///
/// Exits on the termination signal (queue closed and drained) or on the
/// shutdown flag. Candidate errors never terminate the worker.
async fn worker_loop(
    id: usize,
    config: Arc<ScanConfig>,
    probe: Box<dyn Probe>,
    queue_rx: WorkQueueReceiver,
    sink: Option<SinkHandle>,
    shutdown: Arc<AtomicBool>,
    stats: Arc<WorkerStats>,
) {
    debug!(worker = id, "Worker starting");

    loop {
        if shutdown.load(Ordering::Relaxed) {
            debug!(worker = id, "Worker shutting down on interrupt");
            break;
        }

        // Blocking receive with a short timeout so the shutdown flag is
        // re-checked while idle.
        let bucket = match tokio::time::timeout(Duration::from_millis(100), queue_rx.recv()).await
        {
            Ok(Some(bucket)) => bucket,
            Ok(None) => {
                debug!(worker = id, "Queue closed, worker exiting");
                break;
            }
            Err(_) => continue,
        };

        process_candidate(&*probe, &config, sink.as_ref(), &stats, &bucket).await;
        queue_rx.ack();
    }

    debug!(
        worker = id,
        found = stats.found.load(Ordering::Relaxed),
        errors = stats.errors.load(Ordering::Relaxed),
        "Worker finished"
    );
}

/// Process a single candidate: probe, classify, report, list, persist
async fn process_candidate(
    probe: &dyn Probe,
    config: &ScanConfig,
    sink: Option<&SinkHandle>,
    stats: &WorkerStats,
    bucket: &str,
) {
    let outcome = classify(bucket, probe.head_bucket(bucket).await);

    match outcome {
        ProbeOutcome::Found => {
            stats.record_found();
            report::report_found(bucket);

            let keys = if config.list_objects {
                list_bucket(probe, bucket).await
            } else {
                None
            };

            if let Some(sink) = sink {
                let keys = keys.unwrap_or_default();
                if let Err(e) = sink.append(bucket.to_string(), keys).await {
                    error!(bucket, error = %e, "Failed to persist found bucket");
                }
            }
        }
        // Silent: no output for non-existent buckets keeps large scans readable
        ProbeOutcome::NotFound => stats.record_not_found(),
        ProbeOutcome::Error(_) => {
            stats.record_error();
            report::report_probe_error(bucket);
        }
    }
}

/// Shallow-list a found bucket, streaming keys to the terminal
///
/// Returns `Some(keys)` only when the listing succeeded; `Denied` and
/// `Failed` return `None` so no object list reaches the sink.
async fn list_bucket(probe: &dyn Probe, bucket: &str) -> Option<Vec<String>> {
    match probe.list_objects(bucket, LIST_KEY_CAP).await {
        ListResponse::Objects(keys) if keys.is_empty() => {
            report::report_empty_bucket();
            Some(keys)
        }
        ListResponse::Objects(keys) => {
            report::report_listing_header();
            for key in &keys {
                report::report_object_key(key);
            }
            Some(keys)
        }
        ListResponse::Denied => {
            report::report_listing_denied();
            None
        }
        ListResponse::Failed { detail } => {
            warn!(bucket, detail = %detail, "Could not list objects");
            None
        }
    }
}

/// Aggregate statistics from multiple workers
pub fn aggregate_stats(workers: &[Worker]) -> (u64, u64, u64) {
    let mut found = 0u64;
    let mut not_found = 0u64;
    let mut errors = 0u64;

    for worker in workers {
        found += worker.stats.found.load(Ordering::Relaxed);
        not_found += worker.stats.not_found.load(Ordering::Relaxed);
        errors += worker.stats.errors.load(Ordering::Relaxed);
    }

    (found, not_found, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_stats() {
        let stats = WorkerStats::default();

        stats.record_found();
        stats.record_found();
        stats.record_not_found();
        stats.record_error();

        assert_eq!(stats.found.load(Ordering::Relaxed), 2);
        assert_eq!(stats.not_found.load(Ordering::Relaxed), 1);
        assert_eq!(stats.errors.load(Ordering::Relaxed), 1);
    }
}
