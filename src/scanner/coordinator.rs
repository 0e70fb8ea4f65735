//! Scan coordinator - orchestrates the concurrent bucket scan
//!
//! The coordinator is responsible for:
//! - Setting up the work queue and result sink
//! - Spawning workers (each with its own probe client)
//! - Streaming candidates from the wordlist
//! - The drain-then-close shutdown protocol
//! - Joining workers and collecting final statistics
//!
//! Ordering guarantee: the work queue is closed only after every pushed
//! candidate has been acknowledged, so no worker observes the termination
//! signal while real work remains.

use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::probe::ProbeFactory;
use crate::scanner::queue::{WorkQueue, WorkQueueSender};
use crate::scanner::worker::{aggregate_stats, Worker};
use crate::sink::{ResultSink, SinkHandle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

/// Sink channel capacity
const SINK_CHANNEL_SIZE: usize = 256;

/// Result of a completed scan
#[derive(Debug)]
pub struct ScanSummary {
    /// Candidates dispatched to workers
    pub candidates: u64,

    /// Buckets confirmed to exist
    pub found: u64,

    /// Candidates that do not exist
    pub not_found: u64,

    /// Candidates whose probe errored
    pub errors: u64,

    /// Time taken for the scan
    pub duration: Duration,

    /// Whether the scan completed (vs was interrupted)
    pub completed: bool,
}

/// Coordinates the concurrent bucket scan
pub struct ScanCoordinator {
    /// Configuration
    config: Arc<ScanConfig>,

    /// Probe factory (one probe per worker)
    factory: Arc<dyn ProbeFactory>,

    /// Work queue for candidate names
    queue: WorkQueue,

    /// Worker tasks
    workers: Vec<Worker>,

    /// Shutdown signal
    shutdown: Arc<AtomicBool>,
}

impl ScanCoordinator {
    /// Create a new scan coordinator
    pub fn new(config: ScanConfig, factory: Arc<dyn ProbeFactory>) -> Self {
        let queue = WorkQueue::new(config.queue_size);

        Self {
            config: Arc::new(config),
            factory,
            queue,
            workers: Vec::new(),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a clone of the shutdown flag (for signal handlers)
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Run the bucket scan
    pub async fn run(mut self) -> Result<ScanSummary> {
        let start_time = Instant::now();

        info!(
            region = %self.config.region,
            workers = self.config.worker_count,
            profile = %self.config.profile,
            "Starting bucket scan"
        );

        // Open the sink before spawning workers so a bad output path fails fast
        let sink = match &self.config.output_path {
            Some(path) => Some(ResultSink::create(path, SINK_CHANNEL_SIZE).await?),
            None => None,
        };

        // Workers are spawned first and block on the empty queue while the
        // wordlist streams in.
        self.spawn_workers(sink.as_ref().map(ResultSink::handle)).await;

        // Stream candidates. A wordlist failure is logged, not fatal: the
        // full shutdown sequence still runs so workers exit cleanly.
        let sender = self.queue.sender();
        let mut candidates = 0u64;
        if let Err(e) = self.feed_candidates(&sender, &mut candidates).await {
            error!(
                wordlist = %self.config.wordlist.display(),
                error = %e,
                "Failed to read wordlist"
            );
        }
        drop(sender);

        // Drain all outstanding work, then signal termination by closing the
        // queue. Interrupt skips straight to the close.
        let completed = self.wait_for_drain().await;
        self.queue.close();

        let (found, not_found, errors) = self.join_workers().await;

        // All appends are delivered once workers have joined
        if let Some(sink) = sink {
            sink.finish().await?;
        }

        let duration = start_time.elapsed();

        info!(
            candidates,
            found,
            errors,
            duration_secs = duration.as_secs(),
            "Scan finished"
        );

        Ok(ScanSummary {
            candidates,
            found,
            not_found,
            errors,
            duration,
            completed,
        })
    }

    /// Spawn worker tasks, each with its own probe client
    async fn spawn_workers(&mut self, sink: Option<SinkHandle>) {
        for id in 0..self.config.worker_count {
            let probe = self.factory.create().await;
            let worker = Worker::spawn(
                id,
                Arc::clone(&self.config),
                probe,
                self.queue.receiver(),
                sink.clone(),
                Arc::clone(&self.shutdown),
            );
            self.workers.push(worker);
        }

        info!(count = self.workers.len(), "Workers spawned");
    }

    /// Stream the wordlist into the queue, trimming and skipping blank lines
    async fn feed_candidates(
        &self,
        sender: &WorkQueueSender,
        count: &mut u64,
    ) -> Result<()> {
        let file = File::open(&self.config.wordlist).await?;
        let mut lines = BufReader::new(file).lines();

        while let Some(line) = lines.next_line().await? {
            if self.shutdown.load(Ordering::Relaxed) {
                debug!("Interrupt received, stopping candidate feed");
                break;
            }

            let candidate = line.trim();
            if candidate.is_empty() {
                continue;
            }

            // An interrupt can land while the bounded channel is full and the
            // workers have already stopped consuming; racing the push against
            // the flag keeps the feeder from blocking forever on a dead queue.
            tokio::select! {
                pushed = sender.push(candidate.to_string()) => {
                    pushed.map_err(|_| ScanError::QueueClosed)?;
                    *count += 1;
                }
                _ = shutdown_observed(&self.shutdown) => {
                    debug!("Interrupt received, abandoning blocked push");
                    break;
                }
            }
        }

        debug!(candidates = *count, "Wordlist exhausted");
        Ok(())
    }

    /// Wait until every pushed candidate has been acknowledged
    ///
    /// Returns false if the wait was cut short by the shutdown flag.
    async fn wait_for_drain(&self) -> bool {
        tokio::select! {
            _ = self.queue.join() => true,
            _ = shutdown_observed(&self.shutdown) => {
                info!("Shutdown signal received");
                false
            }
        }
    }

    /// Join all worker tasks and collect final stats
    async fn join_workers(&mut self) -> (u64, u64, u64) {
        let workers = std::mem::take(&mut self.workers);
        let stats = aggregate_stats(&workers);

        for worker in workers {
            if let Err(e) = worker.join().await {
                warn!(error = %e, "Worker failed to join cleanly");
            }
        }

        stats
    }
}

/// Resolve once the shutdown flag has been raised
async fn shutdown_observed(flag: &AtomicBool) {
    while !flag.load(Ordering::Relaxed) {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
