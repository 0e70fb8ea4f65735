//! Work queue for candidate bucket names
//!
//! A bounded multi-producer/multi-consumer channel with an outstanding-work
//! counter on top. The coordinator pushes candidates (blocking when the
//! channel is full, which caps memory), waits on the `join()` barrier until
//! every pushed candidate has been acknowledged, then closes the channel.
//! Closure is the termination signal: workers drain whatever is still
//! buffered and then observe the closed channel as a clean exit.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Statistics for the work queue
#[derive(Debug, Default)]
pub struct QueueStats {
    /// Total candidates enqueued
    pub enqueued: AtomicU64,

    /// Total candidates dequeued
    pub dequeued: AtomicU64,
}

impl QueueStats {
    /// Get the number of candidates enqueued so far
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    /// Get the number of candidates dequeued so far
    pub fn dequeued(&self) -> u64 {
        self.dequeued.load(Ordering::Relaxed)
    }
}

/// Bounded work queue with a completion barrier
pub struct WorkQueue {
    sender: async_channel::Sender<String>,
    receiver: async_channel::Receiver<String>,
    outstanding: Arc<AtomicUsize>,
    drained: Arc<Notify>,
    stats: Arc<QueueStats>,
}

impl WorkQueue {
    /// Create a new work queue with the specified capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = async_channel::bounded(capacity);

        Self {
            sender,
            receiver,
            outstanding: Arc::new(AtomicUsize::new(0)),
            drained: Arc::new(Notify::new()),
            stats: Arc::new(QueueStats::default()),
        }
    }

    /// Get a sender handle for feeding candidates
    pub fn sender(&self) -> WorkQueueSender {
        WorkQueueSender {
            sender: self.sender.clone(),
            outstanding: Arc::clone(&self.outstanding),
            stats: Arc::clone(&self.stats),
        }
    }

    /// Get a receiver handle (clone one per worker)
    pub fn receiver(&self) -> WorkQueueReceiver {
        WorkQueueReceiver {
            receiver: self.receiver.clone(),
            outstanding: Arc::clone(&self.outstanding),
            drained: Arc::clone(&self.drained),
            stats: Arc::clone(&self.stats),
        }
    }

    /// Get queue statistics
    pub fn stats(&self) -> Arc<QueueStats> {
        Arc::clone(&self.stats)
    }

    /// Number of candidates pushed but not yet acknowledged
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Wait until every pushed candidate has been acknowledged
    ///
    /// Returns immediately if nothing is outstanding. This is the completion
    /// barrier: the queue must not be closed until it returns, so workers
    /// never observe termination while real candidates remain unprocessed.
    pub async fn join(&self) {
        loop {
            if self.outstanding.load(Ordering::SeqCst) == 0 {
                return;
            }
            let notified = self.drained.notified();
            // Re-check after arming the notification to close the race with
            // an ack that lands between the load and the await.
            if self.outstanding.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Close the queue, signalling termination to all workers
    ///
    /// Buffered candidates are still delivered; workers see the closure only
    /// once the channel is empty.
    pub fn close(&self) {
        self.sender.close();
    }
}

/// Handle for pushing candidates into the queue
#[derive(Clone)]
pub struct WorkQueueSender {
    sender: async_channel::Sender<String>,
    outstanding: Arc<AtomicUsize>,
    stats: Arc<QueueStats>,
}

impl WorkQueueSender {
    /// Push a candidate, blocking while the queue is full
    ///
    /// Returns `Err` if the queue has been closed.
    pub async fn push(&self, candidate: String) -> Result<(), ()> {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        match self.sender.send(candidate).await {
            Ok(()) => {
                self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(_) => {
                self.outstanding.fetch_sub(1, Ordering::SeqCst);
                Err(())
            }
        }
    }
}

/// Handle for pulling candidates from the queue
#[derive(Clone)]
pub struct WorkQueueReceiver {
    receiver: async_channel::Receiver<String>,
    outstanding: Arc<AtomicUsize>,
    drained: Arc<Notify>,
    stats: Arc<QueueStats>,
}

impl WorkQueueReceiver {
    /// Receive the next candidate
    ///
    /// Blocks until a candidate is available. Returns `None` once the queue
    /// is closed and empty - the clean-exit signal for workers.
    pub async fn recv(&self) -> Option<String> {
        match self.receiver.recv().await {
            Ok(candidate) => {
                self.stats.dequeued.fetch_add(1, Ordering::Relaxed);
                Some(candidate)
            }
            Err(_) => None,
        }
    }

    /// Acknowledge completion of one candidate
    ///
    /// Must be called exactly once per received candidate, after all
    /// processing (probe, report, listing, sink write) is done.
    pub fn ack(&self) {
        if self.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.drained.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_push_recv_ack() {
        let queue = WorkQueue::new(10);
        let sender = queue.sender();
        let receiver = queue.receiver();

        sender.push("bucket-a".into()).await.unwrap();
        assert_eq!(queue.outstanding(), 1);

        let candidate = receiver.recv().await.unwrap();
        assert_eq!(candidate, "bucket-a");
        // Still outstanding until acknowledged
        assert_eq!(queue.outstanding(), 1);

        receiver.ack();
        assert_eq!(queue.outstanding(), 0);

        assert_eq!(queue.stats().enqueued(), 1);
        assert_eq!(queue.stats().dequeued(), 1);
    }

    #[tokio::test]
    async fn test_join_waits_for_ack() {
        let queue = WorkQueue::new(10);
        let sender = queue.sender();
        let receiver = queue.receiver();

        sender.push("bucket-a".into()).await.unwrap();
        let _ = receiver.recv().await.unwrap();

        // join() must not return while the candidate is unacknowledged
        let join_result =
            tokio::time::timeout(Duration::from_millis(50), queue.join()).await;
        assert!(join_result.is_err());

        receiver.ack();
        tokio::time::timeout(Duration::from_secs(1), queue.join())
            .await
            .expect("join should return after final ack");
    }

    #[tokio::test]
    async fn test_join_immediate_when_empty() {
        let queue = WorkQueue::new(10);
        tokio::time::timeout(Duration::from_millis(100), queue.join())
            .await
            .expect("join on an empty queue should return immediately");
    }

    #[tokio::test]
    async fn test_close_delivers_buffered_then_signals() {
        let queue = WorkQueue::new(10);
        let sender = queue.sender();
        let receiver = queue.receiver();

        sender.push("bucket-a".into()).await.unwrap();
        sender.push("bucket-b".into()).await.unwrap();
        queue.close();

        // Buffered candidates drain before the termination signal
        assert_eq!(receiver.recv().await.unwrap(), "bucket-a");
        receiver.ack();
        assert_eq!(receiver.recv().await.unwrap(), "bucket-b");
        receiver.ack();
        assert!(receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_push_after_close_fails() {
        let queue = WorkQueue::new(10);
        let sender = queue.sender();
        queue.close();

        assert!(sender.push("bucket-a".into()).await.is_err());
        // Failed push must not leave the counter dangling
        assert_eq!(queue.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_multiple_consumers() {
        let queue = WorkQueue::new(100);
        let sender = queue.sender();

        for i in 0..50 {
            sender.push(format!("bucket-{i}")).await.unwrap();
        }
        queue.close();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let rx = queue.receiver();
            handles.push(tokio::spawn(async move {
                let mut count = 0u64;
                while let Some(_candidate) = rx.recv().await {
                    rx.ack();
                    count += 1;
                }
                count
            }));
        }

        let mut total = 0u64;
        for handle in handles {
            total += handle.await.unwrap();
        }

        assert_eq!(total, 50);
        assert_eq!(queue.outstanding(), 0);
        assert_eq!(queue.stats().dequeued(), 50);
    }
}
