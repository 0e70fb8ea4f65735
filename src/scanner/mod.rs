//! Concurrent scan engine
//!
//! The scanner has three layers:
//! - `queue`: bounded work queue with a completion barrier
//! - `worker`: fixed pool of tasks, each owning a probe client
//! - `coordinator`: wordlist streaming and the drain-then-close protocol
//!
//! `classify` holds the pure probe-outcome classification shared by all
//! workers.

pub mod classify;
pub mod coordinator;
pub mod queue;
pub mod worker;

pub use classify::{classify, ProbeOutcome};
pub use coordinator::{ScanCoordinator, ScanSummary};
pub use queue::{WorkQueue, WorkQueueReceiver, WorkQueueSender};
pub use worker::{Worker, WorkerStats};
