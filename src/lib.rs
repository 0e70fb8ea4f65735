//! s3scout - Concurrent S3 Bucket Discovery Scanner
//!
//! Enumerates candidate bucket names from a wordlist, probes each with a
//! HeadBucket call under a configured AWS profile and region, and reports
//! which buckets exist. Optionally lists up to ten objects per found bucket
//! and appends findings to an output file.
//!
//! # Architecture
//!
//! ```text
//! wordlist ──► Coordinator ──► Work Queue (bounded mpmc)
//!                                   │
//!                    ┌──────────────┼──────────────┐
//!                    ▼              ▼              ▼
//!               Worker 1       Worker 2   ...  Worker N
//!               (own S3        (own S3         (own S3
//!                client)        client)         client)
//!                    │              │              │
//!                    └──────────────┼──────────────┘
//!                                   ▼
//!                          Result Sink task
//!                          (append-mode file)
//! ```
//!
//! Each worker owns an exclusive S3 client. The only shared mutable state
//! is the work queue and the sink channel; the sink's single writer task
//! guarantees records never interleave.
//!
//! A 403 on HeadBucket confirms the bucket exists (the caller just lacks
//! permission), so forbidden responses are classified as found.
//!
//! # Example
//!
//! ```bash
//! # Basic scan
//! s3scout -p recon -w wordlist.txt -r us-west-2
//!
//! # 50 workers, list objects, persist findings
//! s3scout -p recon -w wordlist.txt -r us-east-1 -t 50 -l -o found.txt
//! ```

pub mod config;
pub mod error;
pub mod probe;
pub mod report;
pub mod scanner;
pub mod sink;

pub use config::{CliArgs, ScanConfig};
pub use error::{Result, ScanError};
pub use scanner::{ScanCoordinator, ScanSummary};
