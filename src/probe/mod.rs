//! Bucket probe abstraction
//!
//! A probe wraps the remote storage API: a lightweight existence check
//! (HeadBucket) and a shallow object listing. Probes are not shared across
//! workers; each worker gets its own instance from a [`ProbeFactory`].
//!
//! Probe methods never fail at the call site - every failure mode is folded
//! into the response enums so the classifier can turn it into an outcome.

mod s3;

pub use s3::{S3Probe, S3ProbeFactory};

use async_trait::async_trait;

/// Maximum number of object keys collected per found bucket
pub const LIST_KEY_CAP: usize = 10;

/// Response from a bucket existence probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadResponse {
    /// Bucket exists and the caller may access it
    Allowed,

    /// Bucket exists but the caller lacks permission (HTTP 403)
    Forbidden,

    /// No bucket by that name
    NotFound,

    /// The service answered with an unexpected error code
    Service { code: String },

    /// The request never produced a service response
    Transport { detail: String },
}

/// Response from a shallow object listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListResponse {
    /// Object keys, capped at the requested maximum (possibly empty)
    Objects(Vec<String>),

    /// Listing was refused
    Denied,

    /// Listing failed for another reason
    Failed { detail: String },
}

/// A bucket probe scoped to one identity and region
#[async_trait]
pub trait Probe: Send + Sync {
    /// Check whether a bucket exists and is accessible
    async fn head_bucket(&self, bucket: &str) -> HeadResponse;

    /// List up to `max_keys` object keys in a bucket
    async fn list_objects(&self, bucket: &str, max_keys: usize) -> ListResponse;
}

/// Builds one probe instance per worker
#[async_trait]
pub trait ProbeFactory: Send + Sync {
    /// Create a fresh probe for exclusive use by a single worker
    async fn create(&self) -> Box<dyn Probe>;
}
