//! AWS-backed probe implementation
//!
//! Wraps aws-sdk-s3 HeadBucket and ListObjectsV2 calls and folds the SDK's
//! error taxonomy into the probe response enums. A 403 on HeadBucket means
//! the bucket exists but the caller lacks permission; the classifier relies
//! on that distinction.

use crate::probe::{HeadResponse, ListResponse, Probe, ProbeFactory};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::Client;

/// Factory for per-worker S3 probes
///
/// Loads the shared AWS configuration (credential profile + region) once;
/// each `create()` call builds a fresh client so no client instance is ever
/// shared between workers.
pub struct S3ProbeFactory {
    sdk_config: SdkConfig,
}

impl S3ProbeFactory {
    /// Load AWS configuration for the given profile and region
    pub async fn load(profile: &str, region: &str) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(profile)
            .region(Region::new(region.to_string()))
            .load()
            .await;

        Self { sdk_config }
    }
}

#[async_trait]
impl ProbeFactory for S3ProbeFactory {
    async fn create(&self) -> Box<dyn Probe> {
        Box::new(S3Probe {
            client: Client::new(&self.sdk_config),
        })
    }
}

/// S3 probe owned by a single worker
pub struct S3Probe {
    client: Client,
}

#[async_trait]
impl Probe for S3Probe {
    async fn head_bucket(&self, bucket: &str) -> HeadResponse {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => HeadResponse::Allowed,
            Err(SdkError::ServiceError(context)) => {
                match context.raw().status().as_u16() {
                    403 => HeadResponse::Forbidden,
                    404 => HeadResponse::NotFound,
                    _ if context.err().is_not_found() => HeadResponse::NotFound,
                    _ => HeadResponse::Service {
                        code: context.err().meta().code().unwrap_or("Unknown").to_string(),
                    },
                }
            }
            Err(err) => HeadResponse::Transport {
                detail: DisplayErrorContext(&err).to_string(),
            },
        }
    }

    async fn list_objects(&self, bucket: &str, max_keys: usize) -> ListResponse {
        let result = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .max_keys(max_keys as i32)
            .send()
            .await;

        match result {
            Ok(output) => {
                let mut keys: Vec<String> = output
                    .contents()
                    .iter()
                    .filter_map(|object| object.key().map(String::from))
                    .collect();
                keys.truncate(max_keys);
                ListResponse::Objects(keys)
            }
            Err(SdkError::ServiceError(context)) => {
                let code = context.err().meta().code().unwrap_or("Unknown");
                if code == "AccessDenied" || context.raw().status().as_u16() == 403 {
                    ListResponse::Denied
                } else {
                    ListResponse::Failed {
                        detail: code.to_string(),
                    }
                }
            }
            Err(err) => ListResponse::Failed {
                detail: DisplayErrorContext(&err).to_string(),
            },
        }
    }
}
