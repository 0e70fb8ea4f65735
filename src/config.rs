//! Configuration types for s3scout
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation

use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;

/// Maximum reasonable worker count
const MAX_WORKERS: usize = 512;

/// Minimum work queue capacity
const MIN_QUEUE_SIZE: usize = 10;

/// Default worker count
pub const DEFAULT_WORKERS: usize = 20;

/// Scan for S3 buckets using a pre-configured AWS profile
#[derive(Parser, Debug, Clone)]
#[command(
    name = "s3scout",
    version,
    about = "Scan for S3 buckets using a pre-configured AWS profile",
    long_about = "Probes candidate bucket names from a wordlist with HeadBucket calls and\n\
                  reports which buckets exist under the given profile and region.\n\n\
                  A 403 response confirms existence (the bucket is there, the caller just\n\
                  lacks permission), so forbidden buckets are reported as found.",
    after_help = "EXAMPLES:\n    \
        s3scout -p recon -w wordlist.txt -r us-west-2\n    \
        s3scout -p recon -w wordlist.txt -r us-east-1 -t 50 -l\n    \
        s3scout -p recon -w wordlist.txt -r eu-west-1 -o found.txt"
)]
pub struct CliArgs {
    /// AWS CLI profile name holding the credentials to scan with
    #[arg(short = 'p', long, value_name = "NAME")]
    pub profile: String,

    /// Path to the wordlist file containing candidate bucket names
    #[arg(short = 'w', long, value_name = "FILE")]
    pub wordlist: PathBuf,

    /// AWS region to target (e.g. us-west-2)
    #[arg(short = 'r', long, value_name = "REGION")]
    pub region: String,

    /// Number of concurrent scan workers
    #[arg(short = 't', long, default_value_t = DEFAULT_WORKERS, value_name = "NUM")]
    pub threads: usize,

    /// List objects in found buckets (if permissions allow)
    #[arg(short = 'l', long)]
    pub list_objects: bool,

    /// Append found buckets and objects to this file
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Work queue capacity (controls memory usage)
    #[arg(long, default_value = "1000", value_name = "NUM")]
    pub queue_size: usize,

    /// Verbose output (debug-level logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Validated runtime configuration for a scan
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// AWS profile name
    pub profile: String,

    /// Wordlist path
    pub wordlist: PathBuf,

    /// Target region
    pub region: String,

    /// Number of scan workers
    pub worker_count: usize,

    /// Whether to list objects in found buckets
    pub list_objects: bool,

    /// Optional append-mode output file
    pub output_path: Option<PathBuf>,

    /// Work queue capacity
    pub queue_size: usize,
}

impl ScanConfig {
    /// Validate CLI arguments and build the runtime configuration
    pub fn from_args(args: CliArgs) -> std::result::Result<Self, ConfigError> {
        if args.threads == 0 || args.threads > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: args.threads,
                max: MAX_WORKERS,
            });
        }

        if args.queue_size < MIN_QUEUE_SIZE {
            return Err(ConfigError::InvalidQueueSize {
                size: args.queue_size,
                min: MIN_QUEUE_SIZE,
            });
        }

        if let Some(path) = &args.output {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(ConfigError::InvalidOutputPath {
                        path: path.clone(),
                        reason: format!("parent directory '{}' does not exist", parent.display()),
                    });
                }
            }
        }

        Ok(Self {
            profile: args.profile,
            wordlist: args.wordlist,
            region: args.region,
            worker_count: args.threads,
            list_objects: args.list_objects,
            output_path: args.output,
            queue_size: args.queue_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            profile: "recon".into(),
            wordlist: "wordlist.txt".into(),
            region: "us-west-2".into(),
            threads: DEFAULT_WORKERS,
            list_objects: false,
            output: None,
            queue_size: 1000,
            verbose: false,
        }
    }

    #[test]
    fn test_valid_config() {
        let config = ScanConfig::from_args(base_args()).unwrap();
        assert_eq!(config.worker_count, 20);
        assert_eq!(config.region, "us-west-2");
        assert!(!config.list_objects);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut args = base_args();
        args.threads = 0;
        let err = ScanConfig::from_args(args).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWorkerCount { count: 0, .. }));
    }

    #[test]
    fn test_excessive_workers_rejected() {
        let mut args = base_args();
        args.threads = MAX_WORKERS + 1;
        assert!(ScanConfig::from_args(args).is_err());
    }

    #[test]
    fn test_tiny_queue_rejected() {
        let mut args = base_args();
        args.queue_size = 1;
        let err = ScanConfig::from_args(args).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidQueueSize { .. }));
    }

    #[test]
    fn test_missing_output_parent_rejected() {
        let mut args = base_args();
        args.output = Some("/definitely/not/a/real/dir/found.txt".into());
        let err = ScanConfig::from_args(args).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOutputPath { .. }));
    }

    #[test]
    fn test_cli_parsing() {
        use clap::Parser;
        let args = CliArgs::parse_from([
            "s3scout",
            "-p",
            "recon",
            "-w",
            "names.txt",
            "-r",
            "us-east-1",
            "-t",
            "8",
            "-l",
            "-o",
            "found.txt",
        ]);
        assert_eq!(args.profile, "recon");
        assert_eq!(args.threads, 8);
        assert!(args.list_objects);
        assert_eq!(args.output, Some(PathBuf::from("found.txt")));
    }
}
