//! Terminal reporting for scan results
//!
//! One line per found or errored candidate; not-found candidates are
//! intentionally silent so large wordlists stay readable. Green for found,
//! yellow for listing/info/errors, red for access-denied.

use crate::scanner::ScanSummary;
use console::style;
use std::path::Path;

/// Print the found-line for a confirmed bucket
pub fn report_found(bucket: &str) {
    println!(
        "{} {}",
        style("[+] FOUND:").green().bold(),
        style(bucket).green()
    );
}

/// Print a warning-style line for a candidate whose probe errored
pub fn report_probe_error(bucket: &str) {
    println!(
        "{} check logs for bucket {}",
        style("[!] ERROR:").yellow().bold(),
        bucket
    );
}

/// Print the header line above a bucket's object listing
pub fn report_listing_header() {
    println!("    {}", style("└── Objects found:").yellow());
}

/// Print a single listed object key (streamed as keys arrive)
pub fn report_object_key(key: &str) {
    println!("        - {key}");
}

/// Report that a found bucket holds no objects
pub fn report_empty_bucket() {
    println!("    {}", style("└── Bucket is empty.").yellow());
}

/// Report that listing a found bucket was refused
pub fn report_listing_denied() {
    println!("    {}", style("└── Access denied to list objects.").red());
}

/// Print a header at the start of the scan
pub fn print_header(profile: &str, region: &str, workers: usize) {
    println!();
    println!(
        "{} {}",
        style("s3scout").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Profile:").bold(), profile);
    println!("  {} {}", style("Region:").bold(), region);
    println!("  {} {}", style("Workers:").bold(), workers);
    println!();
}

/// Print a summary of the scan results
pub fn print_summary(summary: &ScanSummary, output: Option<&Path>) {
    println!();
    if summary.completed {
        println!("{}", style("Scan Complete").green().bold());
    } else {
        println!("{}", style("Scan Interrupted").yellow().bold());
    }
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  {} {}",
        style("Candidates:").bold(),
        summary.candidates
    );
    println!("  {} {}", style("Found:").bold(), summary.found);
    if summary.errors > 0 {
        println!(
            "  {} {}",
            style("Errors:").yellow().bold(),
            summary.errors
        );
    }
    println!(
        "  {} {:.1}s",
        style("Duration:").bold(),
        summary.duration.as_secs_f64()
    );
    if let Some(path) = output {
        println!("  {} {}", style("Output:").bold(), path.display());
    }
    println!();
}
