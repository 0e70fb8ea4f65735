//! Result sink for confirmed findings
//!
//! A single dedicated writer task receives records over a channel and
//! appends them to the output file. With exactly one writer there is no
//! lock to hold and records from concurrent workers can never interleave
//! at the line level: each record is written as one contiguous block.
//!
//! Format, per found bucket:
//!
//! ```text
//! Bucket: <name>
//!   - Object: <key>
//! ```

use crate::error::{SinkError, SinkResult};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Message types sent to the sink task
#[derive(Debug)]
pub enum SinkMessage {
    /// Append one found-bucket record
    Record {
        bucket: String,
        keys: Vec<String>,
    },

    /// Flush and stop the sink task
    Shutdown,
}

/// Statistics about sink writes
#[derive(Debug, Default)]
pub struct SinkStats {
    /// Found-bucket records written
    pub records_written: AtomicU64,

    /// Object key lines written
    pub keys_written: AtomicU64,
}

impl SinkStats {
    /// Get the number of records written
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }
}

/// Handle for sending records to the sink
#[derive(Clone)]
pub struct SinkHandle {
    sender: mpsc::Sender<SinkMessage>,
    stats: Arc<SinkStats>,
}

impl SinkHandle {
    /// Append a found-bucket record (bucket line plus one line per key)
    pub async fn append(&self, bucket: String, keys: Vec<String>) -> SinkResult<()> {
        self.sender
            .send(SinkMessage::Record { bucket, keys })
            .await
            .map_err(|_| SinkError::ChannelClosed)
    }

    /// Get sink statistics
    pub fn stats(&self) -> &SinkStats {
        &self.stats
    }
}

/// Append-only result sink backed by a dedicated writer task
pub struct ResultSink {
    /// Writer task handle
    task: Option<JoinHandle<SinkResult<()>>>,

    /// Handle for sending records
    sink_handle: SinkHandle,
}

impl ResultSink {
    /// Open the output file in append mode and spawn the writer task
    pub async fn create(path: &Path, channel_size: usize) -> SinkResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| SinkError::OpenFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let (sender, receiver) = mpsc::channel(channel_size);
        let stats = Arc::new(SinkStats::default());

        let sink_handle = SinkHandle {
            sender,
            stats: Arc::clone(&stats),
        };

        let writer = BufWriter::new(file);
        let task = tokio::spawn(sink_task(writer, receiver, stats));

        debug!(path = %path.display(), "Result sink opened");

        Ok(Self {
            task: Some(task),
            sink_handle,
        })
    }

    /// Get a handle for sending records to the sink
    pub fn handle(&self) -> SinkHandle {
        self.sink_handle.clone()
    }

    /// Flush pending records and stop the writer task
    ///
    /// Call after all workers have been joined so every append has been
    /// delivered to the channel.
    pub async fn finish(mut self) -> SinkResult<()> {
        // Send may fail only if the task already stopped on a write error;
        // joining below surfaces that error.
        let _ = self.sink_handle.sender.send(SinkMessage::Shutdown).await;

        if let Some(task) = self.task.take() {
            task.await.map_err(|_| SinkError::TaskPanicked)??;
        }

        Ok(())
    }
}

/// Writer task: drains the channel, one record at a time
async fn sink_task(
    mut writer: BufWriter<tokio::fs::File>,
    mut receiver: mpsc::Receiver<SinkMessage>,
    stats: Arc<SinkStats>,
) -> SinkResult<()> {
    while let Some(msg) = receiver.recv().await {
        match msg {
            SinkMessage::Record { bucket, keys } => {
                if let Err(e) = write_record(&mut writer, &bucket, &keys, &stats).await {
                    error!(bucket, error = %e, "Sink write failed");
                    return Err(e);
                }
            }
            SinkMessage::Shutdown => break,
        }
    }

    writer.flush().await?;
    Ok(())
}

/// Write one record as a contiguous block
async fn write_record(
    writer: &mut BufWriter<tokio::fs::File>,
    bucket: &str,
    keys: &[String],
    stats: &SinkStats,
) -> SinkResult<()> {
    writer
        .write_all(format!("Bucket: {bucket}\n").as_bytes())
        .await?;

    for key in keys {
        writer
            .write_all(format!("  - Object: {key}\n").as_bytes())
            .await?;
        stats.keys_written.fetch_add(1, Ordering::Relaxed);
    }

    // Flush per record so findings are on disk even if the scan is
    // interrupted later.
    writer.flush().await?;
    stats.records_written.fetch_add(1, Ordering::Relaxed);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_sink_basic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("found.txt");

        let sink = ResultSink::create(&path, 100).await.unwrap();
        let handle = sink.handle();

        handle
            .append(
                "my-bucket".into(),
                vec!["a.txt".into(), "b/c.json".into()],
            )
            .await
            .unwrap();
        handle.append("empty-bucket".into(), vec![]).await.unwrap();

        sink.finish().await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "Bucket: my-bucket\n  - Object: a.txt\n  - Object: b/c.json\nBucket: empty-bucket\n"
        );
    }

    #[tokio::test]
    async fn test_sink_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("found.txt");
        std::fs::write(&path, "Bucket: earlier-run\n").unwrap();

        let sink = ResultSink::create(&path, 10).await.unwrap();
        sink.handle()
            .append("later-run".into(), vec![])
            .await
            .unwrap();
        sink.finish().await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "Bucket: earlier-run\nBucket: later-run\n");
    }

    #[tokio::test]
    async fn test_sink_stats() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("found.txt");

        let sink = ResultSink::create(&path, 10).await.unwrap();
        let handle = sink.handle();

        handle
            .append("bucket".into(), vec!["k1".into(), "k2".into(), "k3".into()])
            .await
            .unwrap();

        sink.finish().await.unwrap();

        // Handle outlives the sink; stats are shared
        assert_eq!(handle.stats().records_written(), 1);
        assert_eq!(handle.stats().keys_written.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn test_concurrent_records_never_interleave() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("found.txt");

        let sink = ResultSink::create(&path, 100).await.unwrap();

        let mut handles = Vec::new();
        for w in 0..8 {
            let sink_handle = sink.handle();
            handles.push(tokio::spawn(async move {
                for i in 0..10 {
                    let bucket = format!("bucket-{w}-{i}");
                    let keys = vec![format!("{bucket}/one"), format!("{bucket}/two")];
                    sink_handle.append(bucket, keys).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        sink.finish().await.unwrap();

        // Every Bucket: line must be immediately followed by its own keys
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 8 * 10 * 3);

        let mut i = 0;
        while i < lines.len() {
            let bucket = lines[i].strip_prefix("Bucket: ").expect("bucket line");
            assert_eq!(lines[i + 1], format!("  - Object: {bucket}/one"));
            assert_eq!(lines[i + 2], format!("  - Object: {bucket}/two"));
            i += 3;
        }
    }
}
