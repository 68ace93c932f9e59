use crate::frontier::Job;
use crate::Result;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use tokio::sync::Mutex;

/// On-disk frontier backend
///
/// The file holds newline-delimited JSON job records; the tail is the next
/// job to dispatch. A pop seeks backward from the end one byte at a time
/// until some suffix of the file decodes as a complete job with a non-empty
/// URL and query, then truncates the file at that record's start. Corrupt
/// bytes between valid records are skipped by the same retreat.
///
/// One mutex serializes every file access; it is held for the whole
/// pop-scan-truncate window so two workers can never observe the same tail.
pub struct DiskFrontier {
    file: Mutex<File>,
}

impl DiskFrontier {
    /// Opens (or creates) the queue file at `path`, truncating any
    /// leftover content from a previous run.
    pub fn create(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one JSON-encoded job followed by a newline.
    pub async fn push(&self, job: &Job) -> Result<()> {
        let mut encoded = serde_json::to_vec(job)?;
        encoded.push(b'\n');

        let mut file = self.file.lock().await;
        file.seek(SeekFrom::End(0))?;
        file.write_all(&encoded)?;

        Ok(())
    }

    /// Removes and returns the most recently inserted job, or `None` if
    /// the file is empty or holds no decodable record.
    pub async fn pop(&self) -> Result<Option<Job>> {
        let mut file = self.file.lock().await;

        let size = file.metadata()?.len();
        if size == 0 {
            return Ok(None);
        }

        let mut tail = Vec::new();
        for back in 1..=size {
            let offset = size - back;
            file.seek(SeekFrom::Start(offset))?;

            tail.clear();
            file.read_to_end(&mut tail)?;

            // Decode the first JSON value starting at this offset; whatever
            // follows it is removed by the truncate below.
            let mut stream = serde_json::Deserializer::from_slice(&tail).into_iter::<Job>();
            let job = match stream.next() {
                Some(Ok(job)) => job,
                _ => continue,
            };

            if job.url.is_empty() || job.search.query.is_empty() {
                continue;
            }

            file.set_len(offset)?;
            return Ok(Some(job));
        }

        // No suffix of the file is a valid record; drop the garbage so the
        // next pop does not rescan it.
        tracing::warn!("Visit queue holds no decodable job, truncating {} bytes", size);
        file.set_len(0)?;

        Ok(None)
    }
}
