//! The frontier: the shared store of pending crawl jobs
//!
//! Two interchangeable backends exist. The disk backend is an append-only
//! file of newline-delimited JSON jobs popped from the tail (LIFO, which
//! biases traversal depth-first and bounds queue growth per subtree). The
//! memory backend is a bounded channel (FIFO, breadth-first tendency).
//! Both expose the same non-blocking contract so the worker's
//! empty-frontier back-off applies uniformly.

mod disk;
mod memory;

pub use disk::DiskFrontier;
pub use memory::MemoryFrontier;

use crate::config::Search;
use crate::Result;
use serde::{Deserialize, Serialize};

/// A single crawl task: where to go, what to look for, how many hops remain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub url: String,
    pub search: Search,
    pub depth: u64,
}

/// Pending-job store shared by all workers
pub enum Frontier {
    Disk(DiskFrontier),
    Memory(MemoryFrontier),
}

impl Frontier {
    /// Appends a job to the store. May wait briefly under backpressure
    /// (memory backend) or for the file lock (disk backend).
    pub async fn push(&self, job: Job) -> Result<()> {
        match self {
            Self::Disk(disk) => disk.push(&job).await,
            Self::Memory(memory) => memory.push(job).await,
        }
    }

    /// Removes and returns the next job, or `None` if the store is
    /// currently empty.
    pub async fn pop(&self) -> Result<Option<Job>> {
        match self {
            Self::Disk(disk) => disk.pop().await,
            Self::Memory(memory) => Ok(memory.pop()),
        }
    }
}
