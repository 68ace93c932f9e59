use crate::frontier::Job;
use crate::{Result, WecrError};
use async_channel::{Receiver, Sender, TryRecvError};

/// In-memory frontier backend: a bounded multi-producer multi-consumer
/// channel. FIFO, so traversal tends breadth-first. `push` waits when the
/// channel is full; the bound keeps queue growth in check.
pub struct MemoryFrontier {
    tx: Sender<Job>,
    rx: Receiver<Job>,
}

impl MemoryFrontier {
    /// Creates a channel with room for `capacity` pending jobs.
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = async_channel::bounded(capacity);
        Self { tx, rx }
    }

    pub async fn push(&self, job: Job) -> Result<()> {
        self.tx
            .send(job)
            .await
            .map_err(|_| WecrError::FrontierClosed)
    }

    /// Returns the oldest pending job without waiting, or `None` if the
    /// channel is currently empty.
    pub fn pop(&self) -> Option<Job> {
        match self.rx.try_recv() {
            Ok(job) => Some(job),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Search;

    fn job(url: &str) -> Job {
        Job {
            url: url.to_string(),
            search: Search {
                is_regexp: false,
                query: "q".to_string(),
            },
            depth: 1,
        }
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let frontier = MemoryFrontier::new(10);

        frontier.push(job("https://a.test/")).await.unwrap();
        frontier.push(job("https://b.test/")).await.unwrap();

        assert_eq!(frontier.pop().unwrap().url, "https://a.test/");
        assert_eq!(frontier.pop().unwrap().url, "https://b.test/");
        assert!(frontier.pop().is_none());
    }
}
