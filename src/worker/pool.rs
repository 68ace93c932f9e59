use crate::fetch;
use crate::frontier::Frontier;
use crate::output::{OutputTree, ResultSink};
use crate::worker::worker::{Worker, WorkerConf};
use crate::worker::{Statistics, VisitedSet};
use crate::Result;
use reqwest::Client;
use std::sync::Arc;
use tokio::task::JoinHandle;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// The worker pool: owns the workers and the state they share
///
/// Workers share the frontier, the visited set, the statistics and the two
/// result sinks by reference; each fetched page body belongs to the single
/// worker that fetched it.
pub struct Pool {
    worker_count: usize,
    frontier: Arc<Frontier>,
    conf: Arc<WorkerConf>,
    visited: Arc<VisitedSet>,
    stats: Arc<Statistics>,
    tree: Arc<OutputTree>,
    text_sink: Arc<ResultSink>,
    email_sink: Arc<ResultSink>,
    client: Client,
    resolver: TokioAsyncResolver,
    handles: Vec<JoinHandle<()>>,
}

impl Pool {
    pub fn new(
        worker_count: usize,
        frontier: Arc<Frontier>,
        conf: WorkerConf,
        tree: OutputTree,
        text_sink: ResultSink,
        email_sink: ResultSink,
    ) -> Result<Self> {
        let client = fetch::build_http_client(&conf.requests.user_agent)?;
        let resolver =
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

        Ok(Self {
            worker_count,
            frontier,
            conf: Arc::new(conf),
            visited: Arc::new(VisitedSet::new()),
            stats: Arc::new(Statistics::new()),
            tree: Arc::new(tree),
            text_sink: Arc::new(text_sink),
            email_sink: Arc::new(email_sink),
            client,
            resolver,
            handles: Vec::new(),
        })
    }

    /// Shared statistics handle, for the status printer and shutdown hook
    pub fn stats(&self) -> Arc<Statistics> {
        Arc::clone(&self.stats)
    }

    /// Starts all workers
    pub fn work(&mut self) {
        self.stats.mark_started();

        for _ in 0..self.worker_count {
            let worker = Worker {
                frontier: Arc::clone(&self.frontier),
                conf: Arc::clone(&self.conf),
                visited: Arc::clone(&self.visited),
                stats: Arc::clone(&self.stats),
                tree: Arc::clone(&self.tree),
                text_sink: Arc::clone(&self.text_sink),
                email_sink: Arc::clone(&self.email_sink),
                client: self.client.clone(),
                resolver: self.resolver.clone(),
            };

            self.handles.push(tokio::spawn(worker.work()));
        }

        tracing::info!("Started {} workers", self.worker_count);
    }

    /// Tells every worker to stop; each observes the flag between jobs
    pub fn stop(&self) {
        self.stats.mark_stopped();
    }

    /// Waits until every worker has observed the stop flag and returned
    pub async fn join(&mut self) {
        for handle in self.handles.drain(..) {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Requests, Save};
    use crate::frontier::MemoryFrontier;
    use tempfile::tempdir;

    fn test_conf() -> WorkerConf {
        WorkerConf {
            requests: Requests {
                request_wait_timeout_ms: 100,
                request_pause_ms: 1,
                content_fetch_timeout_ms: 100,
                user_agent: "TestAgent/1.0".to_string(),
            },
            save: Save {
                output_dir: "out".to_string(),
                save_pages: false,
            },
            allowed_domains: Vec::new(),
            blacklisted_domains: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_stopped_pool_joins_promptly() {
        let dir = tempdir().unwrap();
        let tree = OutputTree::create(dir.path()).unwrap();
        let text_sink = ResultSink::create(&dir.path().join("found_text.json")).unwrap();
        let email_sink = ResultSink::create(&dir.path().join("found_emails.json")).unwrap();
        let frontier = Arc::new(Frontier::Memory(MemoryFrontier::new(10)));

        let mut pool =
            Pool::new(4, frontier, test_conf(), tree, text_sink, email_sink).unwrap();
        pool.work();

        pool.stop();
        tokio::time::timeout(std::time::Duration::from_secs(5), pool.join())
            .await
            .expect("workers should observe the stop flag and exit");

        assert!(pool.stats().is_stopped());
    }
}
