use crate::config::{
    Requests, Save, QUERY_ARCHIVE, QUERY_AUDIO, QUERY_DOCUMENTS, QUERY_EMAIL, QUERY_EVERYTHING,
    QUERY_IMAGES, QUERY_VIDEOS,
};
use crate::extract::{
    classify, find_emails_with_mx, find_links, find_page_assets, find_page_audio,
    find_page_documents, find_page_images, find_page_videos, find_regex, is_text_on_page,
};
use crate::fetch;
use crate::frontier::{Frontier, Job};
use crate::output::{Finding, OutputTree, ResultSink};
use crate::worker::{Statistics, VisitedSet};
use regex::Regex;
use reqwest::Client;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use trust_dns_resolver::TokioAsyncResolver;
use url::Url;

/// Per-worker configuration, shared read-only across the pool
#[derive(Debug, Clone)]
pub struct WorkerConf {
    pub requests: Requests,
    pub save: Save,
    pub allowed_domains: Vec<String>,
    pub blacklisted_domains: Vec<String>,
}

const BACKOFF_START: Duration = Duration::from_millis(10);
const BACKOFF_CEILING: Duration = Duration::from_secs(1);

/// One crawl worker: pulls jobs from the frontier, filters, fetches,
/// extracts, persists and expands, until the pool is stopped.
pub(crate) struct Worker {
    pub frontier: Arc<Frontier>,
    pub conf: Arc<WorkerConf>,
    pub visited: Arc<VisitedSet>,
    pub stats: Arc<Statistics>,
    pub tree: Arc<OutputTree>,
    pub text_sink: Arc<ResultSink>,
    pub email_sink: Arc<ResultSink>,
    pub client: Client,
    pub resolver: TokioAsyncResolver,
}

impl Worker {
    /// Runs the worker loop. An empty frontier is retried with an
    /// exponential back-off so transient emptiness does not burn CPU.
    pub async fn work(self) {
        let mut backoff = BACKOFF_START;

        loop {
            if self.stats.is_stopped() {
                return;
            }

            let job = match self.frontier.pop().await {
                Ok(Some(job)) => job,
                Ok(None) => {
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(BACKOFF_CEILING);
                    continue;
                }
                Err(e) => {
                    tracing::error!("Failed to read the visit queue: {}", e);
                    return;
                }
            };
            backoff = BACKOFF_START;

            if self.stats.is_stopped() {
                return;
            }

            self.process(job).await;

            tokio::time::sleep(Duration::from_millis(self.conf.requests.request_pause_ms)).await;
        }
    }

    async fn process(&self, job: Job) {
        let page_url = match Url::parse(&job.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Failed to parse URL \"{}\": {}", job.url, e);
                return;
            }
        };
        let host = page_url.host_str().unwrap_or_default().to_string();

        if !self.conf.allowed_domains.is_empty()
            && !self.conf.allowed_domains.iter().any(|domain| *domain == host)
        {
            tracing::info!("Skipped non-allowed {}", job.url);
            return;
        }

        if self
            .conf
            .blacklisted_domains
            .iter()
            .any(|domain| *domain == host)
        {
            tracing::info!("Skipped blacklisted {}", job.url);
            return;
        }

        if !self.visited.check_and_insert(&job.url) {
            tracing::info!("Skipping visited {}", job.url);
            return;
        }

        self.stats.pages_visited.fetch_add(1, Ordering::Relaxed);
        tracing::info!("Visiting {}", job.url);

        let body = match fetch::get_page(
            &self.client,
            &job.url,
            self.conf.requests.request_wait_timeout_ms,
        )
        .await
        {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Failed to get \"{}\": {}", job.url, e);
                return;
            }
        };

        let links = find_links(&body, &page_url);

        // Expansion runs concurrently with the rest of the processing; the
        // worker moves on without waiting for the children to be enqueued.
        if job.depth > 1 {
            let frontier = Arc::clone(&self.frontier);
            let search = job.search.clone();
            let current = job.url.clone();
            let depth = job.depth - 1;

            tokio::spawn(async move {
                for link in links {
                    if link.as_str() == current {
                        continue;
                    }

                    let child = Job {
                        url: link.to_string(),
                        search: search.clone(),
                        depth,
                    };
                    if let Err(e) = frontier.push(child).await {
                        tracing::error!("Failed to enqueue {}: {}", link, e);
                    }
                }
            });
        }

        let save_page = self.dispatch(&job, &page_url, &body).await;

        if save_page && self.conf.save.save_pages {
            self.save_page(&page_url, &body).await;
        }
    }

    /// Evaluates the job's search against the fetched body. Returns true
    /// if anything matched and the page is worth keeping.
    async fn dispatch(&self, job: &Job, page_url: &Url, body: &[u8]) -> bool {
        let host = page_url.host_str().unwrap_or_default();

        match job.search.query.as_str() {
            QUERY_IMAGES => {
                let found = find_page_images(body, page_url);
                self.save_content(&found, host).await;
                !found.is_empty()
            }
            QUERY_VIDEOS => {
                let found = find_page_videos(body, page_url);
                self.save_content(&found, host).await;
                !found.is_empty()
            }
            QUERY_AUDIO => {
                let found = find_page_audio(body, page_url);
                self.save_content(&found, host).await;
                !found.is_empty()
            }
            QUERY_DOCUMENTS => {
                let found = find_page_documents(body, page_url);
                self.save_content(&found, host).await;
                !found.is_empty()
            }
            QUERY_EMAIL => self.process_emails(job, body).await,
            QUERY_EVERYTHING => {
                let mut found = find_page_images(body, page_url);
                found.extend(find_page_audio(body, page_url));
                found.extend(find_page_videos(body, page_url));
                found.extend(find_page_documents(body, page_url));

                let any_media = !found.is_empty();
                self.save_content(&found, host).await;

                let any_email = self.process_emails(job, body).await;
                any_media || any_email
            }
            QUERY_ARCHIVE => true,
            _ => self.process_text(job, body),
        }
    }

    async fn process_emails(&self, job: &Job, body: &[u8]) -> bool {
        let emails = find_emails_with_mx(body, &self.resolver).await;
        if emails.is_empty() {
            return false;
        }

        tracing::info!("Found {} email addresses on {}", emails.len(), job.url);
        self.stats
            .matches_found
            .fetch_add(emails.len() as u64, Ordering::Relaxed);
        self.email_sink.write(&Finding {
            page_url: job.url.clone(),
            search: job.search.clone(),
            data: emails,
        });

        true
    }

    fn process_text(&self, job: &Job, body: &[u8]) -> bool {
        if job.search.is_regexp {
            let re = match Regex::new(&job.search.query) {
                Ok(re) => re,
                Err(e) => {
                    tracing::error!("Failed to compile regexp {}: {}", job.search.query, e);
                    return false;
                }
            };

            let matches = find_regex(body, &re);
            if matches.is_empty() {
                return false;
            }

            tracing::info!("Found {} matches on {}", matches.len(), job.url);
            self.stats
                .matches_found
                .fetch_add(matches.len() as u64, Ordering::Relaxed);
            self.text_sink.write(&Finding {
                page_url: job.url.clone(),
                search: job.search.clone(),
                data: matches,
            });

            true
        } else if is_text_on_page(body, &job.search.query, true) {
            tracing::info!("Found \"{}\" on {}", job.search.query, job.url);
            self.stats.matches_found.fetch_add(1, Ordering::Relaxed);
            self.text_sink.write(&Finding {
                page_url: job.url.clone(),
                search: job.search.clone(),
                data: vec![job.search.query.clone()],
            });

            true
        } else {
            false
        }
    }

    /// Downloads every distinct discovered URL into the subdirectory its
    /// extension selects. Failures abandon the current link only.
    async fn save_content(&self, links: &[Url], page_host: &str) {
        let mut processed: Vec<&Url> = Vec::new();

        for (index, link) in links.iter().enumerate() {
            if processed.contains(&link) {
                continue;
            }
            processed.push(link);

            let name = format!("{}_{}_{}", page_host, index, url_basename(link));
            let target = self.tree.dir_for(classify(link.as_str())).join(&name);

            match fetch::fetch_file(
                &self.client,
                link.as_str(),
                self.conf.requests.content_fetch_timeout_ms,
                &target,
            )
            .await
            {
                Ok(()) => {
                    self.stats.matches_found.fetch_add(1, Ordering::Relaxed);
                    tracing::info!("Outputted \"{}\"", name);
                }
                Err(e) => tracing::error!("Failed to fetch {}: {}", link, e),
            }
        }
    }

    /// Persists the page body together with its assets: stylesheets,
    /// scripts and other `src=` targets land in a sibling directory and
    /// the saved HTML is rewritten to reference them relatively.
    async fn save_page(&self, page_url: &Url, body: &[u8]) {
        let Some(host) = page_url.host_str() else {
            return;
        };
        let page_name = format!("{}{}", host, page_url.path().replace('/', "_"));
        let assets_dir_name = format!("{}_files", page_name);
        let assets_dir = self.tree.pages.join(&assets_dir_name);

        if let Err(e) = std::fs::create_dir_all(&assets_dir) {
            tracing::error!(
                "Failed to create asset directory of \"{}\": {}",
                page_url,
                e
            );
            return;
        }

        let mut rewritten = body.to_vec();
        let mut seen_raw: Vec<String> = Vec::new();
        let mut fetched: Vec<String> = Vec::new();

        for asset in find_page_assets(body, page_url) {
            if seen_raw.contains(&asset.raw) {
                continue;
            }
            seen_raw.push(asset.raw.clone());

            let basename = url_basename(&asset.url).to_string();

            if !fetched.contains(&asset.url.to_string()) {
                fetched.push(asset.url.to_string());

                if let Err(e) = fetch::fetch_file(
                    &self.client,
                    asset.url.as_str(),
                    self.conf.requests.content_fetch_timeout_ms,
                    &assets_dir.join(&basename),
                )
                .await
                {
                    tracing::error!("Failed to fetch page asset {}: {}", asset.url, e);
                }
            }

            let replacement = format!("./{}/{}", assets_dir_name, basename);
            rewritten = replace_all(&rewritten, asset.raw.as_bytes(), replacement.as_bytes());
            if asset.url.as_str() != asset.raw {
                rewritten = replace_all(
                    &rewritten,
                    asset.url.as_str().as_bytes(),
                    replacement.as_bytes(),
                );
            }
        }

        let page_path = self.tree.pages.join(format!("{}.html", page_name));
        match std::fs::write(&page_path, &rewritten) {
            Ok(()) => {
                self.stats.pages_saved.fetch_add(1, Ordering::Relaxed);
                tracing::info!("Saved \"{}.html\"", page_name);
            }
            Err(e) => tracing::error!("Failed to save page \"{}\": {}", page_url, e),
        }
    }
}

/// Last path segment of a URL, used as the on-disk filename
fn url_basename(url: &Url) -> &str {
    url.path()
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("file")
}

/// Replaces every non-overlapping occurrence of `needle` in `haystack`.
/// The replacement text itself is never rescanned.
fn replace_all(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
    if needle.is_empty() {
        return haystack.to_vec();
    }

    let mut out = Vec::with_capacity(haystack.len());
    let mut at = 0;

    while at < haystack.len() {
        if haystack[at..].starts_with(needle) {
            out.extend_from_slice(replacement);
            at += needle.len();
        } else {
            out.push(haystack[at]);
            at += 1;
        }
    }

    out
}
