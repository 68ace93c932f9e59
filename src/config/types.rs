use serde::{Deserialize, Serialize};

/// Reserved query sentinels that trigger typed extraction instead of a
/// literal text match.
pub const QUERY_IMAGES: &str = "images";
pub const QUERY_VIDEOS: &str = "videos";
pub const QUERY_AUDIO: &str = "audio";
pub const QUERY_DOCUMENTS: &str = "documents";
pub const QUERY_EMAIL: &str = "email";
pub const QUERY_EVERYTHING: &str = "everything";
pub const QUERY_ARCHIVE: &str = "archive";

/// Fixed subdirectories of the output tree.
pub const SAVE_PAGES_DIR: &str = "pages";
pub const SAVE_IMAGES_DIR: &str = "images";
pub const SAVE_VIDEOS_DIR: &str = "videos";
pub const SAVE_AUDIO_DIR: &str = "audio";
pub const SAVE_DOCUMENTS_DIR: &str = "documents";

/// Top-level text sinks.
pub const FOUND_TEXT_FILE: &str = "found_text.json";
pub const FOUND_EMAILS_FILE: &str = "found_emails.json";

/// Name of the on-disk visit queue file.
pub const VISIT_QUEUE_FILE: &str = "visit_queue.tmp";

/// The per-job search predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Search {
    pub is_regexp: bool,
    pub query: String,
}

/// Request timing and identification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requests {
    /// Timeout for page GETs, in milliseconds; zero means unbounded
    pub request_wait_timeout_ms: u64,

    /// Pause between consecutive requests of one worker, in milliseconds
    pub request_pause_ms: u64,

    /// Timeout for media downloads, in milliseconds; zero means unbounded
    pub content_fetch_timeout_ms: u64,

    pub user_agent: String,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Save {
    pub output_dir: String,
    pub save_pages: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub output_logs: bool,
    pub logs_file: String,
}

/// Dashboard configuration. The read-only status dashboard is an external
/// collaborator; the keys are parsed so a shared config file round-trips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub use_dashboard: bool,
    pub port: u16,
}

/// Main configuration record consumed by the crawl engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub search: Search,
    pub requests: Requests,
    pub depth: u64,
    pub workers: usize,
    pub initial_pages: Vec<String>,
    #[serde(default)]
    pub allowed_domains: Vec<String>,
    #[serde(default)]
    pub blacklisted_domains: Vec<String>,
    #[serde(default)]
    pub in_memory_visit_queue: bool,
    pub save: Save,
    pub logging: Logging,
    pub dashboard: Dashboard,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: Search {
                is_regexp: false,
                query: String::new(),
            },
            requests: Requests {
                request_wait_timeout_ms: 2500,
                request_pause_ms: 100,
                content_fetch_timeout_ms: 0,
                user_agent: String::new(),
            },
            depth: 5,
            workers: 20,
            initial_pages: vec![String::new()],
            allowed_domains: Vec::new(),
            blacklisted_domains: Vec::new(),
            in_memory_visit_queue: false,
            save: Save {
                output_dir: "scraped".to_string(),
                save_pages: false,
            },
            logging: Logging {
                output_logs: true,
                logs_file: "logs.log".to_string(),
            },
            dashboard: Dashboard {
                use_dashboard: false,
                port: 13370,
            },
        }
    }
}

impl Search {
    /// Returns true if the query is one of the reserved sentinels
    pub fn is_sentinel(&self) -> bool {
        matches!(
            self.query.as_str(),
            QUERY_IMAGES
                | QUERY_VIDEOS
                | QUERY_AUDIO
                | QUERY_DOCUMENTS
                | QUERY_EMAIL
                | QUERY_EVERYTHING
                | QUERY_ARCHIVE
        )
    }
}
