use std::collections::HashSet;
use std::sync::Mutex;

/// De-duplication registry of URLs that have entered the fetched state
///
/// Holds full URL strings, no normalization. Grows for the process
/// lifetime; acceptable for bounded crawl depths.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the URL, returning true if it was not present before. Check
    /// and insert happen in one critical section, so concurrent workers
    /// can never both claim the same URL.
    pub fn check_and_insert(&self, url: &str) -> bool {
        let mut urls = self.urls.lock().expect("visited set lock poisoned");
        urls.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.urls.lock().expect("visited set lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
