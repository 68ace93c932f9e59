use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Shared crawl counters, updated by workers and read by observers
///
/// All counters only ever grow; readers are advisory, so relaxed ordering
/// is enough.
#[derive(Debug, Default)]
pub struct Statistics {
    pub pages_visited: AtomicU64,
    pub matches_found: AtomicU64,
    pub pages_saved: AtomicU64,
    pub start_time_unix: AtomicU64,
    pub stopped: AtomicBool,
}

/// Point-in-time copy of the counters, for printing or serializing
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub pages_visited: u64,
    pub matches_found: u64,
    pub pages_saved: u64,
    pub start_time_unix: u64,
    pub stopped: bool,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_started(&self) {
        self.start_time_unix
            .store(chrono::Utc::now().timestamp() as u64, Ordering::Relaxed);
        self.stopped.store(false, Ordering::Relaxed);
    }

    pub fn mark_stopped(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            pages_visited: self.pages_visited.load(Ordering::Relaxed),
            matches_found: self.matches_found.load(Ordering::Relaxed),
            pages_saved: self.pages_saved.load(Ordering::Relaxed),
            start_time_unix: self.start_time_unix.load(Ordering::Relaxed),
            stopped: self.stopped.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let stats = Statistics::new();
        stats.pages_visited.fetch_add(3, Ordering::Relaxed);
        stats.matches_found.fetch_add(7, Ordering::Relaxed);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.pages_visited, 3);
        assert_eq!(snapshot.matches_found, 7);
        assert_eq!(snapshot.pages_saved, 0);
    }

    #[test]
    fn test_stop_flag() {
        let stats = Statistics::new();
        assert!(!stats.is_stopped());

        stats.mark_stopped();
        assert!(stats.is_stopped());

        stats.mark_started();
        assert!(!stats.is_stopped());
        assert!(stats.snapshot().start_time_unix > 0);
    }
}
