//! The worker pool and the state its workers share
//!
//! N identical workers each run a single loop: pull a job from the
//! frontier, filter it, fetch the page, extract and persist what the
//! search asks for, and enqueue child jobs one hop shallower. The pool
//! runs until told to stop; workers observe the flag between jobs.

mod pool;
mod stats;
mod visited;
mod worker;

pub use pool::Pool;
pub use stats::{Statistics, StatsSnapshot};
pub use visited::VisitedSet;
pub use worker::WorkerConf;
