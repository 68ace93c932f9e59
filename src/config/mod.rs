//! Configuration module for Wecr
//!
//! The crawl engine consumes a single validated JSON configuration record;
//! this module defines its shape, the loader and the validation pass.

mod parser;
mod types;
mod validation;

pub use parser::{create_default_config, load_config};
pub use types::*;
pub use validation::validate;
