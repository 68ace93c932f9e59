use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Loads, parses and validates a configuration file
///
/// # Arguments
///
/// * `path` - Path to the JSON configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let file = File::open(path)?;
    let mut config: Config = serde_json::from_reader(BufReader::new(file))?;

    validate(&mut config)?;

    Ok(config)
}

/// Writes a default configuration file at `path`
///
/// Used when no configuration exists yet so the user has a template to
/// fill in.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &Config::default())?;
    Ok(())
}
