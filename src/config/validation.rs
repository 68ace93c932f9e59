use crate::config::types::Config;
use crate::ConfigError;
use url::Url;

/// Fallback user-agent when the config leaves it empty
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 6.1; Win64; x64; rv:47.0) Gecko/20100101 Firefox/47.0";

/// Validates and normalizes a configuration in place
///
/// Checks that seeds and the query are present, rewrites the allow/block
/// lists to bare hosts, and floors out-of-range numeric values the way a
/// crawl can still proceed with. Anything that cannot be repaired is a
/// fatal validation error.
pub fn validate(config: &mut Config) -> Result<(), ConfigError> {
    config.initial_pages.retain(|page| !page.is_empty());
    if config.initial_pages.is_empty() {
        return Err(ConfigError::Validation(
            "no initial page URLs have been set".to_string(),
        ));
    }

    for page in &config.initial_pages {
        Url::parse(page)
            .map_err(|e| ConfigError::InvalidUrl(format!("invalid seed URL '{}': {}", page, e)))?;
    }

    if config.search.query.is_empty() {
        return Err(ConfigError::Validation(
            "search query has not been set".to_string(),
        ));
    }

    config.allowed_domains = normalize_domain_list(&config.allowed_domains, "allowed")?;
    config.blacklisted_domains = normalize_domain_list(&config.blacklisted_domains, "blacklisted")?;

    if config.depth == 0 {
        tracing::warn!("Depth is 0, set to 1");
        config.depth = 1;
    }

    if config.workers == 0 {
        tracing::warn!("Workers number is 0, set to 5");
        config.workers = 5;
    }

    if config.requests.user_agent.is_empty() {
        tracing::warn!("User agent is not set, forced to \"{}\"", DEFAULT_USER_AGENT);
        config.requests.user_agent = DEFAULT_USER_AGENT.to_string();
    }

    if config.save.output_dir.is_empty() {
        return Err(ConfigError::Validation(
            "output directory has not been set".to_string(),
        ));
    }

    Ok(())
}

/// Replaces every list entry with the host component of the parsed URL.
/// Entries without a scheme or host are configuration errors.
fn normalize_domain_list(entries: &[String], kind: &str) -> Result<Vec<String>, ConfigError> {
    let mut hosts = Vec::with_capacity(entries.len());

    for entry in entries {
        if entry.is_empty() {
            continue;
        }

        let parsed = Url::parse(entry).map_err(|e| {
            ConfigError::InvalidUrl(format!("invalid {} domain '{}': {}", kind, entry, e))
        })?;

        match parsed.host_str() {
            Some(host) => hosts.push(host.to_string()),
            None => {
                return Err(ConfigError::InvalidUrl(format!(
                    "{} domain '{}' has no host",
                    kind, entry
                )))
            }
        }
    }

    Ok(hosts)
}
