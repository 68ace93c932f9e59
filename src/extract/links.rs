use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(href)[\s]*=[\s]*("|')(.*?)("|')"#).expect("hardcoded regex pattern is valid")
});

static SRC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(src)[\s]*=[\s]*("|')(.*?)("|')"#).expect("hardcoded regex pattern is valid")
});

/// Extensions that mark an `href` target as a page asset rather than a
/// navigation link.
const ASSET_PATH_MARKERS: &[&str] = &[".css", ".scss", ".js", ".mjs"];

/// A page asset reference: the attribute value exactly as it appears in the
/// HTML, plus the resolved absolute URL to fetch it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub raw: String,
    pub url: Url,
}

/// Makes an absolute URL out of a possibly-relative link candidate
///
/// Already-absolute candidates pass through untouched. A relative candidate
/// gets `https` as its scheme and the referring page's host; the path is
/// kept as written (a `/` is inserted when missing). Protocol-relative
/// `//host/path` candidates get only the scheme.
pub fn resolve_link(candidate: &str, from: &Url) -> Option<Url> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return None;
    }

    match Url::parse(candidate) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let host = from.host_str()?;
            let authority = match from.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            };

            let absolute = if let Some(rest) = candidate.strip_prefix("//") {
                format!("https://{}", rest)
            } else if candidate.starts_with('/') {
                format!("https://{}{}", authority, candidate)
            } else {
                format!("https://{}/{}", authority, candidate)
            };

            Url::parse(&absolute).ok()
        }
        Err(_) => None,
    }
}

fn attr_values<'a>(body: &'a str, re: &'a Regex) -> impl Iterator<Item = &'a str> + 'a {
    re.captures_iter(body)
        .filter_map(|captures| captures.get(3).map(|m| m.as_str()))
}

/// Finds every `href=` target on the page, resolved against `from`
///
/// Candidates that fail to parse as URLs are skipped.
pub fn find_links(body: &[u8], from: &Url) -> Vec<Url> {
    let text = String::from_utf8_lossy(body);
    attr_values(&text, &HREF_RE)
        .filter_map(|candidate| resolve_link(candidate, from))
        .collect()
}

/// Finds every `src=` target on the page, resolved against `from`
pub fn find_src_links(body: &[u8], from: &Url) -> Vec<Url> {
    let text = String::from_utf8_lossy(body);
    attr_values(&text, &SRC_RE)
        .filter_map(|candidate| resolve_link(candidate, from))
        .collect()
}

/// Collects the page's asset references for saving: every `src=` target,
/// plus `href=` targets whose path contains a stylesheet or script
/// extension. The raw attribute text is kept alongside the resolved URL so
/// the saved page body can be rewritten by plain byte replacement.
pub fn find_page_assets(body: &[u8], from: &Url) -> Vec<AssetRef> {
    let text = String::from_utf8_lossy(body);
    let mut assets = Vec::new();

    for raw in attr_values(&text, &SRC_RE) {
        if let Some(url) = resolve_link(raw, from) {
            assets.push(AssetRef {
                raw: raw.to_string(),
                url,
            });
        }
    }

    for raw in attr_values(&text, &HREF_RE) {
        if let Some(url) = resolve_link(raw, from) {
            if ASSET_PATH_MARKERS
                .iter()
                .any(|marker| url.path().contains(marker))
            {
                assets.push(AssetRef {
                    raw: raw.to_string(),
                    url,
                });
            }
        }
    }

    assets
}
