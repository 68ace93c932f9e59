use email_address::EmailAddress;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;
use trust_dns_resolver::TokioAsyncResolver;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-!%&?~^#$]+@[A-Za-z0-9.\-]+\.[a-zA-Z]{2,4}")
        .expect("hardcoded regex pattern is valid")
});

/// Finds email addresses on the page
///
/// Candidates come from a permissive pattern scan; each must then parse as
/// an RFC 5322 mailbox. Duplicates are dropped, first occurrence wins.
pub fn find_emails(body: &[u8]) -> Vec<String> {
    let page = String::from_utf8_lossy(body);
    let mut emails: Vec<String> = Vec::new();

    for candidate in EMAIL_RE.find_iter(&page) {
        let candidate = candidate.as_str();

        if EmailAddress::from_str(candidate).is_err() {
            continue;
        }

        if !emails.iter().any(|seen| seen == candidate) {
            emails.push(candidate.to_string());
        }
    }

    emails
}

/// Finds email addresses whose domain actually receives mail
///
/// On top of [`find_emails`], each address's domain must have at least one
/// MX record; addresses whose lookup fails or comes back empty are dropped.
pub async fn find_emails_with_mx(body: &[u8], resolver: &TokioAsyncResolver) -> Vec<String> {
    let mut verified = Vec::new();

    for email in find_emails(body) {
        let Some((_, domain)) = email.rsplit_once('@') else {
            continue;
        };

        match resolver.mx_lookup(domain.to_string()).await {
            Ok(lookup) if lookup.iter().next().is_some() => verified.push(email),
            Ok(_) => tracing::debug!("No MX records for {}, dropping {}", domain, email),
            Err(e) => tracing::debug!("MX lookup failed for {}: {}", domain, e),
        }
    }

    verified
}
