use crate::config::Search;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// A text finding produced by a worker: which page, which search, and the
/// matched strings (regexp matches, email addresses, or the query itself
/// for a literal substring hit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub page_url: String,
    pub search: Search,
    pub data: Vec<String>,
}

/// Append-only sink for findings
///
/// Each entry is written as one indented JSON object plus a trailing
/// newline, so the file is a concatenation of objects rather than a JSON
/// array. A mutex serializes writers so concurrent entries never
/// interleave. Write errors drop the entry.
pub struct ResultSink {
    file: Mutex<File>,
}

impl ResultSink {
    pub fn create(path: &Path) -> std::io::Result<Self> {
        Ok(Self {
            file: Mutex::new(File::create(path)?),
        })
    }

    pub fn write(&self, finding: &Finding) {
        let Ok(mut encoded) = serde_json::to_vec_pretty(finding) else {
            return;
        };
        encoded.push(b'\n');

        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(&encoded);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn finding(page: &str, data: &[&str]) -> Finding {
        Finding {
            page_url: page.to_string(),
            search: Search {
                is_regexp: false,
                query: "q".to_string(),
            },
            data: data.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_entries_concatenate_and_decode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("found_text.json");
        let sink = ResultSink::create(&path).unwrap();

        sink.write(&finding("https://a.test/", &["one"]));
        sink.write(&finding("https://b.test/", &["two", "three"]));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.ends_with('\n'));

        let decoded: Vec<Finding> = serde_json::Deserializer::from_str(&content)
            .into_iter()
            .map(|entry| entry.unwrap())
            .collect();

        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].page_url, "https://a.test/");
        assert_eq!(decoded[1].data, vec!["two", "three"]);
    }
}
