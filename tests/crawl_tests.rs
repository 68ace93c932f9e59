//! End-to-end crawl tests
//!
//! These tests run a real worker pool against wiremock servers and check
//! the files and counters the engine produces.

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wecr::config::{Requests, Save, Search};
use wecr::frontier::{Frontier, Job, MemoryFrontier};
use wecr::output::{Finding, OutputTree, ResultSink};
use wecr::worker::{Pool, Statistics, WorkerConf};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    pool: Pool,
    stats: Arc<Statistics>,
    output: TempDir,
}

/// Builds a single-worker pool over a memory frontier, seeded with one job
async fn start_crawl(
    seed: &str,
    search: Search,
    depth: u64,
    save_pages: bool,
    blacklisted_domains: Vec<String>,
    allowed_domains: Vec<String>,
) -> Harness {
    let output = TempDir::new().unwrap();
    let tree = OutputTree::create(output.path()).unwrap();
    let text_sink = ResultSink::create(&output.path().join("found_text.json")).unwrap();
    let email_sink = ResultSink::create(&output.path().join("found_emails.json")).unwrap();

    let frontier = Arc::new(Frontier::Memory(MemoryFrontier::new(50)));
    frontier
        .push(Job {
            url: seed.to_string(),
            search,
            depth,
        })
        .await
        .unwrap();

    let conf = WorkerConf {
        requests: Requests {
            request_wait_timeout_ms: 2000,
            request_pause_ms: 1,
            content_fetch_timeout_ms: 2000,
            user_agent: "TestAgent/1.0".to_string(),
        },
        save: Save {
            output_dir: output.path().display().to_string(),
            save_pages,
        },
        allowed_domains,
        blacklisted_domains,
    };

    let mut pool = Pool::new(1, frontier, conf, tree, text_sink, email_sink).unwrap();
    let stats = pool.stats();
    pool.work();

    Harness {
        pool,
        stats,
        output,
    }
}

/// Polls until `pages_visited` reaches `target` (with a settle pause so the
/// final page's processing finishes), then stops and joins the pool
async fn finish_crawl(harness: &mut Harness, target: u64) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);

    while harness
        .stats
        .pages_visited
        .load(std::sync::atomic::Ordering::Relaxed)
        < target
    {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {} visited pages",
            target
        );
        tokio::time::sleep(Duration::from_millis(25)).await;
    }

    tokio::time::sleep(Duration::from_millis(300)).await;
    harness.pool.stop();
    harness.pool.join().await;
}

fn read_findings(path: &std::path::Path) -> Vec<Finding> {
    let content = std::fs::read_to_string(path).unwrap();
    serde_json::Deserializer::from_str(&content)
        .into_iter()
        .map(|entry| entry.unwrap())
        .collect()
}

#[tokio::test]
async fn test_images_are_downloaded_one_hop() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<html><body><img src="{base}/x.png"><a href="{base}/p2">next</a></body></html>"#
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/x.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, 0x50, 0x4e, 0x47]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>no images</html>"))
        .mount(&server)
        .await;

    let search = Search {
        is_regexp: false,
        query: "images".to_string(),
    };
    let mut harness = start_crawl(&format!("{base}/"), search, 2, false, vec![], vec![]).await;
    finish_crawl(&mut harness, 2).await;

    let image = harness.output.path().join("images/127.0.0.1_0_x.png");
    assert!(image.is_file(), "expected {}", image.display());
    assert_eq!(std::fs::read(&image).unwrap(), vec![0x89, 0x50, 0x4e, 0x47]);

    let snapshot = harness.stats.snapshot();
    assert_eq!(snapshot.pages_visited, 2);
    assert_eq!(snapshot.matches_found, 1);
}

#[tokio::test]
async fn test_regex_matches_are_recorded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<p>call 415-1234 or 510-9999</p>"),
        )
        .mount(&server)
        .await;

    let search = Search {
        is_regexp: true,
        query: "[0-9]{3}-[0-9]{4}".to_string(),
    };
    let mut harness = start_crawl(
        &format!("{}/", server.uri()),
        search,
        1,
        false,
        vec![],
        vec![],
    )
    .await;
    finish_crawl(&mut harness, 1).await;

    let findings = read_findings(&harness.output.path().join("found_text.json"));
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].data, vec!["415-1234", "510-9999"]);

    assert_eq!(harness.stats.snapshot().matches_found, 2);
}

#[tokio::test]
async fn test_literal_text_finding_holds_the_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>The Hidden Treasure</p>"))
        .mount(&server)
        .await;

    let search = Search {
        is_regexp: false,
        query: "hidden treasure".to_string(),
    };
    let mut harness = start_crawl(
        &format!("{}/", server.uri()),
        search,
        1,
        false,
        vec![],
        vec![],
    )
    .await;
    finish_crawl(&mut harness, 1).await;

    let findings = read_findings(&harness.output.path().join("found_text.json"));
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].data, vec!["hidden treasure"]);
    assert_eq!(harness.stats.snapshot().matches_found, 1);
}

#[tokio::test]
async fn test_blacklisted_child_is_never_visited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="http://bad.test/x">bad</a>"#,
        ))
        .mount(&server)
        .await;

    let search = Search {
        is_regexp: false,
        query: "anything".to_string(),
    };
    let mut harness = start_crawl(
        &format!("{}/", server.uri()),
        search,
        2,
        false,
        vec!["bad.test".to_string()],
        vec![],
    )
    .await;
    finish_crawl(&mut harness, 1).await;

    // The child job was enqueued but filtered before counting or fetching
    assert_eq!(harness.stats.snapshot().pages_visited, 1);
}

#[tokio::test]
async fn test_allow_list_rejects_other_hosts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&server)
        .await;

    let search = Search {
        is_regexp: false,
        query: "anything".to_string(),
    };
    let mut harness = start_crawl(
        &format!("{}/", server.uri()),
        search,
        1,
        false,
        vec![],
        vec!["allowed.test".to_string()],
    )
    .await;

    // The seed is skipped outright, so nothing is ever counted
    tokio::time::sleep(Duration::from_millis(300)).await;
    harness.pool.stop();
    harness.pool.join().await;

    assert_eq!(harness.stats.snapshot().pages_visited, 0);
}

#[tokio::test]
async fn test_depth_one_does_not_expand() {
    let server = MockServer::start().await;
    let base = server.uri();

    let links: String = (0..50)
        .map(|i| format!(r#"<a href="{base}/p{i}">{i}</a>"#))
        .collect();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(links))
        .mount(&server)
        .await;

    let search = Search {
        is_regexp: false,
        query: "anything".to_string(),
    };
    let mut harness = start_crawl(&format!("{base}/"), search, 1, false, vec![], vec![]).await;
    finish_crawl(&mut harness, 1).await;

    assert_eq!(harness.stats.snapshot().pages_visited, 1);
}

#[tokio::test]
async fn test_duplicate_links_are_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<a href="{base}/p2">a</a><a href="{base}/p2">b</a><a href="{base}/p2">c</a>"#
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>leaf</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let search = Search {
        is_regexp: false,
        query: "anything".to_string(),
    };
    let mut harness = start_crawl(&format!("{base}/"), search, 2, false, vec![], vec![]).await;
    finish_crawl(&mut harness, 2).await;

    assert_eq!(harness.stats.snapshot().pages_visited, 2);
}

#[tokio::test]
async fn test_repeated_media_link_is_downloaded_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<img src="{base}/x.png"><img src="{base}/x.png">"#
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/x.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3]))
        .expect(1)
        .mount(&server)
        .await;

    let search = Search {
        is_regexp: false,
        query: "images".to_string(),
    };
    let mut harness = start_crawl(&format!("{base}/"), search, 1, false, vec![], vec![]).await;
    finish_crawl(&mut harness, 1).await;

    assert_eq!(harness.stats.snapshot().matches_found, 1);
    assert!(harness
        .output
        .path()
        .join("images/127.0.0.1_0_x.png")
        .is_file());
}

#[tokio::test]
async fn test_archive_saves_page_with_rewritten_assets() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<html><head><link rel="stylesheet" href="{base}/style.css"></head><body>hi</body></html>"#
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/style.css"))
        .respond_with(ResponseTemplate::new(200).set_body_string("body { color: red; }"))
        .mount(&server)
        .await;

    let search = Search {
        is_regexp: false,
        query: "archive".to_string(),
    };
    let mut harness = start_crawl(&format!("{base}/"), search, 1, true, vec![], vec![]).await;
    finish_crawl(&mut harness, 1).await;

    let page = harness.output.path().join("pages/127.0.0.1_.html");
    assert!(page.is_file(), "expected {}", page.display());

    let saved = std::fs::read_to_string(&page).unwrap();
    let asset_url = format!("{base}/style.css");
    assert!(
        !saved.contains(&asset_url),
        "asset URL should be rewritten out of the saved page"
    );
    assert!(saved.contains("./127.0.0.1__files/style.css"));

    let asset = harness
        .output
        .path()
        .join("pages/127.0.0.1__files/style.css");
    assert!(asset.is_file(), "expected {}", asset.display());

    assert_eq!(harness.stats.snapshot().pages_saved, 1);
}
