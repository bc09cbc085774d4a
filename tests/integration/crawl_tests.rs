//! Integration tests for the inspector
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! probe cycle end-to-end over real HTTP.

use link_inspector::config::{Config, CrawlerConfig};
use link_inspector::crawler::{run_inspection, HttpProbe, Inspector};
use link_inspector::output::{format_console_report, JunitReporter};
use link_inspector::state::{CheckOutcome, ResultItem, ResultStore, SEED_PARENT};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with a short timeout
fn create_test_config(timeout: u64, max_retries: u32) -> CrawlerConfig {
    CrawlerConfig {
        timeout,
        max_retries,
        ..CrawlerConfig::default()
    }
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

/// Finds the first recorded item for a URL, whatever its parent
fn find(store: &ResultStore, url: &str) -> Option<ResultItem> {
    store
        .pages()
        .iter()
        .flat_map(|(_, items)| items.iter())
        .find(|item| item.url == url)
        .cloned()
}

async fn inspect(config: CrawlerConfig, seed: &str, recursive: bool) -> ResultStore {
    let probe = HttpProbe::new(config.accepted_codes.clone()).expect("Failed to build client");
    let inspector = Inspector::new(config, probe).expect("Invalid config");
    inspector
        .run(&[seed.to_string()], recursive)
        .await
        .expect("Inspection failed")
}

#[tokio::test]
async fn test_classifies_links_on_seed_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            r#"<html><body>
            <a href="/ok">OK</a>
            <a href="/missing">Missing</a>
            <a href="/accepted">Accepted</a>
            <a href="http://127.0.0.1:1/">Refused</a>
            <a href="mailto:someone@example.com">Mail</a>
            <a href="{}/ok#top">Same page again</a>
            </body></html>"#,
            base_url
        )))
        .mount(&mock_server)
        .await;

    Mock::given(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(path("/accepted"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(2000, 0);
    config.accepted_codes = vec![999, 429];

    let seed = format!("{}/", base_url);
    let store = inspect(config, &seed, false).await;

    assert_eq!(find(&store, &seed).unwrap().outcome, CheckOutcome::Ok);

    let ok = format!("{}/ok", base_url);
    let ok_items: Vec<ResultItem> = store
        .pages()
        .get(&seed)
        .unwrap()
        .iter()
        .filter(|item| item.url == ok)
        .cloned()
        .collect();
    assert_eq!(ok_items.len(), 2);
    assert!(ok_items.iter().any(|item| item.outcome == CheckOutcome::Ok));
    assert!(ok_items.iter().any(|item| item.outcome == CheckOutcome::Skipped));

    let missing = find(&store, &format!("{}/missing", base_url)).unwrap();
    assert_eq!(missing.outcome, CheckOutcome::NonSuccessCode);
    assert_eq!(missing.message.as_deref(), Some("404"));

    assert_eq!(
        find(&store, &format!("{}/accepted", base_url)).unwrap().outcome,
        CheckOutcome::Ok
    );
    assert_eq!(
        find(&store, "http://127.0.0.1:1/").unwrap().outcome,
        CheckOutcome::GenericError
    );
    assert_eq!(
        find(&store, "mailto:someone@example.com").unwrap().outcome,
        CheckOutcome::Skipped
    );

    assert!(!store.success());
}

#[tokio::test]
async fn test_head_failure_escalates_to_get() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/no-head">x</a>"#.to_string()))
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/no-head"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/no-head"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let seed = format!("{}/", base_url);
    let store = inspect(create_test_config(2000, 3), &seed, false).await;

    let items = store.pages().get(&seed).unwrap().to_vec();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].outcome, CheckOutcome::Ok);
    assert!(store.success());
}

#[tokio::test]
async fn test_timeout_after_retry_budget() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/slow">x</a>"#.to_string()))
        .mount(&mock_server)
        .await;

    // One HEAD, then the first GET and one retry
    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let seed = format!("{}/", base_url);
    let store = inspect(create_test_config(300, 1), &seed, false).await;

    let slow = find(&store, &format!("{}/slow", base_url)).unwrap();
    assert_eq!(slow.outcome, CheckOutcome::Timeout);
    assert!(!store.success());
}

#[tokio::test]
async fn test_retried_after_timeouts() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/flaky">x</a>"#.to_string()))
        .mount(&mock_server)
        .await;

    // Mounted first so it answers the first two requests
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(300, 2);
    config.get = true;

    let seed = format!("{}/", base_url);
    let store = inspect(config, &seed, false).await;

    let flaky = find(&store, &format!("{}/flaky", base_url)).unwrap();
    assert_eq!(flaky.outcome, CheckOutcome::Retried);
    assert_eq!(flaky.message.as_deref(), Some("2"));
    assert!(store.success());
}

#[tokio::test]
async fn test_recursive_stays_on_origin() {
    let mock_server = MockServer::start().await;
    let external_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let external_url = external_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            r#"<a href="/about">About</a><a href="{}/page">External</a>"#,
            external_url
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html(r#"<a href="/deep">Deep</a><a href="/">Home</a>"#.to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(path("/deep"))
        .respond_with(html(String::new()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(path("/page"))
        .respond_with(html(r#"<a href="/never">Never</a>"#.to_string()))
        .mount(&external_server)
        .await;

    Mock::given(path("/never"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&external_server)
        .await;

    let seed = format!("{}/", base_url);
    let about = format!("{}/about", base_url);
    let store = inspect(create_test_config(2000, 0), &seed, true).await;

    let pages = store.pages();
    assert!(pages.get(SEED_PARENT).is_some());
    assert!(pages.get(&seed).is_some());
    assert!(pages.get(&about).is_some());
    assert!(pages.get(&format!("{}/page", external_url)).is_none());

    assert_eq!(
        find(&store, &format!("{}/deep", base_url)).unwrap().outcome,
        CheckOutcome::Ok
    );
    assert_eq!(
        find(&store, &format!("{}/page", external_url)).unwrap().outcome,
        CheckOutcome::Ok
    );
    assert!(store.success());
}

#[tokio::test]
async fn test_run_inspection_and_junit_report() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/ok">OK</a><a href="/gone">Gone</a><a href="/skip-me">Skip</a>"#
                .to_string(),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&mock_server)
        .await;

    let mut config = Config::default();
    config.crawler.skip = vec!["*skip-me*".to_string()];

    let seed = format!("{}/", base_url);
    let store = run_inspection(&[seed.clone()], false, &config, None)
        .await
        .unwrap();

    assert_eq!(store.count(), 4);
    assert!(!store.success());

    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("junit-report.xml");
    let xml = store.report(&JunitReporter::to_file(&report_path)).unwrap();

    assert_eq!(std::fs::read_to_string(&report_path).unwrap(), xml);
    assert!(xml.contains(&format!(
        "<testsuite name=\"{}\" tests=\"3\" failures=\"1\" skipped=\"1\"",
        seed
    )));
    assert!(xml.contains("<failure message=\"410\"/>"));

    colored::control::set_override(false);
    let console = format_console_report(&store.pages());
    assert!(console.contains(&format!("BROKEN  : {}/gone (410)", base_url)));
}

#[tokio::test]
async fn test_malformed_seed_is_fatal() {
    let result = run_inspection(&["not a url".to_string()], false, &Config::default(), None).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_control_character_href_keeps_junit_well_formed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<a href=\"http://[::1\u{1}\">Broken</a>".to_string()))
        .mount(&mock_server)
        .await;

    let seed = format!("{}/", base_url);
    let store = inspect(create_test_config(2000, 0), &seed, false).await;

    let bad = find(&store, "http://[::1\u{1}").unwrap();
    assert_eq!(bad.outcome, CheckOutcome::GenericError);

    let xml = store.report(&JunitReporter::in_memory()).unwrap();
    assert!(!xml.contains('\u{1}'));
    assert!(xml.contains("<testcase name=\"http://[::1\u{FFFD}\""));
}
