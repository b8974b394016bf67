//! End-to-end tests against mock HTTP servers.

use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use feedwaf::aggregator::collect;
use feedwaf::commands::update::{execute, UpdateOptions};
use feedwaf::config::{Config, DailyConfig, OutputConfig, DEFAULT_USER_AGENT};
use feedwaf::daily::DailyScraper;
use feedwaf::fetcher::Fetcher;
use feedwaf::sources::{ListKind, SourceDescriptor, SourceFormat};
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DAILY_PAGE: &str = "<html><body><table>\
    <tr><th>Date</th><th>IP</th></tr>\
    <tr><td>2024-01-01</td><td>3.3.3.3</td></tr>\
    <tr><td>2024-01-01</td><td>4.4.4.4</td></tr>\
    </table></body></html>";

async fn mount_body(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

fn source(server: &MockServer, name: &str, list: ListKind, format: SourceFormat) -> SourceDescriptor {
    SourceDescriptor::new(name, &format!("{}/{}", server.uri(), name), list, format)
}

fn daily_config(server: &MockServer) -> DailyConfig {
    DailyConfig {
        url_template: format!("{}/d-{{date}}.html", server.uri()),
        timeout_secs: 1,
        ..DailyConfig::default()
    }
}

fn test_config(server: &MockServer, dir: &Path) -> Config {
    Config {
        sources: vec![
            source(server, "bing", ListKind::White, SourceFormat::Json),
            source(server, "baidu", ListKind::White, SourceFormat::Text),
            source(server, "threats", ListKind::Black, SourceFormat::Text),
            source(server, "scanners", ListKind::Black, SourceFormat::Text),
        ],
        output: OutputConfig {
            white: dir.join("white.txt"),
            black: dir.join("black.txt"),
        },
        daily: DailyConfig {
            days: 3,
            ..daily_config(server)
        },
        ..Config::default()
    }
}

async fn mount_healthy_upstreams(server: &MockServer) {
    mount_body(
        server,
        "/bing",
        200,
        r#"{"prefixes":[{"ipv4Prefix":"157.55.39.0/24"},{"ipv6Prefix":"2a01:111:f100::/48"}]}"#,
    )
    .await;
    mount_body(server, "/baidu", 200, "# baidu\n116.179.32.0/24\n157.55.39.0/24\n").await;
    mount_body(server, "/threats", 200, "1.1.1.1\n# note\n\n2.2.2.0/24\n").await;
    mount_body(server, "/scanners", 200, "2.2.2.0/24\n3.3.3.3\n").await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/d-\d{4}-\d{2}-\d{2}\.html$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DAILY_PAGE))
        .mount(server)
        .await;
}

#[tokio::test]
async fn json_fetcher_sends_user_agent_and_keeps_ipv4() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/googlebot.json"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"prefixes":[{"ipv4Prefix":"1.2.3.0/24"},{"notAPrefix":"x"}]}"#,
        ))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&Config::default()).unwrap();
    let url = format!("{}/googlebot.json", server.uri());
    let entries = fetcher.fetch_json_prefixes("Google", &url).await;

    assert_eq!(entries.len(), 1);
    assert!(entries.contains("1.2.3.0/24"));
}

#[tokio::test]
async fn text_fetcher_sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cidr"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string("# share\n1.1.1.0/24\n"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&Config::default()).unwrap();
    let entries = fetcher
        .fetch_text_cidrs("Baidu", &format!("{}/cidr", server.uri()))
        .await;

    assert_eq!(entries.len(), 1);
    assert!(entries.contains("1.1.1.0/24"));
}

#[tokio::test]
async fn fetchers_treat_error_status_as_empty() {
    let server = MockServer::start().await;
    mount_body(&server, "/json", 503, r#"{"prefixes":[{"ipv4Prefix":"1.2.3.0/24"}]}"#).await;
    mount_body(&server, "/text", 404, "1.1.1.1\n").await;

    let fetcher = Fetcher::new(&Config::default()).unwrap();
    let json = fetcher
        .fetch_json_prefixes("json", &format!("{}/json", server.uri()))
        .await;
    let text = fetcher
        .fetch_text_cidrs("text", &format!("{}/text", server.uri()))
        .await;

    assert!(json.is_empty());
    assert!(text.is_empty());
}

#[tokio::test]
async fn malformed_json_is_reported_as_failure() {
    let server = MockServer::start().await;
    mount_body(&server, "/bing", 200, "<html>maintenance</html>").await;
    mount_body(&server, "/baidu", 200, "1.1.1.0/24\n").await;

    let fetcher = Fetcher::new(&Config::default()).unwrap();
    let sources = vec![
        source(&server, "baidu", ListKind::White, SourceFormat::Text),
        source(&server, "bing", ListKind::White, SourceFormat::Json),
    ];
    let report = collect(&fetcher, &sources, ListKind::White).await;

    assert_eq!(report.entries.len(), 1);
    // JSON sources are fetched first
    assert_eq!(report.sources[0].name, "bing");
    assert!(report.sources[0].error.is_some());
    assert!(report.sources[1].error.is_none());
}

#[tokio::test]
async fn daily_scraper_skips_failed_days() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/d-2024-01-03.html"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(DAILY_PAGE))
        .expect(1)
        .mount(&server)
        .await;
    mount_body(&server, "/d-2024-01-02.html", 500, "oops").await;
    mount_body(&server, "/d-2024-01-01.html", 200, "<html><p>no data today</p></html>").await;
    mount_body(
        &server,
        "/d-2023-12-31.html",
        200,
        "<table><tr><td>Date</td><td>IP</td></tr><tr><td>x</td><td>5.5.5.5</td></tr></table>",
    )
    .await;

    let scraper = DailyScraper::new(DEFAULT_USER_AGENT, &daily_config(&server)).unwrap();
    let dates = feedwaf::daily::recent_days(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), 4);
    let result = scraper.scrape_days(&dates).await;

    assert_eq!(result.days_scraped, 4);
    assert_eq!(result.failed_days.len(), 2);
    assert_eq!(result.entries.len(), 3);
    assert!(result.entries.contains("3.3.3.3"));
    assert!(result.entries.contains("5.5.5.5"));
}

#[tokio::test]
async fn daily_scraper_survives_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/d-2024-05-02.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(DAILY_PAGE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    mount_body(
        &server,
        "/d-2024-05-01.html",
        200,
        "<table><tr><td>h</td><td>h</td></tr><tr><td>d</td><td>6.6.6.6</td></tr></table>",
    )
    .await;

    let scraper = DailyScraper::new(DEFAULT_USER_AGENT, &daily_config(&server)).unwrap();
    let dates = feedwaf::daily::recent_days(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(), 2);
    let result = scraper.scrape_days(&dates).await;

    assert_eq!(result.failed_days, vec![NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()]);
    assert_eq!(result.entries.len(), 1);
    assert!(result.entries.contains("6.6.6.6"));
}

#[tokio::test]
async fn update_writes_sorted_deduplicated_lists() {
    let server = MockServer::start().await;
    mount_healthy_upstreams(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path());

    let summary = execute(&config, &UpdateOptions::default()).await.unwrap();

    assert!(summary.white.written);
    assert!(summary.black.written);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("white.txt")).unwrap(),
        "116.179.32.0/24\n157.55.39.0/24\n"
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("black.txt")).unwrap(),
        "1.1.1.1\n2.2.2.0/24\n3.3.3.3\n4.4.4.4\n"
    );
    // two text feeds plus the daily listing
    assert_eq!(summary.black.report.sources.len(), 3);
}

#[tokio::test]
async fn update_is_idempotent() {
    let server = MockServer::start().await;
    mount_healthy_upstreams(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path());

    execute(&config, &UpdateOptions::default()).await.unwrap();
    let white = std::fs::read(dir.path().join("white.txt")).unwrap();
    let black = std::fs::read(dir.path().join("black.txt")).unwrap();

    execute(&config, &UpdateOptions::default()).await.unwrap();
    assert_eq!(std::fs::read(dir.path().join("white.txt")).unwrap(), white);
    assert_eq!(std::fs::read(dir.path().join("black.txt")).unwrap(), black);
}

#[tokio::test]
async fn update_writes_empty_lists_when_everything_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let white_path = dir.path().join("white.txt");
    std::fs::write(&white_path, "stale.entry\n").unwrap();
    let config = test_config(&server, dir.path());

    let summary = execute(&config, &UpdateOptions::default()).await.unwrap();

    assert_eq!(std::fs::read_to_string(&white_path).unwrap(), "\n");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("black.txt")).unwrap(),
        "\n"
    );
    assert_eq!(summary.white.report.failed_sources().len(), 2);
    assert_eq!(summary.black.report.failed_sources().len(), 3);
}

#[tokio::test]
async fn white_write_failure_does_not_block_black_list() {
    let server = MockServer::start().await;
    mount_healthy_upstreams(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&server, dir.path());
    config.output.white = dir.path().join("missing").join("white.txt");

    let summary = execute(&config, &UpdateOptions::default()).await.unwrap();

    assert!(!summary.white.written);
    assert!(summary.white.write_error.is_some());
    assert!(summary.black.written);
    assert!(dir.path().join("black.txt").exists());
}

#[tokio::test]
async fn dry_run_writes_nothing() {
    let server = MockServer::start().await;
    mount_healthy_upstreams(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path());
    let options = UpdateOptions {
        days: Some(1),
        dry_run: true,
    };

    let summary = execute(&config, &options).await.unwrap();

    assert!(!summary.white.written);
    assert!(!summary.black.written);
    assert_eq!(summary.white.report.entries.len(), 2);
    assert!(!dir.path().join("white.txt").exists());
    assert!(!dir.path().join("black.txt").exists());
}

#[tokio::test]
async fn disabled_daily_source_is_not_requested() {
    let server = MockServer::start().await;
    mount_body(&server, "/threats", 200, "1.1.1.1\n").await;
    mount_body(&server, "/scanners", 200, "").await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/d-"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DAILY_PAGE))
        .expect(0)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&server, dir.path());
    config.daily.enabled = false;

    let summary = execute(&config, &UpdateOptions::default()).await.unwrap();

    assert_eq!(summary.black.report.sources.len(), 2);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("black.txt")).unwrap(),
        "1.1.1.1\n"
    );
}
