use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::Server;
use predicates::prelude::*;
use tempfile::tempdir;

const PAGE: &str = r#"<html>
<head>
  <title>Harbour Log</title>
  <meta name="description" content="Arrivals and departures">
</head>
<body>
  <h1>Today</h1>
  <p>Calm seas.</p>
  <a href="/tomorrow">Tomorrow</a>
  <a href="https://weather.example/">Weather</a>
  <img src="/boat.png" alt="Boat">
  <table>
    <thead><tr><th>Vessel</th><th>Berth</th></tr></thead>
    <tbody><tr><td>Marlin</td><td>4</td></tr></tbody>
  </table>
</body>
</html>"#;

fn polite_scrape() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("polite-scrape"));
    cmd.env_remove("POLITE_SCRAPE_DELAY")
        .env_remove("POLITE_SCRAPE_RETRIES")
        .args(["--delay", "0", "--backoff", "0.01"]);
    cmd
}

#[test]
fn test_basic_prints_title_and_headings() {
    let mut server = Server::new();
    let _m = server
        .mock("GET", "/log")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(PAGE)
        .create();

    polite_scrape()
        .arg("basic")
        .arg(format!("{}/log", server.url()))
        .assert()
        .success()
        .stdout(predicate::str::contains("Page Title: Harbour Log"))
        .stdout(predicate::str::contains("h1: Today"))
        .stdout(predicate::str::contains("Calm seas."));
}

#[test]
fn test_tables_json_output() {
    let mut server = Server::new();
    let _m = server
        .mock("GET", "/log")
        .with_status(200)
        .with_body(PAGE)
        .create();

    let output = polite_scrape()
        .args(["tables", "--json"])
        .arg(format!("{}/log", server.url()))
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["records"][0]["Vessel"], "Marlin");
    assert_eq!(json[0]["records"][0]["Berth"], "4");
}

#[test]
fn test_links_resolve_against_page_url() {
    let mut server = Server::new();
    let url = server.url();
    let _m = server
        .mock("GET", "/log")
        .with_status(200)
        .with_body(PAGE)
        .create();

    polite_scrape()
        .arg("links")
        .arg(format!("{}/log", url))
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Tomorrow -> {}/tomorrow", url)))
        .stdout(predicate::str::contains("Internal Links: 1"))
        .stdout(predicate::str::contains("External Links: 1"))
        .stdout(predicate::str::contains(format!("Source: {}/boat.png", url)));
}

#[test]
fn test_not_found_fails_after_one_attempt() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/missing")
        .with_status(404)
        .expect(1)
        .create();

    polite_scrape()
        .arg("basic")
        .arg(format!("{}/missing", server.url()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to fetch"))
        .stderr(predicate::str::contains("404"));

    mock.assert();
}

#[test]
fn test_fetch_retries_server_errors() {
    let mut server = Server::new();
    let unavailable = server
        .mock("GET", "/busy")
        .with_status(503)
        .expect(2)
        .create();
    let ok = server
        .mock("GET", "/busy")
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("ready")
        .expect(1)
        .create();

    polite_scrape()
        .args(["--retries", "3", "fetch"])
        .arg(format!("{}/busy", server.url()))
        .assert()
        .success()
        .stdout(predicate::str::contains("Status: 200"))
        .stdout(predicate::str::contains("Content-Type: text/plain"))
        .stdout(predicate::str::contains("Bytes: 5"))
        .stdout(predicate::str::contains("Attempts: 3"));

    unavailable.assert();
    ok.assert();
}

#[test]
fn test_fetch_gives_up_when_retries_exhausted() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/down")
        .with_status(500)
        .expect(3)
        .create();

    polite_scrape()
        .args(["--retries", "2", "fetch"])
        .arg(format!("{}/down", server.url()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Retries exhausted after 3 attempt(s)"));

    mock.assert();
}

#[test]
fn test_fetch_saves_body() {
    let mut server = Server::new();
    let _m = server
        .mock("GET", "/log")
        .with_status(200)
        .with_body(PAGE)
        .create();

    let dir = tempdir().unwrap();
    let out = dir.path().join("log.html");

    polite_scrape()
        .arg("fetch")
        .arg(format!("{}/log", server.url()))
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&out).unwrap(), PAGE);
}

#[test]
fn test_custom_user_agent_and_header_are_sent() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/log")
        .match_header("user-agent", "harbour-bot/2.0")
        .match_header("x-crew", "night")
        .with_status(200)
        .with_body(PAGE)
        .create();

    polite_scrape()
        .args(["--user-agent", "harbour-bot/2.0", "-H", "X-Crew: night", "meta"])
        .arg(format!("{}/log", server.url()))
        .assert()
        .success()
        .stdout(predicate::str::contains("Description: Arrivals and departures"));

    mock.assert();
}

#[test]
fn test_crawl_continues_past_failures() {
    let mut server = Server::new();
    let _ok = server
        .mock("GET", "/log")
        .with_status(200)
        .with_body(PAGE)
        .create();
    let _gone = server
        .mock("GET", "/gone")
        .with_status(410)
        .create();

    polite_scrape()
        .arg("crawl")
        .arg(format!("{}/gone", server.url()))
        .arg(format!("{}/log", server.url()))
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed: ClientError after 1 attempt(s)"))
        .stdout(predicate::str::contains("Title: Harbour Log"))
        .stdout(predicate::str::contains("Fetched 1/2 page(s)"));
}

#[test]
fn test_select_from_local_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("page.html");
    std::fs::write(&path, PAGE).unwrap();

    polite_scrape()
        .args(["select", "a", "--attr", "href", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 match(es)"))
        .stdout(predicate::str::contains("1. /tomorrow"));
}

#[test]
fn test_demo_runs_offline() {
    polite_scrape()
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Title: Scraping Practice Page"))
        .stdout(predicate::str::contains("--- Table 1 ---"))
        .stdout(predicate::str::contains("Author: Tutorial Team"));
}

#[test]
fn test_invalid_url_is_rejected() {
    polite_scrape()
        .args(["fetch", "not-a-url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid request"));
}
