//! Search against a local HTTP stub and through the full application state.

use jsonland::search::{
    country_detail, CountrySource, DetailOutcome, RemoteQuery, RestCountriesClient,
    SearchController, SearchStatus,
};
use jsonland::storage::{JsonFileStore, KeyValueStore};
use jsonland::{handle_event, AppState, CountryCode, Event, JsonLandError, Region};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const NORWAY: &str = r#"{"name":{"common":"Norway","official":"Kingdom of Norway"},"capital":["Oslo"],
  "population":5379475,"region":"Europe",
  "languages":{"nno":"Norwegian Nynorsk","nob":"Norwegian Bokmål"},"cca2":"NO"}"#;

const JAPAN: &str = r#"{"name":{"common":"Japan","official":"Japan"},"capital":["Tokyo"],
  "population":125836021,"region":"Asia","languages":{"jpn":"Japanese"},"cca2":"JP"}"#;

fn respond(path: &str) -> (u16, String) {
    if path.starts_with("/v3.1/all") || path.starts_with("/v3.1/alpha?codes=") {
        (200, format!("[{NORWAY},{JAPAN}]"))
    } else if path.starts_with("/v3.1/alpha/NO") {
        (200, format!("[{NORWAY}]"))
    } else if path.starts_with("/v3.1/alpha/AQ") {
        (200, "[]".to_string())
    } else if path.starts_with("/v3.1/region/Oceania") {
        (500, r#"{"message":"boom"}"#.to_string())
    } else {
        (404, r#"{"status":404,"message":"Not Found"}"#.to_string())
    }
}

/// Serves canned REST Countries responses; returns the base URL.
async fn stub_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let mut read = 0;
                while !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf[read..]).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => read += n,
                    }
                }
                let request = String::from_utf8_lossy(&buf[..read]);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body) = respond(&path);
                let reply = format!(
                    "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}/v3.1")
}

#[tokio::test]
async fn client_maps_upstream_responses() {
    let client = RestCountriesClient::new(&stub_server().await, Some(Duration::from_secs(5))).unwrap();

    let all = client.fetch(&RemoteQuery::All).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].population_display(), "5,379,475");

    let missing = client.fetch(&RemoteQuery::Name("zzz".to_string())).await;
    assert!(matches!(missing, Err(JsonLandError::Fetch(_))));

    let failed = client.fetch(&RemoteQuery::Region(Region::Oceania)).await;
    assert!(matches!(failed, Err(JsonLandError::Fetch(_))));
}

#[tokio::test]
async fn detail_outcomes() {
    let client = RestCountriesClient::new(&stub_server().await, None).unwrap();

    match country_detail(&client, &CountryCode::parse("no").unwrap()).await {
        DetailOutcome::Found(country) => assert_eq!(country.capital_display(), "Oslo"),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(
        country_detail(&client, &CountryCode::parse("AQ").unwrap()).await,
        DetailOutcome::NotFound
    );
    assert_eq!(
        country_detail(&client, &CountryCode::parse("ZZ").unwrap()).await,
        DetailOutcome::Failed
    );

    let offline = RestCountriesClient::new("http://127.0.0.1:9/v3.1", None).unwrap();
    assert_eq!(
        country_detail(&offline, &CountryCode::parse("NO").unwrap()).await,
        DetailOutcome::Failed
    );
}

#[tokio::test]
async fn controller_reports_each_status() {
    let dir = tempfile::tempdir().unwrap();
    let kv: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(dir.path().join("store.json")).unwrap());
    let source: Arc<dyn CountrySource> =
        Arc::new(RestCountriesClient::new(&stub_server().await, None).unwrap());
    let mut search = SearchController::new(kv, source, Duration::from_millis(20)).unwrap();
    let mut rx = search.subscribe();

    search.set_language("japan").unwrap();
    let status = rx.wait_for(SearchStatus::is_settled).await.unwrap().clone();
    assert_eq!(status.countries().len(), 1);
    assert_eq!(status.countries()[0].cca2, "JP");

    search.set_language("klingon").unwrap();
    rx.wait_for(|s| *s == SearchStatus::NoResults).await.unwrap();

    search.set_language("").unwrap();
    search.set_name("atlantis").unwrap();
    search.submit();
    rx.wait_for(|s| *s == SearchStatus::FetchFailed).await.unwrap();

    search.set_name("").unwrap();
    search.set_region(Some(Region::Oceania)).unwrap();
    rx.wait_for(|s| *s == SearchStatus::FetchFailed).await.unwrap();
    assert!(search.status().countries().is_empty());
}

#[tokio::test]
async fn app_restores_criteria_and_session() {
    let dir = tempfile::tempdir().unwrap();
    let base = stub_server().await;
    let store_path = dir.path().join("store.json");

    {
        let kv: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(&store_path).unwrap());
        let source: Arc<dyn CountrySource> = Arc::new(RestCountriesClient::new(&base, None).unwrap());
        let mut state = AppState::start(kv, source, Duration::from_millis(20)).await.unwrap();

        let photo = dir.path().join("me.gif");
        std::fs::write(&photo, b"GIF89a").unwrap();
        let line = format!("register alice a@x.com p {}", photo.display());
        handle_event(&mut state, Event::parse(&line).unwrap().unwrap()).await.unwrap();
        handle_event(&mut state, Event::parse("fav add jp").unwrap().unwrap()).await.unwrap();
        handle_event(&mut state, Event::parse("region asia").unwrap().unwrap()).await.unwrap();
    }

    let kv: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(&store_path).unwrap());
    let source: Arc<dyn CountrySource> = Arc::new(RestCountriesClient::new(&base, None).unwrap());
    let state = AppState::start(kv, source, Duration::from_millis(20)).await.unwrap();

    let alice = state.session.user().unwrap();
    assert!(alice.photo.starts_with("data:image/gif;base64,"));
    assert_eq!(alice.favorites()[0].as_str(), "JP");
    assert_eq!(state.search.criteria().region, Some(Region::Asia));
}
