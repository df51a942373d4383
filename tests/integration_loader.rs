#![cfg(feature = "fetch")]

use mapmarkers::loader::{fetch_catalog, fetch_catalog_async, load_all, CatalogSource};
use mapmarkers::{CatalogLoadError, LoaderConfig};
use std::fs;
use tiny_http::{Response, Server};

/// Serve the demo documents on an ephemeral port until the process exits.
fn start_catalog_server() -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();

    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let response = match request.url() {
                "/jobs.geojson" => {
                    Response::from_string(fs::read_to_string("demos/jobs.geojson").unwrap())
                }
                "/empty.json" => Response::from_string("[]"),
                "/broken.json" => Response::from_string("{ \"features\": [ { "),
                "/slow.json" => {
                    std::thread::sleep(std::time::Duration::from_millis(500));
                    Response::from_string("[]")
                }
                _ => Response::from_string("Not Found").with_status_code(404),
            };
            let _ = request.respond(response);
        }
    });

    format!("http://{}", addr)
}

#[test]
fn fetches_catalog_over_http() {
    let base = start_catalog_server();
    let catalog = fetch_catalog(&format!("{}/jobs.geojson", base), &LoaderConfig::default())
        .expect("fetch failed");
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.records()[2].title.as_deref(), Some("Zoox"));
}

#[test]
fn missing_document_is_status_error() {
    let base = start_catalog_server();
    let err = fetch_catalog(&format!("{}/nope.json", base), &LoaderConfig::default()).unwrap_err();
    assert!(matches!(err, CatalogLoadError::Status { status: 404, .. }), "{:?}", err);
}

#[test]
fn truncated_document_is_parse_error() {
    let base = start_catalog_server();
    let err =
        fetch_catalog(&format!("{}/broken.json", base), &LoaderConfig::default()).unwrap_err();
    assert!(matches!(err, CatalogLoadError::Parse(_)), "{:?}", err);
}

#[test]
fn timeout_is_http_error() {
    let base = start_catalog_server();
    let cfg = LoaderConfig {
        timeout_ms: 50,
        ..Default::default()
    };
    let err = fetch_catalog(&format!("{}/slow.json", base), &cfg).unwrap_err();
    assert!(matches!(err, CatalogLoadError::Http { .. }), "{:?}", err);
}

#[test]
fn unreachable_host_is_http_error() {
    // Bind and drop to get a port nothing listens on
    let port = {
        let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let err = fetch_catalog(
        &format!("http://127.0.0.1:{}/jobs.geojson", port),
        &LoaderConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CatalogLoadError::Http { .. }), "{:?}", err);
}

#[tokio::test]
async fn async_fetch_matches_blocking_parse() {
    let base = start_catalog_server();
    let fetched = fetch_catalog_async(&format!("{}/jobs.geojson", base), &LoaderConfig::default())
        .await
        .expect("fetch failed");
    let local = mapmarkers::loader::load_catalog_file("demos/jobs.geojson").unwrap();
    assert_eq!(fetched, local);
}

#[tokio::test(flavor = "multi_thread")]
async fn load_all_mixes_files_and_urls_in_order() {
    let base = start_catalog_server();
    let sources = vec![
        CatalogSource::parse(&format!("{}/empty.json", base)),
        CatalogSource::parse("demos/jobs.geojson"),
        CatalogSource::parse(&format!("{}/nope.json", base)),
        CatalogSource::parse(&format!("{}/jobs.geojson", base)),
    ];
    let results = load_all(&sources, &LoaderConfig::default()).await;
    assert_eq!(results.len(), 4);
    assert!(results[0].as_ref().unwrap().is_empty());
    assert_eq!(results[1].as_ref().unwrap().len(), 3);
    assert!(matches!(results[2], Err(CatalogLoadError::Status { status: 404, .. })));
    assert_eq!(results[3].as_ref().unwrap(), results[1].as_ref().unwrap());
}
