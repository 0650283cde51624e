use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use testresult::TestResult;
use tokio::net::TcpListener;

use crate::{
    metrics::Query,
    transport::{HttpTransport, Transport, TransportError},
    Dialect, Monitor, PrinterEndpoint, PrinterFlag,
};

/// A request as seen by [FakeServer].
#[derive(Clone, Debug)]
struct Request {
    path: String,
    headers: HashMap<String, String>,
}

#[derive(Clone, Default)]
struct Routes {
    replies: Arc<HashMap<&'static str, (u16, String)>>,
    requests: Arc<Mutex<Vec<Request>>>,
}

/// Local HTTP server answering canned replies per path. Unknown paths get
/// a `404`.
struct FakeServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl FakeServer {
    async fn start(routes: Vec<(&'static str, u16, String)>) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Routes {
            replies: Arc::new(
                routes
                    .into_iter()
                    .map(|(path, status, body)| (path, (status, body)))
                    .collect(),
            ),
            ..Default::default()
        };
        let requests = state.requests.clone();

        let app = Router::new().fallback(reply).with_state(state);
        tokio::spawn(async move { axum::serve(listener, app).await });

        Ok(Self { addr, requests })
    }

    fn endpoint(&self, dialect: Dialect) -> PrinterEndpoint {
        PrinterEndpoint {
            host: self.addr.ip().to_string(),
            port: self.addr.port(),
            api_key: "0123456789ABCDEF".to_owned(),
            dialect,
            ..Default::default()
        }
    }

    fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

async fn reply(State(routes): State<Routes>, uri: Uri, headers: HeaderMap) -> impl IntoResponse {
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or_else(|| uri.path());
    routes.requests.lock().unwrap().push(Request {
        path: path.to_owned(),
        headers: headers
            .iter()
            .filter_map(|(name, value)| Some((name.as_str().to_owned(), value.to_str().ok()?.to_owned())))
            .collect(),
    });

    let (status, body) = routes.replies.get(path).cloned().unwrap_or((404, String::new()));
    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json"), (header::LOCATION, "/")],
        body,
    )
}

#[tokio::test]
async fn test_fetch_sends_api_key_without_auth() -> TestResult {
    let server = FakeServer::start(vec![("/api/job", 200, "{}".to_owned())]).await?;
    let transport = HttpTransport::new()?;

    let response = transport.fetch(&server.endpoint(Dialect::OctoPrint), "/api/job").await?;
    assert_eq!(response.status, 200);
    assert_eq!(response.body, "{}");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/api/job");
    assert_eq!(
        requests[0].headers.get("x-api-key").map(String::as_str),
        Some("0123456789ABCDEF")
    );
    assert!(!requests[0].headers.contains_key("authorization"));
    Ok(())
}

#[tokio::test]
async fn test_fetch_sends_basic_auth_with_username() -> TestResult {
    let server = FakeServer::start(vec![("/api/printer", 200, "{}".to_owned())]).await?;
    let transport = HttpTransport::new()?;
    let endpoint = PrinterEndpoint {
        username: "pi".to_owned(),
        password: "raspberry".to_owned(),
        ..server.endpoint(Dialect::OctoPrint)
    };

    transport.fetch(&endpoint, "/api/printer").await?;

    let requests = server.requests();
    assert_eq!(
        requests[0].headers.get("authorization").map(String::as_str),
        Some("Basic cGk6cmFzcGJlcnJ5")
    );
    Ok(())
}

#[tokio::test]
async fn test_fetch_body_only_on_success() -> TestResult {
    let server = FakeServer::start(vec![
        ("/ok", 200, "ok body".to_owned()),
        ("/moved", 301, "moved body".to_owned()),
        ("/denied", 403, "denied body".to_owned()),
    ])
    .await?;
    let transport = HttpTransport::new()?;
    let endpoint = server.endpoint(Dialect::OctoPrint);

    let ok = transport.fetch(&endpoint, "/ok").await?;
    assert!(ok.is_ok());
    assert_eq!(ok.body, "ok body");

    let moved = transport.fetch(&endpoint, "/moved").await?;
    assert_eq!(moved.status, 301);
    assert!(!moved.is_ok());
    assert_eq!(moved.body, "moved body");

    let denied = transport.fetch(&endpoint, "/denied").await?;
    assert_eq!(denied.status, 403);
    assert_eq!(denied.body, "");

    let missing = transport.fetch(&endpoint, "/missing").await?;
    assert_eq!(missing.status, 404);
    assert_eq!(missing.body, "");
    Ok(())
}

#[tokio::test]
async fn test_fetch_connection_refused() -> TestResult {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let endpoint = PrinterEndpoint {
        host: addr.ip().to_string(),
        port: addr.port(),
        ..Default::default()
    };
    let result = HttpTransport::new()?.fetch(&endpoint, "/api/job").await;
    assert!(matches!(result, Err(TransportError::Request(_))), "{:?}", result);
    Ok(())
}

#[tokio::test]
async fn test_fetch_times_out() -> TestResult {
    // Accepts connections but never answers.
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    let endpoint = PrinterEndpoint {
        host: addr.ip().to_string(),
        port: addr.port(),
        ..Default::default()
    };
    let result = HttpTransport::new()?.fetch(&endpoint, "/api/job").await;
    assert!(matches!(result, Err(TransportError::Timeout(_))), "{:?}", result);
    Ok(())
}

#[tokio::test]
async fn test_monitor_octoprint_end_to_end() -> TestResult {
    let job = json!({
        "job": {
            "file": {"name": "cube.gcode", "display": "Cube.gcode"},
            "estimatedPrintTime": 1200.0,
            "filament": {"tool0": {"length": 250.0}},
        },
        "progress": {"completion": 50.0, "printTime": 600, "printTimeLeft": 600},
        "state": "Printing",
    });
    let printer = json!({
        "temperature": {
            "tool0": {"actual": 205.0, "target": 205.0},
            "bed": {"actual": 60.0, "target": 60.0},
        },
        "state": {"text": "Paused", "flags": {"paused": true, "operational": true}},
    });
    let server = FakeServer::start(vec![
        ("/api/job", 200, job.to_string()),
        ("/api/printer", 200, printer.to_string()),
    ])
    .await?;

    let mut monitor = Monitor::new(server.endpoint(Dialect::OctoPrint))?;
    monitor.update().await;

    let status = monitor.snapshot();
    assert!(status.job.valid);
    assert!(status.job.loaded);
    assert_eq!(status.job.file_name, "Cube.gcode");
    assert_eq!(status.job.print_time_remaining, 600.0);
    assert!(status.printer.valid);
    assert_eq!(status.printer.print_state, "Paused");
    assert_eq!(
        status.printer.flags.iter().collect::<Vec<_>>(),
        vec![PrinterFlag::Operational, PrinterFlag::Paused]
    );
    assert_eq!(
        server.requests().iter().map(|r| r.path.as_str()).collect::<Vec<_>>(),
        vec!["/api/job", "/api/printer"]
    );
    Ok(())
}

#[tokio::test]
async fn test_monitor_moonraker_end_to_end() -> TestResult {
    let dialect = Dialect::Moonraker;
    let job = json!({
        "result": {
            "status": {
                "virtual_sdcard": {"progress": 0.25, "is_active": true},
                "print_stats": {"filename": "cube.gcode", "print_duration": 300.0, "filament_used": 90.0},
            },
        },
    });
    let server = FakeServer::start(vec![(dialect.job_path(), 200, job.to_string())]).await?;

    let mut monitor = Monitor::new(server.endpoint(dialect))?;
    monitor.update().await;

    let status = monitor.snapshot();
    assert!(status.job.valid);
    assert_eq!(status.job.estimated_print_time, 1200.0);
    assert_eq!(status.job.print_time_remaining, 900.0);
    assert!(!status.printer.valid);
    assert_eq!(monitor.metrics().fetch_failures(Query::Printer), 1);
    Ok(())
}

#[tokio::test]
async fn test_monitor_empty_host_is_fetch_failure() -> TestResult {
    let mut monitor = Monitor::new(PrinterEndpoint::default())?;
    monitor.update().await;

    assert!(!monitor.status().job.valid);
    assert!(!monitor.status().printer.valid);
    assert_eq!(monitor.metrics().fetch_failures(Query::Job), 1);
    Ok(())
}
