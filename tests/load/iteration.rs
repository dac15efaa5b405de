use std::time::{Duration, Instant};

use node_load::template::{DEFAULT_HEADERS, DEFAULT_THINK_TIME};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{iteration_for, node_url, refused_url, TOKEN};

async fn server_returning(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/node"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

/// Three sequential iterations produce three identical GETs and take at
/// least three pauses.
#[tokio::test]
async fn test_three_iterations_send_identical_requests() {
    let server = server_returning(200).await;
    let iteration = iteration_for(&node_url(&server), DEFAULT_THINK_TIME);

    let started = Instant::now();
    for _ in 0..3 {
        iteration.run_once().await;
    }
    let elapsed = started.elapsed();

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 3);
    assert!(elapsed >= Duration::from_secs(3), "elapsed {elapsed:?}");

    for req in &requests {
        assert_eq!(req.method.as_str(), "GET");
        assert_eq!(req.url.path(), "/node");
        assert!(req.body.is_empty());
        assert_eq!(req.headers, requests[0].headers);
    }
}

#[tokio::test]
async fn test_request_carries_fixed_header_set() {
    let server = server_returning(200).await;
    let iteration = iteration_for(&node_url(&server), Duration::ZERO);

    iteration.run_once().await;

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    let headers = &requests[0].headers;
    // Connection is hop-by-hop and may not survive to the handler.
    for (name, value) in DEFAULT_HEADERS.iter().filter(|(n, _)| *n != "Connection") {
        let got = headers
            .get(*name)
            .unwrap_or_else(|| panic!("missing header {name}"));
        assert_eq!(got.to_str().unwrap(), *value, "header {name}");
    }
    assert_eq!(
        headers.get("authorization").unwrap().to_str().unwrap(),
        format!("Bearer {TOKEN}")
    );
}

#[tokio::test]
async fn test_unauthorized_response_still_completes() {
    let server = server_returning(401).await;
    let iteration = iteration_for(&node_url(&server), DEFAULT_THINK_TIME);

    let started = Instant::now();
    iteration.run_once().await;

    assert!(started.elapsed() >= DEFAULT_THINK_TIME);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_server_error_still_completes() {
    let server = server_returning(500).await;
    let iteration = iteration_for(&node_url(&server), DEFAULT_THINK_TIME);

    let started = Instant::now();
    iteration.run_once().await;

    assert!(started.elapsed() >= DEFAULT_THINK_TIME);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_connection_refused_still_completes() {
    let iteration = iteration_for(&refused_url(), DEFAULT_THINK_TIME);

    let started = Instant::now();
    iteration.run_once().await;

    assert!(started.elapsed() >= DEFAULT_THINK_TIME);
}

#[tokio::test]
async fn test_slow_response_is_waited_for_before_pause() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/node"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;
    let iteration = iteration_for(&node_url(&server), Duration::from_millis(200));

    let started = Instant::now();
    iteration.run_once().await;

    assert!(started.elapsed() >= Duration::from_millis(500));
}
