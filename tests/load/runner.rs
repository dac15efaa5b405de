use std::sync::Arc;
use std::time::Duration;

use node_load::runner::{run, RunPlan, StopCondition};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{iteration_for, node_url};

#[tokio::test]
async fn test_virtual_users_share_one_template() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/node"))
        .respond_with(ResponseTemplate::new(200))
        .expect(6)
        .mount(&server)
        .await;

    let routine = Arc::new(iteration_for(&node_url(&server), Duration::from_millis(50)));
    let plan = RunPlan {
        virtual_users: 3,
        stop: StopCondition::Iterations(2),
    };
    let report = run(plan, routine, CancellationToken::new()).await;

    assert_eq!(report.iterations_completed, 6);
    let requests = server.received_requests().await.unwrap();
    let auth = requests[0].headers.get("authorization").cloned();
    assert!(requests
        .iter()
        .all(|r| r.headers.get("authorization").cloned() == auth));
    server.verify().await;
}

#[tokio::test]
async fn test_failing_endpoint_does_not_stop_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/node"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&server)
        .await;

    let routine = Arc::new(iteration_for(&node_url(&server), Duration::from_millis(10)));
    let plan = RunPlan {
        virtual_users: 2,
        stop: StopCondition::Iterations(2),
    };
    let report = run(plan, routine, CancellationToken::new()).await;

    assert_eq!(report.iterations_completed, 4);
    server.verify().await;
}
