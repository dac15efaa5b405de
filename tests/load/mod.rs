mod iteration;
mod runner;

use node_load::{Iteration, RequestTemplate};
use std::sync::Arc;
use std::time::Duration;

pub const TOKEN: &str = "header.payload.signature";

pub fn node_url(server: &wiremock::MockServer) -> String {
    format!("{}/node", server.uri())
}

pub fn iteration_for(url: &str, think_time: Duration) -> Iteration {
    let template = RequestTemplate::builder(url)
        .bearer(TOKEN)
        .think_time(think_time)
        .build()
        .expect("valid template");
    Iteration::new(Arc::new(template), Duration::from_secs(5)).expect("client")
}

/// A local address with nothing listening on it.
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}/node")
}
