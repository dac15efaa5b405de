//! One virtual-user iteration: a single GET built from the shared
//! [`RequestTemplate`], followed by the think-time pause.

use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::error::LoadError;
use crate::template::RequestTemplate;

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Unit of work a host runtime invokes once per iteration of each virtual
/// user. Implementations must not fail: request outcomes stay inside.
#[async_trait]
pub trait VirtualUserIteration: Send + Sync {
    async fn iterate(&self);
}

#[derive(Debug, Clone)]
pub struct Iteration {
    template: Arc<RequestTemplate>,
    client: reqwest::Client,
}

impl Iteration {
    pub fn new(template: Arc<RequestTemplate>, timeout: Duration) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(template, client))
    }

    /// Share an existing client (and its connection pool).
    pub fn with_client(template: Arc<RequestTemplate>, client: reqwest::Client) -> Self {
        Self { template, client }
    }

    pub fn template(&self) -> &RequestTemplate {
        &self.template
    }

    /// Sends the templated request, discards whatever comes back, then
    /// sleeps for the template's think time.
    pub async fn run_once(&self) {
        let started = Instant::now();
        let outcome = self
            .client
            .request(self.template.method().clone(), self.template.url().clone())
            .headers(self.template.headers().clone())
            .send()
            .await;

        match outcome {
            Ok(resp) => {
                let status = resp.status().as_u16();
                // Drain so the pooled connection can be reused.
                let _ = resp.bytes().await;
                debug!(
                    url = %self.template.url(),
                    status,
                    latency_ms = started.elapsed().as_millis() as u64,
                    "iteration request completed"
                );
            }
            Err(e) => {
                warn!(
                    url = %self.template.url(),
                    error = %e,
                    latency_ms = started.elapsed().as_millis() as u64,
                    "iteration request failed"
                );
            }
        }

        sleep(self.template.think_time()).await;
    }
}

#[async_trait]
impl VirtualUserIteration for Iteration {
    async fn iterate(&self) {
        self.run_once().await
    }
}
