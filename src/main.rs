use anyhow::{Context, Result};
use node_load::{config, iteration, login, runner, telemetry};
use config::Config;
use iteration::Iteration;
use std::sync::Arc;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("failed to read .env");
        }
    }
    init_tracing();

    let cfg = Config::load().context("failed to load configuration")?;

    let client = reqwest::Client::builder()
        .timeout(cfg.target.timeout())
        .build()
        .context("failed to build HTTP client")?;

    let token = match (cfg.auth.token(), &cfg.auth.login) {
        (Some(token), _) => token.to_string(),
        (None, Some(login)) => login::fetch_token(&client, login)
            .await
            .context("failed to obtain bearer token")?,
        (None, None) => anyhow::bail!(
            "no credential configured: set NODE_LOAD__AUTH__TOKEN or the [auth.login] section"
        ),
    };

    let template = cfg.target.template(&token)?;
    if template.headers().get("accept").is_some_and(|v| v == "/*/") {
        warn!("Accept header is '/*/', not the '*/*' wildcard; override target.headers.Accept if the server rejects it");
    }
    info!(
        url = %template.url(),
        think_time_ms = template.think_time().as_millis() as u64,
        "request template ready"
    );

    let routine = Arc::new(Iteration::with_client(Arc::new(template), client));
    let plan = cfg.runner.plan()?;
    let report = runner::run(plan, routine, telemetry::cancel_on_shutdown()).await;

    info!(
        iterations = report.iterations_completed,
        elapsed_secs = report.elapsed.as_secs_f64(),
        "done"
    );
    Ok(())
}
