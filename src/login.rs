use serde::Deserialize;
use tracing::info;

use crate::error::LoadError;

/// Credentials exchanged for a bearer token before the run starts.
#[derive(Clone, Deserialize)]
pub struct LoginConfig {
    /// Full login URL, e.g. `http://localhost:3000/user/login`.
    pub url: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Posts form-encoded credentials and returns the response body as the token.
pub async fn fetch_token(client: &reqwest::Client, login: &LoginConfig) -> Result<String, LoadError> {
    info!(url = %login.url, username = %login.username, "requesting bearer token");

    let resp = client
        .post(&login.url)
        .form(&[
            ("username", login.username.as_str()),
            ("password", login.password.as_str()),
        ])
        .send()
        .await?;
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(LoadError::Login(format!("HTTP {status}")));
    }

    let token = body.trim();
    if token.is_empty() {
        return Err(LoadError::Login("empty token in response".to_string()));
    }
    Ok(token.to_string())
}
