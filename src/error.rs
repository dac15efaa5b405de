use thiserror::Error;

/// Errors raised while setting up a load run.
///
/// The iteration routine itself never produces one of these; request
/// outcomes are swallowed at that layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),

    #[error("invalid value for header {name}")]
    InvalidHeaderValue { name: String },

    #[error("invalid target url: {0}")]
    InvalidUrl(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("login failed: {0}")]
    Login(String),

    #[error("no credential configured: set auth.token or auth.login")]
    MissingCredential,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<validator::ValidationErrors> for LoadError {
    fn from(errors: validator::ValidationErrors) -> Self {
        LoadError::Config(errors.to_string())
    }
}

impl From<figment::Error> for LoadError {
    fn from(error: figment::Error) -> Self {
        LoadError::Config(error.to_string())
    }
}
