use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::{collections::BTreeMap, time::Duration};
use validator::{Validate, ValidationError};

use crate::error::LoadError;
use crate::iteration::DEFAULT_HTTP_TIMEOUT;
use crate::login::LoginConfig;
use crate::runner::{RunPlan, StopCondition};
use crate::template::{RequestTemplate, DEFAULT_TARGET_URL, DEFAULT_THINK_TIME};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "NODE_LOAD__";

/// Tokens with this prefix are placeholders left in config files.
const PLACEHOLDER_PREFIX: &str = "__SET_VIA_ENV";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Config {
    #[serde(default)]
    #[validate(nested)]
    pub target: TargetConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    #[validate(nested)]
    pub runner: RunnerConfig,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct TargetConfig {
    #[validate(length(min = 1))]
    pub url: String,
    pub think_time_ms: u64,
    #[validate(range(min = 1))]
    pub timeout_seconds: u64,
    /// Added to, or replacing, the default header set.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_TARGET_URL.to_string(),
            think_time_ms: DEFAULT_THINK_TIME.as_millis() as u64,
            timeout_seconds: DEFAULT_HTTP_TIMEOUT.as_secs(),
            headers: BTreeMap::new(),
        }
    }
}

impl TargetConfig {
    pub fn think_time(&self) -> Duration {
        Duration::from_millis(self.think_time_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn template(&self, token: &str) -> Result<RequestTemplate, LoadError> {
        self.headers
            .iter()
            .fold(RequestTemplate::builder(&self.url), |b, (name, value)| {
                b.header(name, value)
            })
            .bearer(token)
            .think_time(self.think_time())
            .build()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    pub token: Option<String>,
    pub login: Option<LoginConfig>,
}

impl AuthConfig {
    /// The configured token, unless it is empty or a placeholder.
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && !t.starts_with(PLACEHOLDER_PREFIX))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_stop_condition"))]
pub struct RunnerConfig {
    #[validate(range(min = 1))]
    pub virtual_users: usize,
    /// Per virtual user.
    pub iterations: Option<u64>,
    pub duration_seconds: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            virtual_users: 1,
            iterations: Some(1),
            duration_seconds: None,
        }
    }
}

impl RunnerConfig {
    pub fn plan(&self) -> Result<RunPlan, LoadError> {
        let stop = match (self.iterations, self.duration_seconds) {
            (Some(n), None) => StopCondition::Iterations(n),
            (None, Some(s)) => StopCondition::Duration(Duration::from_secs(s)),
            (Some(n), Some(s)) => StopCondition::Both {
                iterations: n,
                duration: Duration::from_secs(s),
            },
            (None, None) => {
                return Err(LoadError::Config(
                    "runner needs iterations or duration_seconds".to_string(),
                ))
            }
        };
        Ok(RunPlan {
            virtual_users: self.virtual_users,
            stop,
        })
    }
}

fn validate_stop_condition(runner: &RunnerConfig) -> Result<(), ValidationError> {
    if runner.iterations.is_none() && runner.duration_seconds.is_none() {
        return Err(ValidationError::new("missing_stop_condition"));
    }
    Ok(())
}

impl Config {
    pub fn load() -> Result<Self, LoadError> {
        let figment = Figment::new()
            .merge(Toml::file(DEFAULT_CONFIG_PATH))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self, LoadError> {
        let cfg: Config = figment.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }
}
