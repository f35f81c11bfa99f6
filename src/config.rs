use std::fmt;
use std::path::PathBuf;

use crate::auth::Credentials;

/// Login-page path used unless `LOGIN_PATH` overrides it. Some dashboard
/// deployments serve the drifted `/account/login` route instead.
const DEFAULT_LOGIN_PATH: &str = "/accounts/login";
const DEFAULT_REPORTS_DIR: &str = "reports";

/// Runtime settings, read once from the environment before any request is
/// made. `credentials` carries its own redacting `Debug`.
#[derive(Debug)]
pub struct Config {
    pub base_url: String,
    pub login_path: String,
    pub credentials: Credentials,
    pub reports_dir: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing { name: &'static str },
    Invalid { name: &'static str, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { name } => {
                write!(f, "missing required environment variable {name}")
            }
            Self::Invalid { name, reason } => write!(f, "invalid {name}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// `BASE_URL`, `APP_EMAIL`, and `APP_PASSWORD` are required; a variable
    /// that is set but empty counts as missing. `LOGIN_PATH` and
    /// `REPORTS_DIR` are optional with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] for an absent required variable and
    /// [`ConfigError::Invalid`] for a `LOGIN_PATH` that does not start
    /// with `/`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = require("BASE_URL")?;
        let email = require("APP_EMAIL")?;
        let password = require("APP_PASSWORD")?;

        let login_path =
            optional("LOGIN_PATH").unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string());
        if !login_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                name: "LOGIN_PATH",
                reason: "must start with '/'",
            });
        }

        let reports_dir = optional("REPORTS_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_REPORTS_DIR), PathBuf::from);

        Ok(Self {
            // Paths are joined onto the base, so a trailing slash would
            // produce `//` URLs.
            base_url: base_url.trim_end_matches('/').to_string(),
            login_path,
            credentials: Credentials { email, password },
            reports_dir,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing { name })
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
