//! Deployment environment, selected by `NODE_ENV`.
//!
//! Only `production` changes behaviour: the server then serves the built
//! client and takes its allowed origin from `CLIENT_URL`. The other values
//! pick which `{environment}.toml` overlay is read. An unset, empty or
//! unknown `NODE_ENV` runs the server in development.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    /// Variable the environment is read from
    pub const ENV_VAR: &'static str = "NODE_ENV";

    const EXPECTED: &'static str = "one of development, test, staging, production";

    /// Read `NODE_ENV` from the process environment.
    pub fn from_env() -> Self {
        Self::from_node_env(std::env::var(Self::ENV_VAR).ok().as_deref())
    }

    /// Resolve a raw `NODE_ENV` value.
    ///
    /// Unknown values are logged and treated as development, so a typo in
    /// `NODE_ENV` never turns on production-only behaviour.
    pub fn from_node_env(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::default();
        };

        raw.parse().unwrap_or_else(|error: ConfigError| {
            tracing::warn!(%error, "Falling back to development");
            Self::default()
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// Overlay file read on top of `default.toml`
    pub fn config_file_name(&self) -> String {
        format!("{}.toml", self.as_str())
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidEnvVar {
                var: Self::ENV_VAR,
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
