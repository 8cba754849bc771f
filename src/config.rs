//! Application configuration loaded from environment variables.
//!
//! Cloud Run injects the push token as an environment variable via a secret
//! binding, so everything is read from the environment once at startup.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Shared secret the push subscription appends as `?token=`
    pub push_verify_token: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            push_verify_token: "test_push_token".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port = match env::var("PORT") {
            Ok(v) => v
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", v))?,
            Err(_) => 8080,
        };

        let push_verify_token = env::var("PUSH_VERIFY_TOKEN")
            .map(|v| v.trim().to_string())
            .map_err(|_| ConfigError::Missing("PUSH_VERIFY_TOKEN"))?;
        if push_verify_token.is_empty() {
            return Err(ConfigError::Missing("PUSH_VERIFY_TOKEN"));
        }

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port,
            push_verify_token,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases live in one test because they share process-wide env vars.
    #[test]
    fn test_config_from_env() {
        env::set_var("PUSH_VERIFY_TOKEN", " secret ");
        env::remove_var("PORT");

        let config = Config::from_env().expect("Config should load");
        assert_eq!(config.push_verify_token, "secret");
        assert_eq!(config.port, 8080);

        env::set_var("PORT", "not-a-port");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("PORT", _))
        ));
        env::remove_var("PORT");
    }
}
