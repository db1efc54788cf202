//! Configuration management for the slot booking server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Only the spreadsheet id and a Sheets credential are required.

use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Configuration that cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    /// A variable is set but does not parse.
    #[error("Invalid value for {name}: {value:?}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Google Sheets configuration
    pub sheets: SheetsConfig,
    /// Admin access configuration
    pub admin: AdminConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Metrics server host (for Prometheus scraping)
    pub metrics_host: String,
    /// Metrics server port
    pub metrics_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

impl ServerConfig {
    /// `host:port` of the API listener.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `host:port` of the Prometheus listener.
    #[must_use]
    pub fn metrics_address(&self) -> String {
        format!("{}:{}", self.metrics_host, self.metrics_port)
    }

    /// How long in-flight requests get once shutdown starts.
    #[must_use]
    pub const fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

/// Google Sheets configuration
#[derive(Clone, PartialEq, Eq)]
pub struct SheetsConfig {
    /// Spreadsheet holding both tables
    pub spreadsheet_id: String,
    /// OAuth access token or API key
    pub credential: String,
    /// API root override (emulators, tests)
    pub api_url: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Title of the slots sheet
    pub slots_sheet: String,
    /// Title of the reservations sheet
    pub reservations_sheet: String,
}

impl SheetsConfig {
    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("credential", &"***")
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("slots_sheet", &self.slots_sheet)
            .field("reservations_sheet", &self.reservations_sheet)
            .finish()
    }
}

/// Admin access configuration
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AdminConfig {
    /// Password exchanged for admin tokens; empty disables login
    pub password: String,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("password_set", &!self.password.is_empty())
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a
    /// numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from a fixed set of variables.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| vars.get(name).cloned())
    }

    /// Load configuration through `lookup`, which returns a variable's value.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let credential = var("GOOGLE_ACCESS_TOKEN")
            .or_else(|| var("GOOGLE_API_KEY"))
            .ok_or(ConfigError::Missing("GOOGLE_ACCESS_TOKEN"))?;

        Ok(Self {
            server: ServerConfig {
                host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or("PORT", var("PORT"), 8080)?,
                metrics_host: var("METRICS_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                metrics_port: parse_or("METRICS_PORT", var("METRICS_PORT"), 9090)?,
                shutdown_timeout: parse_or("SHUTDOWN_TIMEOUT", var("SHUTDOWN_TIMEOUT"), 30)?,
            },
            sheets: SheetsConfig {
                spreadsheet_id: var("GOOGLE_SPREADSHEET_ID")
                    .ok_or(ConfigError::Missing("GOOGLE_SPREADSHEET_ID"))?,
                credential,
                api_url: var("SHEETS_API_URL"),
                timeout_secs: parse_or("SHEETS_TIMEOUT_SECS", var("SHEETS_TIMEOUT_SECS"), 10)?,
                slots_sheet: var("SLOTS_SHEET").unwrap_or_else(|| "Slots".to_string()),
                reservations_sheet: var("RESERVATIONS_SHEET")
                    .unwrap_or_else(|| "Reservations".to_string()),
            },
            admin: AdminConfig {
                password: var("ADMIN_PASSWORD").unwrap_or_default(),
            },
        })
    }
}

fn parse_or<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match value {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("GOOGLE_SPREADSHEET_ID", "sheet-123"),
            ("GOOGLE_ACCESS_TOKEN", "ya29.token"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_map(&vars(&minimal())).unwrap();

        assert_eq!(config.server.address(), "0.0.0.0:8080");
        assert_eq!(config.server.metrics_address(), "0.0.0.0:9090");
        assert_eq!(config.server.shutdown_grace(), Duration::from_secs(30));
        assert_eq!(config.sheets.slots_sheet, "Slots");
        assert_eq!(config.sheets.reservations_sheet, "Reservations");
        assert_eq!(config.sheets.timeout(), Duration::from_secs(10));
        assert!(config.sheets.api_url.is_none());
        assert!(config.admin.password.is_empty());
    }

    #[test]
    fn test_overrides() {
        let mut pairs = minimal();
        pairs.extend([
            ("PORT", "3000"),
            ("SLOTS_SHEET", "Aziende"),
            ("RESERVATIONS_SHEET", "Prenotazioni"),
            ("SHEETS_API_URL", "http://localhost:8085/v4"),
            ("ADMIN_PASSWORD", "s3cret"),
        ]);
        let config = Config::from_map(&vars(&pairs)).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.sheets.slots_sheet, "Aziende");
        assert_eq!(config.sheets.reservations_sheet, "Prenotazioni");
        assert_eq!(
            config.sheets.api_url.as_deref(),
            Some("http://localhost:8085/v4")
        );
        assert_eq!(config.admin.password, "s3cret");
    }

    #[test]
    fn test_api_key_is_accepted_as_credential() {
        let config = Config::from_map(&vars(&[
            ("GOOGLE_SPREADSHEET_ID", "sheet-123"),
            ("GOOGLE_API_KEY", "AIzaSyExample"),
        ]))
        .unwrap();
        assert_eq!(config.sheets.credential, "AIzaSyExample");
    }

    #[test]
    fn test_missing_required_values() {
        let err = Config::from_map(&vars(&[("GOOGLE_ACCESS_TOKEN", "t")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("GOOGLE_SPREADSHEET_ID"));

        let err = Config::from_map(&vars(&[
            ("GOOGLE_SPREADSHEET_ID", "sheet-123"),
            ("GOOGLE_ACCESS_TOKEN", "   "),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("GOOGLE_ACCESS_TOKEN"));
    }

    #[test]
    fn test_invalid_number() {
        let mut pairs = minimal();
        pairs.push(("PORT", "eighty"));
        let err = Config::from_map(&vars(&pairs)).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn test_debug_hides_secrets() {
        let mut pairs = minimal();
        pairs.push(("ADMIN_PASSWORD", "s3cret"));
        let config = Config::from_map(&vars(&pairs)).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("ya29.token"));
        assert!(!rendered.contains("s3cret"));
    }
}
