//! TOML-based service configuration.

use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::engine::Locale;
use crate::grid::ServiceArea;

/// Top-level service configuration parsed from TOML.
///
/// All fields have defaults, so an empty file is a valid configuration that
/// serves the Heilbronn region from `data/`. Load from TOML with
/// [`ServiceConfig::from_toml_file`] or use [`ServiceConfig::baseline`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// HTTP listener and CORS.
    #[serde(default)]
    pub server: ServerConfig,
    /// Dataset file locations.
    #[serde(default)]
    pub data: DataConfig,
    /// Bounding box requests must fall into.
    #[serde(default)]
    pub service_area: ServiceArea,
    /// Log filter and output format.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Request defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// HTTP listener and CORS settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Interface address to bind.
    pub bind: String,
    /// TCP port (must be > 0).
    pub port: u16,
    /// Allowed CORS origins; `["*"]` allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
        }
    }
}

/// Dataset file locations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Local station CSV (required).
    pub facilities: PathBuf,
    /// Upstream substation CSV (required).
    pub upstream: PathBuf,
    /// Station-to-substation CSV; when absent the station records' own
    /// substation column is used.
    pub topology: Option<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            facilities: PathBuf::from("data/facilities.csv"),
            upstream: PathBuf::from("data/upstream.csv"),
            topology: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, for terminals.
    #[default]
    Pretty,
    /// One JSON object per line, for log shippers.
    Json,
}

/// Log filter and output format.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing` filter directive; `RUST_LOG` takes precedence when set.
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Request defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Language used when a request does not name one.
    pub locale: Locale,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"server.port"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl ServiceConfig {
    /// Returns the built-in configuration.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Socket address the HTTP server listens on.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `server.bind` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.server.bind.parse().map_err(|_| {
            ConfigError::new(
                "server.bind",
                format!("must be an IP address, got \"{}\"", self.server.bind),
            )
        })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let srv = &self.server;
        if let Err(e) = self.socket_addr() {
            errors.push(e);
        }
        if srv.port == 0 {
            errors.push(ConfigError::new("server.port", "must be > 0"));
        }
        if srv.cors_origins.is_empty() {
            errors.push(ConfigError::new(
                "server.cors_origins",
                "must list at least one origin or \"*\"",
            ));
        } else if srv.cors_origins.len() > 1 && srv.cors_origins.iter().any(|o| o == "*") {
            errors.push(ConfigError::new(
                "server.cors_origins",
                "\"*\" cannot be combined with explicit origins",
            ));
        } else {
            for origin in srv.cors_origins.iter().filter(|o| *o != "*") {
                if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                    errors.push(ConfigError::new(
                        "server.cors_origins",
                        format!("origin \"{origin}\" must start with http:// or https://"),
                    ));
                }
            }
        }

        let data = &self.data;
        if data.facilities.as_os_str().is_empty() {
            errors.push(ConfigError::new("data.facilities", "must not be empty"));
        }
        if data.upstream.as_os_str().is_empty() {
            errors.push(ConfigError::new("data.upstream", "must not be empty"));
        }
        if data.topology.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            errors.push(ConfigError::new(
                "data.topology",
                "must not be empty when set",
            ));
        }

        let area = &self.service_area;
        let corners = [area.min_lat, area.max_lat, area.min_lon, area.max_lon];
        if corners.iter().any(|v| !v.is_finite()) {
            errors.push(ConfigError::new("service_area", "bounds must be finite"));
        } else {
            if !(-90.0..=90.0).contains(&area.min_lat) || !(-90.0..=90.0).contains(&area.max_lat) {
                errors.push(ConfigError::new(
                    "service_area.min_lat",
                    "latitudes must be in [-90, 90]",
                ));
            }
            if area.min_lat >= area.max_lat {
                errors.push(ConfigError::new(
                    "service_area.min_lat",
                    "must be < service_area.max_lat",
                ));
            }
            if area.min_lon >= area.max_lon {
                errors.push(ConfigError::new(
                    "service_area.min_lon",
                    "must be < service_area.max_lon",
                ));
            }
        }

        if let Err(e) = tracing_subscriber::EnvFilter::try_new(&self.logging.filter) {
            errors.push(ConfigError::new(
                "logging.filter",
                format!("invalid filter directive: {e}"),
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::HEILBRONN_SERVICE_AREA;

    #[test]
    fn baseline_is_valid() {
        let cfg = ServiceConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
        assert_eq!(cfg.service_area, HEILBRONN_SERVICE_AREA);
        assert_eq!(cfg.defaults.locale, Locale::En);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[server]
bind = "127.0.0.1"
port = 9000
cors_origins = ["https://electrify.example"]

[data]
facilities = "/srv/grid/stations.csv"
upstream = "/srv/grid/substations.csv"
topology = "/srv/grid/topology.csv"

[service_area]
min_lat = 48.9
max_lat = 49.3
min_lon = 9.0
max_lon = 9.4

[logging]
filter = "grid_feasibility=debug,tower_http=info"
format = "json"

[defaults]
locale = "de"
"#;
        let cfg = ServiceConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.expect("parsed");
        assert!(cfg.validate().is_empty());
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.defaults.locale, Locale::De);
        assert_eq!(
            cfg.data.topology.as_deref(),
            Some(Path::new("/srv/grid/topology.csv"))
        );
        assert_eq!(
            cfg.socket_addr().map(|a| a.to_string()),
            Ok("127.0.0.1:9000".to_string())
        );
    }

    #[test]
    fn unknown_field_is_rejected() {
        let toml = r#"
[server]
port = 8000
bogus_field = true
"#;
        assert!(ServiceConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg = ServiceConfig::from_toml_str("[server]\nport = 8080\n").expect("parsed");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.bind, "0.0.0.0");
        assert_eq!(cfg.data.facilities, PathBuf::from("data/facilities.csv"));
        assert!(cfg.data.topology.is_none());
    }

    #[test]
    fn validation_catches_zero_port_and_bad_bind() {
        let mut cfg = ServiceConfig::baseline();
        cfg.server.port = 0;
        cfg.server.bind = "localhost".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "server.port"));
        assert!(errors.iter().any(|e| e.field == "server.bind"));
    }

    #[test]
    fn validation_catches_mixed_wildcard_origins() {
        let mut cfg = ServiceConfig::baseline();
        cfg.server.cors_origins = vec!["*".into(), "https://a.example".into()];
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "server.cors_origins"));
    }

    #[test]
    fn validation_catches_inverted_area() {
        let mut cfg = ServiceConfig::baseline();
        cfg.service_area.min_lat = 49.6;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "service_area.min_lat"));
    }

    #[test]
    fn validation_catches_bad_log_filter() {
        let mut cfg = ServiceConfig::baseline();
        cfg.logging.filter = "grid_feasibility=loud".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "logging.filter"));
    }

    #[test]
    fn unknown_locale_is_rejected() {
        assert!(ServiceConfig::from_toml_str("[defaults]\nlocale = \"fr\"\n").is_err());
    }

    #[test]
    fn error_display_names_field() {
        let e = ConfigError::new("server.port", "must be > 0");
        assert_eq!(e.to_string(), "config error: server.port: must be > 0");
    }
}
