// Configuration module entry point
// Loads layered configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig};

/// Default config file, looked up without extension
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Precedence, lowest first: built-in defaults, the config file,
    /// `SERVER__*` environment variables, then `PORT`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let port = std::env::var("PORT").ok();
        Self::build(config_path, port.as_deref())
    }

    fn build(config_path: &str, port: Option<&str>) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", port)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSING: &str = "does-not-exist/config";

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::build(MISSING, None).unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.upload.dir, "uploads");
        assert_eq!(cfg.upload.field_name, "audio");
        assert!(cfg.http.enable_cors);
        assert!(cfg.server.workers.is_none());
        assert!(cfg.performance.max_connections.is_none());
    }

    #[test]
    fn test_port_override() {
        let cfg = Config::build(MISSING, Some("4100")).unwrap();
        assert_eq!(cfg.server.port, 4100);
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Config::build(MISSING, Some("not-a-port")).is_err());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.toml");
        std::fs::write(
            &path,
            "[server]\nport = 8123\n\n[upload]\ndir = \"/tmp/staging\"\n",
        )
        .unwrap();

        let stem = dir.path().join("app");
        let cfg = Config::build(stem.to_str().unwrap(), None).unwrap();
        assert_eq!(cfg.server.port, 8123);
        assert_eq!(cfg.upload.dir, "/tmp/staging");
        // Untouched sections keep their defaults
        assert_eq!(cfg.logging.access_log_format, "combined");
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::default();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 3000;
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:3000".parse::<SocketAddr>().unwrap()
        );

        cfg.server.host = "not an ip".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
