use serde::Deserialize;
use std::net::SocketAddr;

/// Fallback listening port when the environment provides none.
pub const DEFAULT_PORT: &str = "3000";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub port: String,
    pub static_root: String,
    pub access_log: bool,
}

impl Config {
    /// Build configuration from the process environment.
    ///
    /// `PORT` wins when set to a non-empty value and is kept as the raw
    /// string, numeric or not; it is only resolved when the bind address
    /// is built. Everything else falls back to defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Environment::default())
            .set_default("port", DEFAULT_PORT)?
            .set_default("static_root", "public")?
            .set_default("access_log", true)?
            .build()?;

        settings.try_deserialize()
    }

    /// The port the server will bind: the configured value, or the
    /// default when the environment supplied an empty string.
    pub fn effective_port(&self) -> &str {
        if self.port.is_empty() {
            DEFAULT_PORT
        } else {
            &self.port
        }
    }

    /// Resolve the bind address, on all interfaces.
    ///
    /// A non-numeric port value fails here, at the bind step, and is
    /// fatal to startup.
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        let port = self.effective_port();
        format!("0.0.0.0:{port}")
            .parse()
            .map_err(|e| format!("Invalid listen port '{port}': {e}"))
    }
}
