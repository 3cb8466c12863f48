//! Transport configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3000).
    pub bind_addr: SocketAddr,
    /// Allow any origin. When false only localhost origins are allowed.
    pub cors_permissive: bool,
    /// Directory served for paths no API route matches.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            cors_permissive: false,
            static_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ServerConfig;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3000);
        assert!(config.bind_addr.ip().is_loopback());
        assert!(!config.cors_permissive);
        assert!(config.static_dir.is_none());
    }
}
