//! Process entry point for the profile record service.
//!
//! # Responsibility
//! - Read configuration from flags and environment.
//! - Initialize logging, open the store once, and serve until shutdown.

use clap::Parser;
use log::{error, info};
use profile_core::{
    core_version, default_log_level, init_logging, ProfileStore, SqliteProfileRepository,
};
use profile_server::{run_server, AppState, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

/// CRUD service for user profiles backed by SQLite.
#[derive(Debug, Parser)]
#[command(name = "profile-server", version)]
struct Cli {
    /// SQLite database file; created when missing.
    #[arg(long, env = "PROFILE_DB_PATH", default_value = "profiles.sqlite3")]
    db_path: PathBuf,

    /// Address to listen on.
    #[arg(long, env = "PROFILE_BIND", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Directory served for non-API paths.
    #[arg(long, env = "PROFILE_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Allow cross-origin requests from any origin.
    #[arg(long, env = "PROFILE_CORS_PERMISSIVE")]
    cors_permissive: bool,

    /// trace|debug|info|warn|error (defaults by build mode).
    #[arg(long, env = "PROFILE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; stderr when unset.
    #[arg(long, env = "PROFILE_LOG_DIR")]
    log_dir: Option<String>,
}

impl Cli {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            cors_permissive: self.cors_permissive,
            static_dir: self.static_dir.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(err) = init_logging(level, cli.log_dir.as_deref()) {
        eprintln!("profile-server: logging init failed: {err}");
        return ExitCode::FAILURE;
    }
    info!(
        "event=service_start module=cli status=ok version={} db_path={}",
        core_version(),
        cli.db_path.display()
    );

    let store = match ProfileStore::open(&cli.db_path) {
        Ok(store) => store,
        Err(err) => {
            error!("event=service_start module=cli status=error error_code=store_open_failed error={err}");
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(SqliteProfileRepository::new(store));
    match run_server(state, cli.server_config()).await {
        Ok(()) => {
            info!("event=service_stop module=cli status=ok");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=service_stop module=cli status=error error={err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;

    #[test]
    fn defaults_match_server_config_defaults() {
        let cli = Cli::try_parse_from(["profile-server"]).unwrap();
        assert_eq!(cli.server_config(), profile_server::ServerConfig::default());
        assert_eq!(cli.db_path.to_str(), Some("profiles.sqlite3"));
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "profile-server",
            "--bind",
            "0.0.0.0:8080",
            "--cors-permissive",
            "--static-dir",
            "public",
        ])
        .unwrap();
        let config = cli.server_config();
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.cors_permissive);
        assert_eq!(config.static_dir.as_deref(), Some(std::path::Path::new("public")));
    }
}
