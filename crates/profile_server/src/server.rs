//! Axum server setup.
//!
//! - Localhost-only CORS by default
//! - Request logging middleware
//! - Optional static directory fallback
//! - Graceful shutdown on SIGTERM/Ctrl+C

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;
use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use log::{error, info, warn};
use profile_core::ProfileRepository;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

const LOCAL_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

/// Server error type.
#[derive(Debug)]
pub enum ServerError {
    Io(std::io::Error),
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl Error for ServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ServerError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Builds the full application router.
pub fn build_router<R>(state: AppState<R>, config: &ServerConfig) -> Router
where
    R: ProfileRepository + Send + Sync + 'static,
{
    let cors = if config.cors_permissive {
        warn!("event=cors_config module=server status=ok mode=permissive");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(LOCAL_ORIGINS.map(HeaderValue::from_static))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let mut app = Router::<AppState<R>>::new()
        .merge(routes::health::router::<R>())
        .merge(routes::users::router::<R>());

    if let Some(dir) = &config.static_dir {
        info!(
            "event=static_config module=server status=ok dir={}",
            dir.display()
        );
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(cors)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Runs the HTTP server until a shutdown signal arrives.
pub async fn run_server<R>(state: AppState<R>, config: ServerConfig) -> Result<(), ServerError>
where
    R: ProfileRepository + Send + Sync + 'static,
{
    let app = build_router(state, &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(
        "event=server_listen module=server status=ok addr={}",
        config.bind_addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_shutdown module=server status=ok");
    Ok(())
}

async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    info!(
        "event=http_request module=server method={} path={} status={} duration_ms={}",
        method,
        path,
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("event=signal_install module=server status=error signal=ctrl_c error={err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("event=signal_install module=server status=error signal=sigterm error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("event=shutdown_signal module=server signal=ctrl_c");
        }
        _ = terminate => {
            info!("event=shutdown_signal module=server signal=sigterm");
        }
    }
}
