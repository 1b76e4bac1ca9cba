//! Warden demo server.
//!
//! Serves a small order API whose routes are gated on the `x-role` header.

use anyhow::{anyhow, Context, Result};
use axum::{
    body::Body,
    extract::Path,
    http::{Request, StatusCode},
    Json,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use warden_common_log::{spans::request_span, LogConfig, LogFormat, LogLevel};
use warden_gate::{
    config::{load_config, validate_config},
    HeaderRoleExtractor, HttpRouter, WardenConfig,
};

#[derive(Serialize)]
struct Order {
    id: String,
    status: &'static str,
}

async fn health() -> &'static str {
    "ok"
}

async fn list_orders() -> Json<Vec<Order>> {
    Json(vec![Order {
        id: "1001".to_string(),
        status: "shipped",
    }])
}

async fn show_order(Path(id): Path<String>) -> Json<Order> {
    Json(Order { id, status: "pending" })
}

async fn create_order() -> StatusCode {
    StatusCode::CREATED
}

async fn cancel_order(Path(id): Path<String>) -> String {
    format!("order {id} cancelled")
}

fn routes(config: &WardenConfig) -> Result<axum::Router> {
    let router = HttpRouter::<String>::new(HeaderRoleExtractor::default()).with_config(&config.gate);

    let root = router.new_route([config.routes.root.as_str()])?;
    root.handle("GET", "health", health)?;

    let orders = root.next(["orders"])?;
    orders.allow_for("GET", "", list_orders, &["ADMIN", "CUSTOMER"])?;
    orders.allow_for("POST", "", create_order, &["CUSTOMER"])?;
    orders.allow_for("GET", ":id", show_order, &["ADMIN", "CUSTOMER"])?;
    orders.deny_for("DELETE", ":id", cancel_order, &["GUEST"])?;

    for pattern in router.patterns() {
        info!(pattern = %pattern, "Route ready");
    }

    Ok(router.build())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = load_config()?;
    if let Err(errors) = validate_config(&config) {
        let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(anyhow!("Invalid configuration: {}", details.join("; ")));
    }

    let level = LogLevel::parse(&config.logging.level).unwrap_or_default();
    let format = LogFormat::parse(&config.logging.format).unwrap_or_default();
    warden_common_log::init(LogConfig::from_env().with_level_and_format(level, format))
        .context("Failed to initialize logging")?;

    info!("Starting Warden demo v{}", env!("CARGO_PKG_VERSION"));

    let app = routes(&config)?.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &Request<Body>| request_span(req.method().as_str(), req.uri().path())),
    );

    let addr = config.server.socket_addr().context("Invalid bind address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
