//! Router assembly and server lifecycle.

use std::path::Path;

use anyhow::{Context, Result};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::auth::require_api_key;
use super::handlers::{health_check, process_query, status};
use crate::services::AppContext;

/// Build the router for the given context.
pub fn build_router(ctx: AppContext) -> Router {
    let config = ctx.config.clone();

    let mut query_routes = Router::new()
        .route("/process_query", post(process_query))
        .route("/api/query", post(process_query));
    if config.auth.enabled {
        query_routes =
            query_routes.route_layer(middleware::from_fn_with_state(ctx.clone(), require_api_key));
    }

    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/status", get(status))
        .merge(query_routes);

    let static_dir = config
        .server
        .static_dir
        .as_deref()
        .map(Path::new)
        .filter(|dir| dir.is_dir());

    app = match static_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Serving frontend");
            app.fallback_service(ServeDir::new(dir))
        }
        None => app.route("/", get(status)),
    };

    let app = app.with_state(ctx).layer(TraceLayer::new_for_http());

    if config.server.enable_cors {
        app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
    } else {
        app
    }
}

/// Bind and serve until `shutdown` resolves.
pub async fn serve<F>(ctx: AppContext, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = bind_listener(&ctx.config.server.host, ctx.config.server.port).await?;
    let router = build_router(ctx);

    let addr = listener.local_addr().context("Listener has no local address")?;
    info!("ragchat listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

/// Bind `host:port`; `host` may be a name (`localhost`) or a bare IPv6 address (`::`).
pub async fn bind_listener(host: &str, port: u16) -> Result<TcpListener> {
    TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
