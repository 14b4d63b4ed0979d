use anyhow::Result;
use tracing::info;

use crate::adapters::http::{serve, shutdown_signal};
use crate::cli::types::ServeArgs;
use crate::domain::models::Config;
use crate::services::AppContext;

/// Handle the serve command
pub async fn execute(mut config: Config, args: ServeArgs) -> Result<()> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }

    let ctx = AppContext::from_config(config).await?;
    info!(
        rag_active = ctx.is_rag_active(),
        model = %ctx.query.model(),
        auth = ctx.config.auth.enabled,
        "Starting query service"
    );

    serve(ctx, shutdown_signal()).await
}
