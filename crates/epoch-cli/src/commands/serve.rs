use anyhow::Context;
use epoch_server::{AppState, serve, shutdown_signal};
use serde::Serialize;
use tokio::net::TcpListener;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ServeArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Listening {
    address: String,
    database: String,
}

/// Handle `epoch serve`: bind, announce, run until SIGTERM or Ctrl-C.
pub async fn handle(args: &ServeArgs, ctx: AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut server = ctx.config.server.clone();
    if let Some(host) = &args.host {
        server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        server.port = port;
    }

    let addr = server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local = listener.local_addr().context("failed to read bound address")?;

    if !flags.quiet {
        output(
            &Listening {
                address: local.to_string(),
                database: ctx.config.database.path.clone(),
            },
            flags.format,
        )?;
    }

    let state = AppState::new(ctx.service, &ctx.config);
    serve(listener, state, shutdown_signal())
        .await
        .context("server terminated with an error")?;
    tracing::info!("server stopped");
    Ok(())
}
