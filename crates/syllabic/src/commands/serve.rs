//! Serve command: MCP server on stdio.

use anyhow::Context;
use clap::Args;
use rmcp::ServiceExt;
use syllabic_core::config::Config;
use tracing::{info, instrument};

use crate::server::SyllabicServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    // stdio is the only transport
}

/// Run the MCP server until the client disconnects.
///
/// Configured thresholds become the defaults for `check_readability` calls
/// that leave them unset.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    max_input_bytes: Option<usize>,
    config: Config,
) -> anyhow::Result<()> {
    let server = SyllabicServer::new(config.thresholds(), max_input_bytes);
    info!(?max_input_bytes, "starting MCP server on stdio");

    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .inspect_err(|error| tracing::error!(?error, "MCP serving error"))
        .context("failed to start MCP server")?;
    service
        .waiting()
        .await
        .context("MCP server terminated abnormally")?;

    info!("MCP server stopped");
    Ok(())
}
