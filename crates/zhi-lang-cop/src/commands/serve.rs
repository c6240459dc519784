//! Serve command: run the MCP server on stdio.

use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use rmcp::ServiceExt;
use tracing::{info, instrument};

use zhi_lang_cop_core::{Config, Level};

use super::check::DEFAULT_MIN_LEVEL;
use super::load_dictionary;
use crate::server::ProjectServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Default minimum level for `lint_text` when a call omits it
    #[arg(short, long, value_enum)]
    pub level: Option<Level>,
}

/// Load the dictionary once and serve MCP over stdin/stdout until the client
/// disconnects.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(args: ServeArgs, config: Config) -> anyhow::Result<()> {
    let dict = Arc::new(load_dictionary(&config)?);
    let default_level = args.level.or(config.min_level).unwrap_or(DEFAULT_MIN_LEVEL);

    info!(
        dictionary_version = dict.version(),
        default_level = %default_level,
        max_input = ?config.input_limit(),
        "starting MCP server on stdio"
    );

    let server = ProjectServer::new(dict, config.input_limit(), default_level);
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP server")?;
    let reason = service.waiting().await.context("MCP server task failed")?;

    info!(?reason, "MCP server stopped");
    Ok(())
}
