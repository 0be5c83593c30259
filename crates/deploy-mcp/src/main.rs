//! ConfigMap deployment MCP server
//!
//! # Usage
//!
//! ```bash
//! deploy-mcp [--workspace-root <path>] [--templates-dir <path>] [--config <file>]
//! ```
//!
//! # Environment Variables
//!
//! - `WORKSPACE_ROOT`: Root that project paths resolve against (default: `/workspace`)
//! - `RUST_LOG`: Control log verbosity (default: `deploy_mcp=info`)
//!
//! Requests and responses use stdout; logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use deploy_driver::TokioRunner;
use deploy_mcp::{DeployMcpServer, Dispatcher, ServerConfig, logging};

/// MCP server that deploys static sites as Kubernetes ConfigMaps
#[derive(Parser)]
#[command(name = "deploy-mcp")]
#[command(about = "MCP server that deploys static sites as Kubernetes ConfigMaps")]
#[command(version)]
struct Args {
    /// Root directory every project_path is resolved against
    #[arg(short, long, env = "WORKSPACE_ROOT")]
    workspace_root: Option<PathBuf>,

    /// Directory containing a configmap-static/ template bundle
    #[arg(short, long)]
    templates_dir: Option<PathBuf>,

    /// Config file (.toml, .json or .yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    logging::init()?;

    let args = Args::parse();
    let config = ServerConfig::load(args.config.as_deref())?
        .with_overrides(args.workspace_root, args.templates_dir);

    tracing::info!(
        root = %config.workspace_root.display(),
        templates = ?config.templates_dir,
        "Starting deploy-mcp server"
    );

    let dispatcher = Dispatcher::from_config(&config, Arc::new(TokioRunner));
    DeployMcpServer::new(dispatcher).run().await?;

    Ok(())
}
