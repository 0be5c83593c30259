//! MCP server for ConfigMap static-site deployments
//!
//! Exposes five tools over the Model Context Protocol so an agent can turn
//! a directory of static files into a running Kubernetes deployment:
//!
//! ```text
//! [ MCP Client ]
//!        | (JSON-RPC over stdio)
//!        v
//! [ deploy-mcp (server + dispatcher) ]
//!        |
//!        +--> [ deploy-content ]  collect, encode, render the bundle
//!        +--> [ deploy-driver ]   skaffold apply/delete, kubectl queries
//!        +--> [ deploy-fs ]       paths, layout, atomic writes
//! ```
//!
//! # Tools
//!
//! - `scaffold_configmap_app` writes `<project>/.roobrowser/skaffold/`
//! - `deploy_app` runs `skaffold dev|run` there
//! - `get_deployment_status` lists pods, services and ingresses
//! - `get_deployment_logs` reads pod logs, optionally following them
//! - `cleanup_deployment` runs `skaffold delete`

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod server;
pub mod tools;

pub use config::{ServerConfig, TemplateSource};
pub use dispatcher::{Dispatcher, ERROR_PREFIX};
pub use error::{Error, Result};
pub use server::DeployMcpServer;
pub use tools::{ToolContent, ToolDefinition, ToolResult, get_tool_definitions};
