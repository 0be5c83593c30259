//! MCP tool definitions and results
//!
//! # Tools
//!
//! - `scaffold_configmap_app` - collect a project's static files and render
//!   its deployment bundle
//! - `deploy_app` - apply the bundle with `skaffold dev|run`
//! - `get_deployment_status` - list pods, services and ingresses
//! - `get_deployment_logs` - last 100 log lines, optionally followed
//! - `cleanup_deployment` - `skaffold delete` the bundle

use serde::{Deserialize, Serialize};
use serde_json::json;

pub const SCAFFOLD_CONFIGMAP_APP: &str = "scaffold_configmap_app";
pub const DEPLOY_APP: &str = "deploy_app";
pub const GET_DEPLOYMENT_STATUS: &str = "get_deployment_status";
pub const GET_DEPLOYMENT_LOGS: &str = "get_deployment_logs";
pub const CLEANUP_DEPLOYMENT: &str = "cleanup_deployment";

/// Tool definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Result from a tool invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Content types for tool results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    /// Create a successful text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: content.into(),
            }],
            is_error: None,
        }
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: Some(true),
        }
    }

    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Text of the first content block.
    pub fn first_text(&self) -> &str {
        match self.content.first() {
            Some(ToolContent::Text { text }) => text,
            None => "",
        }
    }
}

/// Get all available tool definitions
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: SCAFFOLD_CONFIGMAP_APP.to_string(),
            description: "Create .roobrowser/skaffold/ with a ConfigMap deployment for a project's static content".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "project_path": {
                        "type": "string",
                        "description": "Path to project with static content (relative to workspace root)"
                    },
                    "app_name": {
                        "type": "string",
                        "description": "Application name for deployment (lowercase, alphanumeric with hyphens)"
                    },
                    "ingress_path": {
                        "type": "string",
                        "description": "URL path for ingress (e.g., /my-app)"
                    }
                },
                "required": ["project_path", "app_name", "ingress_path"]
            }),
        },
        ToolDefinition {
            name: DEPLOY_APP.to_string(),
            description: "Deploy app using skaffold from .roobrowser/skaffold/ directory".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "project_path": {
                        "type": "string",
                        "description": "Path to project containing .roobrowser/skaffold/"
                    },
                    "mode": {
                        "type": "string",
                        "enum": ["dev", "run"],
                        "default": "dev",
                        "description": "Deployment mode: dev (with live reload) or run (one-time deployment)"
                    }
                },
                "required": ["project_path"]
            }),
        },
        ToolDefinition {
            name: GET_DEPLOYMENT_STATUS.to_string(),
            description: "Check status of deployed applications".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "app_name": {
                        "type": "string",
                        "description": "Specific app name to check (optional, shows all managed apps if empty)"
                    }
                }
            }),
        },
        ToolDefinition {
            name: GET_DEPLOYMENT_LOGS.to_string(),
            description: "Get logs from deployed application".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "app_name": {
                        "type": "string",
                        "description": "Application name to get logs from"
                    },
                    "follow": {
                        "type": "boolean",
                        "default": false,
                        "description": "Whether to stream logs (true) or get snapshot (false). A stream is returned in one piece once kubectl exits; cancelling it returns nothing."
                    }
                },
                "required": ["app_name"]
            }),
        },
        ToolDefinition {
            name: CLEANUP_DEPLOYMENT.to_string(),
            description: "Clean up deployed resources using skaffold delete".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "project_path": {
                        "type": "string",
                        "description": "Path to project containing .roobrowser/skaffold/"
                    }
                },
                "required": ["project_path"]
            }),
        },
    ]
}
