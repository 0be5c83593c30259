//! MCP Server implementation
//!
//! Reads newline-delimited JSON-RPC from stdin and writes responses to
//! stdout. Each `tools/call` runs on its own task so a long call (a followed
//! log stream, a 60 s apply) never blocks the next request, and a single
//! writer task keeps response lines from interleaving.
//!
//! Requests without an `id` are notifications and never get a response.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinSet};

use crate::dispatcher::Dispatcher;
use crate::protocol::{
    CancelledParams, InitializeResult, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION,
    ServerCapabilities, ServerInfo, ToolCallParams, ToolsCapability, codes,
};
use crate::tools::{GET_DEPLOYMENT_LOGS, get_tool_definitions};
use crate::{Error, Result};

/// MCP server for the deployment tools.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use deploy_driver::TokioRunner;
/// use deploy_mcp::{DeployMcpServer, Dispatcher, ServerConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ServerConfig::default();
///     let dispatcher = Dispatcher::from_config(&config, Arc::new(TokioRunner));
///     DeployMcpServer::new(dispatcher).run().await?;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct DeployMcpServer {
    dispatcher: Arc<Dispatcher>,
    /// Running `tools/call` tasks keyed by serialized request id
    in_flight: Arc<Mutex<HashMap<String, InFlightCall>>>,
}

struct InFlightCall {
    abort: AbortHandle,
    /// A followed log stream, which only ends when kubectl does
    unbounded: bool,
}

impl DeployMcpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Serve over the process's stdin and stdout.
    pub async fn run(&self) -> Result<()> {
        tracing::info!(root = %self.dispatcher.workspace_root().display(), "MCP server ready, listening on stdio");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve until `reader` reaches end of input.
    ///
    /// Calls still running at that point are answered before this returns,
    /// except followed log streams, which are aborted.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        let writer_task = tokio::spawn(write_lines(writer, rx));
        let mut calls = JoinSet::new();

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            tracing::debug!(request = %line, "Received message");
            while calls.try_join_next().is_some() {}

            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(request) => request,
                Err(e) => {
                    let response = JsonRpcResponse::error(
                        None,
                        codes::PARSE_ERROR,
                        format!("Parse error: {}", e),
                    );
                    send(&tx, &response);
                    continue;
                }
            };

            match (request.method.as_str(), &request.id) {
                ("tools/call", Some(id)) => {
                    self.spawn_call(&mut calls, id.clone(), request, tx.clone())
                }
                ("notifications/cancelled", None) => self.cancel(request.params),
                _ => match self.handle_request(request).await {
                    Ok(Some(response)) => send(&tx, &response),
                    Ok(None) => {}
                    Err(e) => {
                        let response = JsonRpcResponse::error(
                            None,
                            codes::INTERNAL_ERROR,
                            format!("Internal error: {}", e),
                        );
                        send(&tx, &response);
                    }
                },
            }
        }

        tracing::info!(pending = calls.len(), "Input closed, finishing running calls");
        for call in self.lock_in_flight().values().filter(|call| call.unbounded) {
            call.abort.abort();
        }
        while calls.join_next().await.is_some() {}
        self.lock_in_flight().clear();

        drop(tx);
        writer_task
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))??;
        Ok(())
    }

    /// Handle one raw message and return the serialized response.
    ///
    /// Notifications yield an empty string. Malformed JSON is an `Err`.
    pub async fn handle_message(&self, message: &str) -> Result<String> {
        let request: JsonRpcRequest = serde_json::from_str(message)?;
        match self.handle_request(request).await? {
            Some(response) => Ok(serde_json::to_string(&response)?),
            None => Ok(String::new()),
        }
    }

    /// Handle one parsed request. `tools/call` runs inline here.
    ///
    /// A request without an `id` is a notification: nothing runs and no
    /// response is produced.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Result<Option<JsonRpcResponse>> {
        let Some(id) = request.id else {
            tracing::debug!(method = %request.method, "Notification received");
            return Ok(None);
        };
        let id = Some(id);
        if request.jsonrpc != "2.0" {
            return Ok(Some(JsonRpcResponse::error(
                id,
                codes::INVALID_REQUEST,
                format!("Invalid request: unsupported jsonrpc version '{}'", request.jsonrpc),
            )));
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id)?,
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params).await?,
            method if method.starts_with("notifications/") || method == "initialized" => {
                return Ok(None);
            }
            _ => JsonRpcResponse::error(
                id,
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };
        Ok(Some(response))
    }

    fn handle_initialize(&self, id: Option<Value>) -> Result<JsonRpcResponse> {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: "deploy-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };
        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "tools": get_tool_definitions() }))
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return Ok(JsonRpcResponse::error(
                    id,
                    codes::INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                ));
            }
        };

        let result = self.dispatcher.invoke(&params.name, params.arguments).await;
        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    fn spawn_call(
        &self,
        calls: &mut JoinSet<()>,
        id: Value,
        request: JsonRpcRequest,
        tx: mpsc::UnboundedSender<String>,
    ) {
        let key = id.to_string();
        let unbounded = is_followed_logs(&request.params);
        let server = self.clone();
        let task_key = key.clone();

        // Registered under the lock so a fast task cannot finish before it is tracked
        let mut in_flight = self.lock_in_flight();
        let abort = calls.spawn(async move {
            let response = match server.handle_request(request).await {
                Ok(Some(response)) => response,
                Ok(None) => {
                    server.lock_in_flight().remove(&task_key);
                    return;
                }
                Err(e) => JsonRpcResponse::error(
                    Some(id),
                    codes::INTERNAL_ERROR,
                    format!("Internal error: {}", e),
                ),
            };
            server.lock_in_flight().remove(&task_key);
            send(&tx, &response);
        });
        in_flight.insert(key, InFlightCall { abort, unbounded });
    }

    fn cancel(&self, params: Value) {
        let params: CancelledParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring malformed cancellation");
                return;
            }
        };
        let key = params.request_id.to_string();
        if let Some(call) = self.lock_in_flight().remove(&key) {
            tracing::info!(request_id = %key, reason = ?params.reason, "Cancelling tool call");
            call.abort.abort();
        }
    }

    fn lock_in_flight(&self) -> std::sync::MutexGuard<'_, HashMap<String, InFlightCall>> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of `tools/call` requests still running.
    pub fn in_flight(&self) -> usize {
        self.lock_in_flight().len()
    }
}

/// `get_deployment_logs` with `follow: true`.
fn is_followed_logs(params: &Value) -> bool {
    params["name"] == GET_DEPLOYMENT_LOGS && params["arguments"]["follow"] == true
}

fn send(tx: &mpsc::UnboundedSender<String>, response: &JsonRpcResponse) {
    match serde_json::to_string(response) {
        Ok(line) => {
            // The writer only goes away once input has closed
            let _ = tx.send(line);
        }
        Err(e) => tracing::error!(error = %e, "Failed to serialize response"),
    }
}

async fn write_lines<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<String>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = rx.recv().await {
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}
