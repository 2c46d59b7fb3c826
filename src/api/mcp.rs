use axum::Json;
use serde_json::{json, Value as J};

use crate::core::mcp::RpcResp;
use crate::infra::http::json as http_json;
use crate::tools::catalog::JsonObject;
use crate::tools::registry::{CallError, ToolRegistry};

fn tools_list(reg: &ToolRegistry) -> J {
    let tools: Vec<J> = reg
        .list()
        .into_iter()
        .map(|t| {
            json!({
                "name": t.name,
                "title": t.title,
                "description": t.description,
                "inputSchema": t.input_schema,
            })
        })
        .collect();
    json!({ "tools": tools })
}

async fn call_tool(reg: &ToolRegistry, params: &J) -> Result<J, CallError> {
    let name = params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| CallError::InvalidParams("missing tool name".into()))?;
    let args: JsonObject = params
        .get("arguments")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();
    let envelope = reg.call(name, &args).await?;
    serde_json::to_value(envelope).map_err(|e| CallError::InvalidParams(e.to_string()))
}

pub async fn http(
    axum::extract::State(reg): axum::extract::State<ToolRegistry>,
    Json(req): Json<crate::core::mcp::RpcReq>,
) -> Json<RpcResp> {
    tracing::debug!(method = %req.method, id = ?req.id, "HTTP handler invoked");
    let id = req.id.clone();
    match req.method.as_str() {
        "initialize" => http_json::ok(
            id,
            json!({
                "serverInfo": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION"),
                },
                "capabilities": { "tools": {} },
            }),
        ),
        "shutdown" => http_json::ok(id, J::Null),
        "tools.list" | "tools/list" => http_json::ok(id, tools_list(&reg)),
        "tools.call" | "tools/call" => match call_tool(&reg, &req.params).await {
            Ok(out) => http_json::ok(id, out),
            Err(CallError::InvalidParams(msg)) => http_json::error(id, -32602, msg),
            Err(e @ CallError::UnknownTool(_)) => http_json::error(id, -32000, e.to_string()),
        },
        _ => http_json::error(id, -32601, format!("unknown method: {}", req.method)),
    }
}
