//! MCP server handler and stdio serving.
//!
//! The handler owns nothing but the router built from the tool registry; every
//! invocation is independent and the host may overlap them freely.

use rmcp::{
    handler::server::tool::ToolRouter, model::*, service::RequestContext, tool_handler,
    ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
};

use crate::tools::mcp_router::build_tool_router;
use crate::tools::registry::ToolRegistry;

#[derive(Clone)]
pub struct GatewaySvc {
    tool_router: ToolRouter<Self>,
}

impl GatewaySvc {
    pub fn new(registry: &ToolRegistry) -> Self {
        Self {
            tool_router: build_tool_router(registry),
        }
    }
}

#[tool_handler]
impl ServerHandler for GatewaySvc {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Asistente IA para la plataforma medica Doctoc: citas, pacientes, \
                 precios, pagos y mensajeria por Telegram (Unipile)."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Run MCP over stdio until the client disconnects.
pub async fn serve_stdio(registry: &ToolRegistry) -> anyhow::Result<()> {
    let svc = GatewaySvc::new(registry);
    let service = svc
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    service.waiting().await.map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}
