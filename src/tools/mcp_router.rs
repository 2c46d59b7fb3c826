//! Bridges the registry onto rmcp: one dynamic `ToolRoute` per catalog row, so the
//! MCP surface and the catalog can never drift apart.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::{CallToolResult, Tool},
    ErrorData as McpError,
};
use serde_json::Value;

use super::catalog::ToolDef;
use super::registry::ToolRegistry;

fn tool_model(def: &ToolDef) -> Tool {
    let schema = match def.input_schema() {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    Tool {
        name: def.name.into(),
        description: Some(def.description.into()),
        input_schema: Arc::new(schema),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Build the tool router for any rmcp server handler.
pub fn build_tool_router<S>(registry: &ToolRegistry) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    let mut router = ToolRouter::new();
    for (i, def) in registry.defs().iter().enumerate() {
        let reg = registry.clone();
        router = router.with_route(ToolRoute::new_dyn(
            tool_model(def),
            move |ctx: ToolCallContext<'_, S>| {
                let args = ctx.arguments.clone().unwrap_or_default();
                let reg = reg.clone();
                async move {
                    let def = &reg.defs()[i];
                    reg.invoke(def, &args)
                        .await
                        .map(CallToolResult::from)
                        .map_err(|msg| McpError::invalid_params(msg, None))
                }
                .boxed()
            },
        ));
    }
    router
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::doctoc::DoctocClient;
    use crate::clients::unipile::UnipileClient;
    use crate::infra::config::{DoctocConfig, UnipileConfig};

    struct TestServer;

    fn test_registry() -> ToolRegistry {
        ToolRegistry::with_clients(
            DoctocClient::new(&DoctocConfig {
                base_url: "http://127.0.0.1:9".into(),
                api_token: String::new(),
                org_id: String::new(),
            }),
            UnipileClient::new(&UnipileConfig {
                dsn: "http://127.0.0.1:9".into(),
                api_key: String::new(),
            }),
        )
    }

    #[test]
    fn router_lists_every_catalog_tool() {
        let registry = test_registry();
        let router: ToolRouter<TestServer> = build_tool_router(&registry);
        let tools = router.list_all();
        assert_eq!(tools.len(), 30);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"ping"));
        assert!(names.contains(&"get_prices"));
        assert!(names.contains(&"send_telegram_message"));
    }

    #[test]
    fn router_publishes_input_schemas() {
        let registry = test_registry();
        let router: ToolRouter<TestServer> = build_tool_router(&registry);
        let tools = router.list_all();
        let send = tools.iter().find(|t| t.name == "send_telegram_message").unwrap();
        let schema = serde_json::to_value(send.input_schema.as_ref()).unwrap();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["text"]["type"], "string");
    }
}
