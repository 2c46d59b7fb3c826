use std::collections::HashMap;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use thiserror::Error;

use crate::clients::doctoc::DoctocClient;
use crate::clients::unipile::UnipileClient;
use crate::core::envelope::{err, ok, Envelope};
use crate::infra::config::Config;

use super::catalog::{catalog, Dispatch, JsonObject, ToolDef};

#[derive(Debug, Error)]
pub enum CallError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("{0}")]
    InvalidParams(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolMeta {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// Fixed tool set plus the two upstream adapters. Cheap to clone; invocations
/// share nothing mutable.
#[derive(Clone)]
pub struct ToolRegistry {
    defs: Arc<Vec<ToolDef>>,
    index: Arc<HashMap<&'static str, usize>>,
    doctoc: Arc<DoctocClient>,
    unipile: Arc<UnipileClient>,
}

impl ToolRegistry {
    pub fn new(cfg: &Config) -> Self {
        Self::with_clients(DoctocClient::new(&cfg.doctoc), UnipileClient::new(&cfg.unipile))
    }

    pub fn with_clients(doctoc: DoctocClient, unipile: UnipileClient) -> Self {
        let defs = catalog();
        let index = defs
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name, i))
            .collect::<HashMap<_, _>>();
        Self {
            defs: Arc::new(defs),
            index: Arc::new(index),
            doctoc: Arc::new(doctoc),
            unipile: Arc::new(unipile),
        }
    }

    pub fn defs(&self) -> &[ToolDef] {
        &self.defs
    }

    pub fn list(&self) -> Vec<ToolMeta> {
        self.defs
            .iter()
            .map(|d| ToolMeta {
                name: d.name,
                title: d.title,
                description: d.description,
                input_schema: d.input_schema(),
            })
            .collect()
    }

    pub async fn call(&self, name: &str, args: &JsonObject) -> Result<Envelope, CallError> {
        let def = self
            .index
            .get(name)
            .and_then(|i| self.defs.get(*i))
            .ok_or_else(|| CallError::UnknownTool(name.to_string()))?;
        self.invoke(def, args).await.map_err(CallError::InvalidParams)
    }

    /// Run one tool. `Err` is a pre-dispatch argument problem; every upstream
    /// outcome, success or failure, comes back as an `Ok` envelope.
    pub(crate) async fn invoke(&self, def: &ToolDef, args: &JsonObject) -> Result<Envelope, String> {
        tracing::debug!(tool = def.name, "tool invoked");
        match &def.dispatch {
            Dispatch::Ping => Ok(ok(&json!({
                "status": "ok",
                "server": env!("CARGO_PKG_NAME"),
                "tools": self.defs.len(),
                "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            }))),

            Dispatch::Doctoc { endpoint, constants } => {
                let body = doctoc_body(def, constants, args)?;
                Ok(match self.doctoc.call(endpoint, body).await {
                    Ok(data) => ok(&data),
                    Err(e) => err(e.to_string()),
                })
            }

            Dispatch::PricesWithFallback { constants } => {
                let body = doctoc_body(def, constants, args)?;
                Ok(match self.doctoc.call("getPricesAPI", body).await {
                    Ok(data) => ok(&data),
                    Err(primary) => {
                        let mut fallback_body = JsonObject::new();
                        fallback_body.insert("sections".into(), json!(["tipos"]));
                        match self.doctoc.call("getUserInfoAPI", fallback_body).await {
                            Ok(data) => ok(&json!({
                                "source": "appointment_types_fallback",
                                "data": data,
                            })),
                            Err(secondary) => {
                                // The primary error is the one callers see.
                                tracing::debug!(error = %secondary, "price fallback failed");
                                err(primary.to_string())
                            }
                        }
                    }
                })
            }

            Dispatch::ListChats => {
                let mut query: Vec<(String, String)> = vec![
                    ("account_type".into(), "TELEGRAM".into()),
                    (
                        "limit".into(),
                        arg_string(args, "limit").unwrap_or_else(|| "10".into()),
                    ),
                ];
                if let Some(cursor) = arg_str(args, "cursor") {
                    query.push(("cursor".into(), cursor.to_owned()));
                }
                Ok(match self.unipile.get("/chats", &query).await {
                    Ok(data) => ok(&data),
                    Err(e) => err(e.to_string()),
                })
            }

            Dispatch::ReadMessages => {
                let chat_id = require_str(args, "chat_id")?;
                let query = vec![(
                    "limit".to_string(),
                    arg_string(args, "limit").unwrap_or_else(|| "20".into()),
                )];
                let path = format!("/chats/{chat_id}/messages");
                Ok(match self.unipile.get(&path, &query).await {
                    Ok(data) => ok(&data),
                    Err(e) => err(e.to_string()),
                })
            }

            Dispatch::SendMessage => {
                let chat_id = require_str(args, "chat_id")?;
                let text = require_str(args, "text")?;
                Ok(match self.unipile.send_message(chat_id, text).await {
                    Ok(data) => ok(&data),
                    Err(e) => err(e.to_string()),
                })
            }
        }
    }
}

/// Constants first, then every declared parameter that was supplied (or has a
/// default). The adapter stamps `orgID` afterwards.
fn doctoc_body(
    def: &ToolDef,
    constants: &JsonObject,
    args: &JsonObject,
) -> Result<JsonObject, String> {
    let mut body = constants.clone();
    for p in &def.params {
        match args.get(p.name) {
            Some(v) if !v.is_null() => {
                body.insert(p.name.to_string(), v.clone());
            }
            _ => {
                if p.required {
                    return Err(format!("missing required field: {}", p.name));
                }
                if let Some(d) = &p.default {
                    body.insert(p.name.to_string(), d.clone());
                }
            }
        }
    }
    Ok(body)
}

fn arg_str<'a>(args: &'a JsonObject, name: &str) -> Option<&'a str> {
    args.get(name).and_then(|v| v.as_str())
}

/// Render a string or number argument the way it belongs in a query string
/// (`10` becomes `"10"`).
fn arg_string(args: &JsonObject, name: &str) -> Option<String> {
    match args.get(name) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn require_str<'a>(args: &'a JsonObject, name: &str) -> Result<&'a str, String> {
    arg_str(args, name).ok_or_else(|| format!("missing required field: {name}"))
}
