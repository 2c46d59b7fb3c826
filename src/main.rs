use std::net::SocketAddr;

use clap::Parser;

use doctoc_mcp_gateway::cli::{run_commands, Commands};
use doctoc_mcp_gateway::infra;
use doctoc_mcp_gateway::infra::config::Config;
use doctoc_mcp_gateway::tools::registry::ToolRegistry;

#[derive(Parser)]
#[command(name = "doctoc-mcp-gateway")]
#[command(about = "MCP gateway for the Doctoc platform and Unipile/Telegram")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    infra::logging::init();

    let args = Cli::parse();
    if let Some(command) = args.command {
        return run_commands(command).await;
    }

    let cfg = Config::load();
    tracing::info!(mode = %cfg.mode, port = cfg.port, "BOOT doctoc-mcp-gateway");

    let registry = ToolRegistry::new(&cfg);
    tracing::info!(tools = registry.defs().len(), "tool registry built");

    // Stdio mode: run MCP over stdio ONLY (no HTTP).
    if cfg.mode == "stdio" {
        return infra::mcp::serve_stdio(&registry).await;
    }

    let app = infra::http_app::build_app(registry);
    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
