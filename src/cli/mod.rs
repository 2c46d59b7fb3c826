use std::time::Duration;

use clap::Subcommand;
use serde_json::json;

use crate::clients::doctoc::DoctocClient;
use crate::infra::config::Config;

#[derive(Subcommand)]
pub enum Commands {
    /// Health check the service
    Health {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Validate configuration
    Config {
        /// Validate config without starting the service
        #[arg(long)]
        validate: bool,
    },
    /// Show service status and configuration summary
    Status {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Test Doctoc connectivity (fetches basic organization info)
    TestDoctoc {
        /// Doctoc base URL override
        #[arg(short, long)]
        url: Option<String>,
    },
}

pub async fn run_commands(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Health { url } => {
            health_check(&url).await?;
            println!("✅ Service is healthy");
            Ok(())
        }
        Commands::Config { validate: _ } => {
            validate_config()?;
            println!("✅ Configuration is valid");
            Ok(())
        }
        Commands::Status { url } => show_status(&url).await,
        Commands::TestDoctoc { url } => {
            test_doctoc(url).await?;
            println!("✅ Doctoc connectivity test passed");
            Ok(())
        }
    }
}

async fn health_check(url: &str) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{url}/healthz"))
        .timeout(Duration::from_secs(2))
        .send()
        .await?;
    anyhow::ensure!(response.status().is_success(), "HTTP {}", response.status());
    Ok(())
}

fn validate_config() -> anyhow::Result<()> {
    let cfg = Config::load();

    if !matches!(cfg.mode.as_str(), "server" | "stdio") {
        anyhow::bail!("Invalid MODE: {}. Must be 'server' or 'stdio'", cfg.mode);
    }
    if cfg.mode == "server" && cfg.port == 0 {
        anyhow::bail!("PORT cannot be 0");
    }
    if cfg.doctoc.api_token.is_empty() {
        eprintln!("⚠️  DOCTOC_API_TOKEN is empty; Doctoc calls will be rejected upstream");
    }
    if cfg.unipile.dsn.is_empty() {
        eprintln!("⚠️  UNIPILE_DSN is empty; Telegram tools will fail");
    }
    Ok(())
}

async fn show_status(url: &str) -> anyhow::Result<()> {
    let client = reqwest::Client::new();

    let health = client
        .get(format!("{url}/healthz"))
        .timeout(Duration::from_secs(5))
        .send()
        .await?;
    println!(
        "🏥 Health Status: {}",
        if health.status().is_success() {
            "✅ Healthy"
        } else {
            "❌ Unhealthy"
        }
    );

    let tools = client
        .post(format!("{url}/mcp"))
        .header("content-type", "application/json")
        .json(&json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/list",
            "params": {}
        }))
        .timeout(Duration::from_secs(2))
        .send()
        .await;
    match tools {
        Ok(resp) if resp.status().is_success() => println!("🔧 Tools: ✅ Available"),
        Ok(resp) => println!("🔧 Tools: ❌ HTTP {}", resp.status()),
        Err(_) => println!("🔧 Tools: ❌ Unavailable"),
    }

    let cfg = Config::load();
    println!("\n📋 Configuration:");
    println!("  Mode: {}", cfg.mode);
    println!("  Port: {}", cfg.port);
    println!(
        "  Log Level: {}",
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into())
    );
    println!("  Doctoc: {}", cfg.doctoc.base_url);
    if cfg.unipile.dsn.is_empty() {
        println!("  Unipile: Not configured");
    } else {
        println!("  Unipile: {}", cfg.unipile.dsn);
    }
    Ok(())
}

async fn test_doctoc(url: Option<String>) -> anyhow::Result<()> {
    let mut cfg = Config::load();
    if let Some(u) = url {
        cfg.doctoc.base_url = u;
    }

    let client = DoctocClient::new(&cfg.doctoc);
    let mut payload = serde_json::Map::new();
    payload.insert("sections".into(), json!(["basic"]));
    let info = client
        .call("getOrganizationInfoAPI", payload)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    println!("🏥 Organizacion:");
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serial_test::serial;
    use std::env;

    #[tokio::test]
    async fn health_check_returns_ok_on_200() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/healthz");
            then.status(200).body("ok");
        });
        assert!(health_check(&server.base_url()).await.is_ok());
    }

    #[tokio::test]
    async fn health_check_fails_on_500() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/healthz");
            then.status(500).body("boom");
        });
        assert!(health_check(&server.base_url()).await.is_err());
    }

    #[tokio::test]
    async fn health_check_fails_when_unreachable() {
        assert!(health_check("http://localhost:9").await.is_err());
    }

    #[test]
    #[serial]
    fn validate_config_accepts_server_and_stdio_modes() {
        env::set_var("MODE", "server");
        env::set_var("PORT", "8080");
        assert!(validate_config().is_ok());

        env::set_var("MODE", "stdio");
        assert!(validate_config().is_ok());

        env::remove_var("MODE");
        env::remove_var("PORT");
    }

    #[test]
    #[serial]
    fn validate_config_rejects_unknown_mode() {
        env::set_var("MODE", "invalid");
        let err = validate_config().unwrap_err();
        assert!(err.to_string().contains("Invalid MODE"));
        env::remove_var("MODE");
    }

    #[test]
    #[serial]
    fn validate_config_rejects_port_zero() {
        env::set_var("MODE", "server");
        env::set_var("PORT", "0");
        let err = validate_config().unwrap_err();
        assert!(err.to_string().contains("PORT cannot be 0"));
        env::remove_var("MODE");
        env::remove_var("PORT");
    }

    #[tokio::test]
    async fn show_status_handles_non_200_health_and_tools() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/healthz");
            then.status(500).body("boom");
        });
        server.mock(|when, then| {
            when.method(POST).path("/mcp");
            then.status(500).body("boom");
        });
        assert!(show_status(&server.base_url()).await.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn test_doctoc_fetches_org_info_from_override_url() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/getOrganizationInfoAPI");
            then.status(200)
                .json_body(serde_json::json!({"name": "Clinica Central"}));
        });
        assert!(test_doctoc(Some(server.base_url())).await.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn run_commands_health_success() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/healthz");
            then.status(200).body("ok");
        });
        assert!(run_commands(Commands::Health { url: server.base_url() }).await.is_ok());
    }

    #[tokio::test]
    async fn run_commands_health_failure() {
        assert!(run_commands(Commands::Health { url: "http://localhost:9".into() })
            .await
            .is_err());
    }
}
