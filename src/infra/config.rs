use serde::Deserialize;

const DEFAULT_DOCTOC_BASE: &str = "https://us-central1-doctoc-platform.cloudfunctions.net";

pub struct Config {
    pub mode: String, // "server" or "stdio"
    pub port: u16,
    pub doctoc: DoctocConfig,
    pub unipile: UnipileConfig,
}

#[derive(Clone)]
pub struct DoctocConfig {
    pub base_url: String,
    pub api_token: String,
    pub org_id: String,
}

#[derive(Clone)]
pub struct UnipileConfig {
    pub dsn: String,
    pub api_key: String,
}

impl std::fmt::Debug for DoctocConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DoctocConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .field("org_id", &self.org_id)
            .finish()
    }
}

impl std::fmt::Debug for UnipileConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnipileConfig")
            .field("dsn", &self.dsn)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Optional TOML overlay, named by `GATEWAY_CONFIG`. Env vars win for mode/port;
/// file values win over env for upstream settings when present.
#[derive(Debug, Default, Deserialize)]
struct FileOverrides {
    #[serde(default)]
    doctoc: DoctocOverrides,
    #[serde(default)]
    unipile: UnipileOverrides,
}

#[derive(Debug, Default, Deserialize)]
struct DoctocOverrides {
    base_url: Option<String>,
    api_token: Option<String>,
    org_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct UnipileOverrides {
    dsn: Option<String>,
    api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let mode = std::env::var("MODE").unwrap_or_else(|_| "server".into());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);

        let doctoc = DoctocConfig {
            base_url: std::env::var("DOCTOC_API_URL")
                .unwrap_or_else(|_| DEFAULT_DOCTOC_BASE.into()),
            api_token: std::env::var("DOCTOC_API_TOKEN").unwrap_or_default(),
            org_id: std::env::var("DOCTOC_ORG_ID").unwrap_or_default(),
        };
        let unipile = UnipileConfig {
            dsn: std::env::var("UNIPILE_DSN").unwrap_or_default(),
            api_key: std::env::var("UNIPILE_API_KEY").unwrap_or_default(),
        };

        Self {
            mode,
            port,
            doctoc,
            unipile,
        }
    }

    /// Env first, then the `GATEWAY_CONFIG` TOML file when it is set and readable.
    pub fn load() -> Self {
        let mut cfg = Self::from_env();
        if let Ok(path) = std::env::var("GATEWAY_CONFIG") {
            match std::fs::read_to_string(&path) {
                Ok(raw) => match toml::from_str::<FileOverrides>(&raw) {
                    Ok(file) => cfg.apply_file(file),
                    Err(e) => tracing::warn!(path = %path, error = %e, "ignoring invalid config file"),
                },
                Err(e) => tracing::warn!(path = %path, error = %e, "ignoring unreadable config file"),
            }
        }
        cfg
    }

    fn apply_file(&mut self, file: FileOverrides) {
        if let Some(v) = file.doctoc.base_url {
            self.doctoc.base_url = v;
        }
        if let Some(v) = file.doctoc.api_token {
            self.doctoc.api_token = v;
        }
        if let Some(v) = file.doctoc.org_id {
            self.doctoc.org_id = v;
        }
        if let Some(v) = file.unipile.dsn {
            self.unipile.dsn = v;
        }
        if let Some(v) = file.unipile.api_key {
            self.unipile.api_key = v;
        }
    }
}
