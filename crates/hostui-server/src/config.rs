//! Host configuration: TOML file, then environment, then CLI flags.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 12000;
pub const DEFAULT_PUSH_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Interface to bind
    pub host: String,
    pub port: u16,
    /// Conversation service URL; defaults to this host's own address
    pub server_url: Option<String>,
    /// Interval between pushed snapshots
    pub push_interval_ms: u64,
    /// Background refresh of the snapshot while polling is enabled
    pub refresh_interval_ms: u64,
    /// Directory holding web component assets
    pub web_root: Option<PathBuf>,
    pub api_key: Option<String>,
    pub uses_vertex_ai: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            server_url: None,
            push_interval_ms: DEFAULT_PUSH_INTERVAL_MS,
            refresh_interval_ms: DEFAULT_PUSH_INTERVAL_MS,
            web_root: None,
            api_key: None,
            uses_vertex_ai: false,
        }
    }
}

impl HostConfig {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hostui")
            .join("config.toml")
    }

    /// Load from `path`, or from the default location when it exists.
    ///
    /// An explicitly given path must exist; a missing default file yields
    /// the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path(), false),
        };
        if !explicit && !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Apply environment overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("HOSTUI_SERVER_URL").filter(|v| !v.trim().is_empty()) {
            self.server_url = Some(url);
        }
        if let Some(dir) = lookup("HOSTUI_WEBAPP_DIR").filter(|v| !v.trim().is_empty()) {
            self.web_root = Some(PathBuf::from(dir));
        }
        if let Some(key) = lookup("GOOGLE_API_KEY").filter(|v| !v.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(flag) = lookup("GOOGLE_GENAI_USE_VERTEXAI") {
            self.uses_vertex_ai = flag.eq_ignore_ascii_case("true");
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn server_url(&self) -> String {
        self.server_url
            .clone()
            .unwrap_or_else(|| format!("http://{}", self.bind_addr()))
    }

    /// Web root: configured directory if it has an index, else the first
    /// conventional location that does, else the working directory.
    pub fn resolve_web_root(&self) -> PathBuf {
        if let Some(p) = &self.web_root {
            if p.join("index.html").exists() {
                return p.clone();
            }
        }

        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let candidates = [
            cwd.join("web/dist"),
            cwd.join("dist"),
            Path::new(env!("CARGO_MANIFEST_DIR")).join("../../web/dist"),
        ];
        for c in candidates {
            if c.join("index.html").exists() {
                return c;
            }
        }
        cwd
    }
}
