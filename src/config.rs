use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::Deserialize;

/// Lowest port accepted from the command line or configuration.
pub const MIN_PORT: u16 = 1024;

/// Top-level server configuration.
///
/// Every field has a default, so an empty YAML document is a valid config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind (e.g. "0.0.0.0")
    pub host: String,
    /// Listening port
    pub port: u16,
}

/// Read-only settings shared by every request handler.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Document root; all served files live beneath it
    pub root: PathBuf,
    /// File served when the request path is exactly "/"
    pub index: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5555,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./www"),
            index: "index.html".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// Defaults are overlaid with the YAML file named by `WEBSERVE_CONFIG`
    /// (if any), then with the `PORT` and `DOC_ROOT` variables.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("WEBSERVE_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        // serde_yaml rejects an empty document; treat it as all defaults
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Applies `PORT` and `DOC_ROOT` overrides using the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.set_port(&port)?;
        }
        if let Some(root) = lookup("DOC_ROOT") {
            self.static_files.root = PathBuf::from(root);
        }
        Ok(())
    }

    /// Parses a port given as text (command line or environment).
    pub fn set_port(&mut self, raw: &str) -> anyhow::Result<()> {
        self.server.port = raw
            .trim()
            .parse()
            .with_context(|| format!("invalid port number: {raw}"))?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port < MIN_PORT {
            bail!(
                "port must be between {} and {}, got {}",
                MIN_PORT,
                u16::MAX,
                self.server.port
            );
        }
        let index = &self.static_files.index;
        if index.is_empty() || index.contains('/') {
            bail!("index file must be a plain file name, got {index:?}");
        }
        Ok(())
    }
}
