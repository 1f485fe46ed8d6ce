use std::path::{Path, PathBuf};
use tracing::{info, warn};
use wxa_core::WxaError;

use crate::schema::WxaConfig;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "wxa.toml";

/// Loads the wxa configuration.
pub struct ConfigLoader {
    config: WxaConfig,
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Resolve the config path: explicit path > WXA_CONFIG env > ./wxa.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        Self::resolve_path_with(explicit, |k| std::env::var(k).ok())
    }

    pub fn resolve_path_with(
        explicit: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Some(p) = env("WXA_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from(CONFIG_FILE_NAME)
    }

    /// Load the config from disk, falling back to defaults.
    pub fn load(path: Option<&Path>) -> wxa_core::Result<Self> {
        Self::load_with_env(path, |k| std::env::var(k).ok())
    }

    /// Like [`ConfigLoader::load`], reading environment overrides through `env`.
    pub fn load_with_env(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> wxa_core::Result<Self> {
        let config_path = Self::resolve_path_with(path, &env);
        let config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            let raw = std::fs::read_to_string(&config_path)?;
            toml::from_str::<WxaConfig>(&raw).map_err(|e| {
                WxaError::Config(format!(
                    "failed to parse {}: {}",
                    config_path.display(),
                    e
                ))
            })?
        } else {
            warn!(?config_path, "config file not found, using defaults");
            WxaConfig::default()
        };

        let config = Self::apply_env_overrides(config, &env);

        match config.validate() {
            Ok(warnings) => {
                for w in &warnings {
                    warn!("{}", w);
                }
            }
            Err(e) => {
                return Err(WxaError::Config(e));
            }
        }

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Snapshot of the loaded config.
    pub fn get(&self) -> WxaConfig {
        self.config.clone()
    }

    /// Path the config was resolved from.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Apply env var overrides (WXA_LISTEN, PORT, SKILL_SECRET, etc.)
    pub fn apply_env_overrides(
        mut config: WxaConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> WxaConfig {
        if let Some(v) = env("WXA_LISTEN") {
            config.server.listen = v;
        } else if let Some(port) = env("PORT").and_then(|p| p.parse::<u16>().ok()) {
            config.server.listen = format!("0.0.0.0:{port}");
        }
        if let Some(v) = env("WXA_LOG_LEVEL") {
            config.logging.level = v;
        }
        // Key material from the environment takes priority over the file.
        if let Some(v) = env("SKILL_PRIVATE_KEY") {
            config.skill.private_key = Some(v);
        }
        if let Some(v) = env("SKILL_PUBLIC_KEY") {
            config.skill.public_key = Some(v);
        }
        if let Some(v) = env("SKILL_SECRET") {
            config.skill.secret = Some(v);
        }
        // Service credentials: config file first, env is the fallback.
        if config.service.developer_id.is_none() {
            config.service.developer_id = env("WXA_DEVELOPER_ID");
        }
        if config.service.token.is_none() {
            config.service.token = env("WXA_TOKEN");
        }
        config
    }
}
