use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use wxa_core::{Result, WxaError};

/// Root configuration, mapped to `wxa.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WxaConfig {
    pub server: ServerConfig,
    pub skill: SkillConfig,
    pub logging: LoggingConfig,
    pub service: ServiceConfig,
}

// ── Server ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP listen address.
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".into(),
        }
    }
}

// ── Skill key material ─────────────────────────────────────────

/// Where the skill's keys and secret come from.
///
/// Inline values win; the `*_file` paths are read only for values left empty.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    /// PKCS#1 PEM private key.
    pub private_key: Option<String>,
    /// SPKI PEM public key.
    pub public_key: Option<String>,
    /// Shared HMAC secret.
    pub secret: Option<String>,
    pub private_key_file: PathBuf,
    pub public_key_file: PathBuf,
    pub secret_file: PathBuf,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            private_key: None,
            public_key: None,
            secret: None,
            private_key_file: PathBuf::from("private.pem"),
            public_key_file: PathBuf::from("public.pem"),
            secret_file: PathBuf::from("secret.txt"),
        }
    }
}

impl std::fmt::Debug for SkillConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillConfig")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("public_key", &self.public_key.as_ref().map(|_| "<set>"))
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("private_key_file", &self.private_key_file)
            .field("public_key_file", &self.public_key_file)
            .field("secret_file", &self.secret_file)
            .finish()
    }
}

/// Fully resolved key material for one skill.
#[derive(Clone)]
pub struct SkillKeys {
    pub private_key: String,
    pub public_key: String,
    pub secret: String,
}

impl std::fmt::Debug for SkillKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillKeys")
            .field("private_key", &"<redacted>")
            .field("public_key", &self.public_key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl SkillKeys {
    /// Resolve every key, reading files for anything not set inline.
    ///
    /// Fails listing every unresolved item if any is still missing.
    pub fn resolve(skill: &SkillConfig) -> Result<Self> {
        let mut missing = Vec::new();

        let private_key = resolve_one(
            skill.private_key.as_deref(),
            &skill.private_key_file,
            "SKILL_PRIVATE_KEY",
            &mut missing,
        )?;
        let public_key = resolve_one(
            skill.public_key.as_deref(),
            &skill.public_key_file,
            "SKILL_PUBLIC_KEY",
            &mut missing,
        )?;
        let secret = resolve_one(
            skill.secret.as_deref(),
            &skill.secret_file,
            "SKILL_SECRET",
            &mut missing,
        )?;

        if !missing.is_empty() {
            return Err(WxaError::MissingSkillKeys(missing.join(", ")));
        }

        Ok(Self {
            private_key,
            public_key,
            secret: secret.trim_end().to_string(),
        })
    }
}

/// The public half of a skill's key material: what a caller needs to send
/// it a request.
#[derive(Debug, Clone)]
pub struct SenderKeys {
    pub public_key: String,
    pub secret: String,
}

impl SenderKeys {
    /// Like [`SkillKeys::resolve`] but never needs the private key.
    pub fn resolve(skill: &SkillConfig) -> Result<Self> {
        let mut missing = Vec::new();

        let public_key = resolve_one(
            skill.public_key.as_deref(),
            &skill.public_key_file,
            "SKILL_PUBLIC_KEY",
            &mut missing,
        )?;
        let secret = resolve_one(
            skill.secret.as_deref(),
            &skill.secret_file,
            "SKILL_SECRET",
            &mut missing,
        )?;

        if !missing.is_empty() {
            return Err(WxaError::MissingSkillKeys(missing.join(", ")));
        }

        Ok(Self {
            public_key,
            secret: secret.trim_end().to_string(),
        })
    }
}

fn resolve_one(
    inline: Option<&str>,
    file: &Path,
    env_name: &str,
    missing: &mut Vec<String>,
) -> Result<String> {
    if let Some(v) = inline.filter(|v| !v.trim().is_empty()) {
        return Ok(v.to_string());
    }
    if file.is_file() {
        let contents = std::fs::read_to_string(file)?;
        if !contents.trim().is_empty() {
            return Ok(contents);
        }
    }
    missing.push(format!("{} or {}", env_name, file.display()));
    Ok(String::new())
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format: "pretty" or "json".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

// ── Skills service ─────────────────────────────────────────────

/// Credentials for the skills-service REST API.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub developer_id: Option<String>,
    pub token: Option<String>,
    /// Overrides the regional default endpoint.
    pub base_url: Option<String>,
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("developer_id", &self.developer_id)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

// ── Validation ─────────────────────────────────────────────────

/// A single config validation issue.
#[derive(Debug)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub severity: WarningSeverity,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let icon = match self.severity {
            WarningSeverity::Error => "❌",
            WarningSeverity::Warning => "⚠️ ",
            WarningSeverity::Info => "💡",
        };
        write!(f, "{} {}: {}", icon, self.field, self.message)?;
        if let Some(ref h) = self.hint {
            write!(f, "\n   ↳ {}", h)?;
        }
        Ok(())
    }
}

const VALID_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const VALID_FORMATS: &[&str] = &["pretty", "json"];

impl WxaConfig {
    /// Validate the config and return a list of warnings/errors.
    /// Returns `Err` with all messages joined if any severity is Error.
    pub fn validate(&self) -> std::result::Result<Vec<ConfigWarning>, String> {
        let mut warnings = Vec::new();

        if self.server.listen.parse::<SocketAddr>().is_err() {
            warnings.push(ConfigWarning {
                field: "server.listen".into(),
                message: format!("'{}' is not a valid socket address", self.server.listen),
                severity: WarningSeverity::Error,
                hint: Some("Use host:port, e.g. '0.0.0.0:8080'".into()),
            });
        }

        if !VALID_LEVELS.contains(&self.logging.level.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.level".into(),
                message: format!("unknown log level '{}'", self.logging.level),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", VALID_LEVELS.join(", "))),
            });
        }

        if !VALID_FORMATS.contains(&self.logging.format.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.format".into(),
                message: format!("unknown log format '{}'", self.logging.format),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", VALID_FORMATS.join(", "))),
            });
        }

        if let Some(url) = &self.service.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                warnings.push(ConfigWarning {
                    field: "service.base_url".into(),
                    message: format!("'{}' is not an http(s) URL", url),
                    severity: WarningSeverity::Error,
                    hint: None,
                });
            }
        }

        if self.skill.secret.as_deref().is_some_and(|s| s.len() < 16) {
            warnings.push(ConfigWarning {
                field: "skill.secret".into(),
                message: "secret is shorter than 16 characters".into(),
                severity: WarningSeverity::Warning,
                hint: Some("Generate one with `wxa generate-secret`".into()),
            });
        }

        let errors: Vec<String> = warnings
            .iter()
            .filter(|w| w.severity == WarningSeverity::Error)
            .map(|w| format!("{}: {}", w.field, w.message))
            .collect();

        if !errors.is_empty() {
            return Err(format!("Configuration errors:\n  • {}", errors.join("\n  • ")));
        }

        Ok(warnings)
    }
}
