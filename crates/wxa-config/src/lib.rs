//! # wxa-config
//!
//! Configuration for wxa skills and tooling. Reads `wxa.toml`, then applies
//! environment overrides. Skill key material can also come from PEM and
//! secret files next to the binary.

pub mod loader;
pub mod schema;

pub use loader::{CONFIG_FILE_NAME, ConfigLoader};
pub use schema::{
    ConfigWarning, LoggingConfig, SenderKeys, ServerConfig, ServiceConfig, SkillConfig,
    SkillKeys, WarningSeverity, WxaConfig,
};
