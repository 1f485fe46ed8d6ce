//! # wxa-skills-service
//!
//! Async client for the skills-service REST API: list, register and delete
//! the skills a developer owns.

pub mod client;
pub mod skill;

pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, SkillsClient};
pub use skill::Skill;
