//! # wxa-cli
//!
//! Command-line interface for Webex Assistant skill developers.
//!
//! ## Commands
//!
//! - `wxa generate-keys` / `wxa generate-secret`: create skill key material
//! - `wxa list-skills` / `create-skill` / `delete-skill`: manage registrations
//! - `wxa serve`: run the echo skill
//! - `wxa simulate`: send a signed, encrypted request to a running skill

pub mod commands;

pub use commands::Cli;
pub use commands::simulate::{build_message, generate_challenge, seal};
