use serde::{Deserialize, Serialize};

use crate::directive::Directive;
use crate::message::WebexAssistantMessage;

/// Routing decision derived from `params.target_dialogue_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueState {
    /// First contact; the skill introduces itself and keeps listening.
    Intro,
    /// Any other turn; the skill decides reply and listen/sleep.
    Active,
}

impl DialogueState {
    pub fn of(message: &WebexAssistantMessage) -> Self {
        if message.is_intro() {
            DialogueState::Intro
        } else {
            DialogueState::Active
        }
    }
}

/// Response returned to the assistant platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebexAssistantResponse {
    pub directives: Vec<Directive>,
    pub challenge: String,
}

impl WebexAssistantResponse {
    /// Build the standard reply: `reply`, `speak`, then `listen` or `sleep`.
    ///
    /// The order is fixed; clients render the view before speaking and only
    /// then open or close the microphone.
    pub fn build(message: &WebexAssistantMessage, reply_text: &str, should_listen: bool) -> Self {
        let turn_end = if should_listen {
            Directive::listen()
        } else {
            Directive::sleep()
        };
        Self {
            directives: vec![
                Directive::reply(reply_text),
                Directive::speak(reply_text),
                turn_end,
            ],
            challenge: message.challenge.clone(),
        }
    }

    /// Introductory reply. Always keeps listening.
    pub fn build_intro(message: &WebexAssistantMessage, intro_text: &str) -> Self {
        Self::build(message, intro_text, true)
    }
}

/// Response to a health-check challenge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebexAssistantHealthResponse {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub challenge: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
}

impl WebexAssistantHealthResponse {
    pub fn ok(challenge: impl Into<String>) -> Self {
        Self {
            challenge: challenge.into(),
            status: "OK".into(),
        }
    }
}
