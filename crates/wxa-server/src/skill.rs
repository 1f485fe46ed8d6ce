use async_trait::async_trait;
use wxa_core::{Result, WebexAssistantMessage};

/// What a skill wants said for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillReply {
    pub text: String,
    /// Keep the microphone open for a follow-up.
    pub should_listen: bool,
}

impl SkillReply {
    /// Reply and end the interaction.
    pub fn say(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            should_listen: false,
        }
    }

    /// Reply and wait for the user to answer.
    pub fn ask(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            should_listen: true,
        }
    }
}

/// Conversational logic hosted by the skill server.
///
/// The server handles authentication, decryption and the intro turn; a skill
/// only sees decrypted messages for active turns.
#[async_trait]
pub trait Skill: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Spoken when the skill is first invoked.
    fn intro(&self) -> &str;

    /// Handle one active turn.
    async fn respond(&self, message: &WebexAssistantMessage) -> Result<SkillReply>;
}

/// Repeats whatever the user said.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoSkill;

impl EchoSkill {
    pub const INTRO: &'static str = "This is the echo skill.  Say something and I will echo it back.";
    pub const NOTHING_HEARD: &'static str = "Hmm... I didn't get anything to echo";
}

#[async_trait]
impl Skill for EchoSkill {
    fn name(&self) -> &str {
        "echo"
    }

    fn intro(&self) -> &str {
        Self::INTRO
    }

    async fn respond(&self, message: &WebexAssistantMessage) -> Result<SkillReply> {
        if message.text.is_empty() {
            return Ok(SkillReply::say(Self::NOTHING_HEARD));
        }
        Ok(SkillReply::say(message.text.clone()))
    }
}
