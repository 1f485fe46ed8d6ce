use serde::{Deserialize, Deserializer, Serialize};

use crate::directive::DirectiveName;

/// Dialogue state the platform sends when a skill is first invoked.
pub const SKILL_INTRO: &str = "skill_intro";

/// The signed, encrypted request the assistant platform posts to a skill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignedRequest {
    /// Base64 HMAC-SHA256 of `message` under the skill secret.
    #[serde(default)]
    pub signature: String,
    /// Secure envelope, `<wrapped key>.<token>`.
    #[serde(default)]
    pub message: String,
}

impl SignedRequest {
    pub fn is_complete(&self) -> bool {
        !self.signature.is_empty() && !self.message.is_empty()
    }
}

/// Plaintext message recovered from a secure envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebexAssistantMessage {
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub context: Context,
    #[serde(deserialize_with = "null_as_default")]
    pub params: Params,
    #[serde(deserialize_with = "null_as_default")]
    pub frame: Frame,
    #[serde(deserialize_with = "null_as_default")]
    pub history: History,
    #[serde(deserialize_with = "null_as_default")]
    pub challenge: String,
}

impl WebexAssistantMessage {
    pub fn is_intro(&self) -> bool {
        self.params.target_dialogue_state.as_deref() == Some(SKILL_INTRO)
    }
}

/// How the user is making the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Context {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    /// Directives the requesting client can render.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub supported_directives: Vec<DirectiveName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_device_id: Option<String>,
}

impl Context {
    pub fn supports(&self, name: &DirectiveName) -> bool {
        self.supported_directives.contains(name)
    }
}

/// Request parameters: time zone, timestamp, language and the target dialogue state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_dialogue_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_resource: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_intents: Option<serde_json::Value>,
}

/// A JSON `null` decodes like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// State preserved across continuous interactions. Passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frame(pub serde_json::Value);

impl Default for Frame {
    fn default() -> Self {
        Self(serde_json::Value::Object(Default::default()))
    }
}

/// Conversation history for multi-turn interactions. Passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(pub serde_json::Value);

impl Default for History {
    fn default() -> Self {
        Self(serde_json::Value::Object(Default::default()))
    }
}
