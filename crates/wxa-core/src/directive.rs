use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of a directive, e.g. `reply` or `display-web-view`.
///
/// Known names have variants; anything else the platform sends is kept in
/// [`DirectiveName::Other`] and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DirectiveName {
    Reply,
    Speak,
    Listen,
    Sleep,
    UiHint,
    DisplayWebView,
    ClearWebView,
    AssistantEvent,
    Other(String),
}

impl DirectiveName {
    pub fn as_str(&self) -> &str {
        match self {
            DirectiveName::Reply => "reply",
            DirectiveName::Speak => "speak",
            DirectiveName::Listen => "listen",
            DirectiveName::Sleep => "sleep",
            DirectiveName::UiHint => "ui-hint",
            DirectiveName::DisplayWebView => "display-web-view",
            DirectiveName::ClearWebView => "clear-web-view",
            DirectiveName::AssistantEvent => "assistant-event",
            DirectiveName::Other(s) => s,
        }
    }

    /// Whether this is one of the names the toolkit knows about.
    pub fn is_known(&self) -> bool {
        !matches!(self, DirectiveName::Other(_))
    }
}

impl From<&str> for DirectiveName {
    fn from(s: &str) -> Self {
        match s {
            "reply" => DirectiveName::Reply,
            "speak" => DirectiveName::Speak,
            "listen" => DirectiveName::Listen,
            "sleep" => DirectiveName::Sleep,
            "ui-hint" => DirectiveName::UiHint,
            "display-web-view" => DirectiveName::DisplayWebView,
            "clear-web-view" => DirectiveName::ClearWebView,
            "assistant-event" => DirectiveName::AssistantEvent,
            other => DirectiveName::Other(other.to_string()),
        }
    }
}

impl From<String> for DirectiveName {
    fn from(s: String) -> Self {
        match DirectiveName::from(s.as_str()) {
            DirectiveName::Other(_) => DirectiveName::Other(s),
            known => known,
        }
    }
}

impl From<DirectiveName> for String {
    fn from(name: DirectiveName) -> Self {
        match name {
            DirectiveName::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for DirectiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a directive renders something (`view`) or triggers behaviour (`action`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DirectiveType {
    View,
    Action,
    Other(String),
}

impl DirectiveType {
    pub fn as_str(&self) -> &str {
        match self {
            DirectiveType::View => "view",
            DirectiveType::Action => "action",
            DirectiveType::Other(s) => s,
        }
    }
}

impl From<String> for DirectiveType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "view" => DirectiveType::View,
            "action" => DirectiveType::Action,
            _ => DirectiveType::Other(s),
        }
    }
}

impl From<DirectiveType> for String {
    fn from(kind: DirectiveType) -> Self {
        match kind {
            DirectiveType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for DirectiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directive payload. Only populated fields are serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_immediately: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Free-form key/value data, used by `assistant-event`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub payload: BTreeMap<String, String>,
}

impl Payload {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Payload::default()
    }
}

/// One instruction for the assistant client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    pub name: DirectiveName,
    #[serde(rename = "type")]
    pub kind: DirectiveType,
    #[serde(default)]
    pub payload: Payload,
}

impl Directive {
    pub fn new(name: DirectiveName, kind: DirectiveType, payload: Payload) -> Self {
        Self {
            name,
            kind,
            payload,
        }
    }

    /// Text shown on the device screen.
    pub fn reply(text: impl Into<String>) -> Self {
        Self::new(DirectiveName::Reply, DirectiveType::View, Payload::text(text))
    }

    /// Text spoken aloud.
    pub fn speak(text: impl Into<String>) -> Self {
        Self::new(
            DirectiveName::Speak,
            DirectiveType::Action,
            Payload::text(text),
        )
    }

    /// Keep the microphone open for the next user turn.
    pub fn listen() -> Self {
        Self::new(
            DirectiveName::Listen,
            DirectiveType::Action,
            Payload::default(),
        )
    }

    /// End the interaction.
    pub fn sleep() -> Self {
        Self::new(DirectiveName::Sleep, DirectiveType::Action, Payload::default())
    }

    pub fn ui_hint(text: impl Into<String>, prompt: Option<String>) -> Self {
        Self::new(
            DirectiveName::UiHint,
            DirectiveType::View,
            Payload {
                text: Some(text.into()),
                prompt,
                ..Default::default()
            },
        )
    }

    pub fn display_web_view(url: impl Into<String>, title: Option<String>) -> Self {
        Self::new(
            DirectiveName::DisplayWebView,
            DirectiveType::Action,
            Payload {
                url: Some(url.into()),
                title,
                ..Default::default()
            },
        )
    }

    pub fn clear_web_view() -> Self {
        Self::new(
            DirectiveName::ClearWebView,
            DirectiveType::Action,
            Payload::default(),
        )
    }

    pub fn assistant_event(data: BTreeMap<String, String>) -> Self {
        Self::new(
            DirectiveName::AssistantEvent,
            DirectiveType::Action,
            Payload {
                payload: data,
                ..Default::default()
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_name_slugs() {
        let json = serde_json::to_string(&DirectiveName::DisplayWebView).unwrap();
        assert_eq!(json, r#""display-web-view""#);
        let name: DirectiveName = serde_json::from_str(r#""ui-hint""#).unwrap();
        assert_eq!(name, DirectiveName::UiHint);
    }

    #[test]
    fn test_unknown_directive_name_is_preserved() {
        let name: DirectiveName = serde_json::from_str(r#""show-carousel""#).unwrap();
        assert_eq!(name, DirectiveName::Other("show-carousel".into()));
        assert!(!name.is_known());
        assert_eq!(serde_json::to_string(&name).unwrap(), r#""show-carousel""#);
    }

    #[test]
    fn test_name_match_is_exact() {
        let name: DirectiveName = serde_json::from_str(r#""Reply""#).unwrap();
        assert_eq!(name, DirectiveName::Other("Reply".into()));
    }

    #[test]
    fn test_empty_payload_serializes_as_empty_object() {
        let json = serde_json::to_value(Directive::sleep()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "sleep", "type": "action", "payload": {}})
        );
    }

    #[test]
    fn test_payload_omits_absent_fields() {
        let d = Directive::display_web_view("https://example.com", None);
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains(r#""url":"https://example.com""#));
        assert!(!json.contains("null"));
        assert!(!json.contains("title"));
    }

    #[test]
    fn test_payload_camel_case() {
        let p = Payload {
            display_immediately: Some(true),
            ..Default::default()
        };
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"displayImmediately":true}"#);
    }
}
