//! # wxa-core
//!
//! Core types for Webex Assistant skills: the message and directive schema,
//! the response builder, the strict request-body codec, and the error type
//! shared by every other crate in the workspace.

pub mod codec;
pub mod directive;
pub mod error;
pub mod message;
pub mod response;

pub use codec::{MAX_BODY_BYTES, decode_json_body};
pub use directive::{Directive, DirectiveName, DirectiveType, Payload};
pub use error::{ApiError, DecodeError, EnvelopeError, Result, Segment, WxaError};
pub use message::{Context, Frame, History, Params, SKILL_INTRO, SignedRequest, WebexAssistantMessage};
pub use response::{DialogueState, WebexAssistantHealthResponse, WebexAssistantResponse};
