// ABOUTME: Reasoning service abstraction used by every generation stage
// ABOUTME: Defines ReasoningClient, role-tagged messages, and the content-block response envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Reasoning Client Interface
//!
//! The generation pipeline talks to an external text-completion service
//! through [`ReasoningClient`]. A call takes role-tagged messages plus the
//! identity of the caller the program is generated for, and returns a
//! [`MessageEnvelope`] made of content blocks. Only the first text block is
//! ever read by the pipeline.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pierre_programs::llm::{ChatMessage, ReasoningClient, ReasoningProvider, ReasoningRequest};
//!
//! async fn example() -> Result<(), pierre_programs::errors::AppError> {
//!     let provider = ReasoningProvider::from_env()?;
//!     let request = ReasoningRequest::new(vec![
//!         ChatMessage::system("Respond with JSON only."),
//!         ChatMessage::user("Propose a 3 day split."),
//!     ]);
//!     let envelope = provider.send(&request, "user-123").await?;
//!     println!("{:?}", envelope.first_text());
//!     Ok(())
//! }
//! ```

mod anthropic;
mod openai_compatible;
mod provider;

pub use anthropic::{AnthropicConfig, AnthropicProvider};
pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};
pub use provider::ReasoningProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

// ============================================================================
// Capability Flags
// ============================================================================

bitflags::bitflags! {
    /// Reasoning provider capability flags
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LlmCapabilities: u8 {
        /// Provider can be asked for JSON-only output
        const JSON_MODE = 0b0000_0001;
        /// Provider forwards the caller identity for abuse tracking
        const CALLER_METADATA = 0b0000_0010;
    }
}

impl LlmCapabilities {
    /// Check if JSON mode is supported
    #[must_use]
    pub const fn supports_json_mode(&self) -> bool {
        self.contains(Self::JSON_MODE)
    }

    /// Check if the caller identity is sent upstream
    #[must_use]
    pub const fn supports_caller_metadata(&self) -> bool {
        self.contains(Self::CALLER_METADATA)
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction message
    System,
    /// User input message
    User,
    /// Assistant response message
    Assistant,
}

impl MessageRole {
    /// Convert to string representation for API calls
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single role-tagged message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// One call to the reasoning service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningRequest {
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Model identifier (provider-specific)
    pub model: Option<String>,
    /// Temperature for response randomness (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Ask the provider to constrain output to a JSON object
    #[serde(default)]
    pub json_output: bool,
}

impl ReasoningRequest {
    /// Create a new request with messages
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
            json_output: false,
        }
    }

    /// Set the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Request JSON-only output where the provider supports it
    #[must_use]
    pub const fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }

    /// Concatenated system instructions, `None` when there are none
    #[must_use]
    pub fn system_prompt(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
            .collect();
        (!parts.is_empty()).then(|| parts.join("\n\n"))
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub input_tokens: u32,
    /// Tokens generated
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Total tokens billed
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// One block of a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Free text
    Text {
        /// Block text
        text: String,
    },
    /// Any block kind this crate does not read
    #[serde(other)]
    Unsupported,
}

impl ContentBlock {
    /// Text block constructor
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Response envelope returned by [`ReasoningClient::send`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    /// Provider response id
    #[serde(default)]
    pub id: Option<String>,
    /// Model that produced the response
    pub model: String,
    /// Content blocks in order
    pub content: Vec<ContentBlock>,
    /// Why generation stopped (`end_turn`, `max_tokens`, `stop`, ...)
    #[serde(default)]
    pub stop_reason: Option<String>,
    /// Token usage
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

impl MessageEnvelope {
    /// Envelope holding a single text block
    #[must_use]
    pub fn from_text(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: None,
            model: model.into(),
            content: vec![ContentBlock::text(text)],
            stop_reason: None,
            usage: None,
        }
    }

    /// First text-bearing block, the only one the pipeline reads
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Whether the provider cut the answer at the token limit
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        matches!(self.stop_reason.as_deref(), Some("max_tokens" | "length"))
    }
}

// ============================================================================
// Client Trait
// ============================================================================

/// External boundary to the reasoning service
///
/// Implementations perform exactly one round trip per call and never retry;
/// retries are the caller's decision.
#[async_trait]
pub trait ReasoningClient: Send + Sync {
    /// Unique provider identifier (e.g., "anthropic", "groq", "ollama")
    fn name(&self) -> &'static str;

    /// Provider capabilities
    fn capabilities(&self) -> LlmCapabilities;

    /// Default model to use if not specified in request
    fn default_model(&self) -> &str;

    /// Send messages on behalf of `caller` and return the response envelope
    async fn send(
        &self,
        request: &ReasoningRequest,
        caller: &str,
    ) -> Result<MessageEnvelope, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_text_skips_non_text_blocks() {
        let envelope = MessageEnvelope {
            id: Some("msg_1".into()),
            model: "m".into(),
            content: vec![
                ContentBlock::Unsupported,
                ContentBlock::text("{\"a\":1}"),
                ContentBlock::text("ignored"),
            ],
            stop_reason: Some("end_turn".into()),
            usage: None,
        };
        assert_eq!(envelope.first_text(), Some("{\"a\":1}"));
        assert!(!envelope.is_truncated());
    }

    #[test]
    fn test_unknown_block_types_decode_as_unsupported() {
        let blocks: Vec<ContentBlock> = serde_json::from_str(
            r#"[{"type":"thinking","thinking":"hmm"},{"type":"text","text":"hi"}]"#,
        )
        .unwrap();
        assert_eq!(blocks[0], ContentBlock::Unsupported);
        assert_eq!(blocks[1], ContentBlock::text("hi"));
    }

    #[test]
    fn test_system_prompt_joins_system_messages() {
        let request = ReasoningRequest::new(vec![
            ChatMessage::system("one"),
            ChatMessage::user("question"),
            ChatMessage::system("two"),
        ]);
        assert_eq!(request.system_prompt().as_deref(), Some("one\n\ntwo"));
        assert!(ReasoningRequest::new(vec![ChatMessage::user("q")])
            .system_prompt()
            .is_none());
    }
}
