use serde::{Deserialize, Serialize};

use super::null_as_default;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl ConversationMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Which backend answers chat questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    /// Keyword rules evaluated against the data by the backend.
    #[serde(alias = "rule")]
    RuleBased,
    #[default]
    Gemini,
    OpenRouter,
}

impl ChatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RuleBased => "rule_based",
            Self::Gemini => "gemini",
            Self::OpenRouter => "open_router",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::RuleBased => "/api/chatbot-query",
            Self::Gemini => "/api/chatbot-gemini",
            Self::OpenRouter => "/api/chatbot-ai",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub messages: &'a [ConversationMessage],
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatAnswer {
    #[serde(default, deserialize_with = "null_as_default")]
    pub answer: String,
}
