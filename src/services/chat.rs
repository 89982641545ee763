//! Conversation relay to the backend's chatbot endpoints.

use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::error::{AppError, AppResult};
use crate::models::chat::{ChatAnswer, ChatMode, ChatRequest, ConversationMessage, Role};

pub const GREETING: &str = "Halo! 👋 Saya adalah Asisten Analitik Permintaan Anda. \
Tanyakan tentang pengeluaran, tren permintaan, atau barang terlaris. \
Contoh: \"Berapa total permintaan unit di tahun 2024?\"";

/// Shown when the backend answers without an `answer` field.
pub const NO_ANSWER_REPLY: &str = "Maaf, saya tidak mengerti.";

/// Shown when the request itself fails.
pub const FAILURE_REPLY: &str = "Maaf, terjadi kesalahan. Coba ganti mode AI atau ulangi.";

pub const SUGGESTIONS: [&str; 7] = [
    "Berapa total permintaan unit tahun 2025?",
    "Total permintaan semua tahun?",
    "Barang apa yang paling sering diminta?",
    "Unit pemohon paling aktif?",
    "Kategori dengan nilai tertinggi?",
    "Berapa jumlah pemohon unik?",
    "Berapa jenis barang yang diminta?",
];

/// Append-only message history, starting with the assistant greeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<ConversationMessage>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: vec![ConversationMessage::assistant(GREETING)],
        }
    }

    /// Resume a conversation the client kept. An empty history starts over
    /// with the greeting.
    pub fn from_messages(messages: Vec<ConversationMessage>) -> Self {
        if messages.is_empty() {
            Self::new()
        } else {
            Self { messages }
        }
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<ConversationMessage> {
        self.messages
    }

    pub fn last(&self) -> Option<&ConversationMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn push(&mut self, message: ConversationMessage) {
        self.messages.push(message);
    }
}

/// Ask `text` in `conversation` and append both the question and the reply.
///
/// Blank input is rejected before anything is sent. Backend failures do not
/// surface as errors: the conversation gets [`FAILURE_REPLY`] instead, so it
/// never ends on an unanswered question.
pub async fn send(
    client: &ApiClient,
    conversation: &mut Conversation,
    mode: ChatMode,
    text: &str,
) -> AppResult<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Pertanyaan tidak boleh kosong".into()));
    }

    conversation.push(ConversationMessage::user(text));

    let answer = match ask(client, mode, conversation.messages(), text).await {
        Ok(answer) if answer.trim().is_empty() => NO_ANSWER_REPLY.to_string(),
        Ok(answer) => answer,
        Err(e) => {
            warn!(mode = mode.as_str(), error = %e, "Chat request failed");
            FAILURE_REPLY.to_string()
        }
    };

    conversation.push(ConversationMessage::assistant(answer.clone()));
    Ok(answer)
}

async fn ask(
    client: &ApiClient,
    mode: ChatMode,
    messages: &[ConversationMessage],
    question: &str,
) -> AppResult<String> {
    debug!(mode = mode.as_str(), turns = messages.len(), "Relaying chat question");

    let reply: ChatAnswer = match mode {
        ChatMode::RuleBased => {
            client
                .get_json_query(mode.endpoint(), &[("question", question)])
                .await?
        }
        ChatMode::Gemini | ChatMode::OpenRouter => {
            client
                .post_json(mode.endpoint(), &ChatRequest { messages })
                .await?
        }
    };

    Ok(reply.answer)
}

/// Split a client-sent history into the earlier turns and the new question,
/// which must be the final user message.
pub fn split_pending_question(
    mut messages: Vec<ConversationMessage>,
) -> AppResult<(Conversation, String)> {
    match messages.pop() {
        Some(ConversationMessage {
            role: Role::User,
            content,
        }) => Ok((Conversation::from_messages(messages), content)),
        _ => Err(AppError::Validation(
            "The last message must be a user question".into(),
        )),
    }
}
