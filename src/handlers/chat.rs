use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::chat::{ChatMode, ConversationMessage};
use crate::services::chat::{self, split_pending_question, GREETING, SUGGESTIONS};
use crate::state::AppState;

/// The client keeps the conversation; each request carries the full
/// history ending with the new user question.
#[derive(Debug, Deserialize)]
pub struct ChatPayload {
    #[serde(default)]
    pub mode: ChatMode,
    pub messages: Vec<ConversationMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub messages: Vec<ConversationMessage>,
}

pub async fn send(
    State(state): State<AppState>,
    Json(payload): Json<ChatPayload>,
) -> AppResult<Json<ChatResponse>> {
    let (mut conversation, question) = split_pending_question(payload.messages)?;
    let answer = chat::send(&state.api, &mut conversation, payload.mode, &question).await?;

    Ok(Json(ChatResponse {
        answer,
        messages: conversation.into_messages(),
    }))
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub greeting: &'static str,
    pub suggestions: &'static [&'static str],
}

pub async fn suggestions() -> Json<SuggestionsResponse> {
    Json(SuggestionsResponse {
        greeting: GREETING,
        suggestions: &SUGGESTIONS,
    })
}
