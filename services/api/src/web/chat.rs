//! services/api/src/web/chat.rs
//!
//! Contains the Axum handlers for the chat widget's message funnel.
//!
//! The write path persists the message first, then attempts the one-shot lead
//! notification, then persists the `emailSent` flip on success. A failed or
//! unreachable notification endpoint never fails the request; it only shows
//! up as `emailSent: false` in the response.

use crate::web::rest::{bad_request, port_error, ErrorBody, HandlerError};
use crate::web::state::AppState;
use axum::{
    extract::{Query, State},
    response::Json,
};
use drivepixel_core::chat;
use drivepixel_core::domain::IncomingChatMessage;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, warn};
use utoipa::ToSchema;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct ChatMessageRequest {
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "pageUrl", default)]
    pub page_url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "sessionComplete", default)]
    pub session_complete: bool,
}

/// The summary returned after each message: the (possibly fresh) session id,
/// the message count so far, and whether the lead notification has gone out.
#[derive(Serialize, ToSchema)]
pub struct ChatMessageData {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "messageCount")]
    pub message_count: usize,
    #[serde(rename = "emailSent")]
    pub email_sent: bool,
}

#[derive(Serialize, ToSchema)]
pub struct ChatMessageResponse {
    pub success: bool,
    pub data: ChatMessageData,
}

#[derive(Deserialize)]
pub struct ChatSessionQuery {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

//=========================================================================================
// Chat Handlers
//=========================================================================================

/// Apply one chat widget message to its session.
///
/// Creates the session when `sessionId` is absent or unknown. Once the
/// session has collected name, email and an inferred service, exactly one
/// notification send is attempted; its outcome is swallowed.
#[utoipa::path(
    post,
    path = "/api/chat/message",
    request_body = ChatMessageRequest,
    responses(
        (status = 200, description = "Message applied", body = ChatMessageResponse),
        (status = 400, description = "Missing sender or message", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn post_chat_message_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatMessageRequest>,
) -> Result<Json<ChatMessageResponse>, HandlerError> {
    if payload.sender.trim().is_empty() || payload.message.trim().is_empty() {
        return Err(bad_request("sender and message are required"));
    }

    let session = state
        .chat_store
        .apply_message(IncomingChatMessage {
            session_id: payload.session_id,
            sender: payload.sender,
            message: payload.message,
            page_url: payload.page_url,
            name: payload.name,
            email: payload.email,
            session_complete: payload.session_complete,
        })
        .await
        .map_err(port_error)?;

    // The message is already persisted; everything below is best-effort.
    let mut email_sent = session.email_sent;
    if let Some(lead) = chat::pending_lead(&session) {
        match state.notifier.notify(&lead).await {
            Ok(()) => {
                email_sent = true;
                if let Err(e) = state.chat_store.mark_email_sent(&session.session_id).await {
                    error!(
                        "Failed to record emailSent for session {}: {:?}",
                        session.session_id, e
                    );
                }
            }
            Err(e) => {
                warn!(
                    "Lead notification failed for session {}: {}",
                    session.session_id, e
                );
            }
        }
    }

    Ok(Json(ChatMessageResponse {
        success: true,
        data: ChatMessageData {
            session_id: session.session_id,
            message_count: session.messages.len(),
            email_sent,
        },
    }))
}

/// Fetch chat sessions: one session (or null) with `sessionId`, all sessions
/// without it.
#[utoipa::path(
    get,
    path = "/api/chat/message",
    params(
        ("sessionId" = Option<String>, Query, description = "Fetch a single session by id")
    ),
    responses(
        (status = 200, description = "Session(s) in a {success, data} envelope"),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn get_chat_sessions_handler(
    State(state): State<AppState>,
    Query(params): Query<ChatSessionQuery>,
) -> Result<Json<Value>, HandlerError> {
    let data = match params.session_id {
        Some(id) => {
            let session = state.chat_store.get(&id).await.map_err(port_error)?;
            json!(session)
        }
        None => {
            let sessions = state.chat_store.list().await.map_err(port_error)?;
            json!(sessions)
        }
    };
    Ok(Json(json!({ "success": true, "data": data })))
}
