//! crates/drivepixel_core/src/chat.rs
//!
//! Pure domain logic for chat sessions: applying an inbound widget message to
//! a session aggregate, keyword-based service inference, and the readiness
//! check that gates the one-shot lead notification.

use chrono::{DateTime, Utc};

use crate::domain::{ChatMessage, ChatSession, IncomingChatMessage, Lead, SessionStatus};

/// Ordered keyword rules for inferring which service a visitor is asking
/// about. The first matching rule wins, and once a session has a service it
/// is never re-inferred.
const SERVICE_RULES: &[(&[&str], &str)] = &[
    (&["it", "development"], "IT Services"),
    (&["real estate", "realestate"], "Real Estate Services"),
    (&["e-commerce", "ecommerce"], "E-commerce Services"),
    (&["support", "other"], "Support / Other"),
];

/// Matches the lowercased message text against [`SERVICE_RULES`].
pub fn infer_service(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    SERVICE_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, service)| *service)
}

/// Creates a fresh session for a first message that carried no (or an
/// unknown) session id.
pub fn new_session(session_id: String, page_url: Option<String>, now: DateTime<Utc>) -> ChatSession {
    ChatSession {
        session_id,
        started_at: now,
        page_url,
        name: None,
        email: None,
        service: None,
        messages: Vec::new(),
        status: SessionStatus::Active,
        last_message_at: now,
        email_sent: false,
        email_sent_at: None,
    }
}

/// Applies one inbound message to a session.
///
/// `name` and `email` overwrite the stored values whenever provided
/// (last-write-wins per field). `service` is inferred from the message text
/// only while still unset. The message is appended and `last_message_at`
/// updated unconditionally.
pub fn apply_message(
    session: &mut ChatSession,
    incoming: &IncomingChatMessage,
    message_id: String,
    now: DateTime<Utc>,
) {
    if let Some(name) = &incoming.name {
        session.name = Some(name.clone());
    }
    if let Some(email) = &incoming.email {
        session.email = Some(email.clone());
    }
    if incoming.session_complete {
        session.status = SessionStatus::Completed;
    }
    if session.service.is_none() {
        session.service = infer_service(&incoming.message).map(str::to_string);
    }

    session.messages.push(ChatMessage {
        id: message_id,
        sender: incoming.sender.clone(),
        message: incoming.message.clone(),
        timestamp: now,
    });
    session.last_message_at = now;
}

/// Returns the lead to notify about, but only when the session has collected
/// name, email and service, and no notification has been sent yet.
pub fn pending_lead(session: &ChatSession) -> Option<Lead> {
    if session.email_sent {
        return None;
    }
    match (&session.name, &session.email, &session.service) {
        (Some(name), Some(email), Some(service)) => Some(Lead {
            name: name.clone(),
            email: email.clone(),
            service: service.clone(),
        }),
        _ => None,
    }
}
