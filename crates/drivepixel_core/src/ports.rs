//! crates/drivepixel_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of the concrete storage (a JSON file today, a real
//! database later) and of the outbound HTTP integrations.

use async_trait::async_trait;

use crate::domain::{
    ChatSession, ContactMessage, IncomingChatMessage, Lead, MessageStatus, NewContactMessage,
    NewsletterSubscriber, SitePageContent,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (filesystem,
/// network) and carries the domain's full failure taxonomy so the HTTP layer
/// can map each variant to a status code.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Record Store Ports (Traits)
//=========================================================================================

/// Storage for contact-form messages. The collection is kept newest-first:
/// `create` prepends, and `list` returns storage order without re-sorting.
#[async_trait]
pub trait ContactMessageStore: Send + Sync {
    async fn list(&self) -> PortResult<Vec<ContactMessage>>;

    async fn create(&self, new: NewContactMessage) -> PortResult<ContactMessage>;

    /// Fails with `NotFound` when no message has the given id.
    async fn update_status(&self, id: &str, status: MessageStatus)
        -> PortResult<ContactMessage>;

    /// Deleting an absent id is a no-op success.
    async fn delete(&self, id: &str) -> PortResult<()>;
}

/// Storage for newsletter subscribers. `subscribe` enforces email uniqueness
/// with a pre-insert scan and appends (unlike contact messages, which prepend).
#[async_trait]
pub trait NewsletterStore: Send + Sync {
    async fn list(&self) -> PortResult<Vec<NewsletterSubscriber>>;

    /// Fails with `Conflict` when the email is already subscribed.
    async fn subscribe(&self, email: &str, source: &str) -> PortResult<NewsletterSubscriber>;

    async fn delete(&self, id: &str) -> PortResult<()>;
}

/// Storage for chat sessions. `apply_message` runs the whole
/// read-modify-write cycle for one inbound widget message, creating the
/// session when the id is absent or unknown, and returns the updated session.
#[async_trait]
pub trait ChatSessionStore: Send + Sync {
    async fn list(&self) -> PortResult<Vec<ChatSession>>;

    async fn get(&self, session_id: &str) -> PortResult<Option<ChatSession>>;

    async fn apply_message(&self, incoming: IncomingChatMessage) -> PortResult<ChatSession>;

    /// Flips `email_sent` to true and stamps `email_sent_at`. The flag is
    /// monotonic; callers only invoke this after a successful notification.
    async fn mark_email_sent(&self, session_id: &str) -> PortResult<()>;
}

//=========================================================================================
// Outbound Integration Ports (Traits)
//=========================================================================================

/// Delivers a collected lead to the notification endpoint, which delegates to
/// the external email backend.
#[async_trait]
pub trait LeadNotifier: Send + Sync {
    async fn notify(&self, lead: &Lead) -> PortResult<()>;
}

/// Fetches the CMS-authored content document for one page path.
#[async_trait]
pub trait PageContentSource: Send + Sync {
    /// Fails with `NotFound` when the CMS has no content for the path (the
    /// endpoint answered `success: false` or a non-success status), and with
    /// `Unexpected` on transport failures. Callers treat both the same way:
    /// fall back to static content.
    async fn fetch_page(&self, path: &str) -> PortResult<SitePageContent>;
}
