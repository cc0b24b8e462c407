//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use drivepixel_core::ports::{
    ChatSessionStore, ContactMessageStore, LeadNotifier, NewsletterStore, PageContentSource,
};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all
/// handlers. Everything behind a port trait so the file-backed adapters can
/// be swapped without touching call sites.
#[derive(Clone)]
pub struct AppState {
    pub contact_store: Arc<dyn ContactMessageStore>,
    pub newsletter_store: Arc<dyn NewsletterStore>,
    pub chat_store: Arc<dyn ChatSessionStore>,
    pub notifier: Arc<dyn LeadNotifier>,
    pub content_source: Arc<dyn PageContentSource>,
    pub config: Arc<Config>,
}
