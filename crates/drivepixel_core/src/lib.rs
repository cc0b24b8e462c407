pub mod chat;
pub mod domain;
pub mod ports;
pub mod render;

pub use domain::{
    BlockContent, ChatMessage, ChatSession, ContactMessage, ContentBlock, IncomingChatMessage,
    Lead, MessageStatus, NewContactMessage, NewsletterSubscriber, SessionStatus, SitePageContent,
    TextStyle,
};
pub use ports::{
    ChatSessionStore, ContactMessageStore, LeadNotifier, NewsletterStore, PageContentSource,
    PortError, PortResult,
};
