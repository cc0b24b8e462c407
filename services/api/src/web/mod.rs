pub mod chat;
pub mod pages;
pub mod rest;
pub mod state;

// Re-export the handlers the server binary wires into the router.
pub use chat::{get_chat_sessions_handler, post_chat_message_handler};
pub use pages::page_handler;
pub use rest::{
    create_contact_handler, create_newsletter_handler, delete_contact_handler,
    delete_newsletter_handler, list_contact_handler, list_newsletter_handler,
    update_contact_status_handler,
};
