//! Integration tests for the file-backed record store.

use api_lib::adapters::JsonFileAdapter;
use drivepixel_core::domain::{
    IncomingChatMessage, MessageStatus, NewContactMessage, SessionStatus,
};
use drivepixel_core::ports::{
    ChatSessionStore, ContactMessageStore, NewsletterStore, PortError,
};
use tempfile::TempDir;

fn store() -> (TempDir, JsonFileAdapter) {
    let dir = tempfile::tempdir().expect("tempdir");
    let adapter = JsonFileAdapter::new(dir.path());
    (dir, adapter)
}

fn contact(name: &str) -> NewContactMessage {
    NewContactMessage {
        full_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        service: "IT Services".to_string(),
        message: "Hello".to_string(),
    }
}

fn chat_message(session_id: Option<&str>, message: &str) -> IncomingChatMessage {
    IncomingChatMessage {
        session_id: session_id.map(str::to_string),
        sender: "visitor".to_string(),
        message: message.to_string(),
        page_url: Some("/services".to_string()),
        name: None,
        email: None,
        session_complete: false,
    }
}

#[tokio::test]
async fn missing_file_reads_as_empty_collection() {
    let (_dir, adapter) = store();
    assert!(ContactMessageStore::list(&adapter).await.unwrap().is_empty());
    assert!(NewsletterStore::list(&adapter).await.unwrap().is_empty());
    assert!(ChatSessionStore::list(&adapter).await.unwrap().is_empty());
}

#[tokio::test]
async fn contact_messages_are_stored_newest_first() {
    let (_dir, adapter) = store();
    adapter.create(contact("First")).await.unwrap();
    adapter.create(contact("Second")).await.unwrap();

    let all = ContactMessageStore::list(&adapter).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].full_name, "Second");
    assert_eq!(all[1].full_name, "First");
    assert_eq!(all[0].status, MessageStatus::Unread);
}

#[tokio::test]
async fn update_status_flips_unread_to_read() {
    let (_dir, adapter) = store();
    let created = adapter.create(contact("Ana")).await.unwrap();

    let updated = adapter
        .update_status(&created.id, MessageStatus::Read)
        .await
        .unwrap();
    assert_eq!(updated.status, MessageStatus::Read);

    let all = ContactMessageStore::list(&adapter).await.unwrap();
    assert_eq!(all[0].status, MessageStatus::Read);
}

#[tokio::test]
async fn update_status_on_absent_id_is_not_found() {
    let (_dir, adapter) = store();
    let err = adapter
        .update_status("nope", MessageStatus::Read)
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::NotFound(_)));
}

#[tokio::test]
async fn deleting_absent_contact_id_is_a_noop_success() {
    let (_dir, adapter) = store();
    adapter.create(contact("Ana")).await.unwrap();

    ContactMessageStore::delete(&adapter, "nope").await.unwrap();
    assert_eq!(ContactMessageStore::list(&adapter).await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_newsletter_email_is_a_conflict() {
    let (_dir, adapter) = store();
    adapter.subscribe("ana@example.com", "website").await.unwrap();

    let err = adapter
        .subscribe("ana@example.com", "footer")
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::Conflict(_)));

    let all = NewsletterStore::list(&adapter).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].source, "website");
}

#[tokio::test]
async fn subscribers_append_in_signup_order() {
    let (_dir, adapter) = store();
    adapter.subscribe("a@example.com", "website").await.unwrap();
    adapter.subscribe("b@example.com", "website").await.unwrap();

    let all = NewsletterStore::list(&adapter).await.unwrap();
    assert_eq!(all[0].email, "a@example.com");
    assert_eq!(all[1].email, "b@example.com");
}

#[tokio::test]
async fn chat_message_without_session_id_starts_a_session() {
    let (_dir, adapter) = store();
    let session = adapter
        .apply_message(chat_message(None, "hello"))
        .await
        .unwrap();

    assert!(!session.session_id.is_empty());
    assert_eq!(session.messages.len(), 1);
    assert_eq!(session.status, SessionStatus::Active);
    assert_eq!(session.page_url.as_deref(), Some("/services"));
    assert!(!session.email_sent);
}

#[tokio::test]
async fn unknown_session_id_also_starts_a_fresh_session() {
    let (_dir, adapter) = store();
    let session = adapter
        .apply_message(chat_message(Some("never-seen"), "hello"))
        .await
        .unwrap();
    // A fresh id is synthesized rather than adopting the unknown one.
    assert_ne!(session.session_id, "never-seen");
}

#[tokio::test]
async fn service_inference_is_sticky_across_messages() {
    let (_dir, adapter) = store();
    let first = adapter
        .apply_message(chat_message(None, "I need real estate help"))
        .await
        .unwrap();
    assert_eq!(first.service.as_deref(), Some("Real Estate Services"));

    let id = first.session_id.clone();
    adapter
        .apply_message(chat_message(Some(&id), "also ecommerce maybe"))
        .await
        .unwrap();
    let third = adapter
        .apply_message(chat_message(Some(&id), "thanks"))
        .await
        .unwrap();

    assert_eq!(third.service.as_deref(), Some("Real Estate Services"));
    assert_eq!(third.messages.len(), 3);
}

#[tokio::test]
async fn mark_email_sent_is_recorded() {
    let (_dir, adapter) = store();
    let session = adapter
        .apply_message(chat_message(None, "hello"))
        .await
        .unwrap();

    adapter.mark_email_sent(&session.session_id).await.unwrap();
    let stored = adapter.get(&session.session_id).await.unwrap().unwrap();
    assert!(stored.email_sent);
    assert!(stored.email_sent_at.is_some());
}

#[tokio::test]
async fn get_unknown_session_is_none() {
    let (_dir, adapter) = store();
    assert!(adapter.get("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn malformed_json_propagates_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("contact_messages.json"), "not json").unwrap();

    let adapter = JsonFileAdapter::new(dir.path());
    let err = ContactMessageStore::list(&adapter).await.unwrap_err();
    assert!(matches!(err, PortError::Unexpected(_)));
}
