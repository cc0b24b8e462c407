//! services/api/src/adapters/json_store.rs
//!
//! This module contains the file-backed storage adapter, which is the concrete
//! implementation of the record-store ports from the `core` crate. Each record
//! kind lives in one pretty-printed JSON array file under the data directory.
//!
//! Every mutation is a full read-modify-write cycle: read the whole array,
//! change it in memory, rewrite the whole file. A per-kind async mutex
//! serializes those cycles so two concurrent requests against the same kind
//! cannot lose an update. There is no partial-write protection; a crash
//! mid-write can corrupt the file, which is an accepted limitation of this
//! storage.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};

use drivepixel_core::chat;
use drivepixel_core::domain::{
    ChatSession, ContactMessage, IncomingChatMessage, MessageStatus, NewContactMessage,
    NewsletterSubscriber,
};
use drivepixel_core::ports::{
    ChatSessionStore, ContactMessageStore, NewsletterStore, PortError, PortResult,
};

//=========================================================================================
// One JSON-Array File
//=========================================================================================

/// A single JSON-array file plus the mutex that serializes read-modify-write
/// cycles against it.
struct JsonCollection {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonCollection {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Acquires the per-kind mutation lock. Plain reads skip this; mutations
    /// hold it across their whole read-modify-write cycle.
    async fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }

    /// Reads the whole collection. A missing file or missing directory is
    /// treated as an empty collection, not an error; malformed JSON and any
    /// other I/O failure propagate.
    async fn read_all<T: DeserializeOwned>(&self) -> PortResult<Vec<T>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                PortError::Unexpected(format!(
                    "Malformed JSON in {}: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(PortError::Unexpected(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Rewrites the whole collection, creating the data directory first if
    /// needed. This is a full-file overwrite, not an append.
    async fn write_all<T: Serialize>(&self, records: &[T]) -> PortResult<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                PortError::Unexpected(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| PortError::Unexpected(format!("Failed to serialize records: {}", e)))?;
        tokio::fs::write(&self.path, json).await.map_err(|e| {
            PortError::Unexpected(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A storage adapter keeping one JSON file per record kind under a data
/// directory. Implements all three record-store ports.
pub struct JsonFileAdapter {
    contacts: JsonCollection,
    subscribers: JsonCollection,
    sessions: JsonCollection,
}

impl JsonFileAdapter {
    /// Creates a new `JsonFileAdapter` rooted at `data_dir`. Files are only
    /// created on first write.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            contacts: JsonCollection::new(data_dir.join("contact_messages.json")),
            subscribers: JsonCollection::new(data_dir.join("newsletter_subscribers.json")),
            sessions: JsonCollection::new(data_dir.join("chat_sessions.json")),
        }
    }
}

/// Time-derived id for contact messages and subscribers. Collisions are not a
/// concern at this storage's scale.
fn record_id(now: DateTime<Utc>) -> String {
    now.timestamp_millis().to_string()
}

/// Opaque session token: time component plus a random suffix.
fn session_id(now: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!("{}-{}", now.timestamp_millis(), suffix)
}

//=========================================================================================
// `ContactMessageStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ContactMessageStore for JsonFileAdapter {
    async fn list(&self) -> PortResult<Vec<ContactMessage>> {
        // Storage order is newest-first because `create` prepends; no sort here.
        self.contacts.read_all().await
    }

    async fn create(&self, new: NewContactMessage) -> PortResult<ContactMessage> {
        let _guard = self.contacts.lock().await;
        let mut records: Vec<ContactMessage> = self.contacts.read_all().await?;
        let now = Utc::now();
        let message = ContactMessage {
            id: record_id(now),
            full_name: new.full_name,
            email: new.email,
            service: new.service,
            message: new.message,
            status: MessageStatus::Unread,
            created_at: now,
        };
        records.insert(0, message.clone());
        self.contacts.write_all(&records).await?;
        Ok(message)
    }

    async fn update_status(
        &self,
        id: &str,
        status: MessageStatus,
    ) -> PortResult<ContactMessage> {
        let _guard = self.contacts.lock().await;
        let mut records: Vec<ContactMessage> = self.contacts.read_all().await?;
        let record = records
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| PortError::NotFound(format!("Contact message {} not found", id)))?;
        record.status = status;
        let updated = record.clone();
        self.contacts.write_all(&records).await?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> PortResult<()> {
        let _guard = self.contacts.lock().await;
        let mut records: Vec<ContactMessage> = self.contacts.read_all().await?;
        // Absent ids are a no-op success.
        records.retain(|m| m.id != id);
        self.contacts.write_all(&records).await
    }
}

//=========================================================================================
// `NewsletterStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl NewsletterStore for JsonFileAdapter {
    async fn list(&self) -> PortResult<Vec<NewsletterSubscriber>> {
        self.subscribers.read_all().await
    }

    async fn subscribe(&self, email: &str, source: &str) -> PortResult<NewsletterSubscriber> {
        let _guard = self.subscribers.lock().await;
        let mut records: Vec<NewsletterSubscriber> = self.subscribers.read_all().await?;
        if records.iter().any(|s| s.email == email) {
            return Err(PortError::Conflict(format!(
                "{} is already subscribed",
                email
            )));
        }
        let subscriber = NewsletterSubscriber {
            id: record_id(Utc::now()),
            email: email.to_string(),
            source: source.to_string(),
            created_at: Utc::now(),
        };
        // Subscribers append; only contact messages prepend.
        records.push(subscriber.clone());
        self.subscribers.write_all(&records).await?;
        Ok(subscriber)
    }

    async fn delete(&self, id: &str) -> PortResult<()> {
        let _guard = self.subscribers.lock().await;
        let mut records: Vec<NewsletterSubscriber> = self.subscribers.read_all().await?;
        records.retain(|s| s.id != id);
        self.subscribers.write_all(&records).await
    }
}

//=========================================================================================
// `ChatSessionStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ChatSessionStore for JsonFileAdapter {
    async fn list(&self) -> PortResult<Vec<ChatSession>> {
        self.sessions.read_all().await
    }

    async fn get(&self, session_id: &str) -> PortResult<Option<ChatSession>> {
        let records: Vec<ChatSession> = self.sessions.read_all().await?;
        Ok(records.into_iter().find(|s| s.session_id == session_id))
    }

    async fn apply_message(&self, incoming: IncomingChatMessage) -> PortResult<ChatSession> {
        let _guard = self.sessions.lock().await;
        let mut records: Vec<ChatSession> = self.sessions.read_all().await?;
        let now = Utc::now();

        // An absent or unknown session id starts a fresh session.
        let index = incoming
            .session_id
            .as_ref()
            .and_then(|id| records.iter().position(|s| &s.session_id == id))
            .unwrap_or_else(|| {
                records.push(chat::new_session(
                    session_id(now),
                    incoming.page_url.clone(),
                    now,
                ));
                records.len() - 1
            });

        chat::apply_message(
            &mut records[index],
            &incoming,
            now.timestamp_millis().to_string(),
            now,
        );
        let snapshot = records[index].clone();
        self.sessions.write_all(&records).await?;
        Ok(snapshot)
    }

    async fn mark_email_sent(&self, session_id: &str) -> PortResult<()> {
        let _guard = self.sessions.lock().await;
        let mut records: Vec<ChatSession> = self.sessions.read_all().await?;
        let session = records
            .iter_mut()
            .find(|s| s.session_id == session_id)
            .ok_or_else(|| PortError::NotFound(format!("Chat session {} not found", session_id)))?;
        session.email_sent = true;
        session.email_sent_at = Some(Utc::now());
        self.sessions.write_all(&records).await
    }
}
