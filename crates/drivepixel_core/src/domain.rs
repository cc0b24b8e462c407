//! crates/drivepixel_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs serialize directly to the on-disk JSON collections and to
//! the wire format of the public API, so the serde attributes here are part
//! of the external contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

//=========================================================================================
// Contact Messages
//=========================================================================================

/// The read state of a contact message. Transitions only from `Unread` to `Read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Unread,
    Read,
}

/// A message submitted through the public contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    pub service: String,
    pub message: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
}

/// The validated input for creating a contact message.
#[derive(Debug, Clone)]
pub struct NewContactMessage {
    pub full_name: String,
    pub email: String,
    pub service: String,
    pub message: String,
}

//=========================================================================================
// Newsletter Subscribers
//=========================================================================================

/// A newsletter signup. `email` is unique across the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterSubscriber {
    pub id: String,
    pub email: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

//=========================================================================================
// Chat Sessions
//=========================================================================================

/// Whether the visitor is still chatting or has closed the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
}

/// A single message inside a chat session. The log is append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// A server-side aggregate of one visitor conversation, keyed by an opaque id.
///
/// `name`, `email` and `service` are the derived lead fields: the first two are
/// last-write-wins per field, while `service` is inferred once from message
/// text and never overwritten afterwards. `email_sent` is a monotonic flag;
/// it flips to `true` at most once per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub page_url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub status: SessionStatus,
    pub last_message_at: DateTime<Utc>,
    pub email_sent: bool,
    #[serde(default)]
    pub email_sent_at: Option<DateTime<Utc>>,
}

/// One inbound message from the chat widget, before it is applied to a session.
#[derive(Debug, Clone)]
pub struct IncomingChatMessage {
    pub session_id: Option<String>,
    pub sender: String,
    pub message: String,
    pub page_url: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub session_complete: bool,
}

/// The lead details forwarded to the outbound notification endpoint once a
/// session has collected all of them.
#[derive(Debug, Clone, Serialize)]
pub struct Lead {
    pub name: String,
    pub email: String,
    pub service: String,
}

//=========================================================================================
// CMS Site Content
//=========================================================================================

/// The CMS-authored representation of one public page. Read-only from the
/// renderer's perspective; the admin backend owns mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitePageContent {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub path: String,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub content_blocks: Vec<ContentBlock>,
}

/// One typed unit of CMS content as it arrives off the wire. `content` stays
/// a raw JSON value here; [`ContentBlock::parsed`] validates it into the
/// closed [`BlockContent`] union at the rendering boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(default)]
    pub id: i64,
    pub section_name: String,
    pub block_type: String,
    #[serde(default)]
    pub content: Value,
    pub section_order: i32,
    pub block_order: i32,
}

/// The presentational form selected by a text block's `style` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Heading,
    Subheading,
    Quote,
    Paragraph,
}

/// One entry in a features-grid block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub icon: Option<String>,
    pub title: String,
    pub description: String,
}

/// A hero block's call-to-action, present only when both text and url are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallToAction {
    pub text: String,
    pub url: String,
}

/// The closed union of block kinds the renderer understands. Anything else
/// lands in `Unknown`, which renders as a visible placeholder rather than
/// being dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockContent {
    Text {
        text: String,
        style: TextStyle,
    },
    Html {
        html: String,
    },
    Image {
        url: String,
        alt: String,
        caption: Option<String>,
    },
    Hero {
        title: String,
        subtitle: String,
        background_image: Option<String>,
        cta: Option<CallToAction>,
    },
    Features {
        title: String,
        features: Vec<Feature>,
    },
    Unknown {
        block_type: String,
    },
}

impl ContentBlock {
    /// Validates the raw `content` value into the typed union for this
    /// block's `block_type`. Missing fields default to empty rather than
    /// erroring; an unrecognized type becomes `BlockContent::Unknown`.
    pub fn parsed(&self) -> BlockContent {
        match self.block_type.as_str() {
            "text" => BlockContent::Text {
                text: str_field(&self.content, "text"),
                style: match opt_str_field(&self.content, "style").as_deref() {
                    Some("heading") => TextStyle::Heading,
                    Some("subheading") => TextStyle::Subheading,
                    Some("quote") => TextStyle::Quote,
                    _ => TextStyle::Paragraph,
                },
            },
            "html" => BlockContent::Html {
                html: str_field(&self.content, "html"),
            },
            "image" => BlockContent::Image {
                url: str_field(&self.content, "url"),
                alt: str_field(&self.content, "alt"),
                caption: opt_str_field(&self.content, "caption"),
            },
            "hero" => BlockContent::Hero {
                title: str_field(&self.content, "title"),
                subtitle: str_field(&self.content, "subtitle"),
                background_image: opt_str_field(&self.content, "background_image"),
                cta: match (
                    opt_str_field(&self.content, "cta_text"),
                    opt_str_field(&self.content, "cta_url"),
                ) {
                    (Some(text), Some(url)) => Some(CallToAction { text, url }),
                    _ => None,
                },
            },
            "features" => BlockContent::Features {
                title: str_field(&self.content, "title"),
                features: self
                    .content
                    .get("features")
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .map(|item| Feature {
                                icon: opt_str_field(item, "icon"),
                                title: str_field(item, "title"),
                                description: str_field(item, "description"),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            other => BlockContent::Unknown {
                block_type: other.to_string(),
            },
        }
    }
}

/// Reads a string field from a JSON object, defaulting to empty when it is
/// absent or not a string.
fn str_field(content: &Value, key: &str) -> String {
    content
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Reads a string field as `Some` only when it is present and non-empty.
fn opt_str_field(content: &Value, key: &str) -> Option<String> {
    content
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
