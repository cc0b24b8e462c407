//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the contact-form and newsletter REST
//! endpoints and the master definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use drivepixel_core::domain::{ContactMessage, MessageStatus, NewContactMessage, NewsletterSubscriber};
use drivepixel_core::ports::PortError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::error;
use utoipa::{IntoParams, OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        create_contact_handler,
        list_contact_handler,
        update_contact_status_handler,
        delete_contact_handler,
        create_newsletter_handler,
        list_newsletter_handler,
        delete_newsletter_handler,
        crate::web::chat::post_chat_message_handler,
        crate::web::chat::get_chat_sessions_handler,
    ),
    components(
        schemas(
            CreateContactRequest,
            UpdateContactStatusRequest,
            CreateNewsletterRequest,
            ContactMessageDto,
            SubscriberDto,
            ContactResponse,
            ContactListResponse,
            NewsletterResponse,
            NewsletterListResponse,
            OkBody,
            ErrorBody,
            crate::web::chat::ChatMessageRequest,
            crate::web::chat::ChatMessageData,
            crate::web::chat::ChatMessageResponse,
        )
    ),
    tags(
        (name = "DrivePixel API", description = "Contact, newsletter and chat lead-capture endpoints.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Shared Response and Error Plumbing
//=========================================================================================

/// The uniform failure body: `{success: false, error}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

/// The bare success body for operations that return no record.
#[derive(Serialize, ToSchema)]
pub struct OkBody {
    pub success: bool,
}

pub(crate) type HandlerError = (StatusCode, Json<ErrorBody>);

/// Maps the port failure taxonomy onto HTTP status codes. Storage failures
/// are logged here and surfaced as a generic 500 without detail.
pub(crate) fn port_error(err: PortError) -> HandlerError {
    let status = match &err {
        PortError::Validation(_) => StatusCode::BAD_REQUEST,
        PortError::NotFound(_) => StatusCode::NOT_FOUND,
        PortError::Conflict(_) => StatusCode::CONFLICT,
        PortError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let error = if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Storage failure: {:?}", err);
        "Internal server error".to_string()
    } else {
        err.to_string()
    };
    (status, Json(ErrorBody { success: false, error }))
}

pub(crate) fn bad_request(message: impl Into<String>) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            success: false,
            error: message.into(),
        }),
    )
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

/// The simple `local@domain.tld` shape check shared by the contact and
/// newsletter forms.
pub(crate) fn email_is_valid(email: &str) -> bool {
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"))
        .is_match(email)
}

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateContactRequest {
    #[serde(rename = "fullName", default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateContactStatusRequest {
    pub id: String,
    pub status: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateNewsletterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct DeleteParams {
    pub id: Option<String>,
}

/// A contact message as it appears on the wire.
#[derive(Serialize, ToSchema)]
pub struct ContactMessageDto {
    pub id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    pub service: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<ContactMessage> for ContactMessageDto {
    fn from(m: ContactMessage) -> Self {
        Self {
            id: m.id,
            full_name: m.full_name,
            email: m.email,
            service: m.service,
            message: m.message,
            status: match m.status {
                MessageStatus::Unread => "unread".to_string(),
                MessageStatus::Read => "read".to_string(),
            },
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct SubscriberDto {
    pub id: String,
    pub email: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

impl From<NewsletterSubscriber> for SubscriberDto {
    fn from(s: NewsletterSubscriber) -> Self {
        Self {
            id: s.id,
            email: s.email,
            source: s.source,
            created_at: s.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ContactResponse {
    pub success: bool,
    pub data: ContactMessageDto,
}

#[derive(Serialize, ToSchema)]
pub struct ContactListResponse {
    pub success: bool,
    pub data: Vec<ContactMessageDto>,
}

#[derive(Serialize, ToSchema)]
pub struct NewsletterResponse {
    pub success: bool,
    pub data: SubscriberDto,
}

#[derive(Serialize, ToSchema)]
pub struct NewsletterListResponse {
    pub success: bool,
    pub data: Vec<SubscriberDto>,
}

//=========================================================================================
// Contact Message Handlers
//=========================================================================================

/// Create a contact message from the public contact form.
///
/// All four fields are required and the email must have a `local@domain.tld`
/// shape; violations are rejected before anything touches storage.
#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = CreateContactRequest,
    responses(
        (status = 201, description = "Message stored", body = ContactResponse),
        (status = 400, description = "Validation failure", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn create_contact_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateContactRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let full_name = payload.full_name.trim();
    let email = payload.email.trim();
    let service = payload.service.trim();
    let message = payload.message.trim();

    if full_name.is_empty() || email.is_empty() || service.is_empty() || message.is_empty() {
        return Err(bad_request("All fields are required"));
    }
    if !email_is_valid(email) {
        return Err(bad_request("Invalid email address"));
    }

    let created = state
        .contact_store
        .create(NewContactMessage {
            full_name: full_name.to_string(),
            email: email.to_string(),
            service: service.to_string(),
            message: message.to_string(),
        })
        .await
        .map_err(port_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            success: true,
            data: created.into(),
        }),
    ))
}

/// List all contact messages, newest first (storage order).
#[utoipa::path(
    get,
    path = "/api/contact",
    responses(
        (status = 200, description = "All messages", body = ContactListResponse),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn list_contact_handler(
    State(state): State<AppState>,
) -> Result<Json<ContactListResponse>, HandlerError> {
    let messages = state.contact_store.list().await.map_err(port_error)?;
    Ok(Json(ContactListResponse {
        success: true,
        data: messages.into_iter().map(Into::into).collect(),
    }))
}

/// Update the read status of one contact message.
#[utoipa::path(
    patch,
    path = "/api/contact",
    request_body = UpdateContactStatusRequest,
    responses(
        (status = 200, description = "Updated message", body = ContactResponse),
        (status = 400, description = "Unknown status value", body = ErrorBody),
        (status = 404, description = "No message with that id", body = ErrorBody)
    )
)]
pub async fn update_contact_status_handler(
    State(state): State<AppState>,
    Json(payload): Json<UpdateContactStatusRequest>,
) -> Result<Json<ContactResponse>, HandlerError> {
    let status = match payload.status.as_str() {
        "unread" => MessageStatus::Unread,
        "read" => MessageStatus::Read,
        other => return Err(bad_request(format!("Unknown status '{}'", other))),
    };
    let updated = state
        .contact_store
        .update_status(&payload.id, status)
        .await
        .map_err(port_error)?;
    Ok(Json(ContactResponse {
        success: true,
        data: updated.into(),
    }))
}

/// Delete a contact message by id. Succeeds even when the id is absent from
/// the collection; only a missing `id` parameter is an error.
#[utoipa::path(
    delete,
    path = "/api/contact",
    params(DeleteParams),
    responses(
        (status = 200, description = "Deleted (or id was absent)", body = OkBody),
        (status = 400, description = "Missing id parameter", body = ErrorBody)
    )
)]
pub async fn delete_contact_handler(
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<OkBody>, HandlerError> {
    let id = params.id.ok_or_else(|| bad_request("id is required"))?;
    state.contact_store.delete(&id).await.map_err(port_error)?;
    Ok(Json(OkBody { success: true }))
}

//=========================================================================================
// Newsletter Handlers
//=========================================================================================

/// Subscribe an email to the newsletter. Duplicate emails are a 409.
#[utoipa::path(
    post,
    path = "/api/newsletter",
    request_body = CreateNewsletterRequest,
    responses(
        (status = 201, description = "Subscribed", body = NewsletterResponse),
        (status = 400, description = "Invalid email shape", body = ErrorBody),
        (status = 409, description = "Email already subscribed", body = ErrorBody)
    )
)]
pub async fn create_newsletter_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateNewsletterRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let email = payload.email.trim();
    if !email_is_valid(email) {
        return Err(bad_request("Invalid email address"));
    }
    let source = payload.source.as_deref().unwrap_or("website");

    let subscriber = state
        .newsletter_store
        .subscribe(email, source)
        .await
        .map_err(port_error)?;

    Ok((
        StatusCode::CREATED,
        Json(NewsletterResponse {
            success: true,
            data: subscriber.into(),
        }),
    ))
}

/// List all newsletter subscribers.
#[utoipa::path(
    get,
    path = "/api/newsletter",
    responses(
        (status = 200, description = "All subscribers", body = NewsletterListResponse),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn list_newsletter_handler(
    State(state): State<AppState>,
) -> Result<Json<NewsletterListResponse>, HandlerError> {
    let subscribers = state.newsletter_store.list().await.map_err(port_error)?;
    Ok(Json(NewsletterListResponse {
        success: true,
        data: subscribers.into_iter().map(Into::into).collect(),
    }))
}

/// Unsubscribe by id. Same contract as contact deletion.
#[utoipa::path(
    delete,
    path = "/api/newsletter",
    params(DeleteParams),
    responses(
        (status = 200, description = "Deleted (or id was absent)", body = OkBody),
        (status = 400, description = "Missing id parameter", body = ErrorBody)
    )
)]
pub async fn delete_newsletter_handler(
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<OkBody>, HandlerError> {
    let id = params.id.ok_or_else(|| bad_request("id is required"))?;
    state
        .newsletter_store
        .delete(&id)
        .await
        .map_err(port_error)?;
    Ok(Json(OkBody { success: true }))
}
