//! services/api/src/adapters/notify.rs
//!
//! This module contains the adapter for the outbound lead-notification
//! endpoint, which delegates to the external email-sending backend. It
//! implements the `LeadNotifier` port from the `core` crate.

use async_trait::async_trait;
use drivepixel_core::domain::Lead;
use drivepixel_core::ports::{LeadNotifier, PortError, PortResult};

/// An adapter that implements the `LeadNotifier` port by POSTing the lead as
/// JSON to the configured notification endpoint.
#[derive(Clone)]
pub struct HttpLeadNotifier {
    client: reqwest::Client,
    url: String,
}

impl HttpLeadNotifier {
    /// Creates a new `HttpLeadNotifier`.
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl LeadNotifier for HttpLeadNotifier {
    async fn notify(&self, lead: &Lead) -> PortResult<()> {
        let response = self
            .client
            .post(&self.url)
            .json(lead)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("Notification request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(PortError::Unexpected(format!(
                "Notification endpoint answered {}",
                response.status()
            )));
        }
        Ok(())
    }
}
