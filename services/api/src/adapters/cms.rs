//! services/api/src/adapters/cms.rs
//!
//! This module contains the adapter for the admin CMS content endpoint. It
//! implements the `PageContentSource` port from the `core` crate.

use async_trait::async_trait;
use serde::Deserialize;

use drivepixel_core::domain::SitePageContent;
use drivepixel_core::ports::{PageContentSource, PortError, PortResult};

/// The `{success, data}` envelope the CMS endpoint answers with.
#[derive(Deserialize)]
struct CmsEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<SitePageContent>,
}

/// An adapter that implements the `PageContentSource` port against the admin
/// CMS backend.
#[derive(Clone)]
pub struct HttpPageContentSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPageContentSource {
    /// Creates a new `HttpPageContentSource`. `base_url` carries no trailing
    /// slash.
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl PageContentSource for HttpPageContentSource {
    /// Fetches the content document for one page path. A non-success status
    /// or a `success: false` envelope both mean "the CMS has nothing for this
    /// path" and map to `NotFound`; transport failures map to `Unexpected`.
    async fn fetch_page(&self, path: &str) -> PortResult<SitePageContent> {
        let url = format!("{}/api/admin/site-content/page/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("Content fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(PortError::NotFound(format!(
                "No CMS content for path '{}' (status {})",
                path,
                response.status()
            )));
        }

        let envelope: CmsEnvelope = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(format!("Malformed CMS response: {}", e)))?;

        match envelope {
            CmsEnvelope {
                success: true,
                data: Some(content),
            } => Ok(content),
            _ => Err(PortError::NotFound(format!(
                "No CMS content for path '{}'",
                path
            ))),
        }
    }
}
