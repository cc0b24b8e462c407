//! services/api/src/web/pages.rs
//!
//! The server-rendered page surface: a `ContentView` component that fetches
//! CMS content for a path and renders it, degrading to the caller-supplied
//! static fallback whenever the CMS has nothing for that path.

use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    response::Html,
};
use drivepixel_core::domain::SitePageContent;
use drivepixel_core::ports::PageContentSource;
use drivepixel_core::render;
use std::sync::Arc;
use tracing::warn;

//=========================================================================================
// ContentView (Renderer Component)
//=========================================================================================

/// Holds the renderer's only state: the current page path and the last
/// successfully fetched document for it. Content is discarded on path change,
/// and each path change triggers exactly one new fetch.
pub struct ContentView {
    source: Arc<dyn PageContentSource>,
    path: Option<String>,
    content: Option<SitePageContent>,
    failed: bool,
}

impl ContentView {
    pub fn new(source: Arc<dyn PageContentSource>) -> Self {
        Self {
            source,
            path: None,
            content: None,
            failed: false,
        }
    }

    /// Fetches content for `page_path` unless it is already the current path.
    /// Any failure (missing content, transport error) clears the content and
    /// sets the error flag; no retry happens until the path changes again.
    pub async fn load(&mut self, page_path: &str) {
        if self.path.as_deref() == Some(page_path) {
            return;
        }
        self.path = Some(page_path.to_string());
        match self.source.fetch_page(page_path).await {
            Ok(content) => {
                self.content = Some(content);
                self.failed = false;
            }
            Err(e) => {
                warn!("No CMS content for '{}': {}", page_path, e);
                self.content = None;
                self.failed = true;
            }
        }
    }

    pub fn content(&self) -> Option<&SitePageContent> {
        self.content.as_ref()
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Renders the fetched content, or the fallback as a hard substitution
    /// when there is none. No fallback means empty output.
    pub fn render(&self, fallback: Option<&str>) -> String {
        match &self.content {
            Some(page) => render::render_page(page),
            None => fallback.unwrap_or_default().to_string(),
        }
    }
}

//=========================================================================================
// SSR Page Handler
//=========================================================================================

/// Static markup served when the CMS has nothing for a path.
fn static_fallback(page_path: &str) -> &'static str {
    match page_path {
        "home" => {
            "<header class=\"hero\"><h1>One Drive Realty</h1>\
             <p>IT services and real estate, under one roof.</p></header>"
        }
        "contact" => "<h2>Get in touch</h2><p>Use the contact form to reach our team.</p>",
        _ => "<p>This page is coming soon.</p>",
    }
}

/// Serve one public page, rendered from CMS content blocks with a static
/// fallback per path.
pub async fn page_handler(
    State(state): State<AppState>,
    Path(page_path): Path<String>,
) -> Html<String> {
    let mut view = ContentView::new(state.content_source.clone());
    view.load(&page_path).await;

    let (title, description) = match view.content() {
        Some(page) => (
            page.meta_title
                .clone()
                .unwrap_or_else(|| page.title.clone()),
            page.meta_description.clone().unwrap_or_default(),
        ),
        None => ("One Drive Realty".to_string(), String::new()),
    };

    let body = view.render(Some(static_fallback(&page_path)));
    Html(format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
         <title>{}</title><meta name=\"description\" content=\"{}\"></head>\
         <body>{}</body></html>",
        render::escape_html(&title),
        render::escape_html(&description),
        body
    ))
}
