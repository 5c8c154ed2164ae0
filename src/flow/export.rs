// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Report export flow
//!
//! Fetches a report page, re-posts its hidden state together with the
//! caller's period filters and the resolved export trigger, then
//! resolves whatever downloadable document the server answered with.

use url::Url;

use super::artifact::{resolve_artifact, DownloadArtifact};
use crate::dom::parse_html_with_url;
use crate::error::{ControlRole, Error, Result};
use crate::http::Session;
use crate::webforms::{
    build_postback_payload, resolve_action_url, ControlRef, ControlResolver, PostbackState,
};

/// Submitted value for a named export control that renders without one
pub const EXPORT_TRIGGER_VALUE: &str = "Exportar";

/// One export invocation against one report page
///
/// Period field names vary per report page and are supplied by the
/// caller; there is no auto-discovery of business fields.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    /// Report page URL
    pub page_url: Url,
    /// Period filter fields, e.g. month/year selects, by wire name
    pub period_params: Vec<(String, String)>,
    /// Explicit export control name, overriding heuristic resolution
    pub export_control: Option<String>,
}

impl ExportRequest {
    /// Create a request for a report page
    pub fn new(page_url: Url) -> Self {
        Self {
            page_url,
            period_params: Vec::new(),
            export_control: None,
        }
    }

    /// Add a period parameter using the field name present on the page
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.period_params.push((name.into(), value.into()));
        self
    }

    /// Override export control resolution with an explicit field name
    pub fn export_control(mut self, name: impl Into<String>) -> Self {
        self.export_control = Some(name.into());
        self
    }
}

/// Report export driver
#[derive(Debug, Clone, Default)]
pub struct ReportExporter {
    resolver: ControlResolver,
}

impl ReportExporter {
    /// Create an exporter with default control resolution
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a customized control resolver
    pub fn with_resolver(mut self, resolver: ControlResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Run one export and resolve the produced artifact
    pub async fn fetch_export(
        &self,
        session: &Session,
        request: &ExportRequest,
    ) -> Result<DownloadArtifact> {
        tracing::info!(url = %request.page_url, "fetching report page");
        let page = session.get(request.page_url.as_str()).await?;
        if !page.is_success() {
            return Err(Error::transport_status(
                request.page_url.as_str(),
                page.status_code(),
                "cannot open report page",
            ));
        }

        let body = page.text_lossy();
        let doc = parse_html_with_url(&body, Some(page.url.clone()));
        let state = PostbackState::extract(&doc);
        let action = resolve_action_url(&page.url, &doc);

        let control = match request.export_control.clone() {
            Some(name) => {
                let value = doc.input_by_name(&name).and_then(|el| el.value());
                ControlRef::NamedField { name, value }
            }
            None => {
                let resolved = self
                    .resolver
                    .resolve_export_control(&doc)
                    .ok_or(Error::resolution(ControlRole::Export))?;
                tracing::debug!(control = ?resolved.control, keyword = %resolved.keyword, "export control resolved");
                resolved.control
            }
        };

        let payload = match &control {
            ControlRef::NamedField { name, value } => {
                let trigger = value.clone().unwrap_or_else(|| EXPORT_TRIGGER_VALUE.to_string());
                let mut payload =
                    build_postback_payload(&state, request.period_params.clone(), None, None);
                payload.set(name.clone(), trigger);
                payload
            }
            ControlRef::PostbackTarget { id } => {
                build_postback_payload(&state, request.period_params.clone(), Some(id), None)
            }
        };

        tracing::info!(action = %action, fields = payload.len(), "submitting export postback");
        let response = session.post_form(action.as_str(), payload.encode()).await?;
        if !response.is_success() {
            return Err(Error::transport_status(
                action.as_str(),
                response.status_code(),
                "export submission failed",
            ));
        }

        resolve_artifact(session, response).await
    }
}

/// Run one export with default control resolution
pub async fn fetch_export(
    session: &Session,
    request: &ExportRequest,
) -> Result<DownloadArtifact> {
    ReportExporter::new().fetch_export(session, request).await
}
