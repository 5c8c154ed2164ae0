// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Postback state extraction and action URL resolution
//!
//! State extracted from one page is valid for exactly one submission to
//! that page's action URL. State from a different page, or state already
//! consumed by a postback, is rejected or silently ignored by the
//! server; callers re-fetch instead of reusing.

use url::Url;

use super::hidden_fields;
use crate::dom::Document;

/// The hidden state fields a WebForms server issues with every page
///
/// `None` means the field was absent from the page (many pages omit one
/// or more); `Some("")` means present but empty. The two are distinct:
/// an absent field must not be sent back at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostbackState {
    /// `__VIEWSTATE` payload
    pub view_state: Option<String>,
    /// `__EVENTVALIDATION` payload
    pub event_validation: Option<String>,
    /// `__VIEWSTATEGENERATOR` id
    pub generator: Option<String>,
}

impl PostbackState {
    /// Extract the state fields from a fetched page
    pub fn extract(doc: &Document) -> Self {
        Self {
            view_state: hidden_value(doc, hidden_fields::VIEW_STATE),
            event_validation: hidden_value(doc, hidden_fields::EVENT_VALIDATION),
            generator: hidden_value(doc, hidden_fields::VIEW_STATE_GENERATOR),
        }
    }

    /// Check whether no state field was present on the page
    pub fn is_empty(&self) -> bool {
        self.view_state.is_none() && self.event_validation.is_none() && self.generator.is_none()
    }

    /// Present fields as (wire name, value) pairs, in wire order
    pub fn present_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = Vec::new();
        if let Some(ref v) = self.view_state {
            fields.push((hidden_fields::VIEW_STATE, v.as_str()));
        }
        if let Some(ref v) = self.generator {
            fields.push((hidden_fields::VIEW_STATE_GENERATOR, v.as_str()));
        }
        if let Some(ref v) = self.event_validation {
            fields.push((hidden_fields::EVENT_VALIDATION, v.as_str()));
        }
        fields
    }
}

/// An input that exists without a `value` attribute still counts as
/// present-but-empty; only a missing input yields `None`.
fn hidden_value(doc: &Document, name: &str) -> Option<String> {
    doc.input_by_name(name)
        .map(|el| el.value().unwrap_or_default())
}

/// Resolve the form's submission target against the page's own URL
///
/// Handles relative (`login.aspx`), absolute and protocol-relative
/// (`//host/app`) action attributes. A page with no form, no action
/// attribute, or an unparseable action submits back to the base URL,
/// which is what a browser does for WebForms self-postbacks.
pub fn resolve_action_url(base: &Url, doc: &Document) -> Url {
    match doc.first_form_action() {
        Some(action) if !action.trim().is_empty() => match base.join(action.trim()) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(action = %action, error = %e, "unresolvable form action, using base URL");
                base.clone()
            }
        },
        _ => base.clone(),
    }
}
