// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! WebForms page mechanics
//!
//! ASP.NET WebForms pages are stateful on the server side through hidden
//! fields the client must round-trip byte-for-byte on every submission.
//! This module tracks that state, builds postback payloads, and
//! heuristically classifies the interactive controls a page exposes.

mod controls;
mod state;
mod submission;

pub use controls::{ControlRef, ControlResolver, ExportMatch, FieldMatch, SubmitMatch};
pub use state::{resolve_action_url, PostbackState};
pub use submission::{build_postback_payload, FormSubmission};

/// Hidden field names a WebForms server emits and expects back verbatim
pub mod hidden_fields {
    /// Opaque serialized page state
    pub const VIEW_STATE: &str = "__VIEWSTATE";
    /// Integrity token for acceptable postback events
    pub const EVENT_VALIDATION: &str = "__EVENTVALIDATION";
    /// Id of the view-state generator
    pub const VIEW_STATE_GENERATOR: &str = "__VIEWSTATEGENERATOR";
    /// Server-side control id addressed by a synthetic postback
    pub const EVENT_TARGET: &str = "__EVENTTARGET";
    /// Argument of a synthetic postback event
    pub const EVENT_ARGUMENT: &str = "__EVENTARGUMENT";
}
