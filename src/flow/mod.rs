// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Portal flows built on the transport and WebForms layers
//!
//! The two flows here are the crate's outward surface: form-based
//! authentication and report export. Each flow invocation is scoped to
//! one session and one freshly fetched postback state; failures surface
//! to the caller, who decides whether to retry with fresh state.

pub mod artifact;
pub mod auth;
pub mod export;

pub use artifact::{ArtifactKind, ArtifactSource, DownloadArtifact};
pub use auth::{
    confirm_downstream_access, AuthOutcome, Authenticator, Confidence, Credentials,
    FieldOverrides, FormsAuthenticator,
};
pub use export::{fetch_export, ExportRequest, ReportExporter};

/// Longest response excerpt kept on outcomes and errors for diagnostics
const EXCERPT_CHARS: usize = 400;

/// Clip a response body for diagnostic surfaces, char-boundary safe
pub(crate) fn response_excerpt(body: &str) -> String {
    if body.chars().count() <= EXCERPT_CHARS {
        body.to_string()
    } else {
        body.chars().take(EXCERPT_CHARS).collect()
    }
}
