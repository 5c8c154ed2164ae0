// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Mustekala - Headless ASP.NET WebForms Client
//!
//! A pure Rust client that drives legacy WebForms portals the way a
//! browser does, without executing script or rendering a DOM: form-based
//! login, byte-for-byte view-state carry-over between requests, and
//! report export with artifact download.
//!
//! ## Features
//!
//! - Postback state tracking: `__VIEWSTATE`/`__EVENTVALIDATION`/
//!   `__VIEWSTATEGENERATOR` extracted per page and replayed verbatim
//! - Synthetic postbacks: `__EVENTTARGET`/`__EVENTARGUMENT` submissions
//!   for controls with no client-visible name
//! - Heuristic control resolution: credential, submit and export
//!   controls located by keyword inspection, deterministically
//! - Session transport: persistent cookie jar, timeout/redirect policy
//! - Artifact resolution: direct binary responses, anchor-wrapped and
//!   script-wrapped downloads
//!
//! ## Example
//!
//! ```rust,no_run
//! use mustekala::{
//!     Authenticator, Credentials, ExportRequest, FormsAuthenticator, ReportExporter, Session,
//! };
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Session::new()?;
//!
//!     let login = FormsAuthenticator::new(Url::parse("https://portal.example/login.aspx")?);
//!     let outcome = login
//!         .authenticate(&session, &Credentials::new("user", "pass"))
//!         .await?;
//!     assert!(outcome.authenticated);
//!
//!     let request = ExportRequest::new(Url::parse("https://portal.example/reports/prod.aspx")?)
//!         .param("ddlMes", "05")
//!         .param("ddlAno", "2024");
//!     let artifact = ReportExporter::new().fetch_export(&session, &request).await?;
//!     artifact.write_to("producao_05_2024.pdf").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dom;
pub mod error;
pub mod flow;
pub mod http;
pub mod webforms;

// Re-exports for convenience

// Transport
pub use http::{Cookie, CookieJar, Request, Response, Session, SessionConfig};

// Markup inspection
pub use dom::{parse_html, parse_html_with_url, Document, Element};

// WebForms mechanics
pub use webforms::{
    build_postback_payload, hidden_fields, resolve_action_url, ControlRef, ControlResolver,
    ExportMatch, FieldMatch, FormSubmission, PostbackState, SubmitMatch,
};

// Flows
pub use flow::{
    confirm_downstream_access, fetch_export, ArtifactKind, ArtifactSource, AuthOutcome,
    Authenticator, Confidence, Credentials, DownloadArtifact, ExportRequest, FieldOverrides,
    FormsAuthenticator, ReportExporter,
};

// Errors
pub use error::{ControlRole, Error, Result};

/// Mustekala version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
