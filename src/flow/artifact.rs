// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Download artifact resolution
//!
//! An export postback answers in one of two shapes: the document bytes
//! directly, or an HTML page that points at the document (an anchor, or
//! a script fragment carrying the path). Resolution tries the direct
//! shape first, then chases links, then script references.

use std::path::Path;

use bytes::Bytes;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use super::response_excerpt;
use crate::dom::parse_html_with_url;
use crate::error::{Error, Result};
use crate::http::{Response, Session};

/// File extensions a report download can carry
pub const REPORT_EXTENSIONS: &[&str] = &[".pdf", ".csv", ".xls", ".xlsx", ".zip"];

lazy_static! {
    /// Quoted path ending in a report extension inside inline script
    static ref SCRIPT_PATH_RE: Regex =
        Regex::new(r#"(?i)["']([^"']+\.(?:pdf|csv|xlsx?|zip))["']"#).unwrap();
}

/// Kind of document an export produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Pdf,
    Csv,
    Spreadsheet,
    Archive,
    /// Binary of undetermined format
    Octet,
}

impl ArtifactKind {
    /// Classify a declared content type as a binary document kind
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let ct = content_type.to_lowercase();
        if ct.contains("application/pdf") {
            Some(ArtifactKind::Pdf)
        } else if ct.contains("text/csv") || ct.contains("application/csv") {
            Some(ArtifactKind::Csv)
        } else if ct.contains("vnd.ms-excel") || ct.contains("spreadsheetml") {
            Some(ArtifactKind::Spreadsheet)
        } else if ct.contains("application/zip") {
            Some(ArtifactKind::Archive)
        } else if ct.contains("application/octet-stream") || ct.contains("application/x-download")
        {
            Some(ArtifactKind::Octet)
        } else {
            None
        }
    }

    /// Classify leading bytes against known binary document signatures
    pub fn from_signature(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"%PDF") {
            Some(ArtifactKind::Pdf)
        } else if bytes.starts_with(b"PK\x03\x04") {
            // xlsx and zip share the container; the extension decides later
            Some(ArtifactKind::Archive)
        } else if bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0]) {
            // OLE compound document: legacy .xls
            Some(ArtifactKind::Spreadsheet)
        } else {
            None
        }
    }

    /// Classify a path by its report extension
    pub fn from_path(path: &str) -> Option<Self> {
        let lowered = path.to_lowercase();
        if lowered.ends_with(".pdf") {
            Some(ArtifactKind::Pdf)
        } else if lowered.ends_with(".csv") {
            Some(ArtifactKind::Csv)
        } else if lowered.ends_with(".xls") || lowered.ends_with(".xlsx") {
            Some(ArtifactKind::Spreadsheet)
        } else if lowered.ends_with(".zip") {
            Some(ArtifactKind::Archive)
        } else {
            None
        }
    }
}

/// How the artifact was located in the export response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "via", rename_all = "snake_case")]
pub enum ArtifactSource {
    /// The export response body was the document itself
    DirectResponse,
    /// An anchor in the response pointed at the document
    FollowedAnchor { href: String },
    /// A script block in the response carried the document path
    ScriptReference { path: String },
}

/// A resolved, downloadable report document
///
/// Produced once by artifact resolution and immutable afterwards; the
/// caller owns where (and whether) the bytes land on disk.
#[derive(Debug, Clone)]
pub struct DownloadArtifact {
    /// Raw document bytes
    pub bytes: Bytes,
    /// Inferred document kind
    pub kind: ArtifactKind,
    /// Declared content type of the response that carried the bytes
    pub content_type: Option<String>,
    /// URL the bytes were fetched from
    pub source_url: Url,
    /// How the artifact was located
    pub source: ArtifactSource,
}

impl DownloadArtifact {
    /// Artifact size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the artifact is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Persist the raw bytes to a caller-owned path
    pub async fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        tokio::fs::write(path, &self.bytes).await?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "artifact written");
        Ok(())
    }
}

/// Resolve the downloadable artifact produced by an export submission
pub async fn resolve_artifact(session: &Session, response: Response) -> Result<DownloadArtifact> {
    // Direct document: declared binary type or recognizable magic bytes
    let declared = response
        .content_type()
        .and_then(ArtifactKind::from_content_type);
    let sniffed = ArtifactKind::from_signature(&response.body);

    if let Some(kind) = declared.or(sniffed) {
        tracing::debug!(kind = ?kind, "export response is the document itself");
        return Ok(DownloadArtifact {
            kind,
            content_type: response.content_type().map(str::to_string),
            source_url: response.url.clone(),
            source: ArtifactSource::DirectResponse,
            bytes: response.body,
        });
    }

    // HTML-wrapped: chase an anchor, then a script reference
    let body = response.text_lossy();
    let doc = parse_html_with_url(&body, Some(response.url.clone()));

    let anchor_href = doc.anchors().into_iter().find_map(|a| {
        let href = a.href()?;
        has_report_extension(&href).then_some(href)
    });
    if let Some(href) = anchor_href {
        tracing::debug!(href = %href, "following export anchor");
        return follow(session, &response.url, &href, ArtifactSource::FollowedAnchor {
            href: href.clone(),
        })
        .await;
    }

    let script_path = doc.scripts().into_iter().find_map(|s| {
        SCRIPT_PATH_RE
            .captures(s.text())
            .map(|cap| cap[1].to_string())
    });
    if let Some(path) = script_path {
        tracing::debug!(path = %path, "following script-referenced document");
        return follow(session, &response.url, &path, ArtifactSource::ScriptReference {
            path: path.clone(),
        })
        .await;
    }

    Err(Error::artifact_not_found(response_excerpt(&body)))
}

/// GET a referenced document path and wrap it as an artifact
async fn follow(
    session: &Session,
    base: &Url,
    reference: &str,
    source: ArtifactSource,
) -> Result<DownloadArtifact> {
    let target = base.join(reference)?;
    let response = session.get(target.as_str()).await?;
    if !response.is_success() {
        return Err(Error::transport_status(
            target.as_str(),
            response.status_code(),
            "artifact link fetch failed",
        ));
    }

    let kind = ArtifactKind::from_path(reference)
        .or_else(|| {
            response
                .content_type()
                .and_then(ArtifactKind::from_content_type)
        })
        .or_else(|| ArtifactKind::from_signature(&response.body))
        .unwrap_or(ArtifactKind::Octet);

    Ok(DownloadArtifact {
        kind,
        content_type: response.content_type().map(str::to_string),
        source_url: response.url.clone(),
        source,
        bytes: response.body,
    })
}

/// Whether a path (ignoring query and fragment) ends in a report extension
fn has_report_extension(href: &str) -> bool {
    let path = href
        .split(['?', '#'])
        .next()
        .unwrap_or(href)
        .to_lowercase();
    REPORT_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_classification() {
        assert_eq!(
            ArtifactKind::from_content_type("application/pdf; charset=binary"),
            Some(ArtifactKind::Pdf)
        );
        assert_eq!(
            ArtifactKind::from_content_type("application/vnd.ms-excel"),
            Some(ArtifactKind::Spreadsheet)
        );
        assert_eq!(ArtifactKind::from_content_type("text/html"), None);
    }

    #[test]
    fn test_signature_sniffing() {
        assert_eq!(
            ArtifactKind::from_signature(b"%PDF-1.7 rest"),
            Some(ArtifactKind::Pdf)
        );
        assert_eq!(
            ArtifactKind::from_signature(b"PK\x03\x04zipdata"),
            Some(ArtifactKind::Archive)
        );
        assert_eq!(ArtifactKind::from_signature(b"<html>"), None);
    }

    #[test]
    fn test_report_extension_ignores_query() {
        assert!(has_report_extension("relatorio.csv"));
        assert!(has_report_extension("/tmp/Relatorio.PDF?sid=1"));
        assert!(has_report_extension("docs/report.xlsx#page"));
        assert!(!has_report_extension("menu.aspx"));
        assert!(!has_report_extension("report.csv.aspx"));
    }

    #[test]
    fn test_script_path_regex() {
        let script = r#"window.open('downloads/relatorio_05_2024.pdf', '_blank');"#;
        let cap = SCRIPT_PATH_RE.captures(script).unwrap();
        assert_eq!(&cap[1], "downloads/relatorio_05_2024.pdf");

        assert!(SCRIPT_PATH_RE.captures("var x = 'nothing here';").is_none());
    }
}
