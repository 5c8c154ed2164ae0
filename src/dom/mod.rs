// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Markup inspector for fetched portal pages
//!
//! Parses raw HTML into a flat, document-ordered element table built on
//! html5ever and answers the structural questions the WebForms flows
//! need: find an input by name, list inputs of a type, list buttons and
//! anchors, read an element's attributes and text. Read-only by
//! contract; parsing is tolerant and never fails on malformed markup.

mod document;
mod element;
mod parser;

pub use document::Document;
pub use element::Element;
pub use parser::{parse_html, parse_html_with_url};
