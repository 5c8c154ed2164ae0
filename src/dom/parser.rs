// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTML parser using html5ever
//!
//! Converts the rcdom tree into the flat element table the inspector
//! queries. Pre-order traversal keeps elements in document order, which
//! the control resolver relies on for deterministic results.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use url::Url;

use super::document::{Document, ElementData};

/// Parse HTML text into a Document
pub fn parse_html(html: &str) -> Document {
    parse_html_with_url(html, None)
}

/// Parse HTML text with the URL the markup was fetched from
pub fn parse_html_with_url(html: &str, url: Option<Url>) -> Document {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };

    // html5ever recovers from arbitrary malformed input; read_from over
    // an in-memory slice cannot fail.
    let dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .unwrap_or_default();

    let mut elements = Vec::new();
    collect(&dom.document, None, &mut elements);

    Document::new(url, elements)
}

/// Walk the rcdom subtree, appending element records in document order.
/// Returns the subtree's accumulated text content.
fn collect(handle: &Handle, parent: Option<usize>, out: &mut Vec<ElementData>) -> String {
    match handle.data {
        RcNodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            let idx = out.len();
            out.push(ElementData {
                tag: name.local.to_string().to_lowercase(),
                attrs: attrs
                    .borrow()
                    .iter()
                    .map(|a| (a.name.local.to_string().to_lowercase(), a.value.to_string()))
                    .collect(),
                text: String::new(),
                parent,
            });

            let mut text = String::new();
            for child in handle.children.borrow().iter() {
                text.push_str(&collect(child, Some(idx), out));
            }
            out[idx].text = text.clone();
            text
        }
        RcNodeData::Text { ref contents } => contents.borrow().to_string(),
        _ => {
            let mut text = String::new();
            for child in handle.children.borrow().iter() {
                text.push_str(&collect(child, parent, out));
            }
            text
        }
    }
}
