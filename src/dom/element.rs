// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Element handles over the parsed document

use super::document::Document;

/// Borrowed handle to one element in a [`Document`]
#[derive(Debug, Clone, Copy)]
pub struct Element<'doc> {
    doc: &'doc Document,
    idx: usize,
}

impl<'doc> Element<'doc> {
    pub(crate) fn new(doc: &'doc Document, idx: usize) -> Self {
        Self { doc, idx }
    }

    /// Lowercased tag name
    pub fn tag(&self) -> &'doc str {
        &self.doc.data(self.idx).tag
    }

    /// Get an attribute value (attribute names are matched lowercased)
    pub fn attr(&self, name: &str) -> Option<String> {
        self.doc
            .data(self.idx)
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    /// Check if the element carries an attribute
    pub fn has_attr(&self, name: &str) -> bool {
        self.doc.data(self.idx).attrs.iter().any(|(n, _)| n == name)
    }

    /// The `id` attribute
    pub fn id(&self) -> Option<String> {
        self.attr("id")
    }

    /// The `name` attribute
    pub fn name(&self) -> Option<String> {
        self.attr("name")
    }

    /// The `value` attribute
    pub fn value(&self) -> Option<String> {
        self.attr("value")
    }

    /// The `href` attribute
    pub fn href(&self) -> Option<String> {
        self.attr("href")
    }

    /// Effective input type: the `type` attribute, defaulting to `text`
    pub fn input_type(&self) -> String {
        self.attr("type")
            .map(|t| t.to_lowercase())
            .unwrap_or_else(|| "text".to_string())
    }

    /// Concatenated subtree text content
    pub fn text(&self) -> &'doc str {
        &self.doc.data(self.idx).text
    }

    /// Parent element, if any
    pub fn parent(&self) -> Option<Element<'doc>> {
        self.doc
            .data(self.idx)
            .parent
            .map(|p| Element::new(self.doc, p))
    }

    /// Nearest enclosing element with the given tag, including self
    pub fn closest(&self, tag: &str) -> Option<Element<'doc>> {
        let mut current = Some(*self);
        while let Some(el) = current {
            if el.tag() == tag {
                return Some(el);
            }
            current = el.parent();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::parse_html;

    #[test]
    fn test_attribute_accessors() {
        let doc = parse_html(
            r#"<input type="SUBMIT" id="btnGo" name="btnExportar" value="Exportar CSV">"#,
        );
        let el = doc.input_by_name("btnExportar").unwrap();

        assert_eq!(el.id().as_deref(), Some("btnGo"));
        assert_eq!(el.value().as_deref(), Some("Exportar CSV"));
        assert_eq!(el.input_type(), "submit");
        assert!(el.has_attr("value"));
        assert!(!el.has_attr("placeholder"));
    }

    #[test]
    fn test_closest_form() {
        let doc = parse_html(r#"<form action="a.aspx"><div><input name="x"></div></form>"#);
        let input = doc.input_by_name("x").unwrap();
        let form = input.closest("form").unwrap();
        assert_eq!(form.attr("action").as_deref(), Some("a.aspx"));
    }
}
