// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Document representation and structural lookups

use url::Url;

use super::element::Element;

/// One parsed element: tag, attributes, subtree text, parent link
#[derive(Debug, Clone)]
pub(crate) struct ElementData {
    /// Lowercased tag name
    pub tag: String,
    /// Attributes in markup order, names lowercased
    pub attrs: Vec<(String, String)>,
    /// Concatenated subtree text content
    pub text: String,
    /// Index of the parent element, if any
    pub parent: Option<usize>,
}

/// Parsed HTML document with document-ordered element access
#[derive(Debug, Clone)]
pub struct Document {
    /// URL the markup was fetched from
    pub url: Option<Url>,
    elements: Vec<ElementData>,
}

impl Document {
    pub(crate) fn new(url: Option<Url>, elements: Vec<ElementData>) -> Self {
        Self { url, elements }
    }

    pub(crate) fn data(&self, idx: usize) -> &ElementData {
        &self.elements[idx]
    }

    /// Number of elements in the document
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the document contains no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// All elements in document order
    pub fn elements(&self) -> impl Iterator<Item = Element<'_>> {
        (0..self.elements.len()).map(move |idx| Element::new(self, idx))
    }

    /// All elements with the given tag, in document order
    pub fn find_by_tag(&self, tag: &str) -> Vec<Element<'_>> {
        self.elements()
            .filter(|e| e.tag() == tag)
            .collect()
    }

    /// Find an input element by exact `name` attribute
    pub fn input_by_name(&self, name: &str) -> Option<Element<'_>> {
        self.elements()
            .find(|e| e.tag() == "input" && e.name().as_deref() == Some(name))
    }

    /// All input elements of the given type, in document order
    ///
    /// An input with no `type` attribute is a text input per the HTML
    /// default, and portals lean on that default heavily.
    pub fn inputs_with_type(&self, input_type: &str) -> Vec<Element<'_>> {
        self.find_by_tag("input")
            .into_iter()
            .filter(|e| e.input_type().eq_ignore_ascii_case(input_type))
            .collect()
    }

    /// All `<button>` elements
    pub fn buttons(&self) -> Vec<Element<'_>> {
        self.find_by_tag("button")
    }

    /// All `<a>` elements
    pub fn anchors(&self) -> Vec<Element<'_>> {
        self.find_by_tag("a")
    }

    /// All `<form>` elements
    pub fn forms(&self) -> Vec<Element<'_>> {
        self.find_by_tag("form")
    }

    /// All `<script>` elements
    pub fn scripts(&self) -> Vec<Element<'_>> {
        self.find_by_tag("script")
    }

    /// Interactive elements (inputs, buttons, anchors, selects) in
    /// document order, for id-based postback target searches
    pub fn interactive_elements(&self) -> Vec<Element<'_>> {
        self.elements()
            .filter(|e| matches!(e.tag(), "input" | "button" | "a" | "select"))
            .collect()
    }

    /// The `action` attribute of the first form carrying one
    pub fn first_form_action(&self) -> Option<String> {
        self.forms().into_iter().find_map(|f| f.attr("action"))
    }

    /// Document title text
    pub fn title(&self) -> Option<String> {
        self.find_by_tag("title")
            .into_iter()
            .next()
            .map(|e| e.text().trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::parse_html;

    #[test]
    fn test_input_by_name_exact() {
        let doc = parse_html(
            r#"<form>
                <input type="hidden" name="__VIEWSTATE" value="dDwt">
                <input type="text" name="txtUser">
            </form>"#,
        );

        let vs = doc.input_by_name("__VIEWSTATE").unwrap();
        assert_eq!(vs.value().as_deref(), Some("dDwt"));
        assert!(doc.input_by_name("__EVENTVALIDATION").is_none());
    }

    #[test]
    fn test_untyped_input_is_text() {
        let doc = parse_html(r#"<input name="plain"><input type="password" name="pwd">"#);
        let text_inputs = doc.inputs_with_type("text");
        assert_eq!(text_inputs.len(), 1);
        assert_eq!(text_inputs[0].name().as_deref(), Some("plain"));
    }

    #[test]
    fn test_first_form_action() {
        let doc = parse_html(r#"<form></form><form action="login.aspx"></form>"#);
        assert_eq!(doc.first_form_action().as_deref(), Some("login.aspx"));
    }

    #[test]
    fn test_interactive_elements_order() {
        let doc = parse_html(
            r#"<a id="lnk">x</a><input name="i" type="submit"><button id="b">y</button>"#,
        );
        let tags: Vec<_> = doc.interactive_elements().iter().map(|e| e.tag().to_string()).collect();
        assert_eq!(tags, vec!["a", "input", "button"]);
    }
}
