// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Heuristic control classification
//!
//! WebForms pages expose no stable API, so interactive controls are
//! located by keyword inspection of their attributes and text. Every
//! resolver method is a pure function of the document: elements are
//! scanned in document order and keyword lists in declaration order,
//! first match wins, so the same document always yields the same
//! resolution. A successful match reports which keyword fired;
//! positional fallbacks report none.

use crate::dom::{Document, Element};

/// Default keywords marking a username / login / document-id input
pub const USERNAME_KEYWORDS: &[&str] =
    &["usuario", "user", "login", "cpf", "documento", "email", "e-mail"];

/// Default keywords marking a password input
pub const PASSWORD_KEYWORDS: &[&str] = &["senha", "pass", "pwd"];

/// Default keywords marking a login submit trigger
pub const SUBMIT_KEYWORDS: &[&str] = &[
    "entrar", "acessar", "login", "logar", "confirmar", "enviar", "ok", "submit",
];

/// Default keywords marking an export / report-generation trigger
pub const EXPORT_KEYWORDS: &[&str] = &[
    "exportar",
    "export",
    "gerar",
    "relatorio",
    "relatório",
    "csv",
    "pdf",
    "excel",
    "xls",
];

/// One interactive control, addressed the way it must be submitted
///
/// A named field submits as an ordinary form key. A postback target has
/// no client-visible name and is addressed through the synthetic
/// `__EVENTTARGET` field instead. Exactly one of the two applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlRef {
    /// Control submits as an ordinary named form field
    NamedField {
        name: String,
        value: Option<String>,
    },
    /// Control is addressed by server-side id via a synthetic postback
    PostbackTarget { id: String },
}

/// A resolved credential input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    /// The input's `name` attribute, used as the submission key
    pub name: String,
    /// Keyword that fired; `None` for the first-input positional fallback
    pub keyword: Option<String>,
}

impl FieldMatch {
    /// Whether this resolution came from the positional fallback rather
    /// than a keyword hit
    pub fn is_fallback(&self) -> bool {
        self.keyword.is_none()
    }
}

/// A resolved submit trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitMatch {
    /// The control's `name` attribute
    pub name: String,
    /// The control's `value` attribute (empty when absent)
    pub value: String,
    /// Keyword that fired
    pub keyword: String,
}

/// A resolved export trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportMatch {
    /// How the control must be submitted
    pub control: ControlRef,
    /// Keyword that fired
    pub keyword: String,
}

/// Keyword-driven control classifier
///
/// Defaults are tuned for Portuguese-language portals plus the common
/// English control names; extend the lists per portal when needed.
#[derive(Debug, Clone)]
pub struct ControlResolver {
    username_keywords: Vec<String>,
    password_keywords: Vec<String>,
    submit_keywords: Vec<String>,
    export_keywords: Vec<String>,
}

impl Default for ControlResolver {
    fn default() -> Self {
        Self {
            username_keywords: USERNAME_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            password_keywords: PASSWORD_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            submit_keywords: SUBMIT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            export_keywords: EXPORT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ControlResolver {
    /// Create a resolver with the default keyword lists
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a username keyword
    pub fn username_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.username_keywords.push(keyword.into().to_lowercase());
        self
    }

    /// Append a password keyword
    pub fn password_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.password_keywords.push(keyword.into().to_lowercase());
        self
    }

    /// Append a submit keyword
    pub fn submit_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.submit_keywords.push(keyword.into().to_lowercase());
        self
    }

    /// Append an export keyword
    pub fn export_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.export_keywords.push(keyword.into().to_lowercase());
        self
    }

    /// Resolve the username input on a login page
    ///
    /// Scans text-type inputs; falls back to the first named text input
    /// on the assumption that login forms are single-purpose.
    pub fn resolve_username_field(&self, doc: &Document) -> Option<FieldMatch> {
        self.resolve_credential_field(doc.inputs_with_type("text"), &self.username_keywords)
    }

    /// Resolve the password input on a login page
    pub fn resolve_password_field(&self, doc: &Document) -> Option<FieldMatch> {
        self.resolve_credential_field(doc.inputs_with_type("password"), &self.password_keywords)
    }

    fn resolve_credential_field(
        &self,
        inputs: Vec<Element<'_>>,
        keywords: &[String],
    ) -> Option<FieldMatch> {
        for input in &inputs {
            let Some(name) = input.name() else { continue };
            let haystack = attribute_haystack(input, &["id", "name", "placeholder"]);
            if let Some(keyword) = first_keyword_hit(&haystack, keywords) {
                return Some(FieldMatch {
                    name,
                    keyword: Some(keyword),
                });
            }
        }

        inputs.iter().find_map(|input| {
            input.name().map(|name| FieldMatch {
                name,
                keyword: None,
            })
        })
    }

    /// Resolve the submit trigger on a login form
    ///
    /// Absence is an expected outcome: the caller then omits the submit
    /// field entirely, which is what pressing Enter submits anyway.
    pub fn resolve_submit_control(&self, doc: &Document) -> Option<SubmitMatch> {
        for control in submit_candidates(doc) {
            let Some(name) = control.name() else { continue };
            let mut haystack = attribute_haystack(&control, &["id", "name", "value"]);
            haystack.push(' ');
            haystack.push_str(&control.text().to_lowercase());

            if let Some(keyword) = first_keyword_hit(&haystack, &self.submit_keywords) {
                return Some(SubmitMatch {
                    name,
                    value: control.value().unwrap_or_default(),
                    keyword,
                });
            }
        }
        None
    }

    /// Resolve the export trigger on a report page
    ///
    /// Tier (a): submit inputs and buttons matching an export keyword,
    /// preferring controls that expose a `name` attribute - those submit
    /// as ordinary named fields. Tier (b): when no named control
    /// matches, ids of all interactive elements are searched instead,
    /// preferring an id containing "export" over any other hit - those
    /// become synthetic postback targets.
    pub fn resolve_export_control(&self, doc: &Document) -> Option<ExportMatch> {
        // Tier (a): named submit controls
        let mut button_candidates = doc.inputs_with_type("submit");
        button_candidates.extend(doc.buttons());
        for control in &button_candidates {
            let Some(name) = control.name() else { continue };
            let mut haystack = attribute_haystack(control, &["id", "name", "value"]);
            haystack.push(' ');
            haystack.push_str(&control.text().to_lowercase());

            if let Some(keyword) = first_keyword_hit(&haystack, &self.export_keywords) {
                return Some(ExportMatch {
                    control: ControlRef::NamedField {
                        name,
                        value: control.value(),
                    },
                    keyword,
                });
            }
        }

        // Tier (b): id-addressed postback targets
        let mut id_matches = Vec::new();
        for element in doc.interactive_elements() {
            let Some(id) = element.id() else { continue };
            if let Some(keyword) = first_keyword_hit(&id.to_lowercase(), &self.export_keywords) {
                id_matches.push((id, keyword));
            }
        }

        id_matches
            .iter()
            .find(|(id, _)| id.to_lowercase().contains("export"))
            .or_else(|| id_matches.first())
            .map(|(id, keyword)| ExportMatch {
                control: ControlRef::PostbackTarget { id: id.clone() },
                keyword: keyword.clone(),
            })
    }
}

/// Submit inputs plus buttons in the submit role (an explicit
/// `type="submit"` or no type attribute, the HTML default for buttons)
fn submit_candidates<'doc>(doc: &'doc Document) -> Vec<Element<'doc>> {
    let mut candidates = doc.inputs_with_type("submit");
    candidates.extend(doc.buttons().into_iter().filter(|b| {
        b.attr("type")
            .map(|t| t.eq_ignore_ascii_case("submit"))
            .unwrap_or(true)
    }));
    candidates
}

/// Lowercased concatenation of the listed attributes
fn attribute_haystack(element: &Element<'_>, attrs: &[&str]) -> String {
    let mut haystack = String::new();
    for attr in attrs {
        if let Some(value) = element.attr(attr) {
            if !haystack.is_empty() {
                haystack.push(' ');
            }
            haystack.push_str(&value.to_lowercase());
        }
    }
    haystack
}

/// First keyword (in list order) contained in the haystack
fn first_keyword_hit(haystack: &str, keywords: &[String]) -> Option<String> {
    keywords
        .iter()
        .find(|kw| haystack.contains(kw.as_str()))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    const LOGIN_PAGE: &str = r#"
        <form action="login.aspx">
            <input type="text" id="txtUser" name="txtUser" placeholder="Usuário">
            <input type="password" id="txtSenha" name="txtSenha">
            <input type="submit" name="btnEntrar" value="Entrar">
        </form>
    "#;

    #[test]
    fn test_credential_resolution() {
        let doc = parse_html(LOGIN_PAGE);
        let resolver = ControlResolver::new();

        let user = resolver.resolve_username_field(&doc).unwrap();
        assert_eq!(user.name, "txtUser");
        assert!(!user.is_fallback());

        let pass = resolver.resolve_password_field(&doc).unwrap();
        assert_eq!(pass.name, "txtSenha");
        assert_eq!(pass.keyword.as_deref(), Some("senha"));
    }

    #[test]
    fn test_credential_fallback_to_first_input() {
        let doc = parse_html(
            r#"<form>
                <input type="text" name="campo1">
                <input type="text" name="campo2">
                <input type="password" name="campo3">
            </form>"#,
        );
        let resolver = ControlResolver::new();

        let user = resolver.resolve_username_field(&doc).unwrap();
        assert_eq!(user.name, "campo1");
        assert!(user.is_fallback());

        let pass = resolver.resolve_password_field(&doc).unwrap();
        assert_eq!(pass.name, "campo3");
        assert!(pass.is_fallback());
    }

    #[test]
    fn test_no_inputs_resolves_nothing() {
        let doc = parse_html("<div>static page</div>");
        let resolver = ControlResolver::new();

        assert_eq!(resolver.resolve_username_field(&doc), None);
        assert_eq!(resolver.resolve_password_field(&doc), None);
        assert_eq!(resolver.resolve_submit_control(&doc), None);
        assert_eq!(resolver.resolve_export_control(&doc), None);
    }

    #[test]
    fn test_submit_control_by_value() {
        let doc = parse_html(LOGIN_PAGE);
        let submit = ControlResolver::new().resolve_submit_control(&doc).unwrap();

        assert_eq!(submit.name, "btnEntrar");
        assert_eq!(submit.value, "Entrar");
        assert_eq!(submit.keyword, "entrar");
    }

    #[test]
    fn test_submit_button_text_matches() {
        let doc = parse_html(r#"<button name="b1">Acessar sistema</button>"#);
        let submit = ControlResolver::new().resolve_submit_control(&doc).unwrap();

        assert_eq!(submit.name, "b1");
        assert_eq!(submit.keyword, "acessar");
    }

    #[test]
    fn test_export_tier_a_named_field() {
        let doc = parse_html(r#"<input type="submit" name="btnExportar" value="Exportar CSV">"#);
        let export = ControlResolver::new().resolve_export_control(&doc).unwrap();

        assert_eq!(
            export.control,
            ControlRef::NamedField {
                name: "btnExportar".to_string(),
                value: Some("Exportar CSV".to_string()),
            }
        );
    }

    #[test]
    fn test_export_tier_b_postback_target() {
        let doc = parse_html(r##"<a id="lnkExportPdf" href="#">Export</a>"##);
        let export = ControlResolver::new().resolve_export_control(&doc).unwrap();

        assert_eq!(
            export.control,
            ControlRef::PostbackTarget {
                id: "lnkExportPdf".to_string(),
            }
        );
    }

    #[test]
    fn test_export_tier_b_prefers_export_id() {
        let doc = parse_html(
            r##"<a id="lnkRelatorioMensal" href="#">Mensal</a>
               <a id="lnkExportPdf" href="#">Export</a>"##,
        );
        let export = ControlResolver::new().resolve_export_control(&doc).unwrap();

        // "export" in the id outranks the earlier keyword hit
        assert_eq!(
            export.control,
            ControlRef::PostbackTarget {
                id: "lnkExportPdf".to_string(),
            }
        );
    }

    #[test]
    fn test_named_control_outranks_postback_target() {
        let doc = parse_html(
            r##"<a id="lnkExportPdf" href="#">Export</a>
               <input type="submit" name="btnGerar" value="Gerar relatório">"##,
        );
        let export = ControlResolver::new().resolve_export_control(&doc).unwrap();

        assert!(matches!(
            export.control,
            ControlRef::NamedField { ref name, .. } if name == "btnGerar"
        ));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let doc = parse_html(LOGIN_PAGE);
        let resolver = ControlResolver::new();

        assert_eq!(
            resolver.resolve_username_field(&doc),
            resolver.resolve_username_field(&doc)
        );
        assert_eq!(
            resolver.resolve_submit_control(&doc),
            resolver.resolve_submit_control(&doc)
        );

        let export_doc = parse_html(
            r##"<a id="lnkExportPdf" href="#">x</a><button id="btnGerarCsv">y</button>"##,
        );
        assert_eq!(
            resolver.resolve_export_control(&export_doc),
            resolver.resolve_export_control(&export_doc)
        );
    }

    #[test]
    fn test_custom_keyword_extension() {
        let doc = parse_html(r#"<input type="text" name="matricula">"#);
        let resolver = ControlResolver::new().username_keyword("matricula");

        let user = resolver.resolve_username_field(&doc).unwrap();
        assert_eq!(user.keyword.as_deref(), Some("matricula"));
    }
}
