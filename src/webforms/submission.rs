// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Outbound form submission payloads

use std::fmt;

use super::hidden_fields;
use super::state::PostbackState;

/// The outbound payload of one form-encoded POST
///
/// Insertion-ordered; setting an existing field overwrites its value in
/// place. Merges are therefore last-write-wins and never collide
/// silently: caller-supplied fields replace state-derived defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSubmission {
    fields: Vec<(String, String)>,
}

impl FormSubmission {
    /// Create an empty submission
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, overwriting any existing value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Merge fields in, last write wins
    pub fn merge<I, K, V>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in fields {
            self.set(name, value);
        }
    }

    /// Get a field value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Check if a field is set
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the submission carries no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Encode as an `application/x-www-form-urlencoded` body
    pub fn encode(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| format!("{}={}", url_encode(k), url_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for FormSubmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormSubmission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut submission = FormSubmission::new();
        submission.merge(iter);
        submission
    }
}

/// Build the payload for one postback against freshly extracted state
///
/// State fields are carried verbatim, skipping absent ones. The
/// synthetic `__EVENTTARGET`/`__EVENTARGUMENT` pair is set only when an
/// event target is supplied; the argument defaults to the empty string
/// the server expects. Caller fields merge last so they can override
/// state-derived defaults.
pub fn build_postback_payload<I, K, V>(
    state: &PostbackState,
    extra_fields: I,
    event_target: Option<&str>,
    event_argument: Option<&str>,
) -> FormSubmission
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut submission = FormSubmission::new();

    for (name, value) in state.present_fields() {
        submission.set(name, value);
    }

    if let Some(target) = event_target {
        submission.set(hidden_fields::EVENT_TARGET, target);
        submission.set(hidden_fields::EVENT_ARGUMENT, event_argument.unwrap_or(""));
    }

    submission.merge(extra_fields);
    submission
}

/// Percent-encode one form field component
fn url_encode(s: &str) -> String {
    let mut result = String::new();
    for c in s.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '~' => result.push(c),
            ' ' => result.push('+'),
            _ => {
                for byte in c.to_string().bytes() {
                    result.push_str(&format!("%{:02X}", byte));
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_state() -> PostbackState {
        PostbackState {
            view_state: Some("dDwt".to_string()),
            event_validation: Some("/wEWAg".to_string()),
            generator: Some("CA0B0334".to_string()),
        }
    }

    #[test]
    fn test_payload_without_event_target() {
        let payload = build_postback_payload(&full_state(), [("a", "1")], None, None);

        assert_eq!(payload.len(), 4);
        assert_eq!(payload.get("__VIEWSTATE"), Some("dDwt"));
        assert_eq!(payload.get("__VIEWSTATEGENERATOR"), Some("CA0B0334"));
        assert_eq!(payload.get("__EVENTVALIDATION"), Some("/wEWAg"));
        assert_eq!(payload.get("a"), Some("1"));
        assert!(!payload.contains("__EVENTTARGET"));
        assert!(!payload.contains("__EVENTARGUMENT"));
    }

    #[test]
    fn test_payload_with_event_target() {
        let payload = build_postback_payload(
            &full_state(),
            std::iter::empty::<(&str, &str)>(),
            Some("lnkExportPdf"),
            None,
        );

        assert_eq!(payload.get("__EVENTTARGET"), Some("lnkExportPdf"));
        assert_eq!(payload.get("__EVENTARGUMENT"), Some(""));
    }

    #[test]
    fn test_absent_state_fields_skipped() {
        let state = PostbackState {
            view_state: Some("dDwt".to_string()),
            ..Default::default()
        };
        let payload =
            build_postback_payload(&state, std::iter::empty::<(&str, &str)>(), None, None);

        assert!(payload.contains("__VIEWSTATE"));
        assert!(!payload.contains("__EVENTVALIDATION"));
        assert!(!payload.contains("__VIEWSTATEGENERATOR"));
    }

    #[test]
    fn test_caller_fields_override_state() {
        let payload = build_postback_payload(&full_state(), [("__VIEWSTATE", "caller")], None, None);

        assert_eq!(payload.get("__VIEWSTATE"), Some("caller"));
        // override replaces in place, no duplicate key on the wire
        assert_eq!(
            payload.iter().filter(|(n, _)| *n == "__VIEWSTATE").count(),
            1
        );
    }

    #[test]
    fn test_encode_escapes_reserved_chars() {
        let payload = FormSubmission::new()
            .with("__VIEWSTATE", "a+b/c=")
            .with("mes", "05");

        assert_eq!(payload.encode(), "__VIEWSTATE=a%2Bb%2Fc%3D&mes=05");
    }
}
