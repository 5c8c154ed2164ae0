// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Form-based authentication flow
//!
//! Drives the WebForms login sequence: fetch page, extract postback
//! state, resolve credential controls, submit, classify the response.
//! The `Authenticator` trait is the seam behind which other login
//! mechanisms (e.g. a real-browser fallback) can stand; all of them
//! leave the session's cookie jar holding an authenticated session.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use super::response_excerpt;
use crate::dom::parse_html_with_url;
use crate::error::{ControlRole, Error, Result};
use crate::http::Session;
use crate::webforms::{build_postback_payload, resolve_action_url, ControlResolver, PostbackState};

/// Keywords whose presence in a response marks a logged-in page
pub const POSITIVE_SIGNALS: &[&str] = &[
    "logout",
    "logoff",
    "sair",
    "sign out",
    "signout",
    "minha conta",
    "encerrar sess",
];

/// Keywords whose presence in a response marks a login page
pub const NEGATIVE_SIGNALS: &[&str] =
    &["senha", "password", "login", "usuario", "usuário", "username"];

/// Login credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Create credentials
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keep passwords out of logs and error chains.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Optional explicit field names overriding heuristic resolution
#[derive(Debug, Clone, Default)]
pub struct FieldOverrides {
    /// Username input name
    pub username_field: Option<String>,
    /// Password input name
    pub password_field: Option<String>,
    /// Submit control name
    pub submit_control: Option<String>,
}

impl FieldOverrides {
    /// Create empty overrides (all heuristic)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the username field name
    pub fn username_field(mut self, name: impl Into<String>) -> Self {
        self.username_field = Some(name.into());
        self
    }

    /// Set the password field name
    pub fn password_field(mut self, name: impl Into<String>) -> Self {
        self.password_field = Some(name.into());
        self
    }

    /// Set the submit control name
    pub fn submit_control(mut self, name: impl Into<String>) -> Self {
        self.submit_control = Some(name.into());
        self
    }
}

/// How confident the success classification is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Confidence {
    /// A positive signal keyword was present in the response
    Positive { signal: String },
    /// No negative signal was present either; some portals land on a
    /// dashboard with unrelated vocabulary. Known false-positive risk:
    /// a page may legitimately omit all keywords for other reasons.
    NoNegativeSignals,
}

impl Confidence {
    /// Whether this is the lower-confidence fallback classification
    pub fn is_low(&self) -> bool {
        matches!(self, Confidence::NoNegativeSignals)
    }
}

/// Result of one authentication attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthOutcome {
    /// Whether the response was classified as logged-in
    pub authenticated: bool,
    /// Classification confidence; absent when rejected
    pub confidence: Option<Confidence>,
    /// Rejection reason; absent on success
    pub reason: Option<String>,
    /// Clipped response body for diagnostics
    pub response_excerpt: String,
}

impl AuthOutcome {
    fn accepted(confidence: Confidence, excerpt: String) -> Self {
        Self {
            authenticated: true,
            confidence: Some(confidence),
            reason: None,
            response_excerpt: excerpt,
        }
    }

    fn rejected(reason: impl Into<String>, excerpt: String) -> Self {
        Self {
            authenticated: false,
            confidence: None,
            reason: Some(reason.into()),
            response_excerpt: excerpt,
        }
    }

    /// Whether the classification used the lower-confidence fallback
    pub fn is_low_confidence(&self) -> bool {
        self.confidence.as_ref().map_or(false, Confidence::is_low)
    }

    /// Convert a rejection into a typed error, for `?`-style callers
    pub fn into_result(self) -> Result<AuthOutcome> {
        if self.authenticated {
            Ok(self)
        } else {
            Err(Error::auth_rejected(
                self.reason
                    .unwrap_or_else(|| "login rejected by server".to_string()),
                self.response_excerpt,
            ))
        }
    }
}

/// An authentication mechanism producing a logged-in session
///
/// Implementations differ in how they log in (pure HTTP emulation here;
/// a browser-automation fallback elsewhere) but are identical at this
/// interface: after a successful call the session's transport carries
/// the server's session cookies.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Attempt to authenticate the given session
    async fn authenticate(&self, session: &Session, credentials: &Credentials)
        -> Result<AuthOutcome>;
}

/// Pure-HTTP WebForms login
#[derive(Debug, Clone)]
pub struct FormsAuthenticator {
    login_url: Url,
    overrides: FieldOverrides,
    resolver: ControlResolver,
}

impl FormsAuthenticator {
    /// Create an authenticator for a login page
    pub fn new(login_url: Url) -> Self {
        Self {
            login_url,
            overrides: FieldOverrides::default(),
            resolver: ControlResolver::default(),
        }
    }

    /// Replace heuristic resolution with explicit field names
    pub fn with_overrides(mut self, overrides: FieldOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Use a customized control resolver
    pub fn with_resolver(mut self, resolver: ControlResolver) -> Self {
        self.resolver = resolver;
        self
    }
}

#[async_trait]
impl Authenticator for FormsAuthenticator {
    async fn authenticate(
        &self,
        session: &Session,
        credentials: &Credentials,
    ) -> Result<AuthOutcome> {
        tracing::info!(url = %self.login_url, "fetching login page");
        let page = session.get(self.login_url.as_str()).await?;
        if !page.is_success() {
            return Ok(AuthOutcome::rejected(
                format!("failed to fetch login page (status {})", page.status_code()),
                response_excerpt(&page.text_lossy()),
            ));
        }

        let body = page.text_lossy();
        let doc = parse_html_with_url(&body, Some(page.url.clone()));
        let state = PostbackState::extract(&doc);
        let action = resolve_action_url(&page.url, &doc);

        let username_field = match self.overrides.username_field.clone() {
            Some(name) => name,
            None => self
                .resolver
                .resolve_username_field(&doc)
                .ok_or(Error::resolution(ControlRole::Username))?
                .name,
        };
        let password_field = match self.overrides.password_field.clone() {
            Some(name) => name,
            None => self
                .resolver
                .resolve_password_field(&doc)
                .ok_or(Error::resolution(ControlRole::Password))?
                .name,
        };

        let mut payload = build_postback_payload(
            &state,
            [
                (username_field.clone(), credentials.username.clone()),
                (password_field.clone(), credentials.password.clone()),
            ],
            None,
            None,
        );

        // A resolved submit trigger rides along as its own name/value
        // pair; without one the server sees an implicit submission.
        match self.overrides.submit_control.clone() {
            Some(name) => {
                let value = doc
                    .input_by_name(&name)
                    .and_then(|el| el.value())
                    .unwrap_or_default();
                payload.set(name, value);
            }
            None => {
                if let Some(submit) = self.resolver.resolve_submit_control(&doc) {
                    tracing::debug!(name = %submit.name, keyword = %submit.keyword, "submit control resolved");
                    payload.set(submit.name, submit.value);
                }
            }
        }

        tracing::info!(action = %action, username_field = %username_field, "submitting credentials");
        let response = session.post_form(action.as_str(), payload.encode()).await?;
        if !response.is_success() {
            return Err(Error::transport_status(
                action.as_str(),
                response.status_code(),
                "login submission failed",
            ));
        }

        let outcome = classify_login_response(&response.text_lossy());
        match (&outcome.authenticated, &outcome.confidence) {
            (true, Some(Confidence::Positive { signal })) => {
                tracing::info!(signal = %signal, "authenticated");
            }
            (true, _) => {
                tracing::warn!("authenticated by absence of negative signals (low confidence)");
            }
            (false, _) => {
                tracing::warn!(reason = ?outcome.reason, "authentication rejected");
            }
        }
        Ok(outcome)
    }
}

/// Classify a login response body as authenticated or not
///
/// Positive signals win outright. Failing that, a body with none of the
/// negative signals is treated as a success of lower confidence, since
/// some portals redirect to a dashboard sharing no vocabulary with the
/// login page.
pub fn classify_login_response(body: &str) -> AuthOutcome {
    let lowered = body.to_lowercase();
    let excerpt = response_excerpt(body);

    if let Some(signal) = POSITIVE_SIGNALS.iter().find(|s| lowered.contains(**s)) {
        return AuthOutcome::accepted(
            Confidence::Positive {
                signal: signal.to_string(),
            },
            excerpt,
        );
    }

    if !NEGATIVE_SIGNALS.iter().any(|s| lowered.contains(*s)) {
        return AuthOutcome::accepted(Confidence::NoNegativeSignals, excerpt);
    }

    AuthOutcome::rejected("login rejected by server", excerpt)
}

/// Confirm a second protected resource is reachable on the same session
///
/// Plain GET; success means the body contains none of the login-page
/// negative signals, i.e. we were not bounced back to a login form.
pub async fn confirm_downstream_access(session: &Session, target: &Url) -> Result<bool> {
    let response = session.get(target.as_str()).await?;
    if !response.is_success() {
        return Ok(false);
    }

    let lowered = response.text_lossy().to_lowercase();
    Ok(!NEGATIVE_SIGNALS.iter().any(|s| lowered.contains(*s)))
}
