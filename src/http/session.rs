// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session transport: HTTP client with persistent cookie storage
//!
//! One `Session` is one logical user session against one portal. It owns
//! the cookie store and default header/timeout/redirect policy and
//! nothing else; the WebForms flows decide what to fetch and submit.
//! Create one per user, drop it to discard the session (no server-side
//! logout is performed).

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::Client;

use super::cookie::CookieJar;
use super::request::Request;
use super::response::Response;
use super::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};

/// Session transport configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// User agent string
    pub user_agent: String,
    /// Default timeout for every request
    pub timeout: Duration,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Accept invalid certificates (dangerous!)
    pub accept_invalid_certs: bool,
    /// Default headers sent on every request
    pub default_headers: HeaderMap,
    /// Proxy URL
    pub proxy: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            "accept",
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        default_headers.insert(
            "accept-language",
            HeaderValue::from_static("pt-BR,pt;q=0.8,en;q=0.5"),
        );

        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            max_redirects: 10,
            accept_invalid_certs: false,
            default_headers,
            proxy: None,
        }
    }
}

/// Authenticated transport handle with persistent cookie storage
#[derive(Clone)]
pub struct Session {
    client: Client,
    config: SessionConfig,
    cookie_jar: CookieJar,
    auth_header: Arc<RwLock<Option<String>>>,
}

impl Session {
    /// Create a new session with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(SessionConfig::default())
    }

    /// Create a new session with custom configuration
    pub fn with_config(config: SessionConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(Policy::limited(config.max_redirects))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .default_headers(config.default_headers.clone())
            .cookie_store(false); // cookies are handled by our own jar

        if let Some(ref proxy_url) = config.proxy {
            builder = builder.proxy(
                reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?,
            );
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            config,
            cookie_jar: CookieJar::new(),
            auth_header: Arc::new(RwLock::new(None)),
        })
    }

    /// Get the cookie jar
    pub fn cookie_jar(&self) -> &CookieJar {
        &self.cookie_jar
    }

    /// Get session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Set HTTP basic auth, sent on every subsequent request
    ///
    /// Some portals sit behind an outer basic-auth gate in front of the
    /// WebForms login itself.
    pub fn set_basic_auth(&self, username: impl AsRef<str>, password: impl AsRef<str>) {
        let encoded = base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            format!("{}:{}", username.as_ref(), password.as_ref()),
        );
        *self.auth_header.write() = Some(format!("Basic {}", encoded));
    }

    /// Set a bearer token, sent on every subsequent request
    pub fn set_bearer_token(&self, token: impl AsRef<str>) {
        *self.auth_header.write() = Some(format!("Bearer {}", token.as_ref()));
    }

    /// Clear any configured auth header
    pub fn clear_auth(&self) {
        *self.auth_header.write() = None;
    }

    /// Execute a GET request
    pub async fn get(&self, url: impl AsRef<str>) -> Result<Response> {
        self.execute(Request::get(url)?).await
    }

    /// Execute a form-encoded POST with a pre-encoded body
    pub async fn post_form(&self, url: impl AsRef<str>, encoded: String) -> Result<Response> {
        self.execute(Request::post(url)?.form_body(encoded)).await
    }

    /// Execute a request
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let start = Instant::now();

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());

        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }

        if let Some(cookie_header) = self.cookie_jar.get_cookie_header(&request.url) {
            builder = builder.header("cookie", cookie_header);
        }

        if let Some(ref auth) = *self.auth_header.read() {
            builder = builder.header("authorization", auth.as_str());
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        tracing::debug!(method = %request.method, url = %request.url, "executing request");

        let response = builder.send().await?;
        let response_time = start.elapsed().as_millis() as u64;

        let redirected = response.url() != &request.url;
        let final_url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();

        // Persist every Set-Cookie so later requests replay it
        for cookie in headers.get_all("set-cookie") {
            if let Ok(cookie_str) = cookie.to_str() {
                self.cookie_jar.add_from_header(cookie_str, &final_url);
            }
        }

        let body = response.bytes().await?;

        tracing::debug!(
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = response_time,
            "response received"
        );

        Ok(Response::new(
            status,
            headers,
            body,
            final_url,
            redirected,
            response_time,
        ))
    }

    /// Execute multiple requests concurrently on this session
    ///
    /// Transport-level batching only. Postback submissions must stay
    /// sequential: the server invalidates view-state once consumed.
    pub async fn execute_all(&self, requests: Vec<Request>) -> Vec<Result<Response>> {
        let futures: Vec<_> = requests.into_iter().map(|r| self.execute(r)).collect();
        futures::future::join_all(futures).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = Session::new().unwrap();
        assert_eq!(session.config().user_agent, DEFAULT_USER_AGENT);
        assert!(session.cookie_jar().is_empty());
    }

    #[test]
    fn test_auth_header() {
        let session = Session::new().unwrap();
        session.set_basic_auth("user", "pass");
        assert!(session
            .auth_header
            .read()
            .as_deref()
            .unwrap()
            .starts_with("Basic "));
        session.clear_auth();
        assert!(session.auth_header.read().is_none());
    }
}
