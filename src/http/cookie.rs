// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie jar for session-persistent cookie storage
//!
//! WebForms portals key the server-side session off cookies set during
//! login (`ASP.NET_SessionId` and friends), so every cookie set on any
//! response must be replayed on all subsequent requests of the session.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use url::Url;

/// A single HTTP cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Domain the cookie belongs to
    pub domain: String,
    /// Path the cookie is valid for
    pub path: String,
    /// Expiration time (None = session cookie)
    pub expires: Option<DateTime<Utc>>,
    /// Secure flag (HTTPS only)
    pub secure: bool,
    /// HttpOnly flag
    pub http_only: bool,
}

impl Cookie {
    /// Create a new session cookie
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: "/".to_string(),
            expires: None,
            secure: false,
            http_only: false,
        }
    }

    /// Set the domain
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set the path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Check if the cookie is expired
    pub fn is_expired(&self) -> bool {
        self.expires.map_or(false, |exp| exp < Utc::now())
    }

    /// Check if the cookie should be sent to the given URL
    pub fn matches(&self, url: &Url) -> bool {
        let host = url.host_str().unwrap_or("");
        if !self.domain_matches(host) {
            return false;
        }
        if !url.path().starts_with(&self.path) {
            return false;
        }
        if self.secure && url.scheme() != "https" {
            return false;
        }
        !self.is_expired()
    }

    fn domain_matches(&self, host: &str) -> bool {
        if self.domain.is_empty() {
            return true;
        }
        let domain = self.domain.trim_start_matches('.');
        host == domain || host.ends_with(&format!(".{}", domain))
    }

    /// Parse a Set-Cookie header value received for `url`
    pub fn parse(header: &str, url: &Url) -> Option<Self> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.trim().split_once('=')?;

        let mut cookie = Cookie::new(name.trim(), value.trim());
        cookie.domain = url.host_str().unwrap_or("").to_string();

        for part in parts {
            let part = part.trim();
            if let Some((attr, val)) = part.split_once('=') {
                match attr.trim().to_lowercase().as_str() {
                    "domain" => cookie.domain = val.trim().trim_start_matches('.').to_string(),
                    "path" => cookie.path = val.trim().to_string(),
                    "expires" => {
                        if let Ok(dt) = DateTime::parse_from_rfc2822(val.trim()) {
                            cookie.expires = Some(dt.with_timezone(&Utc));
                        }
                    }
                    "max-age" => {
                        if let Ok(secs) = val.trim().parse::<i64>() {
                            cookie.expires = Some(Utc::now() + chrono::Duration::seconds(secs));
                        }
                    }
                    _ => {}
                }
            } else {
                match part.to_lowercase().as_str() {
                    "secure" => cookie.secure = true,
                    "httponly" => cookie.http_only = true,
                    _ => {}
                }
            }
        }

        Some(cookie)
    }

    /// Convert to `name=value` Cookie header form
    pub fn to_header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// Thread-safe cookie storage, keyed by domain
#[derive(Debug, Clone)]
pub struct CookieJar {
    cookies: Arc<DashMap<String, Vec<Cookie>>>,
}

impl Default for CookieJar {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieJar {
    /// Create a new empty cookie jar
    pub fn new() -> Self {
        Self {
            cookies: Arc::new(DashMap::new()),
        }
    }

    /// Add a cookie, replacing any existing cookie with the same name and path
    pub fn add(&self, cookie: Cookie) {
        let mut entry = self.cookies.entry(cookie.domain.clone()).or_default();
        entry.retain(|c| c.name != cookie.name || c.path != cookie.path);
        entry.push(cookie);
    }

    /// Add a cookie from a Set-Cookie header
    pub fn add_from_header(&self, header: &str, url: &Url) {
        if let Some(cookie) = Cookie::parse(header, url) {
            self.add(cookie);
        }
    }

    /// Get all live cookies matching a URL
    pub fn get_cookies(&self, url: &Url) -> Vec<Cookie> {
        self.remove_expired();

        let mut result = Vec::new();
        for entry in self.cookies.iter() {
            for cookie in entry.value().iter() {
                if cookie.matches(url) {
                    result.push(cookie.clone());
                }
            }
        }
        result
    }

    /// Get Cookie header value for a URL, or None when nothing matches
    pub fn get_cookie_header(&self, url: &Url) -> Option<String> {
        let cookies = self.get_cookies(url);
        if cookies.is_empty() {
            return None;
        }
        Some(
            cookies
                .iter()
                .map(|c| c.to_header_value())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Clear all cookies
    pub fn clear(&self) {
        self.cookies.clear();
    }

    fn remove_expired(&self) {
        for mut entry in self.cookies.iter_mut() {
            entry.value_mut().retain(|c| !c.is_expired());
        }
    }

    /// Total cookie count
    pub fn len(&self) -> usize {
        self.cookies.iter().map(|e| e.value().len()).sum()
    }

    /// Check if jar is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export all cookies as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        let all: Vec<Cookie> = self.cookies.iter().flat_map(|e| e.value().clone()).collect();
        serde_json::to_string(&all)
    }

    /// Import cookies from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let cookies: Vec<Cookie> = serde_json::from_str(json)?;
        let jar = CookieJar::new();
        for cookie in cookies {
            jar.add(cookie);
        }
        Ok(jar)
    }
}
