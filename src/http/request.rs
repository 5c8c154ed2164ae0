// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP request type and builders

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use url::Url;

use super::FORM_URLENCODED;
use crate::error::Result;

/// HTTP request representation
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Request URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Option<Bytes>,
    /// Per-request timeout override
    pub timeout: Option<Duration>,
}

impl Request {
    /// Create a new GET request
    pub fn get(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::GET, url)
    }

    /// Create a new POST request
    pub fn post(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::POST, url)
    }

    /// Create a new request with arbitrary method
    pub fn new(method: Method, url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            method,
            url: Url::parse(url.as_ref())?,
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        })
    }

    /// Create a request targeting an already parsed URL
    pub fn from_url(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Set a header
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Set the request body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set a form-urlencoded body from already-encoded pairs
    ///
    /// The encoding itself lives in [`crate::webforms::FormSubmission`];
    /// this just stamps the body and content type.
    pub fn form_body(mut self, encoded: String) -> Self {
        self.body = Some(Bytes::from(encoded));
        self.header("content-type", FORM_URLENCODED)
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Get the URL as string
    pub fn url_str(&self) -> &str {
        self.url.as_str()
    }
}
