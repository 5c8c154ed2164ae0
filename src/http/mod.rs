// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP transport layer for Mustekala
//!
//! A session-scoped HTTP client with its own persistent cookie storage.
//! Carries no business logic: the WebForms flows sit on top of it.

mod cookie;
mod request;
mod response;
mod session;

pub use cookie::{Cookie, CookieJar};
pub use request::Request;
pub use response::Response;
pub use session::{Session, SessionConfig};

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Common HTTP headers
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const ACCEPT_LANGUAGE: &str = "accept-language";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const CONTENT_DISPOSITION: &str = "content-disposition";
    pub const COOKIE: &str = "cookie";
    pub const SET_COOKIE: &str = "set-cookie";
    pub const USER_AGENT: &str = "user-agent";
    pub const REFERER: &str = "referer";
    pub const AUTHORIZATION: &str = "authorization";
}

/// Content type of a standard form-encoded postback
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
