//! Session token storage
//!
//! Actions never touch HTTP directly. They read and write the session secret
//! through a [`SessionStore`]; the gateway supplies a [`CookieJar`] built from
//! the request and copies its pending `Set-Cookie` values onto the response.

use std::sync::Mutex;

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use cookie::{Cookie, SameSite};

pub const SESSION_COOKIE: &str = "appwrite-session";

pub trait SessionStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, secret: &str);
    fn clear(&self);
}

/// Session cookie with the attributes every `Set-Cookie` carries
fn session_cookie(value: String) -> cookie::CookieBuilder<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
}

/// Request-scoped cookie view
pub struct CookieJar {
    current: Mutex<Option<String>>,
    outgoing: Mutex<Vec<Cookie<'static>>>,
}

impl CookieJar {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            current: Mutex::new(secret),
            outgoing: Mutex::new(Vec::new()),
        }
    }

    /// Read the session cookie from every `Cookie` header of a request
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let secret = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| Cookie::split_parse_encoded(v.to_string()))
            .filter_map(Result::ok)
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|value| !value.is_empty());
        Self::new(secret)
    }

    /// Append pending `Set-Cookie` headers (percent-encoded) to a response
    pub fn write_headers(&self, headers: &mut HeaderMap) {
        for cookie in lock(&self.outgoing).iter() {
            match HeaderValue::from_str(&cookie.encoded().to_string()) {
                Ok(value) => {
                    headers.append(SET_COOKIE, value);
                }
                Err(e) => tracing::error!("Dropping unencodable session cookie: {}", e),
            }
        }
    }
}

impl SessionStore for CookieJar {
    fn get(&self) -> Option<String> {
        lock(&self.current).clone()
    }

    fn set(&self, secret: &str) {
        *lock(&self.current) = Some(secret.to_string());
        lock(&self.outgoing).push(session_cookie(secret.to_string()).build());
    }

    fn clear(&self) {
        *lock(&self.current) = None;
        lock(&self.outgoing).push(session_cookie(String::new()).removal().build());
    }
}

/// In-memory store for tests
#[derive(Default)]
pub struct MemorySessionStore {
    secret: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(secret: &str) -> Self {
        Self {
            secret: Mutex::new(Some(secret.to_string())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<String> {
        lock(&self.secret).clone()
    }

    fn set(&self, secret: &str) {
        *lock(&self.secret) = Some(secret.to_string());
    }

    fn clear(&self) {
        *lock(&self.secret) = None;
    }
}

/// Ignores poisoning; guarded values are plain data.
fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}
