//! Session identity and the cookies that carry it

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Cookie holding the server-issued session token
pub const TOKEN_COOKIE: &str = "token";
/// Cookie holding the logged-in user's identifier
pub const USER_ID_COOKIE: &str = "userID";
/// Cookie holding the logged-in user's display name
pub const USERNAME_COOKIE: &str = "username";

/// Every cookie that makes up a session, in the order logout clears them
pub const SESSION_COOKIES: [&str; 3] = [TOKEN_COOKIE, USER_ID_COOKIE, USERNAME_COOKIE];

/// Shown in place of the username when the cookie is missing
pub const DEFAULT_USERNAME: &str = "User";

/// A single cookie as the jar keeps it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default = "root_path")]
    pub path: String,
    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,
    /// Host the cookie belongs to; `None` for cookies made locally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

fn root_path() -> String {
    "/".to_string()
}

impl Cookie {
    /// A session cookie (no expiry) scoped to the root path
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: root_path(),
            expires: None,
            domain: None,
        }
    }

    /// The tombstone written on logout: empty value, expired at the epoch
    pub fn expired(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            path: root_path(),
            expires: Utc.timestamp_opt(0, 0).single(),
            domain: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into().trim_start_matches('.').to_ascii_lowercase());
        self
    }

    /// Whether the cookie has expired as of `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|at| at <= now)
    }

    /// Whether a browser would still send this cookie
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        !self.value.is_empty() && !self.is_expired_at(now)
    }

    /// Whether the cookie may be sent to `host`
    ///
    /// A cookie goes back to the host that set it and its subdomains, never
    /// to an unrelated backend.
    pub fn matches_host(&self, host: &str) -> bool {
        let Some(domain) = &self.domain else {
            return true;
        };
        let host = host.to_ascii_lowercase();
        match host.strip_suffix(domain.as_str()) {
            Some("") => true,
            Some(prefix) => prefix.ends_with('.'),
            None => false,
        }
    }

    /// Whether the cookie applies to a request for `request_path`
    pub fn matches_path(&self, request_path: &str) -> bool {
        if self.path.is_empty() || self.path == "/" {
            return true;
        }
        match request_path.strip_prefix(self.path.trim_end_matches('/')) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// The user a page acts for, read once from cookies
///
/// Built at startup and never mutated; services receive it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionIdentity {
    pub user_id: String,
    pub username: Option<String>,
}

impl SessionIdentity {
    pub fn new(user_id: impl Into<String>, username: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username,
        }
    }

    /// Build the identity from raw cookie values
    ///
    /// The backend escapes cookie values the way query strings are escaped,
    /// so both values are decoded before use. Without a user id there is no
    /// session.
    pub fn from_cookie_values(user_id: Option<&str>, username: Option<&str>) -> Option<Self> {
        let user_id = user_id.map(decode_cookie_value).filter(|id| !id.is_empty())?;
        let username = username.map(decode_cookie_value).filter(|name| !name.is_empty());
        Some(Self { user_id, username })
    }

    /// Name to greet the user with
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(DEFAULT_USERNAME)
    }
}

/// Undo query-string escaping (`+` and `%XX`) on a cookie value
fn decode_cookie_value(raw: &str) -> String {
    url::form_urlencoded::parse(format!("v={}", raw).as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}
