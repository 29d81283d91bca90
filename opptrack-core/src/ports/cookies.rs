//! Cookie jar port

use crate::domain::result::Result;
use crate::domain::Cookie;

/// Where session cookies live between requests (and between runs)
pub trait CookieStore: Send + Sync {
    /// Value of a live cookie; expired or emptied cookies read as absent
    fn get(&self, name: &str) -> Option<String>;

    /// Store a cookie, replacing any with the same name, path and domain
    fn set(&self, cookie: Cookie) -> Result<()>;

    /// All live cookies
    fn cookies(&self) -> Vec<Cookie>;

    /// Live cookies a request to `host` and `path` should carry
    fn cookies_for(&self, host: &str, path: &str) -> Vec<Cookie> {
        self.cookies()
            .into_iter()
            .filter(|c| c.matches_host(host) && c.matches_path(path))
            .collect()
    }
}
