//! Cookie jar backed by `cookies.json`
//!
//! Plays the part of the browser's cookie storage. Separate `opp` runs may
//! touch the file at the same time, so reads take a shared lock and writes
//! an exclusive one.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use fs2::FileExt;

use crate::domain::result::Result;
use crate::domain::Cookie;
use crate::ports::CookieStore;

/// Cookie jar, optionally persisted to disk
#[derive(Debug)]
pub struct CookieJar {
    path: Option<PathBuf>,
    cookies: Mutex<Vec<Cookie>>,
}

impl CookieJar {
    /// A jar that forgets everything when dropped
    pub fn in_memory() -> Self {
        Self {
            path: None,
            cookies: Mutex::new(Vec::new()),
        }
    }

    /// Open (or start) the jar stored at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let cookies = if path.exists() {
            let file = File::open(path)?;
            file.lock_shared()?;
            let mut content = String::new();
            let read = (&file).read_to_string(&mut content);
            file.unlock()?;
            read?;
            parse_cookies(path, &content)
        } else {
            Vec::new()
        };

        let now = Utc::now();
        Ok(Self {
            path: Some(path.to_path_buf()),
            cookies: Mutex::new(cookies.into_iter().filter(|c| c.is_live(now)).collect()),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Cookie>> {
        self.cookies.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn parse_cookies(path: &Path, content: &str) -> Vec<Cookie> {
    if content.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<Cookie>>(content) {
        Ok(cookies) => cookies,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable cookie jar");
            Vec::new()
        }
    }
}

/// Put `cookie` into `cookies` the way a browser would
///
/// It replaces cookies with the same name and path on its domain; a cookie
/// without a domain replaces them on every domain. An expired or emptied
/// cookie is a deletion.
fn apply(cookies: &mut Vec<Cookie>, cookie: Cookie, now: DateTime<Utc>) {
    cookies.retain(|c| {
        let same_slot = c.name == cookie.name
            && c.path == cookie.path
            && (cookie.domain.is_none() || c.domain == cookie.domain);
        !same_slot && c.is_live(now)
    });
    if cookie.is_live(now) {
        cookies.push(cookie);
    }
}

/// Re-read the file, apply the change and write it back
///
/// The caller holds the exclusive lock for the whole exchange.
fn merge_into_file(
    file: &mut File,
    path: &Path,
    cookies: &mut Vec<Cookie>,
    cookie: Cookie,
    now: DateTime<Utc>,
) -> Result<()> {
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    *cookies = parse_cookies(path, &content);
    apply(cookies, cookie, now);

    let content = serde_json::to_string_pretty(cookies)?;
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

impl CookieStore for CookieJar {
    fn get(&self, name: &str) -> Option<String> {
        let now = Utc::now();
        self.lock()
            .iter()
            .find(|c| c.name == name && c.is_live(now))
            .map(|c| c.value.clone())
    }

    fn set(&self, cookie: Cookie) -> Result<()> {
        let now = Utc::now();
        let mut cookies = self.lock();
        let Some(path) = &self.path else {
            apply(&mut cookies, cookie, now);
            return Ok(());
        };

        let mut file = OpenOptions::new().create(true).truncate(false).read(true).write(true).open(path)?;
        file.lock_exclusive()?;
        let merged = merge_into_file(&mut file, path, &mut cookies, cookie, now);
        file.unlock()?;
        merged
    }

    fn cookies(&self) -> Vec<Cookie> {
        let now = Utc::now();
        self.lock().iter().filter(|c| c.is_live(now)).cloned().collect()
    }
}
