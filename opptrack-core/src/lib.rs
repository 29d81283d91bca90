//! Opptrack Core - client for a sales opportunities tracker
//!
//! This crate implements the client logic following hexagonal architecture:
//!
//! - **domain**: Core entities (Opportunity, SessionIdentity, forms)
//! - **ports**: Trait definitions for external dependencies (OpportunityApi, CookieStore, Screen)
//! - **services**: User actions (sign up, log in, log out, the opportunities page)
//! - **adapters**: Concrete implementations (HTTP backend, cookie jar file)
//! - **view**: Pure rendering of opportunity lists

pub mod domain;
pub mod ports;
pub mod services;
pub mod adapters;
pub mod config;
pub mod view;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::{CookieJar, HttpApiClient};
use config::Config;
use services::{AuthService, OpportunityService};

// Re-export commonly used types at crate root
pub use domain::{Opportunity, OpportunityStatus, SessionIdentity};
pub use domain::result::Error;
pub use services::ActionOutcome;

/// File name of the cookie jar inside the opptrack directory
pub const COOKIE_JAR_FILE: &str = "cookies.json";

/// Main context for opptrack operations
///
/// Holds the configuration, the persisted cookie jar and the backend
/// client that every service shares.
pub struct OpptrackContext {
    pub config: Config,
    pub cookies: Arc<CookieJar>,
    pub api: Arc<HttpApiClient>,
    pub auth_service: AuthService,
}

impl OpptrackContext {
    /// Create a new context rooted at `opptrack_dir`
    pub fn new(opptrack_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(opptrack_dir)
            .with_context(|| format!("Failed to create {}", opptrack_dir.display()))?;

        let config = Config::load(opptrack_dir)?;
        let cookies = Arc::new(
            CookieJar::open(&opptrack_dir.join(COOKIE_JAR_FILE)).context("Failed to open cookie jar")?,
        );
        let api = Arc::new(HttpApiClient::new(&config, cookies.clone())?);
        tracing::debug!(base_url = %config.base_url, "Context ready");

        let auth_service = AuthService::new(api.clone(), cookies.clone());

        Ok(Self {
            config,
            cookies,
            api,
            auth_service,
        })
    }

    /// The signed-in user, if the cookie jar holds a session
    pub fn session(&self) -> Option<SessionIdentity> {
        use ports::CookieStore;
        SessionIdentity::from_cookie_values(
            self.cookies.get(domain::USER_ID_COOKIE).as_deref(),
            self.cookies.get(domain::USERNAME_COOKIE).as_deref(),
        )
    }

    /// Service for the opportunities page of the signed-in user
    pub fn opportunity_service(&self) -> Result<OpportunityService, Error> {
        OpportunityService::from_cookies(self.api.clone(), &*self.cookies)
    }
}
