//! Auth service - sign up, log in and log out

use std::sync::Arc;

use crate::domain::result::Error;
use crate::domain::{Cookie, LoginForm, Route, SignupForm, SESSION_COOKIES};
use crate::ports::{CookieStore, OpportunityApi, Screen};

use super::messages::{FILL_ALL_FIELDS, LOGIN_FAILED, NETWORK_ERROR, SIGNUP_FAILED};
use super::ActionOutcome;

/// Sign-up, log-in and log-out flows
///
/// Sign-up and log-in post the form and, once the backend has issued the
/// session cookies, move on to the opportunities page. Sign-up reports
/// problems in alerts; log-in uses the inline error line.
pub struct AuthService {
    api: Arc<dyn OpportunityApi>,
    cookies: Arc<dyn CookieStore>,
}

impl AuthService {
    pub fn new(api: Arc<dyn OpportunityApi>, cookies: Arc<dyn CookieStore>) -> Self {
        Self { api, cookies }
    }

    pub async fn signup(&self, screen: &dyn Screen, form: &SignupForm) -> ActionOutcome {
        let Ok(request) = form.validate() else {
            tracing::warn!("Signup form incomplete");
            screen.alert(FILL_ALL_FIELDS);
            return ActionOutcome::Rejected;
        };

        match self.api.signup(&request).await {
            Ok(()) => {
                tracing::info!(username = %request.username, "Signed up");
                screen.navigate(Route::Opportunities);
                ActionOutcome::Completed
            }
            Err(e) => {
                tracing::debug!(error = %e, "Signup rejected");
                screen.alert(&failure_message(&e, SIGNUP_FAILED));
                ActionOutcome::Failed
            }
        }
    }

    pub async fn login(&self, screen: &dyn Screen, form: &LoginForm) -> ActionOutcome {
        let Ok(request) = form.validate() else {
            tracing::warn!("Login form incomplete");
            screen.show_error(FILL_ALL_FIELDS);
            return ActionOutcome::Rejected;
        };

        match self.api.login(&request).await {
            Ok(()) => {
                tracing::info!("Logged in");
                screen.navigate(Route::Opportunities);
                ActionOutcome::Completed
            }
            Err(e) => {
                tracing::debug!(error = %e, "Login rejected");
                screen.show_error(&failure_message(&e, LOGIN_FAILED));
                ActionOutcome::Failed
            }
        }
    }

    /// Forget the session locally and go back to the login page
    ///
    /// Works on whatever the jar holds, a full session or a stray token
    /// alike. The backend is not told.
    pub fn logout(&self, screen: &dyn Screen) -> ActionOutcome {
        for name in SESSION_COOKIES {
            if let Err(e) = self.cookies.set(Cookie::expired(name)) {
                tracing::error!(cookie = name, error = %e, "Failed to clear session cookie");
                return ActionOutcome::Failed;
            }
        }
        tracing::info!("Logged out");
        screen.navigate(Route::Login);
        ActionOutcome::Completed
    }
}

/// Message for a failed request: the server's own words when it gave any
fn failure_message(error: &Error, fallback: &str) -> String {
    if error.is_network() {
        return NETWORK_ERROR.to_string();
    }
    error.server_message().unwrap_or(fallback).to_string()
}
