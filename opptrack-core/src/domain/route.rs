//! Pages the client can navigate between

use std::fmt;

/// A navigation target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`: the login/signup page
    Login,
    /// `/opportunities`: the signed-in user's list
    Opportunities,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Opportunities => "/opportunities",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
