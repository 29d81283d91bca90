//! Service layer - user actions
//!
//! Each service turns one user action into validation, a backend call and
//! feedback on a [`Screen`](crate::ports::Screen). Failures never escape as
//! errors: they end up on screen (or in the log) and the caller gets an
//! [`ActionOutcome`].

mod auth;
mod opportunities;

pub use auth::AuthService;
pub use opportunities::OpportunityService;

/// How a user action ended, once its feedback reached the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The backend accepted the action
    Completed,
    /// Refused by client-side validation; nothing was sent
    Rejected,
    /// The backend refused or could not be reached
    Failed,
    /// The user declined a confirmation
    Cancelled,
}

impl ActionOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Text shown to the user
pub mod messages {
    pub const FILL_ALL_FIELDS: &str = "Please fill all fields";
    pub const SIGNUP_FAILED: &str = "Signup failed";
    pub const LOGIN_FAILED: &str = "Login failed";
    pub const NETWORK_ERROR: &str = "Network error. Please try again.";

    pub const FILL_NAME_AND_VALUE: &str = "Please fill in both opportunity name and value";
    pub const INVALID_VALUE: &str = "Please enter a valid number for the opportunity value";
    pub const NOTHING_TO_UPDATE: &str = "Nothing to update";
    pub const ADD_FAILED: &str = "Failed to add opportunity";
    pub const DELETE_FAILED: &str = "Failed to delete opportunity";
    pub const CLEAR_CONFIRM: &str = "Are you sure you want to delete all opportunities?";
    pub const CLEAR_FAILED: &str = "Failed to clear opportunities";
    pub const LOAD_FAILED: &str = "Failed to load opportunities";
    pub const LOAD_ONE_FAILED: &str = "Failed to load opportunity";
    pub const UPDATE_FAILED: &str = "Failed to update opportunity";
}
