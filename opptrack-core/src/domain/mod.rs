//! Core domain entities
//!
//! Pure data structures with validation logic - no I/O.

mod forms;
mod opportunity;
mod route;
mod session;
pub mod result;

pub use forms::{
    FormError, LoginForm, LoginRequest, OpportunityChanges, OpportunityForm, SignupForm,
    SignupRequest, ValidatedChanges,
};
pub use opportunity::{parse_amount, NewOpportunity, Opportunity, OpportunityStatus, OpportunityUpdate};
pub use route::Route;
pub use session::{
    Cookie, SessionIdentity, DEFAULT_USERNAME, SESSION_COOKIES, TOKEN_COOKIE, USERNAME_COOKIE,
    USER_ID_COOKIE,
};
