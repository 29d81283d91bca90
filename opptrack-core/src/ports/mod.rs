//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The services
//! depend only on these traits: the backend API, the cookie jar, and the
//! screen the user looks at.

mod api;
mod cookies;
mod screen;

pub use api::OpportunityApi;
pub use cookies::CookieStore;
pub use screen::Screen;
