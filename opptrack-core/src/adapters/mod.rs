//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest HTTP client for the OpportunityApi port
//! - JSON file cookie jar for the CookieStore port

pub mod cookie_jar;
pub mod http;

#[cfg(test)]
pub mod mock_server;

pub use cookie_jar::CookieJar;
pub use http::HttpApiClient;
