//! Backend API port

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::{LoginRequest, NewOpportunity, Opportunity, OpportunityUpdate, SignupRequest};

/// The opportunities backend
///
/// Each method is one request. Non-success statuses come back as
/// `Error::Http` carrying the body's `error` field; requests that never get
/// a response come back as `Error::Network`.
#[async_trait]
pub trait OpportunityApi: Send + Sync {
    /// `POST /signup`
    async fn signup(&self, request: &SignupRequest) -> Result<()>;

    /// `POST /login`
    async fn login(&self, request: &LoginRequest) -> Result<()>;

    /// `GET /opportunities/{userId}`; a `null` body is an empty list
    async fn list_opportunities(&self, user_id: &str) -> Result<Vec<Opportunity>>;

    /// `GET /opportunity/{id}`
    async fn get_opportunity(&self, id: &str) -> Result<Opportunity>;

    /// `POST /opportunity/{userId}`, returning the inserted id when the server sends one
    async fn add_opportunity(&self, user_id: &str, opportunity: &NewOpportunity) -> Result<Option<String>>;

    /// `PUT /opportunity`
    async fn update_opportunity(&self, update: &OpportunityUpdate) -> Result<()>;

    /// `DELETE /opportunity/{userId}/{id}`
    async fn delete_opportunity(&self, user_id: &str, id: &str) -> Result<()>;

    /// `DELETE /opportunities/{userId}`
    async fn clear_opportunities(&self, user_id: &str) -> Result<()>;
}
