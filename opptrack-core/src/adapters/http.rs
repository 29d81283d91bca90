//! Opportunities backend HTTP client
//!
//! JSON over HTTP against the tracker backend. Session state travels in
//! cookies: every `Set-Cookie` on a response goes into the cookie store,
//! and every request carries the live cookies for its path.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderValue, COOKIE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use url::Url;

use crate::config::{normalize_base_url, Config};
use crate::domain::result::{Error, Result};
use crate::domain::{
    Cookie, LoginRequest, NewOpportunity, Opportunity, OpportunityUpdate, SignupRequest,
};
use crate::ports::{CookieStore, OpportunityApi};

/// Failure body the backend sends with non-success statuses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// HTTP implementation of [`OpportunityApi`]
pub struct HttpApiClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
    cookies: Arc<dyn CookieStore>,
}

impl HttpApiClient {
    /// Create a client for the configured backend
    pub fn new(config: &Config, cookies: Arc<dyn CookieStore>) -> Result<Self> {
        Self::with_base_url(&config.base_url, config.timeout(), cookies)
    }

    /// Create a client for an explicit backend origin
    pub fn with_base_url(
        base_url: &str,
        timeout: Duration,
        cookies: Arc<dyn CookieStore>,
    ) -> Result<Self> {
        let normalized = normalize_base_url(base_url)?;
        let base_url = Url::parse(&normalized)
            .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            timeout,
            cookies,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Build the URL for a path made of `segments`, percent-encoding each
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Base URL '{}' cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a request, attaching the cookies that apply to its path
    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        tracing::debug!(method = %method, path = url.path(), "Sending request");

        let host = url.host_str().unwrap_or_default();
        let header = self
            .cookies
            .cookies_for(host, url.path())
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ");

        let mut builder = self.client.request(method, url);
        if !header.is_empty() {
            let value = HeaderValue::from_str(&header)
                .map_err(|e| Error::Decode(format!("Stored cookie is not a valid header: {}", e)))?;
            builder = builder.header(COOKIE, value);
        }
        Ok(builder)
    }

    /// Send a request; anything but a 2xx becomes `Error::Http`
    async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        self.store_cookies(&response)?;
        self.check_response_status(response).await
    }

    /// Copy the response's `Set-Cookie` headers into the cookie store
    ///
    /// Each cookie is tied to its `Domain` attribute, or else to the host
    /// that answered.
    fn store_cookies(&self, response: &Response) -> Result<()> {
        let now = SystemTime::now();
        let host = response.url().host_str().unwrap_or_default().to_string();
        for set in response.cookies() {
            let mut cookie =
                Cookie::new(set.name(), set.value()).with_domain(set.domain().unwrap_or(host.as_str()));
            if let Some(path) = set.path() {
                cookie = cookie.with_path(path);
            }
            let expires = match set.max_age() {
                Some(max_age) => now.checked_add(max_age),
                None => set.expires(),
            };
            if let Some(at) = expires {
                cookie = cookie.with_expires(DateTime::<Utc>::from(at));
            }
            tracing::debug!(name = %cookie.name, "Storing cookie from response");
            self.cookies.set(cookie)?;
        }
        Ok(())
    }

    /// Map request errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::Network(format!(
                "Request timed out after {} seconds",
                self.timeout.as_secs()
            ))
        } else if error.is_connect() {
            Error::Network(format!("Unable to connect to {}", self.base_url()))
        } else {
            Error::Network(format!("Request failed: {}", error))
        }
    }

    /// Turn a non-success status into an error carrying the body's `error` field
    async fn check_response_status(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error);
        tracing::debug!(status = status.as_u16(), "Request rejected");

        Err(Error::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("Failed to read response: {}", e)))?;
        serde_json::from_str(&body).map_err(|e| Error::Decode(e.to_string()))
    }
}

#[async_trait]
impl OpportunityApi for HttpApiClient {
    async fn signup(&self, request: &SignupRequest) -> Result<()> {
        let builder = self.request(Method::POST, &["signup"])?.json(request);
        self.execute(builder).await?;
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> Result<()> {
        let builder = self.request(Method::POST, &["login"])?.json(request);
        self.execute(builder).await?;
        Ok(())
    }

    async fn list_opportunities(&self, user_id: &str) -> Result<Vec<Opportunity>> {
        let builder = self.request(Method::GET, &["opportunities", user_id])?;
        let response = self.execute(builder).await?;
        let rows: Option<Vec<JsonValue>> = Self::read_json(response).await?;
        Ok(decode_opportunities(rows.unwrap_or_default()))
    }

    async fn get_opportunity(&self, id: &str) -> Result<Opportunity> {
        let builder = self.request(Method::GET, &["opportunity", id])?;
        let response = self.execute(builder).await?;
        Self::read_json(response).await
    }

    async fn add_opportunity(&self, user_id: &str, opportunity: &NewOpportunity) -> Result<Option<String>> {
        let builder = self
            .request(Method::POST, &["opportunity", user_id])?
            .json(opportunity);
        let response = self.execute(builder).await?;

        // Only used for logging, so a body we cannot read is not an error
        let body = response.text().await.unwrap_or_default();
        let inserted_id = serde_json::from_str::<JsonValue>(&body)
            .ok()
            .and_then(|v| v.get("insertedId").and_then(|id| id.as_str()).map(str::to_string));
        Ok(inserted_id)
    }

    async fn update_opportunity(&self, update: &OpportunityUpdate) -> Result<()> {
        let builder = self.request(Method::PUT, &["opportunity"])?.json(update);
        self.execute(builder).await?;
        Ok(())
    }

    async fn delete_opportunity(&self, user_id: &str, id: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, &["opportunity", user_id, id])?;
        self.execute(builder).await?;
        Ok(())
    }

    async fn clear_opportunities(&self, user_id: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, &["opportunities", user_id])?;
        self.execute(builder).await?;
        Ok(())
    }
}

/// Decode list rows one by one; a row this client cannot represent is
/// skipped with a warning instead of failing the whole list
fn decode_opportunities(rows: Vec<JsonValue>) -> Vec<Opportunity> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value::<Opportunity>(row) {
            Ok(opportunity) => Some(opportunity),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping unreadable opportunity");
                None
            }
        })
        .collect()
}
