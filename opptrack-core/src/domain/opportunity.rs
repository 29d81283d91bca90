//! Opportunity domain model

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

/// A sales-pipeline record owned by one user
///
/// The backend stores these; the client only ever holds the copy from the
/// last successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    /// The backend names this field `ID`; `_id` shows up in older payloads
    #[serde(alias = "ID", alias = "_id", deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(
        deserialize_with = "deserialize_amount",
        serialize_with = "serialize_amount"
    )]
    pub value: Decimal,
    pub status: OpportunityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Pipeline status of an opportunity
///
/// Travels as a plain string. Statuses this client has no name for are kept
/// verbatim so the badge still shows what the server sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OpportunityStatus {
    Open,
    Won,
    Lost,
    Other(String),
}

impl OpportunityStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::Won => "won",
            Self::Lost => "lost",
            Self::Other(s) => s,
        }
    }
}

impl Default for OpportunityStatus {
    fn default() -> Self {
        Self::Open
    }
}

impl From<String> for OpportunityStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "open" => Self::Open,
            "won" => Self::Won,
            "lost" => Self::Lost,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for OpportunityStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<OpportunityStatus> for String {
    fn from(status: OpportunityStatus) -> Self {
        match status {
            OpportunityStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for OpportunityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /opportunity/{userId}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOpportunity {
    pub name: String,
    #[serde(serialize_with = "serialize_amount")]
    pub value: Decimal,
    pub status: OpportunityStatus,
}

impl NewOpportunity {
    /// New opportunities always start out open
    pub fn open(name: impl Into<String>, value: Decimal) -> Self {
        Self {
            name: name.into(),
            value,
            status: OpportunityStatus::Open,
        }
    }
}

/// Body of `PUT /opportunity`
///
/// The backend binds the whole record, identifier included, from the body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunityUpdate {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    #[serde(serialize_with = "serialize_amount")]
    pub value: Decimal,
    pub status: OpportunityStatus,
    pub user_id: String,
}

/// Deserialize ID that can be number or string
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: JsonValue = Deserialize::deserialize(deserializer)?;
    match value {
        JsonValue::String(s) => Ok(s),
        JsonValue::Number(n) => Ok(n.to_string()),
        _ => Err(D::Error::custom("expected number or string for id")),
    }
}

/// Deserialize amount that can be number or string
fn deserialize_amount<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: JsonValue = Deserialize::deserialize(deserializer)?;
    let text = match value {
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s,
        _ => return Err(D::Error::custom("expected number or string for value")),
    };
    parse_amount(&text).ok_or_else(|| D::Error::custom(format!("invalid decimal: {}", text)))
}

/// Serialize an amount as a JSON number, integral amounts without a fraction
fn serialize_amount<S>(value: &Decimal, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use serde::ser::Error;
    let normalized = value.normalize();
    if normalized.scale() == 0 {
        if let Some(whole) = normalized.to_i64() {
            return serializer.serialize_i64(whole);
        }
    }
    let float = normalized
        .to_f64()
        .ok_or_else(|| S::Error::custom(format!("amount out of range: {}", value)))?;
    serializer.serialize_f64(float)
}

/// Parse a user- or server-supplied amount
///
/// Accepts plain decimals (`1500`, `-12.5`) and exponent notation (`1.5e3`).
/// Anything else, including empty input, is `None`.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(trimmed).ok())
}
