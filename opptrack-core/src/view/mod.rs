//! Declarative list rendering
//!
//! `render` turns the fetched opportunities into a `ListView` value. The
//! view is rebuilt from scratch on every load, so the same input always
//! yields the same view and tests can compare views directly.

mod currency;

use serde::Serialize;

use crate::domain::Opportunity;

pub use currency::format_currency;

/// Shown instead of rows when the user has no opportunities
pub const EMPTY_STATE_MESSAGE: &str = "No opportunities yet. Add one above!";

/// The rendered opportunity list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ListView {
    Empty { message: String },
    Items { rows: Vec<OpportunityRow> },
}

/// One rendered opportunity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpportunityRow {
    /// Identifier the row's delete control acts on
    pub id: String,
    pub name: String,
    /// Currency-formatted value, e.g. `$1,500.00`
    pub value: String,
    /// Badge text, equal to the status string
    pub status: String,
    /// Badge style key, `status-{status}`
    pub badge_class: String,
}

impl OpportunityRow {
    pub fn from_opportunity(opportunity: &Opportunity) -> Self {
        let status = opportunity.status.as_str().to_string();
        Self {
            id: opportunity.id.clone(),
            name: opportunity.name.clone(),
            value: format_currency(opportunity.value),
            badge_class: format!("status-{}", status),
            status,
        }
    }
}

impl ListView {
    pub fn rows(&self) -> &[OpportunityRow] {
        match self {
            ListView::Empty { .. } => &[],
            ListView::Items { rows } => rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ListView::Empty { .. })
    }
}

/// Render a fetched list; `None` (a `null` body) renders like an empty list
pub fn render(opportunities: Option<&[Opportunity]>) -> ListView {
    match opportunities {
        Some(list) if !list.is_empty() => ListView::Items {
            rows: list.iter().map(OpportunityRow::from_opportunity).collect(),
        },
        _ => ListView::Empty {
            message: EMPTY_STATE_MESSAGE.to_string(),
        },
    }
}
