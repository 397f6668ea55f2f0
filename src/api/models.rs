//! Wire models for backend responses.
//!
//! The backend wraps list responses in a camelCase page envelope and single
//! records in a `data` envelope. These types mirror that wire shape exactly;
//! mapping into the crate's resource types happens in the API surface.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

/// Page envelope returned by every list endpoint.
///
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageModel<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub last_page: usize,
    pub total_items: usize,
}

/// Envelope for single-record responses.
///
#[derive(Debug, Deserialize)]
pub(crate) struct DataModel<T> {
    pub data: T,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum StatusModel {
    Active,
    Inactive,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ActionStatusModel {
    Open,
    Overdue,
    Closed,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ActionModel {
    pub id: i64,
    pub status: ActionStatusModel,
    #[serde(default)]
    pub next_contact: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProspectModel {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    pub status: StatusModel,
    #[serde(default)]
    pub actions: Vec<ActionModel>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClientModel {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    pub created_at: DateTime<Utc>,
}
