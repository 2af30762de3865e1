use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -------------------------
// Beer
// -------------------------

/// Wire shape of a beer, used for requests and responses alike.
///
/// On input every field is optional: missing business fields become
/// validation errors, and `id`, timestamps and audit fields are ignored.
/// `version`, when present on an update, must match the stored version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeerDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default, alias = "name")]
    pub beer_name: Option<String>,
    #[serde(default, alias = "style")]
    pub beer_style: Option<String>,
    #[serde(default)]
    pub upc: Option<String>,
    #[serde(default, alias = "quantity")]
    pub quantity_on_hand: Option<i32>,
    /// Decoded from the JSON number text, never through `f64`.
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

// -------------------------
// Order statuses
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionsResponse {
    pub from: String,
    pub allowed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionCheckResponse {
    pub from: String,
    pub to: String,
    pub allowed: bool,
}
