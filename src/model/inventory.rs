use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::money::Amount;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecord {
    #[schema(example = 7)]
    pub borrowed_by: u64,
    #[schema(example = "2026-10-01T09:30:00", format = "date-time", value_type = String)]
    pub borrowed_on: NaiveDateTime,
    #[schema(example = "2026-10-03T17:00:00", format = "date-time", value_type = String, nullable = true)]
    pub returned_on: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "ThinkPad T14")]
    pub name: String,
    #[schema(example = "laptop")]
    pub inventory_type: String,
    pub description: Option<String>,
    #[schema(example = "HQ level 3")]
    pub location: Option<String>,
    pub is_available: bool,
    pub last_borrowed_by: Option<u64>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub last_borrowed_date: Option<NaiveDateTime>,
    #[schema(example = "2025-02-01", format = "date", value_type = Option<String>)]
    pub purchased_on: Option<NaiveDate>,
    #[schema(example = "4200.00", value_type = Option<String>)]
    pub purchase_price: Option<Amount>,
    pub purchase_at: Option<String>,
    /// Oldest first. Empty in list responses.
    pub history: Vec<BorrowRecord>,
    #[schema(format = "date-time", value_type = String)]
    pub created_at: NaiveDateTime,
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInventoryItem {
    pub name: String,
    pub inventory_type: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub purchased_on: Option<NaiveDate>,
    pub purchase_price: Option<Amount>,
    pub purchase_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryFilter {
    pub available: Option<bool>,
    pub limit: u32,
    pub offset: u32,
}

/// Outcome of a conditional availability flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkout {
    Done,
    AlreadyInState,
    NoSuchItem,
}
