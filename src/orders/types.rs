//! Rows of the order tables

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery progress of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Assigned,
    InTransit,
    Delivered,
}

impl OrderStatus {
    /// Convert the status to its column value
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Assigned => "assigned",
            OrderStatus::InTransit => "in_transit",
            OrderStatus::Delivered => "delivered",
        }
    }
}

/// Primary key of a row; tables may use serial or uuid keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Int(id) => write!(f, "{}", id),
            RowId::Text(id) => f.write_str(id),
        }
    }
}

/// Order header to insert
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    pub user_id: String,
    pub total_amount: f64,
    pub status: OrderStatus,
}

/// Order header as stored
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderRow {
    pub id: RowId,

    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default)]
    pub total_amount: Option<f64>,

    #[serde(default)]
    pub status: OrderStatus,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Line item to insert
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrderItem {
    pub order_id: RowId,
    pub item_name: String,
    pub quantity: u32,
    pub note: Option<String>,
}
