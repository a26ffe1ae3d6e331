//! Order Model
//!
//! 订单状态机 + 行项目快照。行项目在下单时从购物车复制
//! (名称/价格快照)，后续菜单改价不会影响历史订单。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::AppError;

/// Order status state machine
///
/// ```text
/// pending → confirmed → preparing → ready → delivered
///     └────────┴────────────┴─────────┘
///                 ↓ (any non-terminal)
///             cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal states admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Explicit transition table
    ///
    /// Self-transitions are allowed as idempotent no-ops, so repeating a
    /// status update does not error.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if *self == next {
            return true;
        }
        match self {
            OrderStatus::Pending => matches!(next, OrderStatus::Confirmed | OrderStatus::Cancelled),
            OrderStatus::Confirmed => {
                matches!(next, OrderStatus::Preparing | OrderStatus::Cancelled)
            }
            OrderStatus::Preparing => matches!(next, OrderStatus::Ready | OrderStatus::Cancelled),
            OrderStatus::Ready => matches!(next, OrderStatus::Delivered | OrderStatus::Cancelled),
            OrderStatus::Delivered | OrderStatus::Cancelled => false,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type - determines which location field is required
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum OrderType {
    DineIn,
    Delivery,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::DineIn => "dine_in",
            OrderType::Delivery => "delivery",
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line item snapshot - copied from the cart at order time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    /// Menu item id at order time (no live foreign key)
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

impl OrderLineItem {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// Sum of line totals - the order's `total_amount` at creation time
pub fn total_of(items: &[OrderLineItem]) -> f64 {
    items.iter().map(OrderLineItem::line_total).sum()
}

/// Order entity
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: String,
    /// Placing account - nullable, dine-in guest orders may omit it
    pub user_id: Option<String>,
    pub items: Vec<OrderLineItem>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub table_number: Option<String>,
    pub delivery_address: Option<String>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub order_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields captured from a checkout request
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub user_id: Option<String>,
    pub items: Vec<OrderLineItem>,
    pub order_type: OrderType,
    pub table_number: Option<String>,
    pub delivery_address: Option<String>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub order_notes: Option<String>,
}

impl Order {
    /// Build a new pending order, computing `total_amount` from the snapshot
    pub fn from_draft(draft: OrderDraft) -> Self {
        let now = Utc::now();
        let total_amount = total_of(&draft.items);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: draft.user_id,
            items: draft.items,
            total_amount,
            status: OrderStatus::Pending,
            order_type: draft.order_type,
            table_number: draft.table_number,
            delivery_address: draft.delivery_address,
            customer_name: draft.customer_name,
            customer_phone: draft.customer_phone,
            order_notes: draft.order_notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Raw database row - `items` is the JSON snapshot column
#[derive(Debug, sqlx::FromRow)]
pub struct OrderRow {
    pub id: String,
    pub user_id: Option<String>,
    pub items: String,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub table_number: Option<String>,
    pub delivery_address: Option<String>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub order_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = AppError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let items: Vec<OrderLineItem> = serde_json::from_str(&row.items)
            .map_err(|e| AppError::internal(format!("Corrupt line items for order {}: {}", row.id, e)))?;
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            items,
            total_amount: row.total_amount,
            status: row.status,
            order_type: row.order_type,
            table_number: row.table_number,
            delivery_address: row.delivery_address,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            order_notes: row.order_notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
