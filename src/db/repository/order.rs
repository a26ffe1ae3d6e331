//! Order Repository
//!
//! Orders are append-and-update only, never deleted (audit trail). Listing is
//! compiled from an explicit [`OrderFilter`] criteria struct instead of ad hoc
//! conditional query assembly.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::db::models::{Order, OrderRow, OrderStatus, OrderType};
use crate::utils::{AppError, AppResult};

/// Sort key for order listings, mapped to a fixed column name
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    TotalAmount,
}

impl OrderSortKey {
    fn column(&self) -> &'static str {
        match self {
            OrderSortKey::CreatedAt => "created_at",
            OrderSortKey::UpdatedAt => "updated_at",
            OrderSortKey::TotalAmount => "total_amount",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => " ASC",
            SortDirection::Desc => " DESC",
        }
    }
}

/// Listing criteria - optional fields, compiled by [`OrderRepository::list`]
#[derive(Debug, Clone)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub order_type: Option<OrderType>,
    /// Restrict to one account's orders (customer-facing listing)
    pub user_id: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    /// Free-text match over customer name, phone and order id
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
    pub sort_by: OrderSortKey,
    pub sort_dir: SortDirection,
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self {
            status: None,
            order_type: None,
            user_id: None,
            date_from: None,
            date_to: None,
            search: None,
            limit: 20,
            offset: 0,
            sort_by: OrderSortKey::default(),
            sort_dir: SortDirection::default(),
        }
    }
}

#[derive(Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, order: &Order) -> AppResult<()> {
        let items_json = serde_json::to_string(&order.items)
            .map_err(|e| AppError::internal(format!("Failed to encode line items: {e}")))?;

        sqlx::query(
            "INSERT INTO orders
                (id, user_id, items, total_amount, status, order_type, table_number,
                 delivery_address, customer_name, customer_phone, order_notes,
                 created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(items_json)
        .bind(order.total_amount)
        .bind(order.status)
        .bind(order.order_type)
        .bind(&order.table_number)
        .bind(&order.delivery_address)
        .bind(&order.customer_name)
        .bind(&order.customer_phone)
        .bind(&order.order_notes)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Order::try_from).transpose()
    }

    /// Paginated listing plus the unpaginated total for `has_more`
    pub async fn list(&self, filter: &OrderFilter) -> AppResult<(Vec<Order>, i64)> {
        let mut count_qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM orders");
        Self::push_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM orders");
        Self::push_filters(&mut qb, filter);
        qb.push(" ORDER BY ")
            .push(filter.sort_by.column())
            .push(filter.sort_dir.as_sql());
        qb.push(" LIMIT ").push_bind(filter.limit);
        qb.push(" OFFSET ").push_bind(filter.offset);

        let rows = qb
            .build_query_as::<OrderRow>()
            .fetch_all(&self.pool)
            .await?;
        let orders = rows
            .into_iter()
            .map(Order::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((orders, total))
    }

    /// All orders created in `[start, end)`, optionally restricted by status.
    /// Used by the reporting layer, which folds line items in application code.
    pub async fn find_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status: Option<OrderStatus>,
    ) -> AppResult<Vec<Order>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM orders WHERE created_at >= ");
        qb.push_bind(start);
        qb.push(" AND created_at < ").push_bind(end);
        if let Some(status) = status {
            qb.push(" AND status = ").push_bind(status);
        }
        qb.push(" ORDER BY created_at DESC");

        let rows = qb
            .build_query_as::<OrderRow>()
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Order::try_from).collect()
    }

    /// Persist a status change, refreshing `updated_at`.
    ///
    /// Transition legality is checked by the caller against the loaded order;
    /// two concurrent updates race at last-write-wins (no version column).
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> AppResult<Order> {
        sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &OrderFilter) {
        qb.push(" WHERE 1=1");
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(order_type) = filter.order_type {
            qb.push(" AND order_type = ").push_bind(order_type);
        }
        if let Some(user_id) = &filter.user_id {
            qb.push(" AND user_id = ").push_bind(user_id.clone());
        }
        if let Some(from) = filter.date_from {
            qb.push(" AND created_at >= ").push_bind(from);
        }
        if let Some(to) = filter.date_to {
            qb.push(" AND created_at < ").push_bind(to);
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            qb.push(" AND (customer_name LIKE ")
                .push_bind(pattern.clone())
                .push(" OR customer_phone LIKE ")
                .push_bind(pattern.clone())
                .push(" OR id LIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }
}
