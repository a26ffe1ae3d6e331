//! Statistics Handlers
//!
//! 聚合全部在应用层完成：取出时间窗内的订单，解码行项目快照后折叠。
//! 数据量在单店场景下很小，换取对任意 SQL 方言的无依赖。

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{Order, OrderStatus};
use crate::db::repository::OrderRepository;
use crate::utils::time::time_ago;
use crate::utils::{ApiResponse, AppError, AppResult, ok};

/// 排行榜长度上限
const MAX_TOP_ITEMS: usize = 50;

/// 看板近期订单条数
const RECENT_ORDERS: usize = 5;

// ========== Dashboard ==========

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// 统计窗口 (天)，默认 7
    pub days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub days: i64,
    /// 营收 (不含已取消订单)
    pub total_revenue: f64,
    pub order_count: i64,
    pub cancelled_count: i64,
    pub average_order_value: f64,
    pub status_breakdown: Vec<StatusCount>,
    pub recent_orders: Vec<RecentOrder>,
}

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct RecentOrder {
    pub id: String,
    pub customer_name: String,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub time_ago: String,
}

/// GET /api/admin/dashboard/stats
pub async fn dashboard(
    State(state): State<ServerState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let days = window_days(query.days)?;
    let now = Utc::now();

    let repo = OrderRepository::new(state.pool.clone());
    let orders = repo
        .find_created_between(now - Duration::days(days), now, None)
        .await?;

    Ok(ok(compute_dashboard(&orders, days, now)))
}

fn compute_dashboard(orders: &[Order], days: i64, now: DateTime<Utc>) -> DashboardStats {
    let order_count = orders.len() as i64;
    let cancelled_count = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Cancelled)
        .count() as i64;
    let total_revenue: f64 = orders
        .iter()
        .filter(|o| o.status != OrderStatus::Cancelled)
        .map(|o| o.total_amount)
        .sum();
    let billable = order_count - cancelled_count;
    let average_order_value = if billable > 0 {
        total_revenue / billable as f64
    } else {
        0.0
    };

    // orders arrive sorted newest-first from the repository
    let recent_orders = orders
        .iter()
        .take(RECENT_ORDERS)
        .map(|o| RecentOrder {
            id: o.id.clone(),
            customer_name: o.customer_name.clone(),
            total_amount: o.total_amount,
            status: o.status,
            time_ago: time_ago(now, o.created_at),
        })
        .collect();

    DashboardStats {
        days,
        total_revenue,
        order_count,
        cancelled_count,
        average_order_value,
        status_breakdown: status_breakdown(orders),
        recent_orders,
    }
}

fn status_breakdown(orders: &[Order]) -> Vec<StatusCount> {
    use OrderStatus::*;
    [Pending, Confirmed, Preparing, Ready, Delivered, Cancelled]
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: orders.iter().filter(|o| o.status == status).count() as i64,
        })
        .collect()
}

// ========== Analytics ==========

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    #[default]
    Time,
    Status,
    OrderType,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Hour,
    #[default]
    Day,
    Week,
    Month,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub group_by: Option<GroupBy>,
    pub granularity: Option<Granularity>,
    pub days: Option<i64>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct AnalyticsBucket {
    pub key: String,
    pub count: i64,
    pub revenue: f64,
}

/// GET /api/admin/analytics/orders
pub async fn analytics(
    State(state): State<ServerState>,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<Json<ApiResponse<Vec<AnalyticsBucket>>>> {
    let days = window_days(query.days)?;
    let now = Utc::now();

    let repo = OrderRepository::new(state.pool.clone());
    let orders = repo
        .find_created_between(now - Duration::days(days), now, None)
        .await?;

    let buckets = group_orders(
        &orders,
        query.group_by.unwrap_or_default(),
        query.granularity.unwrap_or_default(),
    );
    Ok(ok(buckets))
}

/// 时间桶标签 - 同一桶内的订单共享一个 key
fn bucket_key(granularity: Granularity, ts: DateTime<Utc>) -> String {
    match granularity {
        Granularity::Hour => ts.format("%Y-%m-%d %H:00").to_string(),
        Granularity::Day => ts.format("%Y-%m-%d").to_string(),
        // ISO week so year boundaries stay consistent
        Granularity::Week => ts.format("%G-W%V").to_string(),
        Granularity::Month => ts.format("%Y-%m").to_string(),
    }
}

fn group_orders(
    orders: &[Order],
    group_by: GroupBy,
    granularity: Granularity,
) -> Vec<AnalyticsBucket> {
    let mut buckets: BTreeMap<String, (i64, f64)> = BTreeMap::new();
    for order in orders {
        let key = match group_by {
            GroupBy::Time => bucket_key(granularity, order.created_at),
            GroupBy::Status => order.status.to_string(),
            GroupBy::OrderType => order.order_type.to_string(),
        };
        let entry = buckets.entry(key).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += order.total_amount;
    }

    buckets
        .into_iter()
        .map(|(key, (count, revenue))| AnalyticsBucket {
            key,
            count,
            revenue,
        })
        .collect()
}

// ========== Top items ==========

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    #[default]
    Quantity,
    Revenue,
}

#[derive(Debug, Deserialize)]
pub struct TopItemsQuery {
    pub days: Option<i64>,
    pub status: Option<OrderStatus>,
    pub rank_by: Option<RankBy>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TopItem {
    pub id: String,
    pub name: String,
    pub total_quantity: i64,
    pub total_revenue: f64,
}

/// GET /api/admin/stats/top-items
pub async fn top_items(
    State(state): State<ServerState>,
    Query(query): Query<TopItemsQuery>,
) -> AppResult<Json<ApiResponse<Vec<TopItem>>>> {
    let days = window_days(query.days)?;
    let now = Utc::now();

    let repo = OrderRepository::new(state.pool.clone());
    let orders = repo
        .find_created_between(now - Duration::days(days), now, query.status)
        .await?;

    let mut items = fold_top_items(&orders);
    rank_items(&mut items, query.rank_by.unwrap_or_default());
    items.truncate(query.limit.unwrap_or(10).min(MAX_TOP_ITEMS));

    Ok(ok(items))
}

/// 把所有订单的行项目折叠到按菜品 id 聚合的映射
fn fold_top_items(orders: &[Order]) -> Vec<TopItem> {
    let mut by_item: BTreeMap<String, TopItem> = BTreeMap::new();
    for order in orders {
        for line in &order.items {
            let entry = by_item.entry(line.id.clone()).or_insert_with(|| TopItem {
                id: line.id.clone(),
                name: line.name.clone(),
                total_quantity: 0,
                total_revenue: 0.0,
            });
            entry.total_quantity += line.quantity;
            entry.total_revenue += line.line_total();
        }
    }
    by_item.into_values().collect()
}

fn rank_items(items: &mut [TopItem], rank_by: RankBy) {
    match rank_by {
        RankBy::Quantity => items.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity)),
        RankBy::Revenue => {
            items.sort_by(|a, b| {
                b.total_revenue
                    .partial_cmp(&a.total_revenue)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
    }
}

// ========== Shared ==========

fn window_days(days: Option<i64>) -> AppResult<i64> {
    let days = days.unwrap_or(7);
    if !(1..=365).contains(&days) {
        return Err(AppError::validation("days must be between 1 and 365"));
    }
    Ok(days)
}
