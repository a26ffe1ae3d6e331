//! Order Handlers
//!
//! 下单时从请求快照行项目 (名称/价格)，总额由服务端计算；
//! 状态流转先校验状态机再落库，非法跳转返回 409。

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderDraft, OrderLineItem, OrderStatus, OrderType};
use crate::db::repository::{OrderFilter, OrderRepository, OrderSortKey, SortDirection};
use crate::utils::time::{day_end, day_start, parse_date};
use crate::utils::{ApiResponse, AppError, AppResult, ok, ok_with_message};

// ========== Request / Response DTOs ==========

/// 下单请求 - 行项目是购物车快照
#[derive(Debug, Deserialize, Validate)]
pub struct OrderCreateRequest {
    #[validate(length(min = 1, message = "Order must contain at least one item"))]
    pub items: Vec<LineItemInput>,
    pub order_type: OrderType,
    pub table_number: Option<String>,
    pub delivery_address: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub order_notes: Option<String>,
}

/// 行项目输入 (菜品 id + 下单时的名称/价格快照)
#[derive(Debug, Deserialize, Serialize)]
pub struct LineItemInput {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

/// 状态流转请求
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// 订单列表查询参数 (日期为 YYYY-MM-DD，含首尾两天)
#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub order_type: Option<OrderType>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort_by: Option<OrderSortKey>,
    pub sort_dir: Option<SortDirection>,
}

/// 分页订单列表响应
#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

impl OrderListQuery {
    fn into_filter(self, user_id: Option<String>) -> AppResult<OrderFilter> {
        let defaults = OrderFilter::default();
        let limit = self.limit.unwrap_or(defaults.limit);
        let offset = self.offset.unwrap_or(defaults.offset);
        if limit < 1 || limit > 100 {
            return Err(AppError::validation("limit must be between 1 and 100"));
        }
        if offset < 0 {
            return Err(AppError::validation("offset must not be negative"));
        }

        let date_from = self
            .date_from
            .as_deref()
            .map(|d| parse_date(d).map(day_start))
            .transpose()?;
        let date_to = self
            .date_to
            .as_deref()
            .map(|d| parse_date(d).map(day_end))
            .transpose()?;

        Ok(OrderFilter {
            status: self.status,
            order_type: self.order_type,
            user_id,
            date_from,
            date_to,
            search: self.search,
            limit,
            offset,
            sort_by: self.sort_by.unwrap_or_default(),
            sort_dir: self.sort_dir.unwrap_or_default(),
        })
    }
}

impl OrderCreateRequest {
    /// 请求级校验之外的领域校验
    fn validate_domain(&self) -> AppResult<()> {
        for item in &self.items {
            if item.quantity <= 0 {
                return Err(AppError::validation(format!(
                    "Item {} quantity must be greater than zero",
                    item.id
                )));
            }
            if item.price < 0.0 {
                return Err(AppError::validation(format!(
                    "Item {} price must not be negative",
                    item.id
                )));
            }
        }

        let has = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.trim().is_empty());
        match self.order_type {
            OrderType::DineIn if !has(&self.table_number) => Err(AppError::validation(
                "table_number is required for dine-in orders",
            )),
            OrderType::Delivery if !has(&self.delivery_address) => Err(AppError::validation(
                "delivery_address is required for delivery orders",
            )),
            _ => Ok(()),
        }
    }
}

// ========== User Handlers ==========

/// POST /api/user/orders - 下单
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<OrderCreateRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    payload.validate()?;
    payload.validate_domain()?;

    let items = payload
        .items
        .into_iter()
        .map(|item| OrderLineItem {
            id: item.id,
            name: item.name,
            price: item.price,
            quantity: item.quantity,
        })
        .collect();

    let order = Order::from_draft(OrderDraft {
        user_id: Some(user.id.clone()),
        items,
        order_type: payload.order_type,
        table_number: payload.table_number,
        delivery_address: payload.delivery_address,
        customer_name: payload.customer_name,
        customer_phone: payload.customer_phone,
        order_notes: payload.order_notes,
    });

    let repo = OrderRepository::new(state.pool.clone());
    repo.create(&order).await?;

    tracing::info!(
        order_id = %order.id,
        account_id = %user.id,
        total = order.total_amount,
        "Order created"
    );

    Ok(ok_with_message(order, "Order created"))
}

/// GET /api/user/orders - 本人订单列表
pub async fn list_mine(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderListResponse>>> {
    let filter = query.into_filter(Some(user.id))?;
    list_with_filter(&state, filter).await
}

/// GET /api/user/orders/{id} - 本人单个订单
pub async fn get_mine(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let repo = OrderRepository::new(state.pool.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;

    if order.user_id.as_deref() != Some(user.id.as_str()) {
        return Err(AppError::forbidden("Order belongs to another account"));
    }

    Ok(ok(order))
}

/// PUT /api/user/orders/{id}/cancel - 取消本人订单
///
/// 走与后台相同的状态机：delivered 订单无法取消 (409)。
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let repo = OrderRepository::new(state.pool.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;

    if order.user_id.as_deref() != Some(user.id.as_str()) {
        return Err(AppError::forbidden("Order belongs to another account"));
    }

    let updated = transition(&repo, order, OrderStatus::Cancelled).await?;

    tracing::info!(order_id = %updated.id, account_id = %user.id, "Order cancelled");
    Ok(ok_with_message(updated, "Order cancelled"))
}

// ========== Admin Handlers ==========

/// GET /api/admin/orders - 全量订单列表
pub async fn list_all(
    State(state): State<ServerState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderListResponse>>> {
    let filter = query.into_filter(None)?;
    list_with_filter(&state, filter).await
}

/// GET /api/admin/orders/{id} - 单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let repo = OrderRepository::new(state.pool.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;

    Ok(ok(order))
}

/// PUT /api/admin/orders/{id}/status - 状态流转
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let repo = OrderRepository::new(state.pool.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;

    let from = order.status;
    let updated = transition(&repo, order, payload.status).await?;

    tracing::info!(
        order_id = %updated.id,
        account_id = %user.id,
        from = %from,
        to = %updated.status,
        "Order status updated"
    );
    Ok(ok(updated))
}

// ========== Shared helpers ==========

async fn list_with_filter(
    state: &ServerState,
    filter: OrderFilter,
) -> AppResult<Json<ApiResponse<OrderListResponse>>> {
    let repo = OrderRepository::new(state.pool.clone());
    let (orders, total) = repo.list(&filter).await?;

    Ok(ok(OrderListResponse {
        orders,
        total,
        limit: filter.limit,
        offset: filter.offset,
        has_more: filter.offset + filter.limit < total,
    }))
}

/// 校验并应用一次状态流转；同状态重复提交是幂等 no-op
async fn transition(
    repo: &OrderRepository,
    order: Order,
    next: OrderStatus,
) -> AppResult<Order> {
    if !order.status.can_transition_to(next) {
        return Err(AppError::invalid_transition(order.status, next));
    }
    if order.status == next {
        return Ok(order);
    }
    repo.update_status(&order.id, next).await
}
