//! 订单 API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/user/orders | POST | 下单 | JWT + 限流 |
//! | /api/user/orders | GET | 本人订单列表 | JWT |
//! | /api/user/orders/{id} | GET | 本人单个订单 | JWT |
//! | /api/user/orders/{id}/cancel | PUT | 取消本人订单 | JWT |
//! | /api/admin/orders | GET | 全量订单列表 (过滤/分页/排序) | admin+ |
//! | /api/admin/orders/{id} | GET | 单个订单 | admin+ |
//! | /api/admin/orders/{id}/status | PUT | 状态流转 | admin+ |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::{STAFF_ROLES, require_auth, require_role};
use crate::core::ServerState;
use crate::rate_limit::rate_limit;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .nest("/api/user/orders", user_routes(state))
        .nest("/api/admin/orders", admin_routes(state))
}

fn user_routes(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_mine).post(handler::create))
        .route("/{id}", get(handler::get_mine))
        .route("/{id}/cancel", put(handler::cancel))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
}

fn admin_routes(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_all))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::update_status))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(middleware::from_fn(require_role(STAFF_ROLES)))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
}
