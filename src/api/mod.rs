//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册 / 登录 / 当前用户
//! - [`menu_items`] - 菜单目录 (公共读取 + 后台管理)
//! - [`orders`] - 订单 (用户下单 + 后台流转)
//! - [`statistics`] - 看板 / 分组分析 / 菜品排行
//!
//! 中间件层次 (由外到内): 认证 → 角色检查 → 限流 → 处理器。

pub mod auth;
pub mod health;
pub mod menu_items;
pub mod orders;
pub mod statistics;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::ServerState;

/// Build the full API router (state still unbound)
pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(auth::router(state))
        .merge(menu_items::router(state))
        .merge(orders::router(state))
        .merge(statistics::router(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
