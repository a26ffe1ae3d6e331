//! 统计 API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/admin/dashboard/stats | GET | 看板汇总 (营收/单量/状态分布/近期订单) | admin+ |
//! | /api/admin/analytics/orders | GET | 分组分析 (时间/状态/订单类型) | admin+ |
//! | /api/admin/stats/top-items | GET | 菜品排行 (按数量或营收) | admin+ |
//!
//! 全部只读：订单行项目在应用层解码后聚合，不依赖数据库方言的
//! JSON 查询能力。

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::{STAFF_ROLES, require_auth, require_role};
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .route("/api/admin/dashboard/stats", get(handler::dashboard))
        .route("/api/admin/analytics/orders", get(handler::analytics))
        .route("/api/admin/stats/top-items", get(handler::top_items))
        .layer(middleware::from_fn(require_role(STAFF_ROLES)))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
}
