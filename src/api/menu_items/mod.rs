//! 菜单目录 API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/menu-items | GET | 菜单列表 (category/available/popular 过滤) | 无 |
//! | /api/menu-items/{id} | GET | 单个菜品 | 无 |
//! | /api/admin/menu-items | POST | 新建菜品 | admin+ |
//! | /api/admin/menu-items/{id} | PUT | 更新菜品 | admin+ |
//! | /api/admin/menu-items/{id} | DELETE | 删除菜品 | super_admin |

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::{STAFF_ROLES, SUPER_ADMIN_ONLY, require_auth, require_role};
use crate::core::ServerState;
use crate::rate_limit::rate_limit;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .nest("/api/menu-items", public_routes())
        .nest("/api/admin/menu-items", admin_routes(state))
}

fn public_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
}

fn admin_routes(state: &ServerState) -> Router<ServerState> {
    // 删除是不可逆操作，单独收紧到 super_admin
    let staff = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(middleware::from_fn(require_role(STAFF_ROLES)));

    let super_admin = Router::new()
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(middleware::from_fn(require_role(SUPER_ADMIN_ONLY)));

    staff
        .merge(super_admin)
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
}
