//! 认证 API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/user/register | POST | 顾客注册 | 无 |
//! | /api/user/login | POST | 顾客登录 | 无 |
//! | /api/admin/register | POST | 后台账户注册 | 无 |
//! | /api/admin/login | POST | 后台登录 (要求 staff 角色) | 无 |
//! | /api/auth/me | GET | 当前登录身份 | JWT |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let public = Router::new()
        .route("/api/user/register", post(handler::register_user))
        .route("/api/user/login", post(handler::login_user))
        .route("/api/admin/register", post(handler::register_admin))
        .route("/api/admin/login", post(handler::login_admin));

    let protected = Router::new()
        .route("/api/auth/me", get(handler::me))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public.merge(protected)
}
