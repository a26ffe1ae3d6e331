//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件。两级检查相互独立：
//! [`require_auth`] 负责认证，[`require_role`] 负责授权；
//! 路由组合时认证层始终在外层，角色检查不会对未认证请求执行。

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::db::models::Role;
use crate::db::repository::AccountRepository;
use crate::security_log;
use crate::utils::AppError;

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT，然后按 `sub`
/// 加载账户：账户不存在或已停用都视为未认证。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 签名密钥未配置 | 500 Misconfigured |
/// | 无 Authorization 头 | 401 Unauthorized |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 InvalidToken |
/// | 账户不存在/停用 | 401 Unauthorized |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if state.jwt_service.config.secret.is_empty() {
        return Err(AppError::misconfigured("JWT signing secret is not set"));
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(AppError::invalid_token)?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    let claims = state.jwt_service.validate_token(token).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = format!("{}", e),
            uri = format!("{:?}", req.uri())
        );
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token(),
        }
    })?;

    // Token is stateless, account status is not: load and re-check.
    let repo = AccountRepository::new(state.pool.clone());
    let account = repo
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(AppError::unauthorized)?;

    if !account.is_active {
        security_log!(
            "WARN",
            "auth_inactive_account",
            account_id = account.id.clone(),
            username = account.username.clone()
        );
        return Err(AppError::unauthorized());
    }

    req.extensions_mut().insert(CurrentUser::from(&account));
    Ok(next.run(req).await)
}

/// 角色检查中间件 - 要求角色属于给定集合
///
/// 必须组合在 [`require_auth`] 之后；扩展中没有 [`CurrentUser`]
/// 说明认证层缺失，按未认证处理。
///
/// # 用法
///
/// ```ignore
/// Router::new()
///     .route("/api/admin/menu-items", post(handler::create))
///     .layer(middleware::from_fn(require_role(STAFF_ROLES)))
///     .layer(middleware::from_fn_with_state(state, require_auth));
/// ```
pub fn require_role(
    roles: &'static [Role],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or_else(AppError::unauthorized)?;

            if !roles.contains(&user.role) {
                security_log!(
                    "WARN",
                    "role_denied",
                    account_id = user.id.clone(),
                    username = user.username.clone(),
                    role = user.role.to_string()
                );
                return Err(AppError::forbidden(format!(
                    "Requires one of roles: {}",
                    roles
                        .iter()
                        .map(Role::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

/// 后台角色集合 (admin + super_admin)
pub const STAFF_ROLES: &[Role] = &[Role::Admin, Role::SuperAdmin];

/// 仅 super_admin
pub const SUPER_ADMIN_ONLY: &[Role] = &[Role::SuperAdmin];
