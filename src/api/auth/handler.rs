//! Authentication Handlers
//!
//! 注册、登录、当前用户查询。登录失败统一返回
//! "Invalid username or password"，不区分用户不存在和密码错误。

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Account, AccountCreate, Role};
use crate::db::repository::AccountRepository;
use crate::security_log;
use crate::utils::{ApiResponse, AppError, AppResult, ok, ok_with_message};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 200;

/// 注册请求
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// 登录请求
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 注册/登录响应 - 令牌 + 脱敏账户
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub account: Account,
}

/// POST /api/user/register - 顾客注册
pub async fn register_user(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    register(state, payload, Role::User).await
}

/// POST /api/admin/register - 后台账户注册
pub async fn register_admin(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    register(state, payload, Role::Admin).await
}

async fn register(
    state: ServerState,
    payload: RegisterRequest,
    role: Role,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    payload.validate()?;

    let password_hash = Account::hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))?;

    let repo = AccountRepository::new(state.pool.clone());
    let account = repo
        .create(AccountCreate {
            username: payload.username,
            email: payload.email,
            password_hash,
            role,
        })
        .await?;

    let token = state
        .jwt_service
        .generate_token(&account)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        account_id = %account.id,
        username = %account.username,
        role = %account.role,
        "Account registered"
    );

    Ok(ok_with_message(
        AuthResponse { token, account },
        "Account created",
    ))
}

/// POST /api/user/login - 顾客登录
pub async fn login_user(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    login(state, payload, false).await
}

/// POST /api/admin/login - 后台登录，要求 staff 角色
pub async fn login_admin(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    login(state, payload, true).await
}

async fn login(
    state: ServerState,
    payload: LoginRequest,
    staff_only: bool,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let repo = AccountRepository::new(state.pool.clone());
    let account = repo.find_by_username(&payload.username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent username enumeration
    let account = match account {
        Some(account) => account,
        None => {
            security_log!("WARN", "login_failed", username = payload.username.clone());
            return Err(AppError::invalid_credentials());
        }
    };

    if !account.is_active {
        security_log!(
            "WARN",
            "login_disabled_account",
            account_id = account.id.clone(),
            username = account.username.clone()
        );
        return Err(AppError::forbidden("Account has been disabled"));
    }

    let password_valid = account
        .verify_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

    if !password_valid {
        security_log!(
            "WARN",
            "login_failed",
            account_id = account.id.clone(),
            username = account.username.clone()
        );
        return Err(AppError::invalid_credentials());
    }

    if staff_only && !account.role.is_staff() {
        security_log!(
            "WARN",
            "login_wrong_portal",
            account_id = account.id.clone(),
            username = account.username.clone(),
            role = account.role.to_string()
        );
        return Err(AppError::forbidden("Staff account required"));
    }

    let token = state
        .jwt_service
        .generate_token(&account)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        account_id = %account.id,
        username = %account.username,
        role = %account.role,
        "Login successful"
    );

    Ok(ok(AuthResponse { token, account }))
}

/// GET /api/auth/me - 当前登录身份 (从数据库重新加载)
pub async fn me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Account>>> {
    let repo = AccountRepository::new(state.pool.clone());
    let account = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(AppError::unauthorized)?;

    Ok(ok(account))
}
