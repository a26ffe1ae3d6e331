//! Server State
//!
//! 持有所有共享服务的单例引用，Arc 浅拷贝注入到各处理器。

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::rate_limit::RateLimiter;
use crate::utils::AppError;

/// 服务器状态
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | pool | SQLite 连接池 |
/// | jwt_service | JWT 认证服务 |
/// | rate_limiter | 滑动窗口限流器 (进程内单例，显式注入) |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序：数据库 (连接 + 迁移) → JWT 服务 → 限流器。
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_url).await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit_max_requests,
            config.rate_limit_window_ms,
        ));

        Ok(Self {
            config: config.clone(),
            pool: db.pool,
            jwt_service,
            rate_limiter,
        })
    }
}
