//! 服务器配置
//!
//! # 环境变量
//!
//! | 环境变量 | 默认值 | 说明 |
//! |----------|--------|------|
//! | DATABASE_URL | sqlite:reef.db | SQLite 数据库地址 |
//! | HTTP_PORT | 3000 | HTTP 服务端口 |
//! | ENVIRONMENT | development | 运行环境 |
//! | JWT_SECRET | - | 签名密钥 (生产环境必填) |
//! | JWT_EXPIRATION_MINUTES | 1440 | 令牌有效期 (上限 24h) |
//! | RATE_LIMIT_MAX_REQUESTS | 60 | 滑动窗口内最大请求数 |
//! | RATE_LIMIT_WINDOW_MS | 60000 | 滑动窗口时长 (毫秒) |
//! | LOG_DIR | - | 日志文件目录 (可选) |

use crate::auth::JwtConfig;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 数据库地址
    pub database_url: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 敏感接口限流: 窗口内最大请求数
    pub rate_limit_max_requests: usize,
    /// 敏感接口限流: 窗口时长 (毫秒)
    pub rate_limit_window_ms: i64,
    /// 日志文件目录 (可选)
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置，未设置时使用默认值
    pub fn from_env() -> Self {
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:reef.db".to_string()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::from_env(&environment),
            rate_limit_max_requests: std::env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(60),
            rate_limit_window_ms: std::env::var("RATE_LIMIT_WINDOW_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(60_000),
            log_dir: std::env::var("LOG_DIR").ok(),
            environment,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
