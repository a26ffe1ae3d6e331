//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`ApiResponse`] - 错误类型和响应结构
//! - [`time`] - 日期解析和 time-ago 格式化
//! - 日志等工具

pub mod error;
pub mod logger;
pub mod result;
pub mod time;

pub use error::{ApiResponse, AppError, ok, ok_with_message};
pub use result::AppResult;
