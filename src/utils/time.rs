//! 时间工具函数
//!
//! 所有日期→时间戳转换统一在 API handler 层完成，
//! repository 层只接收 `DateTime<Utc>`。

use chrono::{DateTime, NaiveDate, Utc};

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 日期开始 (00:00:00 UTC)
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
}

/// 日期结束 → 次日 00:00:00 UTC
///
/// 返回次日零点，调用方使用 `< end` (不含) 语义。
pub fn day_end(date: NaiveDate) -> DateTime<Utc> {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start(next_day)
}

/// Elapsed-time bucketing for dashboard views
///
/// Deterministic given `(now, ts)`:
/// - under a minute: "just now"
/// - under an hour: "Nm ago"
/// - under a day: "Nh ago"
/// - otherwise: "Nd ago"
pub fn time_ago(now: DateTime<Utc>, ts: DateTime<Utc>) -> String {
    let minutes = (now - ts).num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 24 * 60 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / (24 * 60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_time_ago_buckets() {
        let now = Utc::now();

        assert_eq!(time_ago(now, now), "just now");
        assert_eq!(time_ago(now, now - Duration::seconds(59)), "just now");
        assert_eq!(time_ago(now, now - Duration::minutes(5)), "5m ago");
        assert_eq!(time_ago(now, now - Duration::minutes(59)), "59m ago");
        assert_eq!(time_ago(now, now - Duration::hours(1)), "1h ago");
        assert_eq!(time_ago(now, now - Duration::hours(23)), "23h ago");
        assert_eq!(time_ago(now, now - Duration::hours(24)), "1d ago");
        assert_eq!(time_ago(now, now - Duration::days(10)), "10d ago");
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2024-06-01").is_ok());
        assert!(parse_date("01/06/2024").is_err());
        assert!(parse_date("not-a-date").is_err());
    }

    #[test]
    fn test_day_bounds() {
        let date = parse_date("2024-06-01").unwrap();
        let start = day_start(date);
        let end = day_end(date);
        assert_eq!(end - start, Duration::days(1));
    }
}
