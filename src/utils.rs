use chrono::{Local, LocalResult, TimeZone, Utc};

/// 将毫秒时间戳格式化为标准时间格式 HH:MM:SS.mmm
pub fn format_timestamp(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms) {
        LocalResult::Single(datetime) => datetime.format("%H:%M:%S%.3f").to_string(),
        _ => format!("Invalid timestamp: {}", timestamp_ms),
    }
}

/// 当前 epoch 毫秒时间戳，模拟数据源给样本打戳时使用
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
