use chrono::{DateTime, Duration, Utc};

/// Expiry parsing for create requests and the CLI
pub struct TimeParser;

impl TimeParser {
    /// 解析过期时间，支持：
    /// - RFC3339：2023-10-01T12:00:00Z（可以是过去的时间）
    /// - 相对时间：30m, 1d, 2w, 1y
    /// - 组合格式：1d12h, 2h30m
    pub fn parse_expire_time(input: &str) -> Result<DateTime<Utc>, String> {
        Self::parse_expire_time_at(input, Utc::now())
    }

    /// Same as [`Self::parse_expire_time`], relative durations measured from `now`
    pub fn parse_expire_time_at(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
        let input = input.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Ok(dt.with_timezone(&Utc));
        }

        let duration = Self::parse_duration(input)?;
        now.checked_add_signed(duration)
            .ok_or_else(|| "计算的过期时间超出了有效范围".to_string())
    }

    /// Parse `1d12h` style durations; every number needs a unit
    pub fn parse_duration(input: &str) -> Result<Duration, String> {
        let mut total = Duration::zero();
        let mut rest = input;

        if rest.is_empty() {
            return Err("时间不能为空".to_string());
        }

        while !rest.is_empty() {
            let digits_end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            if digits_end == 0 {
                return Err(format!("无效的时间格式: '{}'", input));
            }
            let num: i64 = rest[..digits_end]
                .parse()
                .map_err(|_| format!("无效的数字: '{}'", &rest[..digits_end]))?;
            rest = &rest[digits_end..];

            let unit_end = rest
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(rest.len());
            if unit_end == 0 {
                return Err(format!("缺少时间单位，数字 '{}' 后应跟时间单位", num));
            }
            let unit = &rest[..unit_end];
            rest = &rest[unit_end..];

            let part = match unit {
                "s" | "sec" | "second" | "seconds" => Duration::try_seconds(num),
                "m" | "min" | "minute" | "minutes" => Duration::try_minutes(num),
                "h" | "hour" | "hours" => Duration::try_hours(num),
                "d" | "day" | "days" => Duration::try_days(num),
                "w" | "week" | "weeks" => Duration::try_weeks(num),
                "M" | "month" | "months" => num.checked_mul(30).and_then(Duration::try_days),
                "y" | "year" | "years" => num.checked_mul(365).and_then(Duration::try_days),
                _ => return Err(format!("不支持的时间单位: '{}'", unit)),
            }
            .ok_or_else(|| format!("时间过大: '{}{}'", num, unit))?;

            total = total
                .checked_add(&part)
                .ok_or_else(|| "时间间隔溢出".to_string())?;
        }

        if total.is_zero() {
            return Err("时间间隔不能为零".to_string());
        }

        Ok(total)
    }
}
