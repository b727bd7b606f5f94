use chrono::{DateTime, Local, NaiveDate};

/// Short relative age of a timestamp ("just now", "5m ago", "3h ago", "2d ago").
pub fn time_ago(then: DateTime<Local>, now: DateTime<Local>) -> String {
    let seconds = (now - then).num_seconds().max(0);
    if seconds < 60 {
        return "just now".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    format!("{}d ago", hours / 24)
}

/// Date as shown in activity entries, e.g. "Jan 7, 2024".
pub fn short_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Date as shown in the task header, e.g. "January 7, 2024".
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Parse a `YYYY-MM-DD` date typed into a prompt.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 10, h, m, s).single().unwrap()
    }

    #[test]
    fn under_a_minute_is_just_now() {
        assert_eq!(time_ago(at(10, 0, 0), at(10, 0, 59)), "just now");
    }

    #[test]
    fn minutes_hours_days() {
        let now = at(12, 0, 0);
        assert_eq!(time_ago(now - Duration::minutes(45), now), "45m ago");
        assert_eq!(time_ago(now - Duration::minutes(90), now), "1h ago");
        assert_eq!(time_ago(now - Duration::hours(49), now), "2d ago");
    }

    #[test]
    fn future_timestamps_clamp_to_just_now() {
        assert_eq!(time_ago(at(12, 5, 0), at(12, 0, 0)), "just now");
    }

    #[test]
    fn date_formats() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(short_date(d), "Jan 7, 2024");
        assert_eq!(long_date(d), "January 7, 2024");
        assert_eq!(parse_date(" 2024-01-07 "), Some(d));
        assert_eq!(parse_date("07/01/2024"), None);
    }
}
