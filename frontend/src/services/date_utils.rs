use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Get current date in YYYY-MM-DD format (browser clock), suitable as the
/// default value of an `<input type="date">`.
pub fn current_date_input_value() -> String {
    use js_sys::Date;
    let now = Date::new_0();
    let year = now.get_full_year();
    let month = now.get_month() + 1; // JavaScript months are 0-indexed
    let day = now.get_date();

    date_input_value(year as u32, month as u32, day as u32)
}

fn date_input_value(year: u32, month: u32, day: u32) -> String {
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Parse a YYYY-MM-DD input value into a UTC timestamp at midnight.
pub fn parse_date_input(value: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight))
}

/// Format a timestamp for table cells, dd/mm/yyyy.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Format an optional timestamp, using a dash for "no date".
pub fn format_optional_date(date: Option<&DateTime<Utc>>) -> String {
    match date {
        Some(date) => format_date(date),
        None => "—".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_input_value_zero_pads() {
        assert_eq!(date_input_value(2024, 3, 9), "2024-03-09");
        assert_eq!(date_input_value(2024, 12, 31), "2024-12-31");
    }

    #[test]
    fn test_date_input_value_is_parseable_back() {
        let value = date_input_value(2024, 3, 9);
        assert!(parse_date_input(&value).is_some());
    }

    #[test]
    fn test_parse_date_input_valid() {
        let parsed = parse_date_input("2024-03-09").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-03-09T00:00:00+00:00");
    }

    #[test]
    fn test_parse_date_input_trims_whitespace() {
        assert!(parse_date_input(" 2024-03-09 ").is_some());
    }

    #[test]
    fn test_parse_date_input_rejects_garbage() {
        assert!(parse_date_input("").is_none());
        assert!(parse_date_input("09/03/2024").is_none());
        assert!(parse_date_input("2024-13-01").is_none());
    }

    #[test]
    fn test_format_date_day_first() {
        let date = parse_date_input("2024-03-09").unwrap();
        assert_eq!(format_date(&date), "09/03/2024");
    }

    #[test]
    fn test_format_optional_date_dash_when_missing() {
        assert_eq!(format_optional_date(None), "—");
    }
}
