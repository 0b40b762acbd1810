use time::Duration;

use crate::{error::PacingError, model::MinPerKm};

/// Converts a number of minutes into a Duration, rounded to the nearest
/// whole second. Out of range values saturate and NaN is zero.
pub fn minutes_to_duration(minutes: f64) -> Duration {
    Duration::seconds((minutes * 60.0).round() as i64)
}

/// Formats a time in minutes as "Xh Ym", or just "Ym" if it is under an
/// hour. The total is rounded to whole minutes before being split, so
/// 59.7 minutes is "1h 0m", never "60m".
pub fn format_minutes(minutes: f64) -> String {
    let total = Duration::seconds((minutes.round() * 60.0) as i64);
    let hours = total.whole_hours();
    let mins = total.whole_minutes() - hours * 60;

    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

/// Formats a time in minutes as "H:MM:SS", which is what a split sheet
/// wants.
pub fn format_clock(minutes: f64) -> String {
    let d = minutes_to_duration(minutes);
    let hours = d.whole_hours();
    let mins = d.whole_minutes() - hours * 60;
    let secs = d.whole_seconds() - d.whole_minutes() * 60;
    format!("{hours}:{mins:02}:{secs:02}")
}

/// Formats a pace as "M:SS min/km".
pub fn format_pace(pace: MinPerKm) -> String {
    let d = minutes_to_duration(pace);
    let mins = d.whole_minutes();
    let secs = d.whole_seconds() - mins * 60;
    format!("{mins}:{secs:02} min/km")
}

/// Parses a target time of the form "H:MM" (hours and minutes) into
/// minutes.
pub fn parse_target_time(s: &str) -> Result<f64, PacingError> {
    parse_pair(s).ok_or_else(|| PacingError::InvalidTime(s.to_owned()))
}

/// Parses a pace of the form "M:SS" (minutes and seconds per km) into
/// minutes per km.
pub fn parse_pace(s: &str) -> Result<MinPerKm, PacingError> {
    parse_pair(s)
        .map(|v| v / 60.0)
        .ok_or_else(|| PacingError::InvalidPace(s.to_owned()))
}

/// Parses "A:BB" into A * 60 + BB, requiring BB < 60.
fn parse_pair(s: &str) -> Option<f64> {
    let (major, minor) = s.trim().split_once(':')?;
    let major: u32 = major.trim().parse().ok()?;
    let minor: u32 = minor.trim().parse().ok()?;
    if minor >= 60 {
        return None;
    }

    major
        .checked_mul(60)
        .and_then(|v| v.checked_add(minor))
        .map(|v| v as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(25.0), "25m");
        assert_eq!(format_minutes(0.0), "0m");
        assert_eq!(format_minutes(390.0), "6h 30m");
        assert_eq!(format_minutes(59.7), "1h 0m");
        assert_eq!(format_minutes(125.4), "2h 5m");
    }

    #[test]
    fn test_huge_times_saturate() {
        let text = format_minutes(1e18);
        assert!(text.contains("h ") && text.ends_with('m'));
        assert_eq!(format_minutes(f64::NAN), "0m");
        assert!(format_clock(1e18).contains(':'));
        assert!(format_pace(f64::INFINITY).ends_with("min/km"));
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(17.5), "0:17:30");
        assert_eq!(format_clock(125.25), "2:05:15");
    }

    #[test]
    fn test_format_pace() {
        assert_eq!(format_pace(5.5), "5:30 min/km");
        assert_eq!(format_pace(6.0), "6:00 min/km");
        // 4.999 min is 299.94 seconds, which rounds up to a whole 5 minutes.
        assert_eq!(format_pace(4.999), "5:00 min/km");
    }

    #[test]
    fn test_parse_target_time() {
        assert_eq!(parse_target_time("06:30"), Ok(390.0));
        assert_eq!(parse_target_time("1:05"), Ok(65.0));
        assert_eq!(
            parse_target_time("1:75"),
            Err(PacingError::InvalidTime("1:75".to_owned()))
        );
        assert!(parse_target_time("90").is_err());
        assert!(parse_target_time("a:10").is_err());
        assert_eq!(
            parse_target_time("4000000000:00"),
            Err(PacingError::InvalidTime("4000000000:00".to_owned()))
        );
    }

    #[test]
    fn test_parse_pace() {
        assert_eq!(parse_pace("5:30"), Ok(5.5));
        assert_eq!(parse_pace(" 6:00 "), Ok(6.0));
        assert_eq!(
            parse_pace("5:60"),
            Err(PacingError::InvalidPace("5:60".to_owned()))
        );
        assert!(parse_pace("-5:30").is_err());
        assert_eq!(
            parse_pace("71582789:00"),
            Err(PacingError::InvalidPace("71582789:00".to_owned()))
        );
        assert_eq!(parse_pace("71582788:00"), Ok(71582788.0));
    }
}
