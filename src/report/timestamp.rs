use chrono::NaiveDate;

/// rendering width for schedule clock cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockFormat {
    HourMinuteSecond,
    HourMinute,
    MinuteOnly,
}

/// formats a GTFS clock value (seconds past midnight, possibly beyond 24:00
/// for service running past the end of the day) in the requested width.
pub fn format_clock(seconds: u32, format: ClockFormat) -> String {
    let hour = seconds / 3600;
    let minute = seconds % 3600 / 60;
    let second = seconds % 60;
    match format {
        ClockFormat::HourMinuteSecond => format!("{hour:02}:{minute:02}:{second:02}"),
        ClockFormat::HourMinute => format!("{hour:02}:{minute:02}"),
        ClockFormat::MinuteOnly => format!(":{minute:02}"),
    }
}

/// same-hour elision: a cell rendered directly below a same-hour cell in its
/// column shows minutes only. operates on the already-sorted sequence.
pub fn elided(previous: Option<u32>, current: u32) -> ClockFormat {
    match previous {
        Some(prev) if prev / 3600 == current / 3600 => ClockFormat::MinuteOnly,
        _ => ClockFormat::HourMinute,
    }
}

pub fn datestamp(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// header line for weekly reports, e.g. "Week Ending: Sunday 10-March-2024".
pub fn week_ending_stamp(week_ending: NaiveDate) -> String {
    format!("Week Ending: {}", week_ending.format("%A %-d-%B-%Y"))
}

#[cfg(test)]
mod test {
    use super::{elided, format_clock, ClockFormat};

    #[test]
    fn test_format_clock_widths() {
        let clock = 8 * 3600 + 5 * 60 + 30;
        assert_eq!(format_clock(clock, ClockFormat::HourMinuteSecond), "08:05:30");
        assert_eq!(format_clock(clock, ClockFormat::HourMinute), "08:05");
        assert_eq!(format_clock(clock, ClockFormat::MinuteOnly), ":05");
    }

    #[test]
    fn test_format_clock_past_midnight() {
        assert_eq!(format_clock(25 * 3600 + 900, ClockFormat::HourMinute), "25:15");
    }

    #[test]
    fn test_elision_applies_within_same_hour_only() {
        let h8a = 8 * 3600 + 10 * 60;
        let h8b = 8 * 3600 + 40 * 60;
        let h9 = 9 * 3600;
        assert_eq!(elided(None, h8a), ClockFormat::HourMinute);
        assert_eq!(elided(Some(h8a), h8b), ClockFormat::MinuteOnly);
        assert_eq!(elided(Some(h8b), h9), ClockFormat::HourMinute);
    }
}
