//! Calendar restrictions: disabled weekdays and excluded dates

use std::collections::BTreeSet;
use tracing::warn;

/// Weekday names indexed by checkbox value (1 = Monday .. 7 = Sunday)
pub const WEEKDAY_NAMES: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

/// Map checkbox values onto picker weekdays (0 = Sunday .. 6 = Saturday).
///
/// The settings form stores Sunday as 7; a value of 0 is an unchecked box
/// and never disables anything.
pub fn disabled_weekdays(values: &[u32]) -> BTreeSet<u8> {
    values
        .iter()
        .filter_map(|value| match *value {
            0 => None,
            7 => Some(0),
            day @ 1..=6 => Some(day as u8),
            other => {
                warn!(value = other, "ignoring unknown weekday");
                None
            }
        })
        .collect()
}

/// Name of a checkbox weekday value, if it is one
pub fn weekday_name(value: u32) -> Option<&'static str> {
    match value {
        1..=7 => Some(WEEKDAY_NAMES[value as usize - 1]),
        _ => None,
    }
}

/// Split the newline-delimited excluded dates; blank lines are dropped
pub fn excluded_dates(block: &str) -> Vec<String> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sunday_becomes_zero() {
        let days = disabled_weekdays(&[6, 7]);
        assert_eq!(days.into_iter().collect::<Vec<_>>(), vec![0, 6]);
    }

    #[test]
    fn test_unchecked_box_is_dropped() {
        assert!(disabled_weekdays(&[0, 0, 0]).is_empty());
        assert_eq!(disabled_weekdays(&[0, 1]).into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_weekday_names() {
        assert_eq!(weekday_name(1), Some("Monday"));
        assert_eq!(weekday_name(7), Some("Sunday"));
        assert_eq!(weekday_name(0), None);
    }

    #[test]
    fn test_excluded_dates() {
        assert!(excluded_dates("").is_empty());
        assert_eq!(
            excluded_dates("24.12.2024\r\n25.12.2024\n\n31.12.2024\n"),
            vec!["24.12.2024", "25.12.2024", "31.12.2024"]
        );
    }
}
