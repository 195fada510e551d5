//! Time slot generation for the picker's time column

use crate::data_model::{AllowedHours, Granularity, TimeSlot};

/// List the permitted times of day for the given hours and granularity.
///
/// Hourly granularity yields one "HH:00" slot per hour. Finer granularity
/// yields `60 / granularity` slots per hour starting at minute 0; the first
/// slot of every hour is always written as "00".
pub fn generate(hours: &AllowedHours, granularity: Granularity) -> Vec<TimeSlot> {
    let steps = granularity.steps_per_hour() as usize;
    let mut times = Vec::with_capacity(hours.len() * steps);

    for hour in hours.iter() {
        let hour = format!("{:02}", hour);

        if granularity.is_hourly() {
            times.push(TimeSlot::from_parts(&hour, "00"));
            continue;
        }

        for step in 0..granularity.steps_per_hour() {
            let minutes = if step == 0 {
                "00".to_string()
            } else {
                format!("{:02}", granularity.minutes() * step)
            };
            times.push(TimeSlot::from_parts(&hour, &minutes));
        }
    }

    times
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(hours: &[u32], granularity: u32) -> Vec<String> {
        let hours = AllowedHours::from_hours(hours.iter().copied()).unwrap();
        generate(&hours, Granularity::new(granularity).unwrap())
            .into_iter()
            .map(|slot| slot.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_quarter_hours() {
        assert_eq!(slots(&[5], 15), vec!["05:00", "05:15", "05:30", "05:45"]);
    }

    #[test]
    fn test_hourly() {
        assert_eq!(slots(&[0, 1], 60), vec!["00:00", "01:00"]);
    }

    #[test]
    fn test_five_minutes_pads_single_digit() {
        let times = slots(&[9], 5);
        assert_eq!(times[1], "09:05");
        assert_eq!(times[11], "09:55");
    }

    #[test]
    fn test_length_and_order_for_all_divisors() {
        let all: Vec<u32> = (0..24).collect();
        for granularity in [1, 2, 3, 4, 5, 6, 10, 12, 15, 20, 30, 60] {
            let times = slots(&all, granularity);
            assert_eq!(times.len(), 24 * (60 / granularity) as usize);
            assert!(times.windows(2).all(|w| w[0] < w[1]), "not increasing for {}", granularity);
        }
    }

    #[test]
    fn test_unsorted_hours_come_out_sorted() {
        assert_eq!(slots(&[17, 8], 30), vec!["08:00", "08:30", "17:00", "17:30"]);
    }
}
