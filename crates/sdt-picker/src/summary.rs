//! Human-readable summary of widget settings

use sdt_core::{Theme, WidgetSettings};

use crate::calendar::weekday_name;

fn or_none(value: &str) -> &str {
    if value.trim().is_empty() {
        "None"
    } else {
        value
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// One line per setting, in settings-form order
pub fn settings_summary(settings: &WidgetSettings) -> Vec<String> {
    let allowed_hours = if settings.allowed_hours.trim().is_empty() {
        "All hours are allowed"
    } else {
        settings.allowed_hours.as_str()
    };

    let disabled_days = settings
        .disable_days
        .iter()
        .filter_map(|day| weekday_name(*day))
        .collect::<Vec<_>>()
        .join(",");

    let theme = match settings.datetimepicker_theme {
        Theme::Default => "Default",
        Theme::Dark => "Dark",
    };

    let mut summary = vec![
        format!("Hours Format: {}", settings.hour_format.as_str()),
        format!("Minutes Granularity: {}", settings.allow_times),
        format!("Allowed hours: {}", allowed_hours),
        format!("Disabled days: {}", or_none(&disabled_days)),
        format!("Disabled dates: {}", or_none(&settings.exclude_date)),
        format!("Display inline widget: {}", yes_no(settings.inline)),
        format!("Use mask: {}", yes_no(settings.mask)),
        format!("Theme: {}", theme),
        format!("Minimum date/time: {}", or_none(&settings.min_date)),
        format!("Maximum date/time: {}", or_none(&settings.max_date)),
        format!("Start year: {}", or_none(&settings.year_start)),
        format!("End year: {}", or_none(&settings.year_end)),
    ];

    if let Some(format) = settings.custom_format.as_deref().filter(|f| !f.trim().is_empty()) {
        summary.push(format!("Display format: {}", format));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdt_core::HourFormat;

    #[test]
    fn test_default_summary() {
        let summary = settings_summary(&WidgetSettings::default());
        assert_eq!(summary.len(), 12);
        assert_eq!(summary[0], "Hours Format: 24h");
        assert_eq!(summary[1], "Minutes Granularity: 15");
        assert_eq!(summary[2], "Allowed hours: All hours are allowed");
        assert_eq!(summary[3], "Disabled days: None");
        assert_eq!(summary[7], "Theme: Default");
        assert_eq!(summary[11], "End year: None");
    }

    #[test]
    fn test_configured_summary() {
        let settings = WidgetSettings {
            hour_format: HourFormat::Hour12,
            allowed_hours: "8,9,10".to_string(),
            disable_days: vec![0, 6, 7],
            inline: true,
            datetimepicker_theme: Theme::Dark,
            year_start: "1990".to_string(),
            custom_format: Some("d/m/Y H:i".to_string()),
            ..WidgetSettings::default()
        };
        let summary = settings_summary(&settings);
        assert!(summary.contains(&"Hours Format: 12h".to_string()));
        assert!(summary.contains(&"Allowed hours: 8,9,10".to_string()));
        assert!(summary.contains(&"Disabled days: Saturday,Sunday".to_string()));
        assert!(summary.contains(&"Display inline widget: Yes".to_string()));
        assert!(summary.contains(&"Theme: Dark".to_string()));
        assert!(summary.contains(&"Start year: 1990".to_string()));
        assert_eq!(summary.last().unwrap(), "Display format: d/m/Y H:i");
    }
}
