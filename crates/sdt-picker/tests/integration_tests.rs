//! Integration tests for sdt-picker with the real widget settings file.

use chrono::{TimeZone, Utc};
use sdt_core::{FieldKind, RequestContext, SettingsFile};
use sdt_picker::{field_picker, PickerConfigBuilder};
use serde_json::json;

/// Path to the settings file relative to the workspace root
const SETTINGS_PATH: &str = "fixtures/widgets.yaml";

fn settings() -> SettingsFile {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = std::path::Path::new(&manifest_dir).parent().unwrap().parent().unwrap();
    let path = workspace_root.join(SETTINGS_PATH).to_string_lossy().to_string();
    SettingsFile::load(&path).unwrap()
}

fn ctx() -> RequestContext {
    RequestContext::new(chrono_tz::America::Sao_Paulo)
        .with_now(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap())
        .with_language("pt-br")
}

#[test]
fn test_deadline_options() {
    let settings = settings();
    let field = settings.field("field_deadline").unwrap();
    let ctx = ctx();
    let config = PickerConfigBuilder::new(&field.widget, &ctx)
        .kind(FieldKind::DateTime)
        .build()
        .unwrap();

    assert_eq!(config.allowed_times.len(), 10 * 4);
    assert_eq!(config.allowed_times[0].as_str(), "08:00");
    assert_eq!(config.allowed_times.last().unwrap().as_str(), "17:45");

    let options = config.widget_options();
    assert_eq!(options["disabledWeekDays"], json!([0, 6]));
    assert_eq!(options["disabledDates"], json!(["25.12.2024", "26.12.2024"]));
    assert_eq!(options["mask"], json!(true));
    assert_eq!(options["minDate"], json!("2025-03-01"));
    assert_eq!(options["yearEnd"], json!(2025));
    assert_eq!(options["lang"], json!("pt-BR"));
}

#[test]
fn test_every_fixture_field_builds() {
    let ctx = ctx();
    for field in &settings().fields {
        let picker = field_picker(field, &ctx).unwrap();
        let expected_inputs = if field.kinds().unwrap().is_range() { 2 } else { 1 };
        assert_eq!(picker.inputs.len(), expected_inputs, "Wrong inputs for: {}", field.name);
        assert!(!picker.summary.is_empty());
    }
}

#[test]
fn test_allday_range_is_date_picker() {
    let settings = settings();
    let picker = field_picker(settings.field("field_holiday").unwrap(), &ctx()).unwrap();

    let properties: Vec<&str> = picker.inputs.iter().map(|input| input.property).collect();
    assert_eq!(properties, vec!["value", "end_value"]);
    for input in &picker.inputs {
        assert_eq!(input.options["timepicker"], json!(false));
        assert_eq!(input.options["inline"], json!(true));
        assert_eq!(input.options["disabledWeekDays"], json!([0]));
        assert_eq!(input.attributes["data-single-date-time"], "date");
    }
    assert!(picker.summary.contains(&"Disabled days: Sunday".to_string()));
}

#[test]
fn test_meeting_twelve_hour_without_seconds() {
    let settings = settings();
    let picker = field_picker(settings.field("field_meeting").unwrap(), &ctx()).unwrap();
    let options = &picker.inputs[1].options;
    assert_eq!(options["format"], json!("Y-m-d h:i A"));
    assert_eq!(options["formatTime"], json!("h:i A"));
    assert_eq!(options["theme"], json!("dark"));
    assert_eq!(options["allowTimes"].as_array().unwrap().len(), 48);
}

#[test]
fn test_birthday_year_start() {
    let settings = settings();
    let field = settings.field("field_birthday").unwrap();
    let ctx = ctx();
    let config = PickerConfigBuilder::new(&field.widget, &ctx)
        .kind(FieldKind::DateOnly)
        .build()
        .unwrap();
    assert_eq!(config.year_start, 1900);
    assert_eq!(config.max_date, "2024-12-31");
    assert!(!config.allow_blank);
}
