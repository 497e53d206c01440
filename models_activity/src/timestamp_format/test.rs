use super::*;
use chrono::TimeZone;

#[test]
fn test_format_is_fixed_width() {
    let whole_second = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let with_millis = whole_second + chrono::Duration::milliseconds(5);

    assert_eq!(format(&whole_second), "2024-01-01T00:00:00.000Z");
    assert_eq!(format(&with_millis), "2024-01-01T00:00:00.005Z");
    assert!(format(&whole_second) < format(&with_millis));
}

#[test]
fn test_parse_accepts_offsets() {
    let parsed = parse("2024-01-01T02:00:00.000+02:00").unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
}

#[test]
fn test_parse_rejects_garbage() {
    assert!(parse("yesterday").is_err());
}

#[test]
fn test_truncate_to_millis() {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let precise = base + chrono::Duration::nanoseconds(1_234_567);

    assert_eq!(
        truncate_to_millis(precise),
        base + chrono::Duration::milliseconds(1)
    );
}
