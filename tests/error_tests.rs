//! Error message formatting and conversions

use chrono::NaiveDate;
use rusty_eurofx::error::FxError;

#[test]
fn test_no_data_for_date_message() {
    let err = FxError::NoDataForDate(NaiveDate::from_ymd_opt(1998, 12, 31).unwrap());
    assert_eq!(err.to_string(), "Could not find currency data for date 1998-12-31");
}

#[test]
fn test_feed_error_messages() {
    let cases = [
        (FxError::FeedDownload("timeout".to_string()), "Feed download failed: timeout"),
        (FxError::FeedExtraction("bad zip".to_string()), "Feed extraction failed: bad zip"),
        (FxError::FeedRead("denied".to_string()), "Feed read failed: denied"),
        (FxError::MalformedFeed("Line 3".to_string()), "Malformed feed: Line 3"),
    ];
    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn test_input_error_messages() {
    let err = FxError::InvalidAmount("'abc' is not a number".to_string());
    assert!(err.to_string().contains("abc"));

    let err = FxError::UnknownCurrency("XYZ".to_string());
    assert_eq!(err.to_string(), "Unknown currency: XYZ");

    assert_eq!(FxError::QueueClosed.to_string(), "Conversion queue is closed");
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: FxError = io.into();
    assert!(matches!(err, FxError::IoError(_)));
    assert!(err.to_string().contains("gone"));
}

#[test]
fn test_toml_error_conversion() {
    let parse = toml::from_str::<toml::Value>("= nope").unwrap_err();
    let err: FxError = parse.into();
    assert!(err.to_string().starts_with("Config parse error"));
}
