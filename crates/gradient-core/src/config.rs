//! Persisted gradient configuration.
//!
//! The document is a bare JSON array of stop records, no version field:
//!
//! ```json
//! [{ "id": 1, "percentage": 0, "color": { "r": 0, "g": 0, "b": 1 } }]
//! ```
//!
//! Record order is irrelevant on reload because the compiler re-sorts.

use std::collections::HashSet;
use std::io::{Read, Write};

use crate::collection::StopCollection;
use crate::error::ConfigError;
use crate::stop::Stop;

/// File name suggested by the save dialog.
pub const SUGGESTED_CONFIG_NAME: &str = "color-gradient-config.json";
pub const CONFIG_EXTENSION: &str = "json";
pub const CONFIG_DESCRIPTION: &str = "Color Gradient Configuration";

/// Serializes the collection in its storage order.
pub fn to_json(stops: &StopCollection) -> Result<String, ConfigError> {
    let records: Vec<&Stop> = stops.iter().collect();
    Ok(serde_json::to_string(&records)?)
}

pub fn write_config<W: Write>(mut writer: W, stops: &StopCollection) -> Result<(), ConfigError> {
    let records: Vec<&Stop> = stops.iter().collect();
    serde_json::to_writer(&mut writer, &records)?;
    writer.flush()?;
    Ok(())
}

/// Parses and validates a configuration document.
///
/// Nothing is returned unless the whole document is valid.
pub fn parse_config(json: &str) -> Result<Vec<Stop>, ConfigError> {
    let stops: Vec<Stop> = serde_json::from_str(json)?;
    validate(stops)
}

pub fn read_config<R: Read>(mut reader: R) -> Result<Vec<Stop>, ConfigError> {
    let mut json = String::new();
    reader.read_to_string(&mut json)?;
    parse_config(&json)
}

fn validate(stops: Vec<Stop>) -> Result<Vec<Stop>, ConfigError> {
    let mut seen = HashSet::with_capacity(stops.len());
    for stop in &stops {
        if !seen.insert(stop.id) {
            return Err(ConfigError::DuplicateId(stop.id));
        }
    }
    Ok(stops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::stop::StopId;

    fn sorted_by_id(mut stops: Vec<Stop>) -> Vec<Stop> {
        stops.sort_by_key(|s| s.id);
        stops
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn record_shape_matches_persisted_format() {
        let stops: StopCollection = [Stop::new(StopId(1), 0.0, Rgb::BLUE)].into_iter().collect();
        let json = to_json(&stops).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{ "id": 1, "percentage": 0.0, "color": { "r": 0.0, "g": 0.0, "b": 1.0 } }])
        );
    }

    #[test]
    fn integer_numbers_parse_as_percentages() {
        let stops = parse_config(
            r#"[{"id":2,"percentage":100,"color":{"r":1,"g":0,"b":0}},
                {"id":1,"percentage":0,"color":{"r":0,"g":0,"b":1}}]"#,
        )
        .unwrap();
        assert_eq!(
            sorted_by_id(stops),
            vec![
                Stop::new(StopId(1), 0.0, Rgb::BLUE),
                Stop::new(StopId(2), 100.0, Rgb::RED),
            ]
        );
    }

    // ── round trip ────────────────────────────────────────────────────────

    #[test]
    fn save_then_load_reproduces_the_collection() {
        let mut original = StopCollection::with_defaults();
        original.add(42.5, Rgb::new(0.3, 0.6, 0.9));
        original.add(-20.0, Rgb::WHITE);

        let mut bytes = Vec::new();
        write_config(&mut bytes, &original).unwrap();
        let loaded = read_config(bytes.as_slice()).unwrap();

        let expected: Vec<Stop> = original.iter().copied().collect();
        assert_eq!(sorted_by_id(loaded), sorted_by_id(expected));
    }

    #[test]
    fn empty_collection_round_trips() {
        let json = to_json(&StopCollection::new()).unwrap();
        assert_eq!(json, "[]");
        assert!(parse_config(&json).unwrap().is_empty());
    }

    // ── malformed ─────────────────────────────────────────────────────────

    #[test]
    fn non_array_document_is_rejected() {
        let err = parse_config(r#"{"id":1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn missing_color_is_rejected() {
        let err = parse_config(r#"[{"id":1,"percentage":0}]"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn one_bad_record_rejects_the_whole_document() {
        let err = parse_config(
            r#"[{"id":1,"percentage":0,"color":{"r":0,"g":0,"b":1}},
                {"id":"two","percentage":100,"color":{"r":1,"g":0,"b":0}}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = parse_config(
            r#"[{"id":3,"percentage":0,"color":{"r":0,"g":0,"b":1}},
                {"id":3,"percentage":100,"color":{"r":1,"g":0,"b":0}}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateId(StopId(3))));
    }
}
