// Tutorial utilities: JSON file loading with top-level shape checks, ID-list
// merging and a sample payload generator shared by several subcommands.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Parse a file as JSON without constraining the top-level shape.
pub fn load_json_file(path: &Path) -> Result<Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Parse a file expected to contain a JSON object.
pub fn load_json_dict(path: &Path) -> Result<Value> {
    let payload = load_json_file(path)?;
    if !payload.is_object() {
        bail!("Expected a JSON object in {}", path.display());
    }
    Ok(payload)
}

/// Parse a file expected to contain a JSON array.
pub fn load_json_list(path: &Path) -> Result<Vec<Value>> {
    match load_json_file(path)? {
        Value::Array(items) => Ok(items),
        _ => bail!("Expected a JSON array in {}", path.display()),
    }
}

/// Split a comma-separated list, trimming whitespace and dropping empties.
pub fn parse_comma_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|csv| {
            csv.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

fn stringify(item: &Value) -> String {
    match item {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Merge inline comma-separated IDs with a JSON file (an array, or an object
/// with an `advert_ids` field) into one list, deduplicated in first-seen
/// order. Non-string items are stringified rather than rejected.
pub fn read_ids(ids: Option<&str>, ids_file: Option<&Path>) -> Result<Vec<String>> {
    let mut collected = parse_comma_list(ids);

    if let Some(path) = ids_file {
        match load_json_file(path)? {
            Value::Array(items) => collected.extend(items.iter().map(stringify)),
            Value::Object(map) => match map.get("advert_ids") {
                Some(Value::Array(items)) => collected.extend(items.iter().map(stringify)),
                _ => bail!("IDs file must be a JSON array or an object with 'advert_ids'."),
            },
            _ => bail!("IDs file must be a JSON array or an object with 'advert_ids'."),
        }
    }

    let mut seen = HashSet::new();
    collected.retain(|id| seen.insert(id.clone()));
    Ok(collected)
}

/// Deterministic-shape sample BriefAdvert for the demos. The embedded
/// timestamp makes titles unique across runs, the index within one run.
pub fn sample_brief_advert(index: u32) -> Value {
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M");
    let lat_offset = f64::from(index) * 0.001;
    let lon_offset = f64::from(index) * 0.0015;
    json!({
        "title": format!("Client API sample #{} ({})", index, timestamp),
        "description": "Sample advert created via the Client API tutorial.",
        "advert_type": "rent",
        "reality_type": "flat",
        "reality_state": "renovated",
        "energy_rating": "A",
        "currency": "eur",
        "measurement_system": "metric",
        "price": {
            "overall": 900 + index * 10,
            "utilities": 150,
            "show_price": true,
        },
        "layout": {
            "num_rooms": 2,
            "floor_area": 68.5,
            "floor_number": 4,
        },
        "features": {
            "furnishing": true,
            "lift": true,
            "dedicated_parking": false,
            "internet": "fiber_optic",
        },
        "location": {
            "lat": 48.14663 + lat_offset,
            "lon": 17.10775 + lon_offset,
        },
        "media": {
            "photos": [format!("https://example.com/photos/sample-{}.jpg", index)],
            "videos": [format!("https://example.com/videos/sample-{}.mp4", index)],
        },
        "is_vip": false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn json_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_comma_list_trims_and_drops_empties() {
        assert_eq!(
            parse_comma_list(Some(" a, b ,, c ")),
            vec!["a".to_owned(), "b".to_owned(), "c".to_owned()]
        );
        assert!(parse_comma_list(None).is_empty());
        assert!(parse_comma_list(Some("")).is_empty());
    }

    #[test]
    fn read_ids_dedups_preserving_first_seen_order() {
        let ids = read_ids(Some("a,b,a"), None).unwrap();
        assert_eq!(ids, vec!["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn read_ids_accepts_array_file() {
        let file = json_file(r#"["x", "y"]"#);
        let ids = read_ids(None, Some(file.path())).unwrap();
        assert_eq!(ids, vec!["x".to_owned(), "y".to_owned()]);
    }

    #[test]
    fn read_ids_accepts_advert_ids_object_and_merges_inline() {
        let file = json_file(r#"{"advert_ids": ["b", "c", 7]}"#);
        let ids = read_ids(Some("a,b"), Some(file.path())).unwrap();
        assert_eq!(
            ids,
            vec!["a".to_owned(), "b".to_owned(), "c".to_owned(), "7".to_owned()]
        );
    }

    #[test]
    fn read_ids_rejects_other_shapes() {
        let file = json_file(r#"{"ids": ["a"]}"#);
        assert!(read_ids(None, Some(file.path())).is_err());

        let scalar = json_file("42");
        assert!(read_ids(None, Some(scalar.path())).is_err());
    }

    #[test]
    fn load_json_dict_rejects_arrays() {
        let file = json_file(r#"[1, 2, 3]"#);
        let err = load_json_dict(file.path()).unwrap_err();
        assert!(err.to_string().contains("Expected a JSON object"));

        let object = json_file(r#"{"a": 1}"#);
        assert_eq!(load_json_dict(object.path()).unwrap()["a"], 1);
    }

    #[test]
    fn load_json_list_rejects_objects() {
        let file = json_file(r#"{"a": 1}"#);
        let err = load_json_list(file.path()).unwrap_err();
        assert!(err.to_string().contains("Expected a JSON array"));

        let array = json_file(r#"[{"a": 1}]"#);
        assert_eq!(load_json_list(array.path()).unwrap().len(), 1);
    }

    #[test]
    fn load_json_file_reports_invalid_json() {
        let file = json_file("{not json");
        let err = load_json_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }

    #[test]
    fn sample_brief_advert_scales_with_index() {
        let advert = sample_brief_advert(3);
        let title = advert["title"].as_str().unwrap();
        assert!(title.starts_with("Client API sample #3 ("));
        assert_eq!(advert["price"]["overall"], 930);
        assert_eq!(advert["media"]["photos"][0], "https://example.com/photos/sample-3.jpg");

        let lat = advert["location"]["lat"].as_f64().unwrap();
        assert!((lat - 48.14963).abs() < 1e-9);
    }
}
