// Bulk flows: create, update and publish many adverts in one request.
// The server answers with a mix of accepted adverts and per-item errors;
// the errors are reported, not fatal.

use anyhow::{bail, Context, Result};
use reqwest::Method;
use serde_json::{json, Value};
use std::path::Path;

use crate::api::{BulkError, BulkResponse, ClientApiSession};
use crate::util::{load_json_list, read_ids, sample_brief_advert};

fn parse_bulk(payload: Option<Value>) -> Result<BulkResponse> {
    match payload {
        Some(value) => serde_json::from_value(value).context("Unexpected bulk response shape"),
        None => Ok(BulkResponse::default()),
    }
}

fn print_errors(errors: &[BulkError]) {
    if errors.is_empty() {
        return;
    }
    println!("Errors encountered:");
    for error in errors {
        println!("- {}: {}", error.label(), error.detail_text());
    }
}

/// POST /adverts/bulk-create with a payload file or `total` generated
/// samples.
pub fn create(api: &ClientApiSession, payload_file: Option<&Path>, total: u32) -> Result<()> {
    let payloads = match payload_file {
        Some(path) => load_json_list(path)?,
        None => (1..=total).map(sample_brief_advert).collect(),
    };
    if payloads.is_empty() {
        bail!("No adverts provided for bulk create.");
    }

    let response = parse_bulk(api.json(
        api.request(Method::POST, "/adverts/bulk-create")
            .json(&json!({ "adverts": payloads })),
    )?)?;
    println!("Created {} advert(s) in bulk.", response.adverts.len());
    print_errors(&response.errors);
    Ok(())
}

fn sample_updates(ids: &[String]) -> Vec<Value> {
    ids.iter()
        .enumerate()
        .map(|(index, advert_id)| {
            let mut advert = sample_brief_advert(index as u32 + 1);
            advert["description"] = json!(format!("Bulk update example for {}.", advert_id));
            json!({ "advert_id": advert_id, "advert": advert })
        })
        .collect()
}

/// PUT /adverts/bulk-update with an updates file, or sample payloads built
/// for the given advert IDs.
pub fn update(
    api: &ClientApiSession,
    updates_file: Option<&Path>,
    advert_ids: Option<&str>,
    ids_file: Option<&Path>,
) -> Result<()> {
    let updates = match updates_file {
        Some(path) => load_json_list(path)?,
        None => {
            let ids = read_ids(advert_ids, ids_file)?;
            if ids.is_empty() {
                bail!("Provide --updates-file or at least one advert ID.");
            }
            sample_updates(&ids)
        }
    };
    if updates.is_empty() {
        bail!("No updates provided for bulk update.");
    }

    let response = parse_bulk(api.json(
        api.request(Method::PUT, "/adverts/bulk-update")
            .json(&json!({ "adverts": updates })),
    )?)?;
    println!("Updated {} advert(s) in bulk.", response.adverts.len());
    print_errors(&response.errors);
    Ok(())
}

/// POST /adverts/bulk-publish for the given advert IDs.
pub fn publish(
    api: &ClientApiSession,
    advert_ids: Option<&str>,
    ids_file: Option<&Path>,
) -> Result<()> {
    let ids = read_ids(advert_ids, ids_file)?;
    if ids.is_empty() {
        bail!("Provide at least one advert ID via --advert-ids or --ids-file.");
    }

    let response = parse_bulk(api.json(
        api.request(Method::POST, "/adverts/bulk-publish")
            .json(&json!({ "advert_ids": ids })),
    )?)?;
    println!("Published {} advert(s) in bulk.", response.adverts.len());
    print_errors(&response.errors);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_updates_stamp_the_advert_id() {
        let updates = sample_updates(&["adv-1".to_owned(), "adv-2".to_owned()]);
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0]["advert_id"], "adv-1");
        assert_eq!(
            updates[1]["advert"]["description"],
            "Bulk update example for adv-2."
        );
        // Sample payloads are indexed from 1, like the standalone sample.
        let title = updates[1]["advert"]["title"].as_str().unwrap();
        assert!(title.contains("#2"));
    }

    #[test]
    fn parse_bulk_treats_empty_body_as_empty_response() {
        let response = parse_bulk(None).unwrap();
        assert!(response.adverts.is_empty());
        assert!(response.errors.is_empty());
    }

    #[test]
    fn parse_bulk_keeps_partial_failures() {
        let response = parse_bulk(Some(json!({
            "adverts": [{"advert_id": "adv-1"}],
            "errors": [{"reference": "row-2", "detail": "price missing"}]
        })))
        .unwrap();
        assert_eq!(response.adverts.len(), 1);
        assert_eq!(response.errors[0].label(), "row-2");
        assert_eq!(response.errors[0].detail_text(), "price missing");
    }
}
