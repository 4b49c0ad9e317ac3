// Single-advert flows: create, fetch, update, delete, unpublish, plus the
// paginated listing for the authenticated account.

use anyhow::{Context, Result};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

use crate::api::{ClientApiSession, PageMeta};
use crate::util::{load_json_dict, sample_brief_advert};

fn payload_or_sample(payload_file: Option<&Path>) -> Result<Value> {
    match payload_file {
        Some(path) => load_json_dict(path),
        None => Ok(sample_brief_advert(1)),
    }
}

/// POST /adverts with a caller-supplied BriefAdvert or a generated sample.
pub fn create(api: &ClientApiSession, payload_file: Option<&Path>) -> Result<()> {
    let payload = payload_or_sample(payload_file)?;
    let created = api
        .json(api.request(Method::POST, "/adverts").json(&payload))?
        .unwrap_or(Value::Null);
    println!("Created advert:");
    println!("{}", ClientApiSession::pretty(&created));
    Ok(())
}

/// GET /adverts/{advert_id}.
pub fn get(api: &ClientApiSession, advert_id: &str) -> Result<()> {
    let advert = api
        .json(api.request(Method::GET, &format!("/adverts/{}", advert_id)))?
        .unwrap_or(Value::Null);
    println!("Advert details:");
    println!("{}", ClientApiSession::pretty(&advert));
    Ok(())
}

/// PUT /adverts/{advert_id}. The API expects a full BriefAdvert payload,
/// not a patch; the description is stamped so the change is visible.
pub fn update(api: &ClientApiSession, advert_id: &str, payload_file: Option<&Path>) -> Result<()> {
    let mut payload = payload_or_sample(payload_file)?;
    payload["description"] = json!("Updated via client API tutorial.");
    let updated = api
        .json(
            api.request(Method::PUT, &format!("/adverts/{}", advert_id))
                .json(&payload),
        )?
        .unwrap_or(Value::Null);
    println!("Updated advert:");
    println!("{}", ClientApiSession::pretty(&updated));
    Ok(())
}

/// DELETE /adverts/{advert_id}.
pub fn delete(api: &ClientApiSession, advert_id: &str) -> Result<()> {
    let result = api
        .json(api.request(Method::DELETE, &format!("/adverts/{}", advert_id)))?
        .unwrap_or(Value::Null);
    println!("Delete response:");
    println!("{}", ClientApiSession::pretty(&result));
    Ok(())
}

/// POST /adverts/{advert_id}/unpublish. Shows the status object when the
/// server returns one, the whole body otherwise.
pub fn unpublish(api: &ClientApiSession, advert_id: &str) -> Result<()> {
    let result = api
        .json(api.request(Method::POST, &format!("/adverts/{}/unpublish", advert_id)))?
        .unwrap_or(Value::Null);
    let shown = result.get("status").cloned().unwrap_or(result);
    println!("Unpublish response:");
    println!("{}", ClientApiSession::pretty(&shown));
    Ok(())
}

#[derive(Debug, Deserialize)]
struct AdvertPage {
    #[serde(default)]
    meta: PageMeta,
    #[serde(default)]
    adverts: Vec<Value>,
}

fn advert_line(advert: &Value) -> String {
    let published = advert
        .pointer("/status/is_published")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let processed = advert
        .pointer("/status/is_processed")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let advert_id = advert
        .get("advert_id")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let title = advert
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or("Untitled");
    format!(
        "- {} -> {} ({}, {})",
        advert_id,
        title,
        if published { "published" } else { "draft" },
        if processed { "processed" } else { "queued" },
    )
}

/// GET /adverts with pagination; prints one line per advert.
pub fn list(api: &ClientApiSession, page: u32, page_size: u32) -> Result<()> {
    let payload = api
        .json(
            api.request(Method::GET, "/adverts")
                .query(&[("page", page), ("page_size", page_size)]),
        )?
        .context("Empty response received from /adverts.")?;
    let listing: AdvertPage =
        serde_json::from_value(payload).context("Unexpected response shape from /adverts")?;

    println!("{}", listing.meta.describe(page));
    if listing.adverts.is_empty() {
        println!("No adverts found for this account.");
        return Ok(());
    }
    for advert in &listing.adverts {
        println!("{}", advert_line(advert));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advert_line_reads_status_flags() {
        let advert = json!({
            "advert_id": "adv-1",
            "title": "Two-room flat",
            "status": {"is_published": true, "is_processed": false}
        });
        assert_eq!(
            advert_line(&advert),
            "- adv-1 -> Two-room flat (published, queued)"
        );
    }

    #[test]
    fn advert_line_defaults_missing_fields() {
        assert_eq!(
            advert_line(&json!({})),
            "- unknown -> Untitled (draft, queued)"
        );
    }

    #[test]
    fn advert_page_accepts_sparse_payloads() {
        let listing: AdvertPage = serde_json::from_value(json!({"adverts": []})).unwrap();
        assert!(listing.adverts.is_empty());
        assert_eq!(listing.meta.describe(4), "Page 4 of ?");
    }
}
