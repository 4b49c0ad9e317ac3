// Order flows: the paginated order listing and the package-to-advert
// matching call.

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

use crate::api::{ClientApiSession, PageMeta};
use crate::util::{load_json_dict, read_ids};

/// Sort direction for the order listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Deserialize)]
struct OrderPage {
    #[serde(default)]
    meta: PageMeta,
    #[serde(default)]
    orders: Vec<Value>,
}

fn order_line(order: &Value) -> String {
    let order_id = order
        .get("order_id")
        .and_then(Value::as_str)
        .or_else(|| order.get("uid").and_then(Value::as_str))
        .unwrap_or("unknown");
    let status = order
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let package_count = order
        .get("packages")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    format!("- {} -> {} ({} package(s))", order_id, status, package_count)
}

/// GET /orders with pagination and sort direction.
pub fn list(api: &ClientApiSession, page: u32, page_size: u32, sort: SortOrder) -> Result<()> {
    let payload = api
        .json(api.request(Method::GET, "/orders").query(&[
            ("page", page.to_string()),
            ("page_size", page_size.to_string()),
            ("sort", sort.as_str().to_owned()),
        ]))?
        .context("Empty response received from /orders.")?;
    let listing: OrderPage =
        serde_json::from_value(payload).context("Unexpected response shape from /orders")?;

    println!("{}", listing.meta.describe(page));
    if listing.orders.is_empty() {
        println!("No orders found for this account.");
        return Ok(());
    }
    for order in &listing.orders {
        println!("{}", order_line(order));
    }
    Ok(())
}

/// POST /orders/match with a mapping file, or a single-package mapping
/// built from the package UID and advert IDs.
pub fn match_packages(
    api: &ClientApiSession,
    mapping_file: Option<&Path>,
    package_uid: Option<&str>,
    advert_ids: Option<&str>,
    ids_file: Option<&Path>,
) -> Result<()> {
    let mapping = match mapping_file {
        Some(path) => load_json_dict(path)?,
        None => {
            let Some(package_uid) = package_uid else {
                bail!("Provide --mapping-file or --package-uid.");
            };
            let ids = read_ids(advert_ids, ids_file)?;
            if ids.is_empty() {
                bail!("Provide at least one advert ID via --advert-ids or --ids-file.");
            }
            json!({ "mapping": [{ "package_uid": package_uid, "advert_ids": ids }] })
        }
    };

    let response = api
        .json(api.request(Method::POST, "/orders/match").json(&mapping))?
        .unwrap_or(Value::Null);
    println!("Match response:");
    println!("{}", ClientApiSession::pretty(&response));
    Ok(())
}
