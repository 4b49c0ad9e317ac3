// Media flows: attach external URLs or upload a local file to an advert,
// and remove media by URL. The upload goes out as multipart form data; a
// spinner runs while the transfer is in flight.

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::multipart::Form;
use reqwest::Method;
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;

use crate::api::ClientApiSession;
use crate::util::load_json_list;

/// Media slots an advert exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MediaType {
    Photos,
    Videos,
    Visualizations,
    #[value(name = "visualizations3d")]
    Visualizations3d,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Photos => "photos",
            MediaType::Videos => "videos",
            MediaType::Visualizations => "visualizations",
            MediaType::Visualizations3d => "visualizations3d",
        }
    }
}

fn print_media(response: Value) {
    let shown = response.get("media").cloned().unwrap_or(response);
    println!("Updated media:");
    println!("{}", ClientApiSession::pretty(&shown));
}

/// POST /adverts/{advert_id}/media with URL fields and an optional file
/// part. The file's mime type is derived from its extension.
pub fn add(
    api: &ClientApiSession,
    advert_id: &str,
    media_type: MediaType,
    media_urls: &[String],
    upload_file: Option<&Path>,
) -> Result<()> {
    if media_urls.is_empty() && upload_file.is_none() {
        bail!("Provide at least one --media-url or --upload-file.");
    }
    if let Some(path) = upload_file {
        if !path.exists() {
            bail!("Upload file not found: {}", path.display());
        }
    }

    let mut form = Form::new().text("media_type", media_type.as_str());
    for url in media_urls {
        form = form.text("urls", url.clone());
    }

    let request = api.request(Method::POST, &format!("/adverts/{}/media", advert_id));
    let response = if let Some(path) = upload_file {
        let form = form
            .file("files", path)
            .with_context(|| format!("Failed to read upload file {}", path.display()))?;

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner.set_message("Uploading...");
        let result = api.json(request.multipart(form));
        spinner.finish_and_clear();
        result?
    } else {
        api.json(request.multipart(form))?
    };

    print_media(response.unwrap_or(Value::Null));
    Ok(())
}

/// POST /adverts/{advert_id}/delete-media with the URLs to drop as the JSON
/// body and the media type as a query parameter.
pub fn delete(
    api: &ClientApiSession,
    advert_id: &str,
    media_type: MediaType,
    media_urls: &[String],
    urls_file: Option<&Path>,
) -> Result<()> {
    let mut urls: Vec<Value> = media_urls.iter().map(|url| json!(url)).collect();
    if let Some(path) = urls_file {
        urls.extend(load_json_list(path)?);
    }
    if urls.is_empty() {
        bail!("Provide at least one --media-url or --urls-file.");
    }

    let response = api
        .json(
            api.request(
                Method::POST,
                &format!("/adverts/{}/delete-media", advert_id),
            )
            .query(&[("media_type", media_type.as_str())])
            .json(&urls),
        )?
        .unwrap_or(Value::Null);
    print_media(response);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_names_match_the_api() {
        assert_eq!(MediaType::Photos.as_str(), "photos");
        assert_eq!(MediaType::Visualizations3d.as_str(), "visualizations3d");
    }

    #[test]
    fn media_type_parses_cli_spellings() {
        assert_eq!(
            MediaType::from_str("visualizations3d", true).unwrap(),
            MediaType::Visualizations3d
        );
        assert!(MediaType::from_str("gifs", true).is_err());
    }
}
