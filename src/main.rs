// Entrypoint for the CLI application.
// - One subcommand per Client API endpoint; connection flags are global.
// - Keeps `main` small: resolve credentials, build a session, dispatch.
// - Returns `anyhow::Result` so any failure exits non-zero with its message.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use clientapi_cli::api::ClientApiSession;
use clientapi_cli::commands::media::MediaType;
use clientapi_cli::commands::orders::SortOrder;
use clientapi_cli::commands::{adverts, bulk, media, orders};
use clientapi_cli::config::ConnectionArgs;

#[derive(Debug, Parser)]
#[command(
    name = "clientapi",
    version,
    about = "Command-line tutorials for the classified-ads Client API",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a single advert (POST /api/v1/adverts)
    CreateAdvert {
        /// JSON file with a BriefAdvert payload; a sample is generated when omitted
        #[arg(long)]
        payload_file: Option<PathBuf>,
    },
    /// Fetch a single advert (GET /api/v1/adverts/{advert_id})
    GetAdvert {
        /// Advert identifier to fetch
        #[arg(long)]
        advert_id: String,
    },
    /// Update an advert with a full BriefAdvert payload (PUT /api/v1/adverts/{advert_id})
    UpdateAdvert {
        /// Advert identifier to update
        #[arg(long)]
        advert_id: String,
        /// JSON file with a BriefAdvert payload; a sample is generated when omitted
        #[arg(long)]
        payload_file: Option<PathBuf>,
    },
    /// Delete an advert (DELETE /api/v1/adverts/{advert_id})
    DeleteAdvert {
        /// Advert identifier to delete
        #[arg(long)]
        advert_id: String,
    },
    /// List adverts owned by the account (GET /api/v1/adverts)
    ListAdverts {
        /// Page number to fetch
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Number of adverts per page
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },
    /// Unpublish an advert (POST /api/v1/adverts/{advert_id}/unpublish)
    UnpublishAdvert {
        /// Advert identifier to unpublish
        #[arg(long)]
        advert_id: String,
    },
    /// Create adverts in one request (POST /api/v1/adverts/bulk-create)
    BulkCreate {
        /// JSON file with an array of BriefAdvert payloads
        #[arg(long)]
        payload_file: Option<PathBuf>,
        /// Number of sample adverts to generate when no payload file is supplied
        #[arg(long, default_value_t = 5)]
        total: u32,
    },
    /// Update adverts in one request (PUT /api/v1/adverts/bulk-update)
    BulkUpdate {
        /// JSON file with an array of {advert_id, advert} objects
        #[arg(long)]
        updates_file: Option<PathBuf>,
        /// Comma-separated advert IDs to update
        #[arg(long)]
        advert_ids: Option<String>,
        /// JSON array of advert IDs or {"advert_ids": [...]}
        #[arg(long)]
        ids_file: Option<PathBuf>,
    },
    /// Publish adverts in one request (POST /api/v1/adverts/bulk-publish)
    BulkPublish {
        /// Comma-separated advert IDs to publish
        #[arg(long)]
        advert_ids: Option<String>,
        /// JSON array of advert IDs or {"advert_ids": [...]}
        #[arg(long)]
        ids_file: Option<PathBuf>,
    },
    /// Attach media to an advert (POST /api/v1/adverts/{advert_id}/media)
    AddMedia {
        /// Advert identifier
        #[arg(long)]
        advert_id: String,
        /// Media type for the upload
        #[arg(long, value_enum, default_value = "photos")]
        media_type: MediaType,
        /// External media URL to attach (repeatable)
        #[arg(long)]
        media_url: Vec<String>,
        /// File to upload to the media store
        #[arg(long)]
        upload_file: Option<PathBuf>,
    },
    /// Remove media from an advert (POST /api/v1/adverts/{advert_id}/delete-media)
    DeleteMedia {
        /// Advert identifier
        #[arg(long)]
        advert_id: String,
        /// Media type to delete
        #[arg(long, value_enum, default_value = "photos")]
        media_type: MediaType,
        /// Media URL to remove (repeatable)
        #[arg(long)]
        media_url: Vec<String>,
        /// JSON file with an array of media URLs
        #[arg(long)]
        urls_file: Option<PathBuf>,
    },
    /// List orders (GET /api/v1/orders)
    ListOrders {
        /// Page number to fetch
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Number of orders per page
        #[arg(long, default_value_t = 20)]
        page_size: u32,
        /// Sort direction for the order list
        #[arg(long, value_enum, default_value = "desc")]
        sort: SortOrder,
    },
    /// Assign adverts to purchased packages (POST /api/v1/orders/match)
    MatchPackages {
        /// JSON file with the mapping payload
        #[arg(long)]
        mapping_file: Option<PathBuf>,
        /// Package UID to assign adverts to
        #[arg(long)]
        package_uid: Option<String>,
        /// Comma-separated advert IDs to assign
        #[arg(long)]
        advert_ids: Option<String>,
        /// JSON array of advert IDs or {"advert_ids": [...]}
        #[arg(long)]
        ids_file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Quiet by default; RUST_LOG=debug shows every request and response
    // status.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = cli.connection.resolve()?;
    let api = ClientApiSession::from_config(&config)?;

    match cli.command {
        Command::CreateAdvert { payload_file } => adverts::create(&api, payload_file.as_deref()),
        Command::GetAdvert { advert_id } => adverts::get(&api, &advert_id),
        Command::UpdateAdvert {
            advert_id,
            payload_file,
        } => adverts::update(&api, &advert_id, payload_file.as_deref()),
        Command::DeleteAdvert { advert_id } => adverts::delete(&api, &advert_id),
        Command::ListAdverts { page, page_size } => adverts::list(&api, page, page_size),
        Command::UnpublishAdvert { advert_id } => adverts::unpublish(&api, &advert_id),
        Command::BulkCreate {
            payload_file,
            total,
        } => bulk::create(&api, payload_file.as_deref(), total),
        Command::BulkUpdate {
            updates_file,
            advert_ids,
            ids_file,
        } => bulk::update(
            &api,
            updates_file.as_deref(),
            advert_ids.as_deref(),
            ids_file.as_deref(),
        ),
        Command::BulkPublish {
            advert_ids,
            ids_file,
        } => bulk::publish(&api, advert_ids.as_deref(), ids_file.as_deref()),
        Command::AddMedia {
            advert_id,
            media_type,
            media_url,
            upload_file,
        } => media::add(
            &api,
            &advert_id,
            media_type,
            &media_url,
            upload_file.as_deref(),
        ),
        Command::DeleteMedia {
            advert_id,
            media_type,
            media_url,
            urls_file,
        } => media::delete(
            &api,
            &advert_id,
            media_type,
            &media_url,
            urls_file.as_deref(),
        ),
        Command::ListOrders {
            page,
            page_size,
            sort,
        } => orders::list(&api, page, page_size, sort),
        Command::MatchPackages {
            mapping_file,
            package_uid,
            advert_ids,
            ids_file,
        } => orders::match_packages(
            &api,
            mapping_file.as_deref(),
            package_uid.as_deref(),
            advert_ids.as_deref(),
            ids_file.as_deref(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn connection_flags_are_accepted_after_the_subcommand() {
        let cli = Cli::parse_from([
            "clientapi",
            "get-advert",
            "--advert-id",
            "adv-1",
            "--api-key",
            "key",
        ]);
        assert_eq!(cli.connection.api_key.as_deref(), Some("key"));
    }

    #[test]
    fn media_urls_are_repeatable() {
        let cli = Cli::parse_from([
            "clientapi",
            "add-media",
            "--advert-id",
            "adv-1",
            "--media-url",
            "https://example.com/a.jpg",
            "--media-url",
            "https://example.com/b.jpg",
        ]);
        match cli.command {
            Command::AddMedia { media_url, .. } => assert_eq!(media_url.len(), 2),
            other => panic!("parsed unexpected command: {:?}", other),
        }
    }
}
