// Library root
// -----------
// This crate exposes a small library surface for the Client API tutorial
// binary (`main.rs`).
//
// Module responsibilities:
// - `config`: Merges CLI flags and environment variables into the
//   credential record every subcommand needs.
// - `api`: Encapsulates the authenticated blocking HTTP session (basic
//   auth plus the account and API-key headers) and the response envelopes
//   shared across endpoints.
// - `util`: JSON file loading with shape checks, ID-list merging and the
//   sample payload generator.
// - `commands`: One flow per API endpoint; each performs a single request
//   and prints a human-readable summary.
pub mod api;
pub mod commands;
pub mod config;
pub mod util;
