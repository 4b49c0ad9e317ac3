// Configuration layer: merges CLI flags with environment variables into a
// single credential record. Every subcommand exposes the same connection
// flags, each defaulting to the similarly named environment variable.

use anyhow::{bail, Result};
use clap::Args;
use std::env;

pub const ENV_BASE_URL: &str = "CLIENT_API_BASE_URL";
pub const ENV_BASIC_USER: &str = "CLIENT_API_BASIC_USER";
pub const ENV_BASIC_PASSWORD: &str = "CLIENT_API_BASIC_PASSWORD";
pub const ENV_ACCOUNT: &str = "CLIENT_API_ACCOUNT";
pub const ENV_API_KEY: &str = "CLIENT_API_KEY";

/// Base URL used when neither the flag nor the environment provides one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8081/api/v1";

/// Fully-resolved Client API credentials. Immutable once built; all fields
/// are non-empty by the time a session is constructed from them.
#[derive(Debug, Clone)]
pub struct ClientApiConfig {
    pub base_url: String,
    pub basic_user: String,
    pub basic_password: String,
    pub account_uid: String,
    pub api_key: String,
}

/// Connection flags shared by every subcommand. A flag set to a non-empty
/// value wins over the environment; `--base-url` falls back to a localhost
/// default, the rest are required.
#[derive(Debug, Default, Args)]
pub struct ConnectionArgs {
    /// Client API base URL (env: CLIENT_API_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// HTTP Basic username (env: CLIENT_API_BASIC_USER)
    #[arg(long, global = true)]
    pub basic_user: Option<String>,

    /// HTTP Basic password (env: CLIENT_API_BASIC_PASSWORD)
    #[arg(long, global = true)]
    pub basic_password: Option<String>,

    /// Account UID sent as X-Client-Account (env: CLIENT_API_ACCOUNT)
    #[arg(long, global = true)]
    pub account_uid: Option<String>,

    /// Plaintext API key sent as X-Client-Api-Key (env: CLIENT_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,
}

impl ConnectionArgs {
    /// Merge flags with the process environment into a complete config.
    pub fn resolve(&self) -> Result<ClientApiConfig> {
        self.resolve_with(|name| env::var(name).ok())
    }

    // Env lookup is injected so tests do not touch process-global state.
    fn resolve_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<ClientApiConfig> {
        let pick = |flag: &Option<String>, var: &str| {
            flag.as_deref()
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
                .or_else(|| lookup(var).filter(|value| !value.is_empty()))
        };

        let base_url =
            pick(&self.base_url, ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let basic_user = pick(&self.basic_user, ENV_BASIC_USER);
        let basic_password = pick(&self.basic_password, ENV_BASIC_PASSWORD);
        let account_uid = pick(&self.account_uid, ENV_ACCOUNT);
        let api_key = pick(&self.api_key, ENV_API_KEY);

        match (basic_user, basic_password, account_uid, api_key) {
            (Some(basic_user), Some(basic_password), Some(account_uid), Some(api_key)) => {
                Ok(ClientApiConfig {
                    base_url,
                    basic_user,
                    basic_password,
                    account_uid,
                    api_key,
                })
            }
            (basic_user, basic_password, account_uid, api_key) => {
                // Report every missing credential at once rather than one
                // per invocation.
                let mut missing = Vec::new();
                if basic_user.is_none() {
                    missing.push("basic_user");
                }
                if basic_password.is_none() {
                    missing.push("basic_password");
                }
                if account_uid.is_none() {
                    missing.push("account_uid");
                }
                if api_key.is_none() {
                    missing.push("api_key");
                }
                bail!(
                    "Missing credentials: {}. Provide them via CLI flags or environment variables.",
                    missing.join(", ")
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_env() -> HashMap<String, String> {
        env_of(&[
            (ENV_BASIC_USER, "env-user"),
            (ENV_BASIC_PASSWORD, "env-pass"),
            (ENV_ACCOUNT, "env-account"),
            (ENV_API_KEY, "env-key"),
        ])
    }

    fn resolve(args: &ConnectionArgs, env: &HashMap<String, String>) -> Result<ClientApiConfig> {
        args.resolve_with(|name| env.get(name).cloned())
    }

    #[test]
    fn env_only_resolves_with_default_base_url() {
        let config = resolve(&ConnectionArgs::default(), &full_env()).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.basic_user, "env-user");
        assert_eq!(config.api_key, "env-key");
    }

    #[test]
    fn flags_take_precedence_over_env() {
        let args = ConnectionArgs {
            basic_user: Some("flag-user".into()),
            base_url: Some("https://api.example.com/api/v1".into()),
            ..Default::default()
        };
        let config = resolve(&args, &full_env()).unwrap();
        assert_eq!(config.basic_user, "flag-user");
        assert_eq!(config.basic_password, "env-pass");
        assert_eq!(config.base_url, "https://api.example.com/api/v1");
    }

    #[test]
    fn empty_flag_falls_through_to_env() {
        let args = ConnectionArgs {
            basic_user: Some(String::new()),
            ..Default::default()
        };
        let config = resolve(&args, &full_env()).unwrap();
        assert_eq!(config.basic_user, "env-user");
    }

    #[test]
    fn missing_credentials_are_all_named() {
        let env = env_of(&[(ENV_BASIC_USER, "env-user")]);
        let err = resolve(&ConnectionArgs::default(), &env).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("basic_password"));
        assert!(message.contains("account_uid"));
        assert!(message.contains("api_key"));
        assert!(!message.contains("basic_user,"));
    }

    #[test]
    fn empty_env_value_counts_as_missing() {
        let mut env = full_env();
        env.insert(ENV_API_KEY.to_string(), String::new());
        let err = resolve(&ConnectionArgs::default(), &env).unwrap_err();
        assert!(err.to_string().contains("api_key"));
    }
}
