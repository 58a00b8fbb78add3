use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

pub const ARG_BACKEND_URL: &str = "backend-url";
pub const ARG_API_KEY: &str = "api-key";
pub const ARG_PROFILE_TABLE: &str = "profile-table";
pub const ARG_TENANT_COLUMN: &str = "tenant-column";
pub const ARG_SESSION_FILE: &str = "session-file";

pub struct Options {
    pub url: String,
    pub api_key: String,
    pub profile_table: String,
    pub tenant_column: String,
    pub session_file: Option<PathBuf>,
}

impl Options {
    /// Parse backend arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the backend URL or API key is missing.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let get_non_empty = |id: &str| {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
        };

        let Some(url) = get_non_empty(ARG_BACKEND_URL) else {
            anyhow::bail!("missing required argument: --{ARG_BACKEND_URL}");
        };
        let Some(api_key) = get_non_empty(ARG_API_KEY) else {
            anyhow::bail!("missing required argument: --{ARG_API_KEY}");
        };

        Ok(Self {
            url,
            api_key,
            profile_table: get_non_empty(ARG_PROFILE_TABLE).unwrap_or_else(|| "profiles".to_string()),
            tenant_column: get_non_empty(ARG_TENANT_COLUMN).unwrap_or_else(|| "tenant_id".to_string()),
            session_file: get_non_empty(ARG_SESSION_FILE).map(PathBuf::from),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_BACKEND_URL)
                .long(ARG_BACKEND_URL)
                .help("Base URL of the hosted auth backend, example: https://project.example.co")
                .env("TENANT_GATE_BACKEND_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_API_KEY)
                .long(ARG_API_KEY)
                .help("Public (anon) API key of the backend")
                .env("TENANT_GATE_API_KEY")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new(ARG_PROFILE_TABLE)
                .long(ARG_PROFILE_TABLE)
                .help("Table holding user profiles")
                .env("TENANT_GATE_PROFILE_TABLE")
                .default_value("profiles")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TENANT_COLUMN)
                .long(ARG_TENANT_COLUMN)
                .help("Profile column holding the tenant identifier")
                .env("TENANT_GATE_TENANT_COLUMN")
                .default_value("tenant_id")
                .global(true),
        )
        .arg(
            Arg::new(ARG_SESSION_FILE)
                .long(ARG_SESSION_FILE)
                .help("File used to keep the session between runs")
                .env("TENANT_GATE_SESSION_FILE")
                .global(true),
        )
}
