use clap::{Arg, ArgAction, ArgMatches, Command};

pub const ARG_TENANT_ID: &str = "tenant-id";
pub const ARG_PAGE_URL: &str = "page-url";
pub const ARG_RELOAD_DELAY_SECONDS: &str = "reload-delay-seconds";
pub const ARG_YES: &str = "yes";

pub struct Options {
    /// Left unchecked here; a missing tenant is rendered by the controller.
    pub tenant_id: Option<String>,
    pub page_url: String,
    pub reload_delay_seconds: u64,
    pub assume_yes: bool,
}

impl Options {
    /// Parse site arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the page URL is missing.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let page_url = matches
            .get_one::<String>(ARG_PAGE_URL)
            .cloned()
            .filter(|v| !v.trim().is_empty());
        let Some(page_url) = page_url else {
            anyhow::bail!("missing required argument: --{ARG_PAGE_URL}");
        };

        Ok(Self {
            tenant_id: matches.get_one::<String>(ARG_TENANT_ID).cloned(),
            page_url,
            reload_delay_seconds: matches
                .get_one::<u64>(ARG_RELOAD_DELAY_SECONDS)
                .copied()
                .unwrap_or(3),
            assume_yes: matches.get_flag(ARG_YES),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_TENANT_ID)
                .long(ARG_TENANT_ID)
                .help("Tenant served by this site; profiles of other tenants are refused")
                .env("TENANT_GATE_TENANT_ID")
                .global(true),
        )
        .arg(
            Arg::new(ARG_PAGE_URL)
                .long(ARG_PAGE_URL)
                .help("URL of the login page, used for redirects and reset links")
                .env("TENANT_GATE_PAGE_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_RELOAD_DELAY_SECONDS)
                .long(ARG_RELOAD_DELAY_SECONDS)
                .help("Delay before reloading after a password reset")
                .env("TENANT_GATE_RELOAD_DELAY_SECONDS")
                .default_value("3")
                .value_parser(clap::value_parser!(u64))
                .global(true),
        )
        .arg(
            Arg::new(ARG_YES)
                .short('y')
                .long(ARG_YES)
                .help("Answer yes to confirmation prompts")
                .action(ArgAction::SetTrue)
                .global(true),
        )
}
