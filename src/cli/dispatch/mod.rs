//! Maps validated CLI matches to an [`Action`].

use crate::cli::{
    actions::{Action, forgot_password, login, logout, recover, route},
    commands::{
        ARG_EMAIL, ARG_PASSWORD, ARG_URL, CMD_FORGOT_PASSWORD, CMD_LOGIN, CMD_LOGOUT, CMD_RECOVER,
        CMD_ROUTE, backend, site,
    },
    globals::GlobalArgs,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::time::Duration;

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or the subcommand is unknown.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let (name, sub) = matches.subcommand().context("missing subcommand")?;

    // Global args are propagated to the subcommand matches.
    let globals = globals(sub)?;

    let email = || -> Result<String> {
        sub.get_one::<String>(ARG_EMAIL)
            .cloned()
            .filter(|v| !v.trim().is_empty())
            .with_context(|| format!("missing required argument: --{ARG_EMAIL}"))
    };

    let action = match name {
        CMD_LOGIN => Action::Login(login::Args {
            email: email()?,
            password: sub
                .get_one::<String>(ARG_PASSWORD)
                .cloned()
                .map(SecretString::from),
            globals,
        }),
        CMD_ROUTE => Action::Route(route::Args {
            url: sub.get_one::<String>(ARG_URL).cloned(),
            globals,
        }),
        CMD_LOGOUT => Action::Logout(logout::Args { globals }),
        CMD_FORGOT_PASSWORD => Action::ForgotPassword(forgot_password::Args {
            email: email()?,
            globals,
        }),
        CMD_RECOVER => Action::Recover(recover::Args {
            url: sub
                .get_one::<String>(ARG_URL)
                .cloned()
                .with_context(|| format!("missing required argument: --{ARG_URL}"))?,
            globals,
        }),
        other => anyhow::bail!("unknown subcommand: {other}"),
    };

    Ok(action)
}

fn globals(matches: &clap::ArgMatches) -> Result<GlobalArgs> {
    let backend_opts = backend::Options::parse(matches)?;
    let site_opts = site::Options::parse(matches)?;

    let mut globals = GlobalArgs::new(
        backend_opts.url,
        SecretString::from(backend_opts.api_key),
        site_opts.page_url,
    );
    globals.profile_table = backend_opts.profile_table;
    globals.tenant_column = backend_opts.tenant_column;
    globals.session_file = backend_opts.session_file;
    globals.tenant_id = site_opts.tenant_id;
    globals.reload_delay = Duration::from_secs(site_opts.reload_delay_seconds);
    globals.assume_yes = site_opts.assume_yes;

    Ok(globals)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    fn with_backend_env<F: FnOnce()>(f: F) {
        temp_env::with_vars(
            [
                ("TENANT_GATE_BACKEND_URL", Some("https://project.example.co")),
                ("TENANT_GATE_API_KEY", Some("anon")),
                ("TENANT_GATE_PAGE_URL", Some("https://school.example/login.html")),
                ("TENANT_GATE_TENANT_ID", Some("school-1")),
                ("TENANT_GATE_EMAIL", None),
                ("TENANT_GATE_PASSWORD", None),
            ],
            f,
        );
    }

    #[test]
    fn login_maps_credentials_and_globals() {
        with_backend_env(|| {
            let matches = commands::new().get_matches_from(vec![
                "tenant-gate",
                "login",
                "--email",
                "a@x.com",
                "--password",
                "secret",
                "--yes",
            ]);
            let Action::Login(args) = handler(&matches).unwrap() else {
                panic!("expected login action");
            };
            assert_eq!(args.email, "a@x.com");
            assert_eq!(args.password.unwrap().expose_secret(), "secret");
            assert_eq!(args.globals.tenant_id.as_deref(), Some("school-1"));
            assert!(args.globals.assume_yes);
            assert_eq!(args.globals.reload_delay, Duration::from_secs(3));
        });
    }

    #[test]
    fn recover_maps_url() {
        with_backend_env(|| {
            let matches = commands::new().get_matches_from(vec![
                "tenant-gate",
                "recover",
                "--url",
                "https://school.example/login.html#access_token=t&type=recovery",
            ]);
            let Action::Recover(args) = handler(&matches).unwrap() else {
                panic!("expected recover action");
            };
            assert!(args.url.ends_with("type=recovery"));
        });
    }

    #[test]
    fn backend_url_required() {
        temp_env::with_vars(
            [
                ("TENANT_GATE_BACKEND_URL", None::<&str>),
                ("TENANT_GATE_API_KEY", Some("anon")),
                ("TENANT_GATE_PAGE_URL", Some("https://school.example/login.html")),
            ],
            || {
                let matches = commands::new().get_matches_from(vec!["tenant-gate", "logout"]);
                let result = handler(&matches);
                assert!(result.is_err());
                if let Err(err) = result {
                    assert!(
                        err.to_string()
                            .contains("missing required argument: --backend-url")
                    );
                }
            },
        );
    }

    #[test]
    fn missing_tenant_is_left_to_the_controller() {
        temp_env::with_vars(
            [
                ("TENANT_GATE_BACKEND_URL", Some("https://project.example.co")),
                ("TENANT_GATE_API_KEY", Some("anon")),
                ("TENANT_GATE_PAGE_URL", Some("https://school.example/login.html")),
                ("TENANT_GATE_TENANT_ID", None),
            ],
            || {
                let matches = commands::new().get_matches_from(vec!["tenant-gate", "route"]);
                let Action::Route(args) = handler(&matches).unwrap() else {
                    panic!("expected route action");
                };
                assert!(args.globals.tenant_id.is_none());
                assert!(args.globals.site_config().is_err());
            },
        );
    }
}
