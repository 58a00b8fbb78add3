pub mod backend;
pub mod logging;
pub mod site;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const CMD_LOGIN: &str = "login";
pub const CMD_ROUTE: &str = "route";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_FORGOT_PASSWORD: &str = "forgot-password";
pub const CMD_RECOVER: &str = "recover";

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_URL: &str = "url";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("tenant-gate")
        .about("Tenant-scoped login gate")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Sign in and print where the user lands")
                .arg(
                    Arg::new(ARG_EMAIL)
                        .short('e')
                        .long(ARG_EMAIL)
                        .help("Account e-mail")
                        .env("TENANT_GATE_EMAIL")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_PASSWORD)
                        .short('p')
                        .long(ARG_PASSWORD)
                        .help("Account password, prompted for when omitted")
                        .env("TENANT_GATE_PASSWORD")
                        .hide_env_values(true),
                ),
        )
        .subcommand(
            Command::new(CMD_ROUTE)
                .about("Route the current session for a page")
                .arg(
                    Arg::new(ARG_URL)
                        .long(ARG_URL)
                        .help("Page to route, defaults to --page-url"),
                ),
        )
        .subcommand(Command::new(CMD_LOGOUT).about("Sign out and return to the login page"))
        .subcommand(
            Command::new(CMD_FORGOT_PASSWORD)
                .about("E-mail a password reset link")
                .arg(
                    Arg::new(ARG_EMAIL)
                        .short('e')
                        .long(ARG_EMAIL)
                        .help("Account e-mail")
                        .env("TENANT_GATE_EMAIL")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(CMD_RECOVER)
                .about("Complete a password reset from the link in the reset e-mail")
                .arg(
                    Arg::new(ARG_URL)
                        .long(ARG_URL)
                        .help("Callback URL including the #access_token=... fragment")
                        .required(true),
                ),
        );

    let command = backend::with_args(command);
    let command = site::with_args(command);
    logging::with_args(command)
}
