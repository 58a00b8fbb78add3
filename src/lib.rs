//! # tenant-gate (Tenant-Scoped Login Gate)
//!
//! `tenant-gate` sits in front of a hosted authentication backend and decides
//! what a signed-in user is allowed to see on a single-tenant site. The backend
//! owns credentials, sessions and password e-mails; this crate only sequences
//! calls to it and decides where the user should land.
//!
//! ## Site Access
//!
//! A session is authorized for the site iff the user's profile carries the
//! `super_admin` role or its tenant matches the configured tenant. Any login
//! that fails the check is signed out before the denial is reported, so a
//! denied login never leaves a standing session behind.
//!
//! ## Routing
//!
//! Pages are classified by path marker (`login`, `dashboard`, `superadmin`).
//! The [`routing::SessionRouter`] turns the current session and page into a
//! single [`routing::RouteAction`]. Redirects always replace history.
//!
//! ## Password Recovery
//!
//! Recovery links land back on the login page with a `type=recovery` fragment.
//! The backend turns that into a [`backend::SessionEvent::RecoveryInitiated`]
//! event, which flips the [`recovery::RecoveryFlow`] from the login form to the
//! reset form.

pub mod account;
pub mod auth;
pub mod backend;
pub mod cli;
pub mod config;
pub mod controller;
pub mod errors;
pub mod recovery;
pub mod routing;
pub mod ui;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
