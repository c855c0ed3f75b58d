//! Map parsed CLI arguments to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{saasform, ARG_PORT};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let saasform_opts = saasform::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        saasform_server: saasform_opts.server,
        login_url: saasform_opts.login_url,
        logout_url: saasform_opts.logout_url,
        profile_url: saasform_opts.profile_url,
        key_timeout_seconds: saasform_opts.key_timeout_seconds,
        key_attempts: saasform_opts.key_attempts,
        leeway_seconds: saasform_opts.leeway_seconds,
    }))
}
