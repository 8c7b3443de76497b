//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to the action to run, resolving the port
//! fallback and parsing the model reference up front so a bad value fails
//! before the server binds.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{self, auth, provider};
use crate::generation::ModelRef;
use anyhow::{Context, Result};
use clap::parser::ValueSource;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = resolve_port(matches)?;

    let provider_opts = provider::Options::parse(matches)?;
    let model: ModelRef = provider_opts
        .model
        .parse()
        .with_context(|| format!("invalid --model: {}", provider_opts.model))?;

    let auth_opts = auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        replicate_api_url: provider_opts.api_url,
        replicate_api_token: provider_opts.api_token,
        model,
        password_hasher: auth_opts.password_hasher,
    }))
}

/// `--port`/`POSTERMINT_PORT` win; otherwise a plain `PORT` variable is
/// honored before the built-in default.
fn resolve_port(matches: &clap::ArgMatches) -> Result<u16> {
    let port = matches
        .get_one::<u16>(commands::ARG_PORT)
        .copied()
        .unwrap_or(commands::DEFAULT_PORT);

    if matches.value_source(commands::ARG_PORT) != Some(ValueSource::DefaultValue) {
        return Ok(port);
    }

    match std::env::var("PORT") {
        Ok(value) => value
            .trim()
            .parse::<u16>()
            .with_context(|| format!("invalid PORT: {value}")),
        Err(_) => Ok(port),
    }
}
