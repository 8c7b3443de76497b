use crate::generation::DEFAULT_MODEL;
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_REPLICATE_API_TOKEN: &str = "replicate-api-token";
pub const ARG_REPLICATE_API_URL: &str = "replicate-api-url";
pub const ARG_MODEL: &str = "model";

pub const DEFAULT_REPLICATE_API_URL: &str = "https://api.replicate.com";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_REPLICATE_API_TOKEN)
                .long(ARG_REPLICATE_API_TOKEN)
                .help("Replicate API token")
                .env("REPLICATE_API_TOKEN")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_REPLICATE_API_URL)
                .long(ARG_REPLICATE_API_URL)
                .help("Replicate API base URL")
                .env("POSTERMINT_REPLICATE_API_URL")
                .default_value(DEFAULT_REPLICATE_API_URL),
        )
        .arg(
            Arg::new(ARG_MODEL)
                .short('m')
                .long(ARG_MODEL)
                .help("Model to run, as owner/name or owner/name:version")
                .env("POSTERMINT_MODEL")
                .default_value(DEFAULT_MODEL),
        )
}

#[derive(Debug)]
pub struct Options {
    pub api_token: SecretString,
    pub api_url: String,
    pub model: String,
}

impl Options {
    /// # Errors
    /// Returns an error if the API token is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let api_token = matches
            .get_one::<String>(ARG_REPLICATE_API_TOKEN)
            .cloned()
            .map(SecretString::from)
            .context("missing required argument: --replicate-api-token")?;
        let api_url = matches
            .get_one::<String>(ARG_REPLICATE_API_URL)
            .cloned()
            .unwrap_or_else(|| DEFAULT_REPLICATE_API_URL.to_string());
        let model = matches
            .get_one::<String>(ARG_MODEL)
            .cloned()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_token,
            api_url,
            model,
        })
    }
}
