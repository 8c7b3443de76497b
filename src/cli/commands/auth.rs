use crate::credentials::HasherKind;
use anyhow::Result;
use clap::{builder::PossibleValuesParser, Arg, ArgMatches, Command};

pub const ARG_PASSWORD_HASHER: &str = "password-hasher";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_PASSWORD_HASHER)
            .long(ARG_PASSWORD_HASHER)
            .help("Password digest for stored accounts")
            .long_help(
                "Password digest for stored accounts. `sha256` is an unsalted single pass and is kept as the default for compatibility; `argon2` uses Argon2id with a per-account salt.",
            )
            .env("POSTERMINT_PASSWORD_HASHER")
            .value_parser(PossibleValuesParser::new([
                HasherKind::Sha256.as_str(),
                HasherKind::Argon2.as_str(),
            ]))
            .default_value(HasherKind::Sha256.as_str()),
    )
}

#[derive(Debug)]
pub struct Options {
    pub password_hasher: HasherKind,
}

impl Options {
    /// # Errors
    /// Returns an error if the hasher name is unknown.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let password_hasher = matches
            .get_one::<String>(ARG_PASSWORD_HASHER)
            .map_or(Ok(HasherKind::default()), |name| name.parse())?;
        Ok(Self { password_hasher })
    }
}
