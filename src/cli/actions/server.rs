use crate::{
    api,
    credentials::{Credentials, HasherKind},
    generation::{Generator, ModelRef, ReplicateProvider},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub replicate_api_url: String,
    pub replicate_api_token: SecretString,
    pub model: ModelRef,
    pub password_hasher: HasherKind,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the provider client cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Server args: {:?}", args);

    let provider = ReplicateProvider::new(&args.replicate_api_url, args.replicate_api_token)
        .context("Could not configure the image provider")?;

    let generator = Arc::new(Generator::new(Arc::new(provider), args.model));

    if args.password_hasher == HasherKind::Sha256 {
        warn!("Accounts use unsalted SHA-256 password digests; pass --password-hasher argon2 for salted hashes");
    }
    let credentials = Arc::new(Credentials::in_memory(args.password_hasher.build()));

    info!(model = %generator.model(), hasher = %args.password_hasher, "starting");

    api::new(args.port, credentials, generator).await
}
