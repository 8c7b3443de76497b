//! # Postermint (event poster generation proxy)
//!
//! `postermint` accepts a structured description of an event, turns it into a
//! single text prompt, and forwards it to a hosted image-generation provider
//! (Replicate). The provider answers in several shapes depending on the model
//! version; the proxy reduces all of them to a single `href`.
//!
//! ## Accounts
//!
//! A small signup/login layer keeps accounts in memory for the lifetime of the
//! process and hands out opaque tokens. Tokens are random strings that nothing
//! verifies yet; the [`credentials::TokenVerifier`] trait marks where a real
//! session check would plug in.
//!
//! > **Warning:** the default password hasher is an unsalted SHA-256 digest.
//! > Start the server with `--password-hasher argon2` for salted Argon2id.
//!
//! ## Output normalization
//!
//! Provider output is matched against an ordered list of shapes (`url`,
//! array, `image`, `images`). The first shape that yields a URL wins; when
//! none do, the raw output is returned to the caller with a `502`.

pub mod api;
pub mod cli;
pub mod credentials;
pub mod generation;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
