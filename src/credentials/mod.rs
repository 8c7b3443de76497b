//! Account signup and login.
//!
//! [`Credentials`] owns the injected store, password hasher, and token issuer.
//! Emails are normalized (trimmed, lowercased) before they touch the store.
//! Login failures are deliberately undifferentiated: an unknown email and a
//! wrong password produce the same [`CredentialError::Authentication`].

mod hasher;
mod store;
mod token;

pub use hasher::{Argon2Hasher, HasherKind, PasswordHasher, Sha256Digest};
pub use store::{Account, AccountStore, InMemoryAccountStore, PutOutcome};
pub use token::{RandomTokens, TokenIssuer, TokenStatus, TokenVerifier, UnverifiedTokens};

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("{0} is required")]
    Validation(&'static str),
    #[error("email already registered")]
    Conflict,
    #[error("invalid email or password")]
    Authentication,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Result of a successful signup or login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub token: String,
}

pub struct Credentials {
    store: Arc<dyn AccountStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl Credentials {
    #[must_use]
    pub fn new(
        store: Arc<dyn AccountStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// In-memory store with random tokens and the given hasher.
    #[must_use]
    pub fn in_memory(hasher: Arc<dyn PasswordHasher>) -> Self {
        Self::new(
            Arc::new(InMemoryAccountStore::new()),
            hasher,
            Arc::new(RandomTokens),
        )
    }

    /// Register a new account.
    ///
    /// # Errors
    /// `Validation` when a field is missing, `Conflict` when the email is
    /// taken, `Internal` when hashing, storage, or token generation fails.
    #[instrument(skip(self, password))]
    pub fn signup(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Session, CredentialError> {
        let (email, password) = required(email, password)?;

        if self.store.has(&email)? {
            debug!("signup for existing email");
            return Err(CredentialError::Conflict);
        }

        let account = Account {
            email,
            user_id: Uuid::new_v4().to_string(),
            password_digest: self.hasher.hash(password)?,
        };
        let user_id = account.user_id.clone();

        match self.store.put(account)? {
            PutOutcome::Created => Ok(Session {
                user_id,
                token: self.tokens.issue()?,
            }),
            PutOutcome::Exists => Err(CredentialError::Conflict),
        }
    }

    /// Authenticate a returning user.
    ///
    /// # Errors
    /// `Validation` when a field is missing, `Authentication` for an unknown
    /// email or wrong password, `Internal` on backend failures.
    #[instrument(skip(self, password))]
    pub fn login(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Session, CredentialError> {
        let (email, password) = required(email, password)?;

        let Some(account) = self.store.get(&email)? else {
            debug!("login for unknown email");
            return Err(CredentialError::Authentication);
        };

        if !self.hasher.verify(password, &account.password_digest)? {
            debug!("login with wrong password");
            return Err(CredentialError::Authentication);
        }

        Ok(Session {
            user_id: account.user_id,
            token: self.tokens.issue()?,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").finish_non_exhaustive()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn required<'a>(
    email: Option<&str>,
    password: Option<&'a str>,
) -> Result<(String, &'a str), CredentialError> {
    let email = email
        .map(normalize_email)
        .filter(|email| !email.is_empty())
        .ok_or(CredentialError::Validation("email"))?;
    let password = password
        .filter(|password| !password.is_empty())
        .ok_or(CredentialError::Validation("password"))?;
    Ok((email, password))
}
