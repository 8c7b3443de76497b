//! Account storage.

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::RwLock;

/// A registered account. Keyed by the normalized email address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub email: String,
    pub user_id: String,
    pub password_digest: String,
}

/// Outcome of inserting an account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PutOutcome {
    Created,
    /// An account with the same email already exists; nothing was written.
    Exists,
}

/// Storage seam for accounts so a persistent backend can replace the
/// in-memory table without touching the signup/login flow.
pub trait AccountStore: Send + Sync {
    /// Look up an account by normalized email.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be read.
    fn get(&self, email: &str) -> Result<Option<Account>>;

    /// Check whether an email is registered.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be read.
    fn has(&self, email: &str) -> Result<bool>;

    /// Insert an account unless its email is already taken.
    ///
    /// The existence check and the insert must be atomic.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be written.
    fn put(&self, account: Account) -> Result<PutOutcome>;
}

/// Process-lifetime account table.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns an error if the lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| anyhow!("account store lock poisoned"))?;
        Ok(accounts.len())
    }

    /// # Errors
    /// Returns an error if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl AccountStore for InMemoryAccountStore {
    fn get(&self, email: &str) -> Result<Option<Account>> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| anyhow!("account store lock poisoned"))?;
        Ok(accounts.get(email).cloned())
    }

    fn has(&self, email: &str) -> Result<bool> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| anyhow!("account store lock poisoned"))?;
        Ok(accounts.contains_key(email))
    }

    fn put(&self, account: Account) -> Result<PutOutcome> {
        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| anyhow!("account store lock poisoned"))?;
        if accounts.contains_key(&account.email) {
            return Ok(PutOutcome::Exists);
        }
        accounts.insert(account.email.clone(), account);
        Ok(PutOutcome::Created)
    }
}
