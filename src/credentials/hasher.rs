//! Password digests.
//!
//! [`Sha256Digest`] is the default and is weak: one unsalted SHA-256 pass, so
//! identical passwords share a digest and offline guessing is cheap.
//! [`Argon2Hasher`] uses Argon2id with a random per-account salt and is the
//! variant to run in production.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher as _, PasswordVerifier as _,
};
use sha2::{Digest, Sha256};
use std::{fmt, str::FromStr, sync::Arc};

pub trait PasswordHasher: Send + Sync {
    /// Produce the stored digest for a plaintext password.
    ///
    /// # Errors
    /// Returns an error if the digest cannot be computed.
    fn hash(&self, password: &str) -> Result<String>;

    /// Check a plaintext password against a stored digest.
    ///
    /// # Errors
    /// Returns an error if the stored digest is malformed.
    fn verify(&self, password: &str, digest: &str) -> Result<bool>;
}

/// Unsalted single-pass SHA-256, hex encoded.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Digest;

impl Sha256Digest {
    fn digest(password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl PasswordHasher for Sha256Digest {
    fn hash(&self, password: &str) -> Result<String> {
        Ok(Self::digest(password))
    }

    fn verify(&self, password: &str, digest: &str) -> Result<bool> {
        Ok(Self::digest(password) == digest)
    }
}

/// Argon2id with default parameters; digests are PHC strings.
#[derive(Clone, Debug, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("failed to hash password: {e}"))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, digest: &str) -> Result<bool> {
        let parsed =
            PasswordHash::new(digest).map_err(|e| anyhow!("malformed password digest: {e}"))?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

/// Hasher selection for the CLI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HasherKind {
    #[default]
    Sha256,
    Argon2,
}

impl HasherKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Argon2 => "argon2",
        }
    }

    #[must_use]
    pub fn build(self) -> Arc<dyn PasswordHasher> {
        match self {
            Self::Sha256 => Arc::new(Sha256Digest),
            Self::Argon2 => Arc::new(Argon2Hasher::default()),
        }
    }
}

impl fmt::Display for HasherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HasherKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sha256" => Ok(Self::Sha256),
            "argon2" => Ok(Self::Argon2),
            other => Err(anyhow!("unknown password hasher: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_digest_is_hex_of_plaintext() -> Result<()> {
        let digest = Sha256Digest.hash("password")?;
        assert_eq!(
            digest,
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
        assert!(Sha256Digest.verify("password", &digest)?);
        assert!(!Sha256Digest.verify("Password", &digest)?);
        Ok(())
    }

    #[test]
    fn sha256_digest_is_unsalted() -> Result<()> {
        assert_eq!(Sha256Digest.hash("same")?, Sha256Digest.hash("same")?);
        Ok(())
    }

    #[test]
    fn argon2_salts_each_digest() -> Result<()> {
        let hasher = Argon2Hasher::default();
        let first = hasher.hash("hunter2")?;
        let second = hasher.hash("hunter2")?;
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
        assert!(hasher.verify("hunter2", &first)?);
        assert!(hasher.verify("hunter2", &second)?);
        assert!(!hasher.verify("hunter3", &first)?);
        Ok(())
    }

    #[test]
    fn argon2_rejects_malformed_digest() {
        let hasher = Argon2Hasher::default();
        assert!(hasher.verify("hunter2", "not-a-phc-string").is_err());
    }

    #[test]
    fn hasher_kind_parses_names() -> Result<()> {
        assert_eq!("sha256".parse::<HasherKind>()?, HasherKind::Sha256);
        assert_eq!("ARGON2".parse::<HasherKind>()?, HasherKind::Argon2);
        assert!("md5".parse::<HasherKind>().is_err());
        assert_eq!(HasherKind::default().to_string(), "sha256");
        Ok(())
    }
}
