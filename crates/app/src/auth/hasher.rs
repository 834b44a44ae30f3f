//! Password hashing with Argon2id.
//!
//! Stored secrets are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), so the
//! parameters a secret was produced with travel with it and verification keeps working
//! after the configured cost changes.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{self, SaltString},
};
use rand::rngs::OsRng;
use thiserror::Error;
use tokio::task::{self, JoinError};
use zeroize::Zeroizing;

/// Argon2 cost parameters, fixed per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasherConfig {
    /// Memory cost in KiB.
    pub memory_kib: u32,

    /// Number of passes.
    pub iterations: u32,

    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Error)]
pub enum SecretHasherError {
    #[error("invalid hasher parameters")]
    InvalidConfig(#[source] argon2::Error),

    #[error("failed to hash secret")]
    Hash(#[source] password_hash::Error),

    #[error("stored secret is malformed")]
    MalformedSecret(#[source] password_hash::Error),

    #[error("hashing task failed")]
    Task(#[source] JoinError),
}

/// Salted, deliberately expensive one-way hashing of plaintext passwords.
#[derive(Debug, Clone)]
pub struct SecretHasher {
    params: Params,
}

impl SecretHasher {
    /// Build a hasher from cost parameters.
    ///
    /// # Errors
    ///
    /// Returns an error when Argon2 rejects the parameters.
    pub fn new(config: HasherConfig) -> Result<Self, SecretHasherError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(SecretHasherError::InvalidConfig)?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `plaintext` with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns an error if Argon2 fails to produce a digest.
    pub fn hash(&self, plaintext: &str) -> Result<String, SecretHasherError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(SecretHasherError::Hash)
    }

    /// Check `plaintext` against a stored `secret`.
    ///
    /// A mismatch is `Ok(false)`. A secret that cannot be parsed or verified is an error,
    /// never a mismatch.
    ///
    /// # Errors
    ///
    /// Returns [`SecretHasherError::MalformedSecret`] for corrupt stored secrets.
    pub fn verify(&self, secret: &str, plaintext: &str) -> Result<bool, SecretHasherError> {
        let parsed = PasswordHash::new(secret).map_err(SecretHasherError::MalformedSecret)?;

        match self.argon2().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(error) => Err(SecretHasherError::MalformedSecret(error)),
        }
    }

    /// [`Self::hash`] on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing fails or the blocking task is cancelled.
    pub async fn hash_blocking(&self, plaintext: &str) -> Result<String, SecretHasherError> {
        let hasher = self.clone();
        let plaintext = Zeroizing::new(plaintext.to_owned());

        task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(SecretHasherError::Task)?
    }

    /// [`Self::verify`] on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored secret is malformed or the blocking task is cancelled.
    pub async fn verify_blocking(
        &self,
        secret: &str,
        plaintext: &str,
    ) -> Result<bool, SecretHasherError> {
        let hasher = self.clone();
        let secret = secret.to_owned();
        let plaintext = Zeroizing::new(plaintext.to_owned());

        task::spawn_blocking(move || hasher.verify(&secret, &plaintext))
            .await
            .map_err(SecretHasherError::Task)?
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::test_hasher;

    use super::*;

    #[test]
    fn verify_accepts_the_hashed_password() -> TestResult {
        let hasher = test_hasher();
        let secret = hasher.hash("correct-password")?;

        assert!(hasher.verify(&secret, "correct-password")?);

        Ok(())
    }

    #[test]
    fn verify_rejects_a_wrong_password_without_error() -> TestResult {
        let hasher = test_hasher();
        let secret = hasher.hash("correct-password")?;

        assert!(!hasher.verify(&secret, "wrong-password")?);

        Ok(())
    }

    #[test]
    fn hashes_are_salted() -> TestResult {
        let hasher = test_hasher();

        assert_ne!(hasher.hash("same")?, hasher.hash("same")?);

        Ok(())
    }

    #[test]
    fn secrets_carry_their_own_parameters() -> TestResult {
        let secret = test_hasher().hash("p@ss")?;
        let stronger = SecretHasher::new(HasherConfig {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })?;

        assert!(secret.starts_with("$argon2id$"));
        assert!(stronger.verify(&secret, "p@ss")?);

        Ok(())
    }

    #[test]
    fn malformed_secret_is_an_error_not_a_mismatch() {
        let hasher = test_hasher();

        for secret in ["", "plaintext-not-a-hash", "$$$"] {
            let result = hasher.verify(secret, "anything");

            assert!(
                matches!(result, Err(SecretHasherError::MalformedSecret(_))),
                "expected MalformedSecret for {secret:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let result = SecretHasher::new(HasherConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 0,
        });

        assert!(matches!(result, Err(SecretHasherError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn blocking_variants_match_sync_behaviour() -> TestResult {
        let hasher = test_hasher();
        let secret = hasher.hash_blocking("p@ss").await?;

        assert!(hasher.verify_blocking(&secret, "p@ss").await?);
        assert!(!hasher.verify_blocking(&secret, "nope").await?);

        Ok(())
    }
}
