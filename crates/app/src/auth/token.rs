//! Bearer token generation, lookup hashing, and header parsing.

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroize;

use crate::{auth::models::CredentialToken, identities::records::IdentityId};

/// Number of random bytes behind every token.
pub const TOKEN_BYTES: usize = 16;

/// Length of the textual token handed to clients.
pub const TOKEN_LENGTH: usize = 26;

/// Authorization scheme accepted by [`parse_bearer`].
pub const BEARER_SCHEME: &str = "Bearer";

const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("bearer credential is malformed")]
    Malformed,

    #[error("secure random source failed")]
    Entropy(#[source] rand::Error),

    #[error("token expiry is out of range")]
    ExpiryOutOfRange(#[source] jiff::Error),
}

/// Plaintext token value. Shown to the client once, never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct PlaintextToken(String);

impl PlaintextToken {
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn lookup_hash(&self) -> LookupHash {
        LookupHash::of(&self.0)
    }
}

impl fmt::Debug for PlaintextToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlaintextToken(**redacted**)")
    }
}

impl Drop for PlaintextToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// SHA-256 digest of a plaintext token, hex encoded. This is what the store indexes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupHash(String);

impl LookupHash {
    #[must_use]
    pub fn of(plaintext: &str) -> Self {
        Self(format!("{:x}", Sha256::digest(plaintext.as_bytes())))
    }

    /// Wrap a digest read back from storage.
    #[must_use]
    pub fn from_stored(hex: String) -> Self {
        Self(hex)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Generate a fresh token for `identity_id` that expires `ttl` from now.
///
/// # Errors
///
/// Returns an error if the operating system RNG fails or the expiry overflows.
pub fn generate_token(
    identity_id: IdentityId,
    ttl: SignedDuration,
) -> Result<CredentialToken, TokenError> {
    let mut bytes = [0_u8; TOKEN_BYTES];

    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(TokenError::Entropy)?;

    let plaintext = PlaintextToken(encode_base32(&bytes));

    bytes.zeroize();

    let created_at = Timestamp::now();
    let expires_at = created_at
        .checked_add(ttl)
        .map_err(TokenError::ExpiryOutOfRange)?;

    Ok(CredentialToken {
        identity_id,
        lookup_hash: plaintext.lookup_hash(),
        plaintext,
        created_at,
        expires_at,
    })
}

/// Extract the token from an `Authorization` header value of the form `Bearer <token>`.
///
/// The scheme is matched exactly, there must be exactly one token segment, and the token
/// must have the generated shape.
///
/// # Errors
///
/// Returns [`TokenError::Malformed`] for anything else.
pub fn parse_bearer(authorization: &str) -> Result<&str, TokenError> {
    let mut parts = authorization.split(' ');

    let scheme = parts.next().ok_or(TokenError::Malformed)?;
    let token = parts.next().ok_or(TokenError::Malformed)?;

    if scheme != BEARER_SCHEME || parts.next().is_some() || !is_well_formed(token) {
        return Err(TokenError::Malformed);
    }

    Ok(token)
}

/// Whether `token` has the length and alphabet of a generated token.
#[must_use]
pub fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LENGTH && token.bytes().all(|byte| BASE32_ALPHABET.contains(&byte))
}

/// RFC 4648 base32, no padding.
fn encode_base32(bytes: &[u8]) -> String {
    let mut encoded = String::with_capacity((bytes.len() * 8).div_ceil(5));
    let mut buffer = 0_u32;
    let mut bits = 0_u32;

    for byte in bytes {
        buffer = (buffer << 8) | u32::from(*byte);
        bits += 8;

        while bits >= 5 {
            bits -= 5;
            encoded.push(base32_char(buffer >> bits));
        }

        buffer &= (1 << bits) - 1;
    }

    if bits > 0 {
        encoded.push(base32_char(buffer << (5 - bits)));
    }

    encoded
}

fn base32_char(value: u32) -> char {
    let index = (value & 0x1f) as usize;

    char::from(BASE32_ALPHABET[index])
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn generated_tokens_have_fixed_length_and_alphabet() -> TestResult {
        let token = generate_token(IdentityId::from_i64(1), SignedDuration::from_hours(24))?;

        assert_eq!(token.plaintext.expose().len(), TOKEN_LENGTH);
        assert!(is_well_formed(token.plaintext.expose()));
        assert!(!token.plaintext.expose().contains('='));

        Ok(())
    }

    #[test]
    fn generated_tokens_are_unique() -> TestResult {
        let a = generate_token(IdentityId::from_i64(1), SignedDuration::from_hours(1))?;
        let b = generate_token(IdentityId::from_i64(1), SignedDuration::from_hours(1))?;

        assert_ne!(a.plaintext, b.plaintext);
        assert_ne!(a.lookup_hash, b.lookup_hash);

        Ok(())
    }

    #[test]
    fn expiry_is_creation_plus_ttl() -> TestResult {
        let ttl = SignedDuration::from_mins(90);
        let token = generate_token(IdentityId::from_i64(3), ttl)?;

        assert_eq!(token.expires_at, token.created_at.checked_add(ttl)?);
        assert_eq!(token.identity_id, IdentityId::from_i64(3));

        Ok(())
    }

    #[test]
    fn lookup_hash_is_deterministic_sha256_hex() {
        let hash = LookupHash::of("ABCDEFGHIJKLMNOPQRSTUVWXYZ");

        assert_eq!(hash, LookupHash::of("ABCDEFGHIJKLMNOPQRSTUVWXYZ"));
        assert_eq!(hash.as_str().len(), 64);
        assert_ne!(hash, LookupHash::of("ABCDEFGHIJKLMNOPQRSTUVWXYA"));
    }

    #[test]
    fn lookup_hash_matches_known_digest() {
        assert_eq!(
            LookupHash::of("abc").as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn base32_matches_rfc4648_vectors() {
        assert_eq!(encode_base32(b""), "");
        assert_eq!(encode_base32(b"f"), "MY");
        assert_eq!(encode_base32(b"fo"), "MZXQ");
        assert_eq!(encode_base32(b"foo"), "MZXW6");
        assert_eq!(encode_base32(b"foob"), "MZXW6YQ");
        assert_eq!(encode_base32(b"fooba"), "MZXW6YTB");
        assert_eq!(encode_base32(b"foobar"), "MZXW6YTBOI");
    }

    #[test]
    fn sixteen_bytes_encode_to_twenty_six_chars() {
        assert_eq!(encode_base32(&[0xff; TOKEN_BYTES]).len(), TOKEN_LENGTH);
        assert_eq!(encode_base32(&[0x00; TOKEN_BYTES]), "A".repeat(TOKEN_LENGTH));
    }

    #[test]
    fn parse_bearer_accepts_exact_shape() -> TestResult {
        let token = "A".repeat(TOKEN_LENGTH);

        assert_eq!(parse_bearer(&format!("Bearer {token}"))?, token);

        Ok(())
    }

    #[test]
    fn parse_bearer_rejects_other_shapes() {
        let token = "A".repeat(TOKEN_LENGTH);

        let cases = [
            String::new(),
            "Bearer".to_string(),
            "Bearer ".to_string(),
            token.clone(),
            format!("Basic {token}"),
            format!("bearer {token}"),
            format!("Bearer  {token}"),
            format!("Bearer {token} extra"),
            format!("Bearer {}", "A".repeat(TOKEN_LENGTH - 1)),
            format!("Bearer {}", "A".repeat(TOKEN_LENGTH + 1)),
            format!("Bearer {}", "a".repeat(TOKEN_LENGTH)),
            format!("Bearer {}", "1".repeat(TOKEN_LENGTH)),
        ];

        for case in cases {
            assert!(
                matches!(parse_bearer(&case), Err(TokenError::Malformed)),
                "expected {case:?} to be rejected"
            );
        }
    }

    #[test]
    fn plaintext_debug_is_redacted() -> TestResult {
        let token = generate_token(IdentityId::from_i64(1), SignedDuration::from_hours(1))?;
        let rendered = format!("{:?}", token.plaintext);

        assert!(!rendered.contains(token.plaintext.expose()));

        Ok(())
    }
}
