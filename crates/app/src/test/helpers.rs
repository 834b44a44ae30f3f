//! Test Helpers

use crate::auth::{AuthSettings, HasherConfig, SecretHasher};

/// Argon2 parameters small enough to keep tests fast.
pub(crate) const TEST_HASHER_CONFIG: HasherConfig = HasherConfig {
    memory_kib: 1024,
    iterations: 1,
    parallelism: 1,
};

pub(crate) fn test_hasher() -> SecretHasher {
    SecretHasher::new(TEST_HASHER_CONFIG).expect("test hasher parameters are valid")
}

pub(crate) fn test_settings() -> AuthSettings {
    AuthSettings {
        hasher: TEST_HASHER_CONFIG,
        ..AuthSettings::default()
    }
}
