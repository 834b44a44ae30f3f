use std::time::Duration;

use clap::Args;
use jiff::SignedDuration;
use turnstile_app::{
    auth::{AuthSettings, HasherConfig},
    context::AppContext,
};

/// Connection and credential policy shared by every command that touches the store.
#[derive(Debug, Args)]
pub(crate) struct StoreArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Upper bound on a single store call, in milliseconds
    #[arg(long, env = "STORE_TIMEOUT_MS", default_value_t = 3_000)]
    pub store_timeout_ms: u64,

    /// Lifetime of tokens issued at login, in seconds
    #[arg(long, env = "TOKEN_TTL_SECONDS", default_value_t = 86_400)]
    pub token_ttl_seconds: i64,

    /// Argon2 memory cost in KiB
    #[arg(long, env = "ARGON2_MEMORY_KIB", default_value_t = HasherConfig::default().memory_kib)]
    pub argon2_memory_kib: u32,

    /// Argon2 passes
    #[arg(long, env = "ARGON2_ITERATIONS", default_value_t = HasherConfig::default().iterations)]
    pub argon2_iterations: u32,

    /// Argon2 lanes
    #[arg(long, env = "ARGON2_PARALLELISM", default_value_t = HasherConfig::default().parallelism)]
    pub argon2_parallelism: u32,
}

impl StoreArgs {
    pub(crate) fn auth_settings(&self) -> AuthSettings {
        AuthSettings {
            token_ttl: SignedDuration::from_secs(self.token_ttl_seconds),
            store_timeout: Duration::from_millis(self.store_timeout_ms),
            hasher: HasherConfig {
                memory_kib: self.argon2_memory_kib,
                iterations: self.argon2_iterations,
                parallelism: self.argon2_parallelism,
            },
        }
    }

    pub(crate) async fn context(&self) -> Result<AppContext, String> {
        AppContext::from_database_url(&self.database_url, self.auth_settings())
            .await
            .map_err(|error| format!("failed to initialise: {error}"))
    }
}
