//! Shared test utilities for config module tests.

use std::sync::Mutex;

/// Mutex to serialize environment variable tests and prevent race conditions.
pub static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Every environment variable read by the config layer.
pub const ENV_VARS: [&str; 8] = [
    "ASTRA_DATABASE_PATH",
    "ASTRA_ENDPOINT",
    "ASTRA_RESEARCH_MODEL",
    "ASTRA_EXTRACTION_MODEL",
    "ASTRA_TIMEOUT_MS",
    "ASTRA_CONNECT_TIMEOUT_MS",
    "ASTRA_API_KEY",
    "GEMINI_API_KEY",
];

/// Set an environment variable. Callers must hold `ENV_MUTEX`.
pub fn set_env(name: &str, value: &str) {
    // SAFETY: config tests serialize all environment access through ENV_MUTEX.
    unsafe { std::env::set_var(name, value) };
}

/// Clean up environment variables used by astra config. Callers must hold `ENV_MUTEX`.
pub fn cleanup_env_vars() {
    for var in ENV_VARS {
        // SAFETY: config tests serialize all environment access through ENV_MUTEX.
        unsafe { std::env::remove_var(var) };
    }
}
