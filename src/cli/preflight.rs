//! Pre-flight checks before talking to the model service.
//!
//! Credentials are read from the environment once, before a session starts,
//! so a missing key fails fast instead of on the first query.

use crate::config::ModelProvider;
use crate::error::{LeseError, Result};

/// Read the API key for `provider` from the environment.
pub fn api_key(provider: ModelProvider) -> Result<String> {
    validate_key(provider, std::env::var(provider.api_key_var()).ok())
}

fn validate_key(provider: ModelProvider, value: Option<String>) -> Result<String> {
    let var = provider.api_key_var();
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        Some(_) => Err(LeseError::Config(format!(
            "{} is empty. Set it with: export {}='...'",
            var, var
        ))),
        None => Err(LeseError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            var, var
        ))),
    }
}
