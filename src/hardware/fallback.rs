use tracing::warn;

use crate::error::Result;

/// Contain a probe or parse failure: log it against `field` and use `fallback`.
pub fn or_fallback<T>(field: &str, result: Result<T>, fallback: T) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!(field, error = %err, "using fallback value");
            fallback
        }
    }
}
