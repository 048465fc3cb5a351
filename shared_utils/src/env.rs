use std::str::FromStr;

use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// An environment variable is set but its value could not be parsed.
#[derive(Debug, Error)]
#[error("Invalid value {value:?} for environment variable {name}: {message}")]
pub struct InvalidEnvVarError {
    pub name: String,
    pub value: String,
    pub message: String,
}

/// Reads an environment variable, returning a structured error if it's missing.
///
/// This is a thin wrapper around `std::env::var` that provides a more
/// ergonomic and specific error type for missing variables.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    std::env::var(name).map_err(|_| MissingEnvVarError(name.to_string()))
}

/// Reads and parses an optional environment variable.
///
/// Returns `Ok(None)` when the variable is unset or empty, and an
/// [`InvalidEnvVarError`] when it is set to something `T` cannot parse.
pub fn parse_env_var<T>(name: &str) -> Result<Option<T>, InvalidEnvVarError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Ok(raw) = get_env_var(name) else {
        return Ok(None);
    };
    parse_value(name, &raw)
}

fn parse_value<T>(name: &str, raw: &str) -> Result<Option<T>, InvalidEnvVarError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse::<T>().map(Some).map_err(|e| InvalidEnvVarError {
        name: name.to_string(),
        value: raw.to_string(),
        message: e.to_string(),
    })
}
