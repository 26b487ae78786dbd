//! Environment variable helpers

use std::fmt;
use std::str::FromStr;

/// An environment variable was set but could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvParseError {
    /// Variable name
    pub name: String,
    /// Parser message
    pub message: String,
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not valid: {}", self.name, self.message)
    }
}

impl std::error::Error for EnvParseError {}

/// Parse an environment variable or return a default.
///
/// Unset and empty variables fall back to `default`.
pub fn parse_env_or<T>(name: &str, default: T) -> Result<T, EnvParseError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(name) {
        Ok(val) if !val.trim().is_empty() => parse_value(name, &val),
        _ => Ok(default),
    }
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T, EnvParseError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| EnvParseError {
        name: name.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_or_returns_default_when_missing() {
        let value: u32 = parse_env_or("AKTIEN_TEST_NONEXISTENT_VAR_12345", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_value_trims_input() {
        let value: usize = parse_value("AKTIEN_CAPACITY", " 12 ").unwrap();
        assert_eq!(value, 12);
    }

    #[test]
    fn test_parse_value_reports_variable_name() {
        let err = parse_value::<u32>("AKTIEN_CAPACITY", "ten").unwrap_err();
        assert_eq!(err.name, "AKTIEN_CAPACITY");
        assert!(err.to_string().starts_with("AKTIEN_CAPACITY is not valid"));
    }
}
