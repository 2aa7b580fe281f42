//! Configuration errors
//!
//! Construction is the only fallible surface: once a terrain or body exists,
//! ticking and querying it cannot fail.

use thiserror::Error;

/// Malformed construction-time parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Too few profile samples to carve three landing thirds
    #[error("num_points must be at least {min}, got {got}")]
    TooFewPoints { got: usize, min: usize },

    /// A dimension or scale that must be strictly positive
    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    /// A value that must be finite but may be zero or negative
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    /// A coefficient that must lie in the open interval (0, 1)
    #[error("{field} must lie strictly between 0 and 1, got {value}")]
    OutOfUnitRange { field: &'static str, value: f32 },

    /// A `(min, max)` pair with `min > max`
    #[error("{field} range is inverted: {min} > {max}")]
    InvertedRange { field: &'static str, min: f32, max: f32 },

    /// A `(min, max)` pair reaching outside `[0, limit]`
    #[error("{field} ({min}, {max}) must lie within [0, {limit}]")]
    OutOfDomain {
        field: &'static str,
        min: f32,
        max: f32,
        limit: f32,
    },

    /// A count that must be at least one
    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },

    /// JSON configuration could not be parsed
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

/// Convenience alias for `Result<T, ConfigError>`.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Reject NaN, infinities and values `<= 0`
pub(crate) fn require_positive(field: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

pub(crate) fn require_finite(field: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

/// Reject values outside the open interval (0, 1)
pub(crate) fn require_unit(field: &'static str, value: f32) -> ConfigResult<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { field, value })
    }
}

pub(crate) fn require_ordered(field: &'static str, (min, max): (f32, f32)) -> ConfigResult<()> {
    require_finite(field, min)?;
    require_finite(field, max)?;
    if min > max {
        return Err(ConfigError::InvertedRange { field, min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ConfigError::TooFewPoints { got: 2, min: 4 };
        assert_eq!(err.to_string(), "num_points must be at least 4, got 2");

        let err = ConfigError::OutOfUnitRange { field: "friction", value: 1.5 };
        assert_eq!(err.to_string(), "friction must lie strictly between 0 and 1, got 1.5");
    }

    #[test]
    fn test_guards() {
        assert!(require_positive("w", 1.0).is_ok());
        assert!(require_positive("w", 0.0).is_err());
        assert!(require_positive("w", f32::NAN).is_err());
        assert!(require_unit("f", 0.5).is_ok());
        assert!(require_unit("f", 1.0).is_err());
        assert!(require_unit("f", f32::NAN).is_err());
        assert!(require_ordered("r", (1.0, 2.0)).is_ok());
        assert_eq!(
            require_ordered("r", (3.0, 2.0)),
            Err(ConfigError::InvertedRange { field: "r", min: 3.0, max: 2.0 })
        );
    }
}
