//! Raw token to typed value conversion.
//!
//! One converter per [`ParamType`]. A converter receives `None` when a flag
//! was given without a value; only booleans accept that (as `true`).

use thiserror::Error;

use crate::types::{ParamType, Value};

/// Why a token could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// No token was supplied for a type that needs one.
    #[error("missing value of type {0}")]
    MissingValue(ParamType),
    /// The token does not parse as the expected type.
    #[error("failed to convert '{raw}' to type {expected}")]
    Invalid { raw: String, expected: ParamType },
}

/// Converts `raw` to a value of `param_type`.
///
/// # Examples
///
/// ```
/// use command_tree_core::{convert, ParamType, Value};
///
/// assert_eq!(convert(ParamType::Number, Some("5")), Ok(Value::Number(5.0)));
/// assert_eq!(convert(ParamType::Boolean, None), Ok(Value::Boolean(true)));
/// assert_eq!(convert(ParamType::Boolean, Some("No")), Ok(Value::Boolean(false)));
/// assert!(convert(ParamType::Number, Some("abc")).is_err());
/// assert!(convert(ParamType::String, None).is_err());
/// ```
pub fn convert(param_type: ParamType, raw: Option<&str>) -> Result<Value, ConvertError> {
    match param_type {
        ParamType::String => convert_string(raw),
        ParamType::Boolean => convert_boolean(raw),
        ParamType::Number => convert_number(raw),
    }
}

fn convert_string(raw: Option<&str>) -> Result<Value, ConvertError> {
    raw.map(|s| Value::String(s.to_string()))
        .ok_or(ConvertError::MissingValue(ParamType::String))
}

fn convert_boolean(raw: Option<&str>) -> Result<Value, ConvertError> {
    let Some(raw) = raw else {
        return Ok(Value::Boolean(true));
    };
    const TRUTHY: &[&str] = &["true", "yes", "on", "1"];
    const FALSY: &[&str] = &["false", "no", "off", "0"];
    if TRUTHY.iter().any(|t| raw.eq_ignore_ascii_case(t)) {
        Ok(Value::Boolean(true))
    } else if FALSY.iter().any(|f| raw.eq_ignore_ascii_case(f)) {
        Ok(Value::Boolean(false))
    } else {
        Err(invalid(raw, ParamType::Boolean))
    }
}

fn convert_number(raw: Option<&str>) -> Result<Value, ConvertError> {
    let raw = raw.ok_or(ConvertError::MissingValue(ParamType::Number))?;
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Value::Number(n)),
        _ => Err(invalid(raw, ParamType::Number)),
    }
}

fn invalid(raw: &str, expected: ParamType) -> ConvertError {
    ConvertError::Invalid {
        raw: raw.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_keeps_token_verbatim() {
        assert_eq!(
            convert(ParamType::String, Some(" spaced ")),
            Ok(Value::String(" spaced ".into()))
        );
    }

    #[test]
    fn test_boolean_spellings() {
        for raw in ["true", "TRUE", "yes", "on", "1"] {
            assert_eq!(convert(ParamType::Boolean, Some(raw)), Ok(Value::Boolean(true)));
        }
        for raw in ["false", "No", "off", "0"] {
            assert_eq!(convert(ParamType::Boolean, Some(raw)), Ok(Value::Boolean(false)));
        }
        assert_eq!(
            convert(ParamType::Boolean, Some("maybe")),
            Err(ConvertError::Invalid {
                raw: "maybe".into(),
                expected: ParamType::Boolean
            })
        );
    }

    #[test]
    fn test_number_rejects_non_finite() {
        assert_eq!(convert(ParamType::Number, Some("-2.5")), Ok(Value::Number(-2.5)));
        assert_eq!(convert(ParamType::Number, Some("1e3")), Ok(Value::Number(1000.0)));
        assert!(convert(ParamType::Number, Some("inf")).is_err());
        assert!(convert(ParamType::Number, Some("NaN")).is_err());
        assert_eq!(
            convert(ParamType::Number, None),
            Err(ConvertError::MissingValue(ParamType::Number))
        );
    }
}
