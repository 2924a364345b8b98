//! Typed extraction of named call arguments from a JSON object.

use serde_json::{Map, Value};
use std::str::FromStr;

use crate::error::DomainError;

/// Borrowed view over the flat argument mapping of one call.
///
/// JSON `null` counts as an omitted argument.
#[derive(Debug, Clone, Copy)]
pub struct Arguments<'a> {
    values: &'a Map<String, Value>,
}

impl<'a> Arguments<'a> {
    pub fn new(values: &'a Map<String, Value>) -> Self {
        Self { values }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.values.get(key).filter(|value| !value.is_null())
    }

    pub fn required_str(&self, key: &'static str) -> Result<&'a str, DomainError> {
        match self.get(key) {
            Some(value) => value.as_str().ok_or(DomainError::InvalidArgument {
                argument: key,
                expected: "a string",
            }),
            None => Err(DomainError::MissingArgument(key)),
        }
    }

    pub fn optional_str(&self, key: &'static str, default: &'a str) -> Result<&'a str, DomainError> {
        match self.get(key) {
            Some(_) => self.required_str(key),
            None => Ok(default),
        }
    }

    pub fn optional_int(&self, key: &'static str, default: i64) -> Result<i64, DomainError> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };

        value
            .as_i64()
            .or_else(|| {
                value
                    .as_f64()
                    .filter(|number| number.fract() == 0.0)
                    .map(|number| number as i64)
            })
            .ok_or(DomainError::InvalidArgument {
                argument: key,
                expected: "an integer",
            })
    }

    /// Parses an enumerated string argument, falling back to `default`.
    pub fn optional_enum<T>(&self, key: &'static str, default: T) -> Result<T, DomainError>
    where
        T: FromStr<Err = DomainError>,
    {
        match self.get(key) {
            Some(_) => self.required_str(key)?.parse(),
            None => Ok(default),
        }
    }
}
