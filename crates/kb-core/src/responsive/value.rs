//! Scalar-or-sequence responsive values

use super::breakpoint::Breakpoint;
use crate::error::MalformedResponsiveValue;
use std::fmt;
use std::str::FromStr;

/// A value that may differ per breakpoint
///
/// Sequence index 0 is the base value, then small, medium, large and
/// extra-large. A missing entry inherits the nearest defined entry before it.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsiveValue<T> {
    Single(T),
    Sequence(Vec<Option<T>>),
}

impl<T> ResponsiveValue<T> {
    pub fn single(value: T) -> Self {
        ResponsiveValue::Single(value)
    }

    /// Sequence with every entry defined
    pub fn values(values: Vec<T>) -> Self {
        ResponsiveValue::Sequence(values.into_iter().map(Some).collect())
    }

    /// Sequence with possibly undefined entries
    pub fn sequence(values: Vec<Option<T>>) -> Self {
        ResponsiveValue::Sequence(values)
    }

    /// Base value, or why there is none
    pub fn base(&self) -> Result<&T, MalformedResponsiveValue> {
        match self {
            ResponsiveValue::Single(v) => Ok(v),
            ResponsiveValue::Sequence(values) => match values.first() {
                None => Err(MalformedResponsiveValue::Empty),
                Some(None) => Err(MalformedResponsiveValue::MissingBase),
                Some(Some(v)) => Ok(v),
            },
        }
    }

    /// Whether the value produces per-breakpoint overrides
    pub fn has_overrides(&self) -> bool {
        matches!(self, ResponsiveValue::Sequence(v) if v.len() >= 2)
    }

    /// Value in effect at a breakpoint, following the fallback chain
    pub fn at(&self, breakpoint: Breakpoint) -> Result<&T, MalformedResponsiveValue> {
        let base = self.base()?;
        let ResponsiveValue::Sequence(values) = self else {
            return Ok(base);
        };
        let found = (1..=breakpoint.index())
            .rev()
            .find_map(|i| values.get(i).and_then(Option::as_ref));
        Ok(found.unwrap_or(base))
    }
}

impl<T> From<T> for ResponsiveValue<T> {
    fn from(value: T) -> Self {
        ResponsiveValue::Single(value)
    }
}

impl<T: FromStr> ResponsiveValue<T>
where
    T::Err: fmt::Display,
{
    /// Parse `"a"` as a scalar and `"a,b,,c"` as a sequence; blank entries
    /// are undefined
    pub fn parse_list(input: &str) -> Result<Self, String> {
        if !input.contains(',') {
            let v = input
                .trim()
                .parse::<T>()
                .map_err(|e| format!("'{}': {}", input.trim(), e))?;
            return Ok(ResponsiveValue::Single(v));
        }

        let mut values = Vec::new();
        for part in input.split(',') {
            let part = part.trim();
            if part.is_empty() {
                values.push(None);
            } else {
                let v = part
                    .parse::<T>()
                    .map_err(|e| format!("'{}': {}", part, e))?;
                values.push(Some(v));
            }
        }
        Ok(ResponsiveValue::Sequence(values))
    }
}
