//! Expanding responsive values into style declarations

use super::breakpoint::{Breakpoint, BreakpointTable};
use super::declaration::{kebab_case, StyleDeclaration};
use super::value::ResponsiveValue;
use crate::error::MalformedResponsiveValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A CSS value before unit handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Keyword(String),
}

impl StyleValue {
    /// CSS text for `property`: numbers on spacing-like properties get `px`
    pub fn css_for(&self, property: &str) -> String {
        match self {
            StyleValue::Number(n) if takes_px(property) => format!("{}px", format_number(*n)),
            StyleValue::Number(n) => format_number(*n),
            StyleValue::Keyword(k) => k.clone(),
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Number(n) => f.write_str(&format_number(*n)),
            StyleValue::Keyword(k) => f.write_str(k),
        }
    }
}

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        StyleValue::Number(n)
    }
}

impl From<i32> for StyleValue {
    fn from(n: i32) -> Self {
        StyleValue::Number(f64::from(n))
    }
}

impl From<u32> for StyleValue {
    fn from(n: u32) -> Self {
        StyleValue::Number(f64::from(n))
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::Keyword(s.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        StyleValue::Keyword(s)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

const PX_PROPERTIES: &[&str] = &[
    "gap",
    "row-gap",
    "column-gap",
    "width",
    "height",
    "min-width",
    "max-width",
    "min-height",
    "max-height",
    "top",
    "right",
    "bottom",
    "left",
    "border-radius",
];

/// Whether unitless numbers for this property mean pixels
pub fn takes_px(property: &str) -> bool {
    let property = kebab_case(property);
    property.starts_with("margin")
        || property.starts_with("padding")
        || PX_PROPERTIES.contains(&property.as_str())
}

/// Expand a responsive value, or report why it cannot be expanded
///
/// A scalar or one-entry sequence sets the base only. Longer sequences set
/// the base from entry 0 and an override for every breakpoint.
pub fn try_resolve<V>(
    property: &str,
    value: &ResponsiveValue<V>,
    breakpoints: &BreakpointTable,
) -> Result<StyleDeclaration, MalformedResponsiveValue>
where
    V: Clone + Into<StyleValue>,
{
    let css = |v: &V| v.clone().into().css_for(property);

    let mut decl = StyleDeclaration::with_breakpoints(*breakpoints);
    decl.set(property, css(value.base()?));

    if value.has_overrides() {
        for bp in Breakpoint::ALL {
            decl.set_override(bp, property, css(value.at(bp)?));
        }
    }
    Ok(decl)
}

/// Expand a responsive value
///
/// # Panics
///
/// Panics on an empty sequence or one with no base value. Use
/// [`try_resolve`] for untrusted input.
pub fn resolve<V>(
    property: &str,
    value: &ResponsiveValue<V>,
    breakpoints: &BreakpointTable,
) -> StyleDeclaration
where
    V: Clone + Into<StyleValue>,
{
    match try_resolve(property, value, breakpoints) {
        Ok(decl) => decl,
        Err(e) => panic!("malformed responsive value for '{}': {}", property, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BP: BreakpointTable = BreakpointTable::DEFAULT;

    #[test]
    fn test_scalar_sets_base_only() {
        let d = resolve("gap", &ResponsiveValue::single(8), &BP);
        assert_eq!(d.base().get("gap"), Some("8px"));
        assert!(!d.has_overrides());
    }

    #[test]
    fn test_single_entry_sequence_has_no_overrides() {
        let d = resolve("flex-direction", &ResponsiveValue::values(vec!["column"]), &BP);
        assert_eq!(d.base().get("flex-direction"), Some("column"));
        assert!(!d.has_overrides());
    }

    #[test]
    fn test_two_entries_override_all_breakpoints() {
        let d = resolve("gap", &ResponsiveValue::values(vec![8, 16]), &BP);
        assert_eq!(d.base().get("gap"), Some("8px"));
        for bp in Breakpoint::ALL {
            assert_eq!(d.overrides(bp).unwrap().get("gap"), Some("16px"), "{}", bp);
        }
    }

    #[test]
    fn test_three_entries() {
        let d = resolve("justifyContent", &ResponsiveValue::values(vec!["a", "b", "c"]), &BP);
        assert_eq!(d.base().get("justifyContent"), Some("a"));
        assert_eq!(d.overrides(Breakpoint::Small).unwrap().get("justifyContent"), Some("b"));
        for bp in [Breakpoint::Medium, Breakpoint::Large, Breakpoint::ExtraLarge] {
            assert_eq!(d.overrides(bp).unwrap().get("justifyContent"), Some("c"));
        }
    }

    #[test]
    fn test_gap_in_sequence_inherits_preceding() {
        let value = ResponsiveValue::sequence(vec![Some(0), Some(4), None, Some(12), None]);
        let d = resolve("padding", &value, &BP);
        assert_eq!(d.value_at("padding", Some(Breakpoint::Medium)), Some("4px"));
        assert_eq!(d.value_at("padding", Some(Breakpoint::ExtraLarge)), Some("12px"));
    }

    #[test]
    fn test_non_spacing_numbers_stay_unitless() {
        let d = resolve("flex-grow", &ResponsiveValue::single(1), &BP);
        assert_eq!(d.base().get("flex-grow"), Some("1"));
        let d = resolve("marginTop", &ResponsiveValue::single(2.5), &BP);
        assert_eq!(d.base().get("marginTop"), Some("2.5px"));
    }

    #[test]
    fn test_try_resolve_errors() {
        let empty: ResponsiveValue<u32> = ResponsiveValue::sequence(vec![]);
        assert_eq!(
            try_resolve("gap", &empty, &BP),
            Err(MalformedResponsiveValue::Empty)
        );
        let no_base = ResponsiveValue::sequence(vec![None, Some(4u32)]);
        assert_eq!(
            try_resolve("gap", &no_base, &BP),
            Err(MalformedResponsiveValue::MissingBase)
        );
    }

    #[test]
    #[should_panic(expected = "malformed responsive value")]
    fn test_resolve_panics_on_malformed() {
        let empty: ResponsiveValue<u32> = ResponsiveValue::sequence(vec![]);
        resolve("gap", &empty, &BP);
    }
}
