//! Responsive flex container layout

use super::breakpoint::BreakpointTable;
use super::declaration::StyleDeclaration;
use super::resolver::{resolve, try_resolve, StyleValue};
use super::value::ResponsiveValue;
use crate::error::MalformedResponsiveValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! css_keyword_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $input:literal => $css:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// CSS keyword
            pub fn css(&self) -> &'static str {
                match self {
                    $($name::$variant => $css),+
                }
            }

            /// Accepted input names
            pub fn names() -> &'static [&'static str] {
                &[$($input),+]
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($input => Ok($name::$variant),)+
                    other => Err(format!(
                        "expected one of {}, got '{}'",
                        Self::names().join(", "),
                        other
                    )),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let name = match self {
                    $($name::$variant => $input),+
                };
                f.write_str(name)
            }
        }

        impl From<$name> for StyleValue {
            fn from(v: $name) -> Self {
                StyleValue::Keyword(v.css().to_string())
            }
        }
    };
}

css_keyword_enum!(
    /// Main axis
    FlexDirection {
        Row => "row" => "row",
        Column => "column" => "column",
    }
);

css_keyword_enum!(
    /// Distribution along the main axis
    Justify {
        Start => "start" => "flex-start",
        Center => "center" => "center",
        End => "end" => "flex-end",
        SpaceBetween => "space-between" => "space-between",
        SpaceAround => "space-around" => "space-around",
    }
);

css_keyword_enum!(
    /// Alignment on the cross axis
    AlignItems {
        Start => "start" => "flex-start",
        Center => "center" => "center",
        End => "end" => "flex-end",
        Stretch => "stretch" => "stretch",
    }
);

/// A flex container whose four properties may vary per breakpoint
#[derive(Debug, Clone, PartialEq)]
pub struct FlexLayout {
    pub direction: ResponsiveValue<FlexDirection>,
    pub justify: ResponsiveValue<Justify>,
    pub align: ResponsiveValue<AlignItems>,
    pub gap: ResponsiveValue<u32>,
}

impl Default for FlexLayout {
    fn default() -> Self {
        Self {
            direction: FlexDirection::Row.into(),
            justify: Justify::Start.into(),
            align: AlignItems::Stretch.into(),
            gap: 0.into(),
        }
    }
}

impl FlexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction(mut self, value: impl Into<ResponsiveValue<FlexDirection>>) -> Self {
        self.direction = value.into();
        self
    }

    pub fn justify(mut self, value: impl Into<ResponsiveValue<Justify>>) -> Self {
        self.justify = value.into();
        self
    }

    pub fn align(mut self, value: impl Into<ResponsiveValue<AlignItems>>) -> Self {
        self.align = value.into();
        self
    }

    pub fn gap(mut self, value: impl Into<ResponsiveValue<u32>>) -> Self {
        self.gap = value.into();
        self
    }

    /// `display: flex` plus the four resolved properties
    ///
    /// # Panics
    ///
    /// Panics if any property holds a malformed sequence.
    pub fn style(&self, breakpoints: &BreakpointTable) -> StyleDeclaration {
        let mut decl = StyleDeclaration::with_breakpoints(*breakpoints);
        decl.set("display", "flex");
        decl.merge(&resolve("flex-direction", &self.direction, breakpoints));
        decl.merge(&resolve("justify-content", &self.justify, breakpoints));
        decl.merge(&resolve("align-items", &self.align, breakpoints));
        decl.merge(&resolve("gap", &self.gap, breakpoints));
        decl
    }

    /// Like [`style`](Self::style), reporting malformed values instead
    pub fn try_style(
        &self,
        breakpoints: &BreakpointTable,
    ) -> Result<StyleDeclaration, MalformedResponsiveValue> {
        let mut decl = StyleDeclaration::with_breakpoints(*breakpoints);
        decl.set("display", "flex");
        decl.merge(&try_resolve("flex-direction", &self.direction, breakpoints)?);
        decl.merge(&try_resolve("justify-content", &self.justify, breakpoints)?);
        decl.merge(&try_resolve("align-items", &self.align, breakpoints)?);
        decl.merge(&try_resolve("gap", &self.gap, breakpoints)?);
        Ok(decl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responsive::Breakpoint;
    use pretty_assertions::assert_eq;

    const BP: BreakpointTable = BreakpointTable::DEFAULT;

    #[test]
    fn test_defaults() {
        let style = FlexLayout::new().style(&BP);
        let props: Vec<_> = style.base().iter().collect();
        assert_eq!(
            props,
            vec![
                ("display", "flex"),
                ("flex-direction", "row"),
                ("justify-content", "flex-start"),
                ("align-items", "stretch"),
                ("gap", "0px"),
            ]
        );
        assert!(!style.has_overrides());
    }

    #[test]
    fn test_responsive_direction_and_gap() {
        let style = FlexLayout::new()
            .direction(ResponsiveValue::values(vec![
                FlexDirection::Column,
                FlexDirection::Row,
            ]))
            .gap(ResponsiveValue::values(vec![8, 16, 24]))
            .justify(Justify::SpaceBetween)
            .style(&BP);

        assert_eq!(style.base().get("flex-direction"), Some("column"));
        assert_eq!(style.base().get("justify-content"), Some("space-between"));
        assert_eq!(
            style.value_at("flex-direction", Some(Breakpoint::ExtraLarge)),
            Some("row")
        );
        assert_eq!(style.value_at("gap", Some(Breakpoint::Small)), Some("16px"));
        assert_eq!(style.value_at("gap", Some(Breakpoint::Large)), Some("24px"));
        assert!(style.overrides(Breakpoint::Small).unwrap().get("justify-content").is_none());
    }

    #[test]
    fn test_end_maps_to_flex_end() {
        let style = FlexLayout::new()
            .justify(Justify::End)
            .align(AlignItems::Center)
            .style(&BP);
        assert_eq!(style.base().get("justify-content"), Some("flex-end"));
        assert_eq!(style.base().get("align-items"), Some("center"));
    }

    #[test]
    fn test_keyword_parsing() {
        assert_eq!("space-around".parse(), Ok(Justify::SpaceAround));
        assert_eq!("column".parse(), Ok(FlexDirection::Column));
        let err = "middle".parse::<AlignItems>().unwrap_err();
        assert!(err.contains("start, center, end, stretch"));
    }

    #[test]
    fn test_try_style_reports_malformed_gap() {
        let layout = FlexLayout::new().gap(ResponsiveValue::sequence(vec![None, Some(4)]));
        assert_eq!(
            layout.try_style(&BP),
            Err(MalformedResponsiveValue::MissingBase)
        );
    }
}
