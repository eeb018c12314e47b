//! Style declarations with per-breakpoint overrides

use super::breakpoint::{Breakpoint, BreakpointTable};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Ordered property/value pairs; setting a property again replaces it in place
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropertyList(Vec<(String, String)>);

impl PropertyList {
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.0.iter_mut().find(|(p, _)| *p == property) {
            Some((_, v)) => *v = value,
            None => self.0.push((property, value)),
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn extend(&mut self, other: &PropertyList) {
        for (p, v) in other.iter() {
            self.set(p, v);
        }
    }
}

/// A base style plus media-query overrides, one set per breakpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyleDeclaration {
    base: PropertyList,
    overrides: BTreeMap<Breakpoint, PropertyList>,
    #[serde(skip)]
    breakpoints: BreakpointTable,
}

impl StyleDeclaration {
    /// Empty declaration using [`BreakpointTable::DEFAULT`]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_breakpoints(breakpoints: BreakpointTable) -> Self {
        Self {
            breakpoints,
            ..Self::default()
        }
    }

    pub fn breakpoints(&self) -> &BreakpointTable {
        &self.breakpoints
    }

    /// Set an unconditional property
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.base.set(property, value);
    }

    /// Set a property inside the media query of `breakpoint`
    pub fn set_override(
        &mut self,
        breakpoint: Breakpoint,
        property: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.overrides
            .entry(breakpoint)
            .or_default()
            .set(property, value);
    }

    pub fn base(&self) -> &PropertyList {
        &self.base
    }

    /// Overrides of one breakpoint, if any
    pub fn overrides(&self, breakpoint: Breakpoint) -> Option<&PropertyList> {
        self.overrides.get(&breakpoint)
    }

    pub fn has_overrides(&self) -> bool {
        self.overrides.values().any(|o| !o.is_empty())
    }

    /// Effective value of a property at a breakpoint (`None` = base layout)
    pub fn value_at(&self, property: &str, breakpoint: Option<Breakpoint>) -> Option<&str> {
        if let Some(bp) = breakpoint {
            let from_override = Breakpoint::ALL
                .iter()
                .rev()
                .filter(|b| **b <= bp)
                .find_map(|b| self.overrides.get(b).and_then(|o| o.get(property)));
            if from_override.is_some() {
                return from_override;
            }
        }
        self.base.get(property)
    }

    /// Add every property of `other`; on conflict `other` wins. The
    /// breakpoint table of `self` is kept.
    pub fn merge(&mut self, other: &StyleDeclaration) {
        self.base.extend(&other.base);
        for (bp, props) in &other.overrides {
            self.overrides.entry(*bp).or_default().extend(props);
        }
    }

    /// Builder form of [`merge`](Self::merge)
    pub fn merged(mut self, other: &StyleDeclaration) -> Self {
        self.merge(other);
        self
    }

    /// Render a CSS rule for `selector` plus one `@media` block per
    /// breakpoint with overrides, ascending
    pub fn to_css(&self, selector: &str) -> String {
        let mut css = String::new();
        write_rule(&mut css, selector, &self.base, "");
        for (bp, props) in &self.overrides {
            if props.is_empty() {
                continue;
            }
            let _ = writeln!(
                css,
                "@media (min-width: {}px) {{",
                self.breakpoints.min_width(*bp)
            );
            write_rule(&mut css, selector, props, "  ");
            css.push_str("}\n");
        }
        css
    }
}

fn write_rule(css: &mut String, selector: &str, props: &PropertyList, indent: &str) {
    let _ = writeln!(css, "{}{} {{", indent, selector);
    for (property, value) in props.iter() {
        let _ = writeln!(css, "{}  {}: {};", indent, kebab_case(property), value);
    }
    let _ = writeln!(css, "{}}}", indent);
}

/// `justifyContent` -> `justify-content`; kebab-case input is unchanged
pub fn kebab_case(property: &str) -> String {
    let mut out = String::with_capacity(property.len() + 4);
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
