//! Viewport breakpoints

use crate::error::{KbError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named breakpoint above the base (mobile) layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Breakpoint {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl Breakpoint {
    /// Ascending order
    pub const ALL: [Breakpoint; 4] = [
        Breakpoint::Small,
        Breakpoint::Medium,
        Breakpoint::Large,
        Breakpoint::ExtraLarge,
    ];

    /// Position in a responsive sequence (0 is the base value)
    pub fn index(&self) -> usize {
        match self {
            Breakpoint::Small => 1,
            Breakpoint::Medium => 2,
            Breakpoint::Large => 3,
            Breakpoint::ExtraLarge => 4,
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Breakpoint::Small => "sm",
            Breakpoint::Medium => "md",
            Breakpoint::Large => "lg",
            Breakpoint::ExtraLarge => "xl",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Minimum viewport width in px for each breakpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakpointTable {
    pub small: u32,
    pub medium: u32,
    pub large: u32,
    pub extra_large: u32,
}

impl BreakpointTable {
    /// 576 / 768 / 992 / 1200
    pub const DEFAULT: BreakpointTable = BreakpointTable {
        small: 576,
        medium: 768,
        large: 992,
        extra_large: 1200,
    };

    /// Build a table; widths must be strictly ascending
    pub fn new(small: u32, medium: u32, large: u32, extra_large: u32) -> Result<Self> {
        let table = Self {
            small,
            medium,
            large,
            extra_large,
        };
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<()> {
        let widths = self.widths();
        if widths.windows(2).all(|w| w[0] < w[1]) {
            Ok(())
        } else {
            Err(KbError::Config(format!(
                "Breakpoints must be strictly ascending, got {:?}",
                widths
            )))
        }
    }

    pub fn min_width(&self, breakpoint: Breakpoint) -> u32 {
        match breakpoint {
            Breakpoint::Small => self.small,
            Breakpoint::Medium => self.medium,
            Breakpoint::Large => self.large,
            Breakpoint::ExtraLarge => self.extra_large,
        }
    }

    pub fn widths(&self) -> [u32; 4] {
        [self.small, self.medium, self.large, self.extra_large]
    }

    /// Largest breakpoint active at `width`, `None` below small
    pub fn active(&self, width: u32) -> Option<Breakpoint> {
        Breakpoint::ALL
            .into_iter()
            .rev()
            .find(|bp| width >= self.min_width(*bp))
    }
}

impl Default for BreakpointTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_widths() {
        assert_eq!(BreakpointTable::DEFAULT.widths(), [576, 768, 992, 1200]);
        assert!(BreakpointTable::DEFAULT.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_ascending() {
        assert!(BreakpointTable::new(600, 600, 900, 1200).is_err());
        assert!(BreakpointTable::new(100, 200, 300, 400).is_ok());
    }

    #[test]
    fn test_active_breakpoint() {
        let t = BreakpointTable::DEFAULT;
        assert_eq!(t.active(320), None);
        assert_eq!(t.active(576), Some(Breakpoint::Small));
        assert_eq!(t.active(991), Some(Breakpoint::Medium));
        assert_eq!(t.active(1920), Some(Breakpoint::ExtraLarge));
    }

    #[test]
    fn test_partial_table_from_toml() {
        let t: BreakpointTable = toml::from_str("small = 600").unwrap();
        assert_eq!(t.small, 600);
        assert_eq!(t.extra_large, 1200);
    }
}
