//! Responsive style resolution
//!
//! A property value is either a scalar or a sequence indexed by breakpoint
//! (0 = base, then small, medium, large, extra-large). Resolving expands it
//! into a [`StyleDeclaration`] with one media-query override per breakpoint.

mod breakpoint;
mod declaration;
mod flex;
mod resolver;
mod value;

pub use breakpoint::{Breakpoint, BreakpointTable};
pub use declaration::{kebab_case, PropertyList, StyleDeclaration};
pub use flex::{AlignItems, FlexDirection, FlexLayout, Justify};
pub use resolver::{resolve, takes_px, try_resolve, StyleValue};
pub use value::ResponsiveValue;
