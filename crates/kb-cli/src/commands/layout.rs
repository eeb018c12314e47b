//! Layout command
//!
//! Print the responsive CSS of a flex container. Every value takes one entry
//! or a comma-separated list indexed by breakpoint: base, then small, medium,
//! large and extra-large. Blank entries fall back to the previous one.

use anyhow::{anyhow, Result};
use clap::Args;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use kb_core::responsive::{AlignItems, FlexDirection, FlexLayout, Justify, ResponsiveValue};

use super::load_config;

/// Arguments for the layout command
#[derive(Debug, Args)]
pub struct LayoutArgs {
    /// row | column
    #[arg(long, default_value = "row")]
    pub direction: String,

    /// start | center | end | space-between | space-around
    #[arg(long, default_value = "start")]
    pub justify: String,

    /// start | center | end | stretch
    #[arg(long, default_value = "stretch")]
    pub align: String,

    /// Gap in pixels
    #[arg(long, default_value = "0")]
    pub gap: String,

    /// CSS selector of the container
    #[arg(long, default_value = ".flex")]
    pub selector: String,

    /// Output the resolved declaration as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse<T>(name: &str, input: &str) -> Result<ResponsiveValue<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    ResponsiveValue::parse_list(input).map_err(|e| anyhow!("Invalid --{} {}", name, e))
}

/// Build the layout from the argument strings
pub fn build_layout(args: &LayoutArgs) -> Result<FlexLayout> {
    Ok(FlexLayout::new()
        .direction(parse::<FlexDirection>("direction", &args.direction)?)
        .justify(parse::<Justify>("justify", &args.justify)?)
        .align(parse::<AlignItems>("align", &args.align)?)
        .gap(parse::<u32>("gap", &args.gap)?))
}

/// Execute the layout command
pub fn execute(args: LayoutArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let layout = build_layout(&args)?;
    let declaration = layout
        .try_style(&config.layout.breakpoints)
        .map_err(|e| anyhow!("Invalid layout: {}", e))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&declaration)?);
    } else {
        print!("{}", declaration.to_css(&args.selector));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_core::responsive::{Breakpoint, BreakpointTable};

    fn args(direction: &str, gap: &str) -> LayoutArgs {
        LayoutArgs {
            direction: direction.to_string(),
            justify: "start".to_string(),
            align: "stretch".to_string(),
            gap: gap.to_string(),
            selector: ".flex".to_string(),
            json: false,
        }
    }

    #[test]
    fn test_sequence_arguments() {
        let layout = build_layout(&args("column,row", "8,,16")).unwrap();
        let decl = layout.style(&BreakpointTable::DEFAULT);
        assert_eq!(decl.value_at("flex-direction", None), Some("column"));
        assert_eq!(
            decl.value_at("flex-direction", Some(Breakpoint::Large)),
            Some("row")
        );
        assert_eq!(decl.value_at("gap", Some(Breakpoint::Small)), Some("8px"));
        assert_eq!(decl.value_at("gap", Some(Breakpoint::Medium)), Some("16px"));
    }

    #[test]
    fn test_invalid_keyword() {
        let err = build_layout(&args("diagonal", "0")).unwrap_err();
        assert!(err.to_string().contains("--direction"));
    }

    #[test]
    fn test_empty_base_is_rejected() {
        let layout = build_layout(&args(",row", "0")).unwrap();
        assert!(layout.try_style(&BreakpointTable::DEFAULT).is_err());
    }
}
