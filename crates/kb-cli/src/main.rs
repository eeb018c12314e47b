//! kbase - knowledge base viewer and exporter
//!
//! Browse a catalog of markdown documents in the terminal, render them to
//! HTML or plain text, copy them to the clipboard and print responsive
//! flex-layout CSS.
//!
//! ## Quick Start
//!
//! ```bash
//! # Browse the built-in catalog, documents resolved under the current directory
//! kbase browse --root ./site
//!
//! # Render a document
//! kbase render notes.md --format html
//!
//! # Copy plain text to the clipboard
//! kbase copy notes.md --mode plain
//!
//! # Responsive flex CSS
//! kbase layout --direction column,row --gap 8,16
//!
//! # Component showcase
//! kbase tools
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
