//! listgen CLI - Command-line interface library
//!
//! This library provides the CLI functionality for listgen:
//! - Generate: write the numbered-list sample report (default command)
//! - Styles: list the numbered styles a template defines
//!
//! # Library Usage
//!
//! ```ignore
//! use listgen_cli::{generate_command, GenerateArgs};
//!
//! generate_command(&GenerateArgs::default())?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Flat report from the bundled template
//! listgen
//!
//! # Nested report from a custom template
//! listgen generate --nested --template corporate.dotx --output lists.docx
//!
//! # Show which styles would get a list
//! listgen styles corporate.dotx
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{generate_command, resolve_config, style_lines, styles_command};
pub use app::{run_cli, GenerateArgs, DEFAULT_OUTPUT};
