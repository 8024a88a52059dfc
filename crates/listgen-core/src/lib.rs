//! # listgen-core
//!
//! Generates a sample Word report demonstrating every numbered-list style a
//! template defines.
//!
//! The pipeline is:
//! 1. [`loader`]: load the template and empty its body
//! 2. [`index`]: map list styles to their numbering definitions
//! 3. [`builder`]: append one restarting list per style
//! 4. [`report`]: repeat the lists for the configured number of passes
//!
//! ## Example
//!
//! ```no_run
//! use listgen_core::{generate_report, ReportConfig};
//!
//! let report = generate_report(&ReportConfig::nested())?;
//! report.save("numbered-lists.docx")?;
//! # Ok::<(), listgen_core::ReportError>(())
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod index;
pub mod loader;
pub mod report;

pub use builder::ListBuilder;
pub use config::ReportConfig;
pub use error::{ReportError, Result};
pub use index::StyleIndex;
pub use loader::{load_template, strip_body};
pub use report::{generate_report, ReportGenerator};

/// Template shipped with the generator
///
/// Defines the styles `ListNumber`, `ListBullet`, `ListNumber2` and
/// `OutlineList`, each bound to level 0 of its own numbering definition,
/// plus a header and a footer.
pub const BUNDLED_TEMPLATE: &[u8] = include_bytes!("../assets/list-styles.dotx");

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
