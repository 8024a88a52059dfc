//! # listgen-ooxml
//!
//! The WordprocessingML subset listgen needs to turn a template into a report.
//!
//! This crate provides functionality to:
//! - Read DOCX/DOTX packages and keep unmodelled parts intact
//! - Edit the document body (paragraphs, list bindings, text runs)
//! - Enumerate and extend the numbering table
//! - Write the package back as a DOCX
//!
//! ## Example: Listing numbering definitions
//!
//! ```no_run
//! use listgen_ooxml::WordDocument;
//!
//! let doc = WordDocument::open("list-styles.dotx")?;
//! for definition in doc.numbering().abstract_nums() {
//!     println!("{} -> {:?}", definition.id, definition.paragraph_style());
//! }
//! # Ok::<(), listgen_ooxml::OoxmlError>(())
//! ```

pub mod archive;
pub mod document;
pub mod error;
pub mod numbering;
pub mod package;
pub mod relationships;
pub mod styles;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod writer;
mod xml;

pub use archive::OoxmlArchive;
pub use document::{Block, Document, NumberingRef, Paragraph, RawElement, Run};
pub use error::{OoxmlError, Result};
pub use numbering::{AbstractNum, Level, LevelOverride, Num, Numbering};
pub use package::WordDocument;
pub use relationships::{Relationship, Relationships};
pub use styles::{Style, StyleSheet, StyleType};
pub use writer::DocxWriter;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
