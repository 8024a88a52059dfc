//! Report configuration
//!
//! One policy drives both report shapes: a flat report with five five-item
//! lists per style, and a nested report whose items spawn sub-lists down to
//! a maximum indent level.
//!
//! ```toml
//! items_per_list = 3
//! pass_count = 3
//! nested_sub_lists = true
//! max_nesting_level = 3
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// Deepest indent level WordprocessingML supports (levels are 0-8)
pub const MAX_INDENT_LEVEL: u32 = 8;

/// Shape of the generated report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Items in every list and sub-list
    pub items_per_list: u32,
    /// How many times every discovered style gets a list
    pub pass_count: u32,
    /// Whether each item is followed by a sub-list one level deeper
    pub nested_sub_lists: bool,
    /// Deepest indent level a sub-list may use
    pub max_nesting_level: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::flat()
    }
}

impl ReportConfig {
    /// Five passes of flat five-item lists
    pub fn flat() -> Self {
        Self {
            items_per_list: 5,
            pass_count: 5,
            nested_sub_lists: false,
            max_nesting_level: 3,
        }
    }

    /// Three passes of three-item lists nested three levels deep
    pub fn nested() -> Self {
        Self {
            items_per_list: 3,
            pass_count: 3,
            nested_sub_lists: true,
            max_nesting_level: 3,
        }
    }

    /// Parse a configuration from a TOML string
    ///
    /// Missing keys take their values from [`ReportConfig::flat`].
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.items_per_list == 0 {
            return Err(ReportError::Config(
                "items_per_list must be at least 1".to_string(),
            ));
        }
        if self.max_nesting_level > MAX_INDENT_LEVEL {
            return Err(ReportError::Config(format!(
                "max_nesting_level {} exceeds the deepest indent level {}",
                self.max_nesting_level, MAX_INDENT_LEVEL
            )));
        }
        Ok(())
    }
}
