//! Report driver
//!
//! Loads the template, indexes its list styles and runs the configured
//! number of passes. Each pass builds one list per style in index order with
//! a list index that starts again at 1.

use std::io::Write;
use std::path::Path;

use listgen_ooxml::WordDocument;
use tracing::{debug, info, warn, Dispatch};

use crate::builder::ListBuilder;
use crate::config::ReportConfig;
use crate::error::Result;
use crate::index::StyleIndex;
use crate::loader::load_template;
use crate::BUNDLED_TEMPLATE;

/// Generates the numbered-list sample report
#[derive(Debug, Clone)]
pub struct ReportGenerator<'a> {
    template: &'a [u8],
    config: ReportConfig,
    dispatch: Option<Dispatch>,
}

impl<'a> ReportGenerator<'a> {
    /// Create a generator for a template package
    pub fn new(template: &'a [u8], config: ReportConfig) -> Self {
        Self {
            template,
            config,
            dispatch: None,
        }
    }

    /// Route this generator's log events to `dispatch` instead of the global subscriber
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// The configuration in use
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Build the report document
    pub fn generate(&self) -> Result<WordDocument> {
        match self.dispatch {
            Some(ref dispatch) => tracing::dispatcher::with_default(dispatch, || self.run()),
            None => self.run(),
        }
    }

    /// Build the report and write it to `writer`
    pub fn generate_to<W: Write>(&self, writer: W) -> Result<WordDocument> {
        let document = self.generate()?;
        document.write(writer)?;
        Ok(document)
    }

    /// Build the report and save it to a file
    pub fn generate_to_file<P: AsRef<Path>>(&self, path: P) -> Result<WordDocument> {
        let document = self.generate()?;
        document.save(path)?;
        Ok(document)
    }

    fn run(&self) -> Result<WordDocument> {
        self.config.validate()?;

        let mut document = load_template(self.template);
        let index = StyleIndex::build(&document);
        if index.is_empty() {
            warn!("Template defines no numbered list styles; the report will have no lists");
        } else {
            info!("Found {} numbered list styles", index.len());
        }

        let mut lists = 0;
        let mut builder = ListBuilder::new(&mut document, &index, &self.config);
        for pass in 1..=self.config.pass_count {
            debug!("Starting pass {} of {}", pass, self.config.pass_count);
            for (position, style) in index.styles().enumerate() {
                builder.build_list(position + 1, style)?;
                lists += 1;
            }
        }

        info!(
            "Generated {} lists in {} body elements",
            lists,
            document.body_element_count()
        );
        Ok(document)
    }
}

/// Generate the report from the bundled template
pub fn generate_report(config: &ReportConfig) -> Result<WordDocument> {
    ReportGenerator::new(BUNDLED_TEMPLATE, *config).generate()
}
