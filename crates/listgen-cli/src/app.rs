//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use listgen_core::{ReportConfig, ReportGenerator, StyleIndex, BUNDLED_TEMPLATE};
use listgen_ooxml::WordDocument;

/// Default report file name
pub const DEFAULT_OUTPUT: &str = "numbered-lists.docx";

#[derive(Parser)]
#[command(name = "listgen")]
#[command(author, version, about = "Numbered-list sample reports from Word templates", long_about = None)]
struct Cli {
    /// Log per-element detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the sample report (default)
    Generate(GenerateArgs),

    /// List the numbered styles a template defines
    Styles {
        /// Template DOTX/DOCX file (default: the bundled template)
        template: Option<PathBuf>,
    },
}

/// Options of the generate command
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Output DOCX file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Template DOTX file (default: the bundled template)
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Report configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Follow every item with nested sub-lists
    #[arg(long)]
    pub nested: bool,

    /// Number of passes over all styles
    #[arg(long)]
    pub passes: Option<u32>,

    /// Items per list and sub-list
    #[arg(long)]
    pub items: Option<u32>,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            template: None,
            config: None,
            nested: false,
            passes: None,
            items: None,
        }
    }
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Generate(args)) => generate_command(&args)?,
        Some(Commands::Styles { template }) => styles_command(template.as_deref())?,
        None => generate_command(&GenerateArgs::default())?,
    }

    Ok(())
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` directives are honoured; the default level is info, or debug
/// with `--verbose`.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    // A subscriber may already be installed when embedded in another tool
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolve the report configuration from a file and command-line overrides
pub fn resolve_config(args: &GenerateArgs) -> Result<ReportConfig> {
    let mut config = match args.config {
        Some(ref path) => ReportConfig::load(path)
            .with_context(|| format!("Failed to load configuration: {}", path.display()))?,
        None if args.nested => ReportConfig::nested(),
        None => ReportConfig::flat(),
    };

    if args.nested {
        config.nested_sub_lists = true;
    }
    if let Some(passes) = args.passes {
        config.pass_count = passes;
    }
    if let Some(items) = args.items {
        config.items_per_list = items;
    }

    config.validate().context("Invalid report configuration")?;
    Ok(config)
}

/// Execute the generate command
pub fn generate_command(args: &GenerateArgs) -> Result<()> {
    println!("listgen v{}", listgen_core::VERSION);

    let config = resolve_config(args)?;
    let template = read_template(args.template.as_deref())?;

    println!(
        "  Lists: {} items, {} passes{}",
        config.items_per_list,
        config.pass_count,
        if config.nested_sub_lists {
            format!(", nested to level {}", config.max_nesting_level)
        } else {
            String::new()
        }
    );

    let document = ReportGenerator::new(&template, config)
        .generate()
        .context("Failed to generate report")?;

    document
        .save(&args.output)
        .with_context(|| format!("Failed to write report: {}", args.output.display()))?;

    println!();
    println!("Report complete!");
    println!("  Created: {}", args.output.display());
    println!("  {} paragraphs", document.paragraphs().count());

    Ok(())
}

/// Execute the styles command
pub fn styles_command(template: Option<&Path>) -> Result<()> {
    let bytes = read_template(template)?;
    let name = template
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "bundled template".to_string());

    let document = WordDocument::from_bytes(&bytes)
        .with_context(|| format!("Failed to open template: {}", name))?;

    println!("Numbered styles in {}:", name);
    for line in style_lines(&document) {
        println!("  {}", line);
    }

    Ok(())
}

/// One line per indexed style: ID, display name and numbering definition
pub fn style_lines(document: &WordDocument) -> Vec<String> {
    let index = StyleIndex::build(document);
    if index.is_empty() {
        return vec!["(none)".to_string()];
    }

    index
        .iter()
        .map(|(style, abstract_num_id)| {
            let display = document.styles().display_name(style);
            if display == style {
                format!("{} -> numbering definition {}", style, abstract_num_id)
            } else {
                format!(
                    "{} ({}) -> numbering definition {}",
                    style, display, abstract_num_id
                )
            }
        })
        .collect()
}

fn read_template(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            println!("  Loading template: {}", path.display());
            fs::read(path)
                .with_context(|| format!("Failed to read template: {}", path.display()))
        }
        None => Ok(BUNDLED_TEMPLATE.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_without_subcommand() {
        let cli = Cli::try_parse_from(["listgen"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "listgen", "generate", "-o", "out.docx", "--nested", "--passes", "2", "--items", "4",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Generate(args)) => {
                assert_eq!(args.output, PathBuf::from("out.docx"));
                assert!(args.nested);
                assert_eq!(args.passes, Some(2));
                assert_eq!(args.items, Some(4));
                assert!(args.template.is_none());
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_generate_default_output() {
        let cli = Cli::try_parse_from(["listgen", "generate"]).unwrap();
        match cli.command {
            Some(Commands::Generate(args)) => {
                assert_eq!(args.output, PathBuf::from(DEFAULT_OUTPUT))
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_resolve_config_presets() {
        assert_eq!(
            resolve_config(&GenerateArgs::default()).unwrap(),
            ReportConfig::flat()
        );

        let nested = GenerateArgs {
            nested: true,
            ..GenerateArgs::default()
        };
        assert_eq!(resolve_config(&nested).unwrap(), ReportConfig::nested());
    }

    #[test]
    fn test_resolve_config_overrides() {
        let args = GenerateArgs {
            passes: Some(1),
            items: Some(2),
            ..GenerateArgs::default()
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.pass_count, 1);
        assert_eq!(config.items_per_list, 2);
        assert!(!config.nested_sub_lists);

        let invalid = GenerateArgs {
            items: Some(0),
            ..GenerateArgs::default()
        };
        assert!(resolve_config(&invalid).is_err());
    }

    #[test]
    fn test_style_lines_for_bundled_template() {
        let document = WordDocument::from_bytes(BUNDLED_TEMPLATE).unwrap();
        let lines = style_lines(&document);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "ListNumber (List Number) -> numbering definition 0");
    }
}
