use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::OutputFormat;

/// Command line interface for notegram
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "notegram: Markdown notes to messaging-ready text"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to a configuration file (TOML or JSON). When omitted, notegram.toml,
  /// notegram.json or .notegram.toml in the working directory is used.
  #[arg(short = 'c', long = "config-file", global = true)]
  pub config_file: Option<PathBuf>,
}

/// All supported subcommands for the notegram CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new notegram configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "notegram.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Convert notes and print the plain text (or text and entities as JSON).
  Convert {
    /// Markdown files, directories to search for `.md` files, or `-` for
    /// standard input.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    #[command(flatten)]
    args: ConvertArgs,
  },

  /// Report notes that would be empty or too long once converted.
  Check {
    /// Markdown files, directories to search for `.md` files, or `-` for
    /// standard input.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    #[command(flatten)]
    args: ConvertArgs,
  },
}

/// Conversion flags shared by `convert` and `check`. Each one overrides the
/// configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConvertArgs {
  /// Maximum length of the converted text, in UTF-16 code units.
  #[arg(short = 'm', long)]
  pub max_length: Option<usize>,

  /// Use the media caption limit instead of the message limit.
  #[arg(long, conflicts_with = "max_length")]
  pub caption: bool,

  /// Keep the leading `---` frontmatter block.
  #[arg(long)]
  pub keep_frontmatter: bool,

  /// Keep level-1 headings, demoted to bold text.
  #[arg(long)]
  pub keep_top_heading: bool,

  /// Convert fenced code blocks to plain text without a pre annotation.
  #[arg(long)]
  pub no_code_blocks: bool,

  /// Collapse links to their text without a link annotation.
  #[arg(long)]
  pub no_links: bool,

  /// Output format.
  #[arg(short = 'F', long, value_enum)]
  pub format: Option<OutputFormat>,

  /// Number of threads to use for parallel processing.
  #[arg(short = 'p', long = "jobs")]
  pub jobs: Option<usize>,
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Conversion flags of the current subcommand, if it takes any.
  #[must_use]
  pub const fn convert_args(&self) -> Option<&ConvertArgs> {
    match &self.command {
      Commands::Convert { args, .. } | Commands::Check { args, .. } => Some(args),
      Commands::Init { .. } => None,
    }
  }
}
