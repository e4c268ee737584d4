pub mod templates;

use std::{
  fs,
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result, eyre};
use notegram_format::{CAPTION_MAX_LENGTH, ConversionOptions, options};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// File names searched, in order, when no configuration file is given.
const CONFIG_FILENAMES: &[&str] =
  &["notegram.toml", "notegram.json", ".notegram.toml", ".notegram.json"];

/// How converted notes are written to standard output.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
  /// The converted text only.
  #[default]
  Text,
  /// Text, entities and truncation info for every note.
  Json,
}

/// Configuration for the notegram CLI.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
  /// Options handed to the converter.
  #[serde(default)]
  pub conversion: ConversionOptions,

  /// Output format of `notegram convert`.
  #[serde(default)]
  pub format: OutputFormat,

  /// Number of threads used for conversion. Defaults to the CPU count.
  #[serde(default)]
  pub jobs: Option<usize>,
}

impl Config {
  /// Create a new configuration from a file.
  /// Only TOML and JSON are supported for the time being.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    options::load_file(path)
      .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))
  }

  /// Load config from file and CLI arguments.
  pub fn load(cli: &Cli) -> Result<Self> {
    let mut config = if let Some(config_path) = &cli.config_file {
      Self::from_file(config_path).wrap_err_with(|| {
        format!("Failed to load config from {}", config_path.display())
      })?
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!(
        "Using discovered config file: {}",
        discovered_config.display()
      );
      Self::from_file(&discovered_config).wrap_err_with(|| {
        format!(
          "Failed to load discovered config from {}",
          discovered_config.display()
        )
      })?
    } else {
      Self::default()
    };

    config.merge_with_cli(cli);
    config.validate()?;

    Ok(config)
  }

  /// Merge CLI arguments into this config, prioritizing CLI values when
  /// present.
  pub fn merge_with_cli(&mut self, cli: &Cli) {
    let Some(args) = cli.convert_args() else {
      return;
    };
    let conversion = &mut self.conversion;

    if args.caption {
      conversion.max_length = CAPTION_MAX_LENGTH;
    }
    if let Some(max_length) = args.max_length {
      conversion.max_length = max_length;
    }

    // Flags can only turn a behavior off relative to the file.
    if args.keep_frontmatter {
      conversion.strip_frontmatter = false;
    }
    if args.keep_top_heading {
      conversion.strip_top_heading = false;
    }
    if args.no_code_blocks {
      conversion.keep_code_blocks = false;
    }
    if args.no_links {
      conversion.keep_links = false;
    }

    if let Some(format) = args.format {
      self.format = format;
    }
    self.jobs = args.jobs.or(self.jobs);
  }

  /// Reject configurations the converter cannot run with.
  pub fn validate(&self) -> Result<()> {
    self
      .conversion
      .validate()
      .wrap_err("Invalid conversion options")?;
    if self.jobs == Some(0) {
      return Err(eyre!("jobs must be at least 1"));
    }
    Ok(())
  }

  /// Search for a config file in the working directory, then in
  /// `$XDG_CONFIG_HOME`.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    if let Some(found) = Self::find_config_file_in(&current_dir) {
      return Some(found);
    }

    let xdg_config_home = std::env::var_os("XDG_CONFIG_HOME")?;
    let xdg_config_dir = PathBuf::from(xdg_config_home).join("notegram");
    ["config.toml", "config.json"]
      .iter()
      .map(|name| xdg_config_dir.join(name))
      .find(|path| path.is_file())
  }

  /// Search `dir` for one of the standard config file names.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|name| dir.join(name))
      .find(|path| path.is_file())
  }

  /// Generate a default configuration file with commented explanations.
  pub fn generate_default_config(format: &str, path: &Path) -> Result<()> {
    let config_content = templates::get_template(format)?;

    fs::write(path, config_content).wrap_err_with(|| {
      format!("Failed to write default config to {}", path.display())
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]
  use super::*;

  #[test]
  fn test_templates_parse_to_defaults() {
    let from_toml: Config = toml::from_str(templates::DEFAULT_TOML_TEMPLATE).unwrap();
    let from_json: Config =
      serde_json::from_str(templates::DEFAULT_JSON_TEMPLATE).unwrap();
    assert_eq!(from_toml, Config::default());
    assert_eq!(from_json, Config::default());
  }

  #[test]
  fn test_partial_config_keeps_defaults() {
    let config: Config = toml::from_str("[conversion]\nkeep_links = false\n").unwrap();
    assert!(!config.conversion.keep_links);
    assert!(config.conversion.strip_frontmatter);
    assert_eq!(config.conversion.max_length, 4096);
    assert_eq!(config.format, OutputFormat::Text);
    assert_eq!(config.jobs, None);
  }

  #[test]
  fn test_unknown_template_format() {
    assert!(templates::get_template("yaml").is_err());
  }

  #[test]
  fn test_zero_jobs_rejected() {
    let config = Config {
      jobs: Some(0),
      ..Default::default()
    };
    assert!(config.validate().is_err());
  }
}
