use std::{
  fs,
  io::{self, Write},
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info};
use notegram::{
  cli::{Cli, Commands},
  config::Config,
  process,
};
use notegram_format::{ConversionOptions, MarkdownConverter};

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  // Logs go to stderr; stdout carries the converted notes
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match &cli.command {
    Commands::Init {
      output,
      format,
      force,
    } => init(output, format, *force),
    Commands::Convert { inputs, .. } => {
      let config = Config::load(&cli)?;
      convert(&config, inputs)
    },
    Commands::Check { inputs, .. } => {
      let config = Config::load(&cli)?;
      check(&config, inputs)
    },
  }
}

fn init(output: &Path, format: &str, force: bool) -> Result<()> {
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  if let Some(parent) = output.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
    info!("Created directory: {}", parent.display());
  }

  Config::generate_default_config(format, output).wrap_err_with(|| {
    format!("Failed to generate configuration file: {}", output.display())
  })?;

  info!("Configuration file created. Edit it to customize conversion.");
  Ok(())
}

fn setup_thread_pool(config: &Config) -> Result<()> {
  let thread_count = config.jobs.unwrap_or_else(num_cpus::get);
  rayon::ThreadPoolBuilder::new()
    .num_threads(thread_count)
    .build_global()
    .wrap_err("Failed to set up the thread pool")
}

fn convert(config: &Config, paths: &[PathBuf]) -> Result<()> {
  setup_thread_pool(config)?;

  let inputs = process::collect_inputs(paths)?;
  let converter = MarkdownConverter::new(config.conversion.clone());
  let notes = process::convert_inputs(&inputs, &converter)?;

  let mut stdout = io::stdout().lock();
  process::write_converted(&mut stdout, &notes, config.format)?;
  stdout.flush()?;
  Ok(())
}

fn check(config: &Config, paths: &[PathBuf]) -> Result<()> {
  setup_thread_pool(config)?;

  // Convert without truncation so overlong notes are reported, not cut.
  let limit = config.conversion.max_length;
  let converter = MarkdownConverter::new(ConversionOptions {
    max_length: usize::MAX,
    ..config.conversion.clone()
  });

  let inputs = process::collect_inputs(paths)?;
  let notes = process::convert_inputs(&inputs, &converter)?;

  let mut stdout = io::stdout().lock();
  let failed = process::write_check(&mut stdout, &notes, limit, config.format)?;
  stdout.flush()?;

  if failed > 0 {
    bail!("{failed} of {} notes failed validation", notes.len());
  }
  info!("All {} notes are valid", notes.len());
  Ok(())
}
