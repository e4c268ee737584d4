//! Input collection, parallel conversion and output rendering.
use std::{
  fmt,
  fs,
  io::{self, Read, Write},
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result, bail};
use log::{debug, info};
use notegram_format::{
  ConversionResult,
  MarkdownConverter,
  MessageEntity,
  ValidationReport,
};
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::OutputFormat;

/// A note to convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
  /// Standard input, given as `-`.
  Stdin,
  File(PathBuf),
}

impl fmt::Display for Input {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Stdin => f.write_str("<stdin>"),
      Self::File(path) => write!(f, "{}", path.display()),
    }
  }
}

impl Input {
  fn read(&self) -> Result<String> {
    match self {
      Self::Stdin => {
        let mut content = String::new();
        io::stdin()
          .read_to_string(&mut content)
          .wrap_err("Failed to read standard input")?;
        Ok(content)
      },
      Self::File(path) => {
        fs::read_to_string(path)
          .wrap_err_with(|| format!("Failed to read {}", path.display()))
      },
    }
  }
}

fn is_markdown(path: &Path) -> bool {
  path
    .extension()
    .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

/// Expand command line paths into inputs. Directories are searched
/// recursively for `.md` files, in sorted order.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<Input>> {
  let mut inputs = Vec::new();

  for path in paths {
    if path.as_os_str() == "-" {
      inputs.push(Input::Stdin);
    } else if path.is_dir() {
      let before = inputs.len();
      for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry
          .wrap_err_with(|| format!("Failed to walk {}", path.display()))?;
        if entry.file_type().is_file() && is_markdown(entry.path()) {
          inputs.push(Input::File(entry.into_path()));
        }
      }
      debug!(
        "Found {} markdown files in {}",
        inputs.len() - before,
        path.display()
      );
    } else if path.is_file() {
      inputs.push(Input::File(path.clone()));
    } else {
      bail!("Input does not exist: {}", path.display());
    }
  }

  Ok(inputs)
}

/// A converted note.
#[derive(Debug, Clone)]
pub struct Converted {
  pub input:  Input,
  pub result: ConversionResult,
}

/// Convert every input in parallel, preserving input order.
pub fn convert_inputs(
  inputs: &[Input],
  converter: &MarkdownConverter,
) -> Result<Vec<Converted>> {
  info!("Converting {} notes", inputs.len());
  inputs
    .par_iter()
    .map(|input| -> Result<Converted> {
      let content = input.read()?;
      let result = converter.convert(&content);
      if result.truncated {
        info!(
          "{input}: truncated from {} to {} characters",
          result.original_length,
          result.len()
        );
      }
      Ok(Converted {
        input: input.clone(),
        result,
      })
    })
    .collect()
}

#[derive(Serialize)]
struct NoteOutput<'a> {
  source:          String,
  text:            &'a str,
  entities:        Vec<MessageEntity>,
  truncated:       bool,
  original_length: usize,
}

impl<'a> From<&'a Converted> for NoteOutput<'a> {
  fn from(converted: &'a Converted) -> Self {
    let result = &converted.result;
    Self {
      source:          converted.input.to_string(),
      text:            &result.text,
      entities:        result.entities(),
      truncated:       result.truncated,
      original_length: result.original_length,
    }
  }
}

/// Write converted notes in the requested format.
///
/// Text output is the converted text; with several notes each one is
/// preceded by a `==> source <==` header. JSON output is an array with the
/// text and entities of every note.
pub fn write_converted<W: Write>(
  out: &mut W,
  notes: &[Converted],
  format: OutputFormat,
) -> Result<()> {
  match format {
    OutputFormat::Text => {
      for (idx, note) in notes.iter().enumerate() {
        if notes.len() > 1 {
          if idx > 0 {
            writeln!(out)?;
          }
          writeln!(out, "==> {} <==", note.input)?;
        }
        writeln!(out, "{}", note.result.text)?;
      }
    },
    OutputFormat::Json => {
      let output: Vec<NoteOutput> = notes.iter().map(NoteOutput::from).collect();
      serde_json::to_writer_pretty(&mut *out, &output)?;
      writeln!(out)?;
    },
  }
  Ok(())
}

#[derive(Serialize)]
struct CheckOutput<'a> {
  source: String,
  #[serde(flatten)]
  report: &'a ValidationReport,
}

/// Validate converted notes against `limit` and write one line per note.
/// Returns how many notes failed.
pub fn write_check<W: Write>(
  out: &mut W,
  notes: &[Converted],
  limit: usize,
  format: OutputFormat,
) -> Result<usize> {
  let reports: Vec<(&Converted, ValidationReport)> = notes
    .iter()
    .map(|note| (note, note.result.validate(limit)))
    .collect();

  match format {
    OutputFormat::Text => {
      for (note, report) in &reports {
        if report.valid {
          writeln!(out, "{}: ok", note.input)?;
        } else {
          writeln!(out, "{}: {}", note.input, report.messages().join("; "))?;
        }
      }
    },
    OutputFormat::Json => {
      let output: Vec<CheckOutput> = reports
        .iter()
        .map(|(note, report)| {
          CheckOutput {
            source: note.input.to_string(),
            report,
          }
        })
        .collect();
      serde_json::to_writer_pretty(&mut *out, &output)?;
      writeln!(out)?;
    },
  }

  Ok(reports.iter().filter(|(_, report)| !report.valid).count())
}
