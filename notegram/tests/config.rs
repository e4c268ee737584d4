#![allow(
  clippy::expect_used,
  clippy::unwrap_used,
  reason = "Fine in tests"
)]
use std::fs;

use clap::Parser;
use notegram::{
  cli::Cli,
  config::{Config, OutputFormat},
  process::{Input, collect_inputs},
};
use tempfile::TempDir;

fn parse(args: &[&str]) -> Cli {
  Cli::try_parse_from(std::iter::once("notegram").chain(args.iter().copied()))
    .expect("Failed to parse arguments")
}

#[test]
fn test_load_toml_config_file() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let path = dir.path().join("notegram.toml");
  fs::write(
    &path,
    "format = \"json\"\njobs = 2\n\n[conversion]\nmax_length = 200\nkeep_links = \
     false\n",
  )
  .expect("Failed to write config");

  let config = Config::from_file(&path).expect("Failed to load config");
  assert_eq!(config.format, OutputFormat::Json);
  assert_eq!(config.jobs, Some(2));
  assert_eq!(config.conversion.max_length, 200);
  assert!(!config.conversion.keep_links);
  assert!(config.conversion.strip_frontmatter);
}

#[test]
fn test_load_json_config_file() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let path = dir.path().join("notegram.json");
  fs::write(&path, r#"{ "conversion": { "strip_top_heading": false } }"#)
    .expect("Failed to write config");

  let config = Config::from_file(&path).expect("Failed to load config");
  assert!(!config.conversion.strip_top_heading);
  assert_eq!(config.format, OutputFormat::Text);
}

#[test]
fn test_unsupported_config_extension() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let path = dir.path().join("notegram.yaml");
  fs::write(&path, "format: text").expect("Failed to write config");
  assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_cli_flags_override_config_file() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let path = dir.path().join("custom.toml");
  fs::write(&path, "[conversion]\nmax_length = 200\n").expect("Failed to write config");
  let config_arg = path.to_str().expect("Path is valid UTF-8");

  let cli = parse(&[
    "convert",
    "-c",
    config_arg,
    "--caption",
    "--no-links",
    "--keep-frontmatter",
    "--format",
    "json",
    "--jobs",
    "3",
    "note.md",
  ]);
  let config = Config::load(&cli).expect("Failed to load config");

  assert_eq!(config.conversion.max_length, 1024);
  assert!(!config.conversion.keep_links);
  assert!(!config.conversion.strip_frontmatter);
  assert!(config.conversion.strip_top_heading);
  assert_eq!(config.format, OutputFormat::Json);
  assert_eq!(config.jobs, Some(3));
}

#[test]
fn test_zero_max_length_is_rejected() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let path = dir.path().join("zero.toml");
  fs::write(&path, "").expect("Failed to write config");
  let config_arg = path.to_str().expect("Path is valid UTF-8");

  let cli = parse(&["check", "-c", config_arg, "--max-length", "0", "note.md"]);
  assert!(Config::load(&cli).is_err());
}

#[test]
fn test_caption_conflicts_with_max_length() {
  let result =
    Cli::try_parse_from(["notegram", "convert", "--caption", "--max-length", "9", "a.md"]);
  assert!(result.is_err());
}

#[test]
fn test_find_config_file_in_directory() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  assert_eq!(Config::find_config_file_in(dir.path()), None);

  let hidden = dir.path().join(".notegram.toml");
  fs::write(&hidden, "").expect("Failed to write config");
  assert_eq!(Config::find_config_file_in(dir.path()), Some(hidden));

  let visible = dir.path().join("notegram.toml");
  fs::write(&visible, "").expect("Failed to write config");
  assert_eq!(Config::find_config_file_in(dir.path()), Some(visible));
}

#[test]
fn test_generate_default_config() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  for format in ["toml", "json"] {
    let path = dir.path().join(format!("notegram.{format}"));
    Config::generate_default_config(format, &path).expect("Failed to generate");
    let config = Config::from_file(&path).expect("Generated config loads");
    assert_eq!(config, Config::default());
  }
  assert!(Config::generate_default_config("yaml", &dir.path().join("x.yaml")).is_err());
}

#[test]
fn test_collect_inputs_walks_directories() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let nested = dir.path().join("notes").join("daily");
  fs::create_dir_all(&nested).expect("Failed to create dirs");
  fs::write(dir.path().join("notes").join("b.md"), "b").unwrap();
  fs::write(nested.join("a.md"), "a").unwrap();
  fs::write(nested.join("image.png"), "").unwrap();
  let single = dir.path().join("single.md");
  fs::write(&single, "s").unwrap();

  let inputs = collect_inputs(&[
    single.clone(),
    dir.path().join("notes"),
    "-".into(),
  ])
  .expect("Failed to collect inputs");

  assert_eq!(inputs, vec![
    Input::File(single),
    Input::File(dir.path().join("notes").join("b.md")),
    Input::File(nested.join("a.md")),
    Input::Stdin,
  ]);
}

#[test]
fn test_missing_input_is_an_error() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  assert!(collect_inputs(&[dir.path().join("missing.md")]).is_err());
}
