use thiserror::Error;

/// Error type for template operations.
#[derive(Debug, Error)]
pub enum TemplateError {
  /// The requested configuration format is not supported.
  #[error("Unsupported config format: {0}")]
  UnsupportedFormat(String),
}

/// Default configuration template in TOML, with every field explained.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# notegram configuration file

# Output format for `notegram convert`: "text" or "json"
format = "text"

# Number of threads to use for parallel processing (defaults to number of CPU cores)
# jobs = 4

[conversion]
# Remove a leading `---` frontmatter block
strip_frontmatter = true

# Remove level-1 `# ` headings (note titles)
strip_top_heading = true

# Maximum length of the converted text in UTF-16 code units.
# 4096 is the message limit, 1024 the media caption limit.
max_length = 4096

# Annotate fenced code blocks as preformatted text
keep_code_blocks = true

# Annotate Markdown links; when false links collapse to plain text
keep_links = true
"#;

/// Default configuration template in JSON format.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "format": "text",
  "conversion": {
    "strip_frontmatter": true,
    "strip_top_heading": true,
    "max_length": 4096,
    "keep_code_blocks": true,
    "keep_links": true
  }
}
"#;

/// Get the correct configuration template based on the requested format.
pub fn get_template(format: &str) -> Result<&'static str, TemplateError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(TemplateError::UnsupportedFormat(format.to_string())),
  }
}
