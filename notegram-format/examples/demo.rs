#![allow(clippy::print_stdout, reason = "Demo output")]
use notegram_format::{ConversionOptions, MarkdownConverter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
  let note = "---\ntags: [demo]\n---\n# Demo\n\n## Today\n\n**Ship** the \
              `notegram` release, see [the board](https://board.test).\n\n> \
              [!tip]- Details\n> Nothing *secret* here.";

  let converter = MarkdownConverter::new(ConversionOptions::message());
  let result = converter.convert(note);

  println!("Text:\n{}\n", result.text);
  println!("Annotations:");
  for annotation in &result.annotations {
    println!(
      "  {:<22} offset {:>3} length {:>3}",
      annotation.kind.wire_name(),
      annotation.offset,
      annotation.length
    );
  }

  println!("\nEntities:\n{}", serde_json::to_string_pretty(&result.entities())?);

  let report = result.validate(converter.options().max_length);
  println!("\nValid: {}", report.valid);
  Ok(())
}
