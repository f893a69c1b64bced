use pngsift::{encode::*, png::*};

use std::path::Path;

const USAGE: &str = "usage:
  pngsift info <file.png>...
  pngsift squash <in.png> <out.png> [millis]";

fn main() {
  let args: Vec<String> = std::env::args().skip(1).collect();
  let result = match args.first().map(String::as_str) {
    Some("info") if args.len() > 1 => {
      args[1..].iter().for_each(|p| info(Path::new(p)));
      Ok(())
    }
    Some("squash") if args.len() == 3 || args.len() == 4 => squash(&args[1], &args[2], args.get(3)),
    _ => Err(USAGE.to_string()),
  };
  if let Err(e) = result {
    eprintln!("{e}");
    std::process::exit(1);
  }
}

fn info(path: &Path) {
  let bytes = match std::fs::read(path) {
    Ok(bytes) => bytes,
    Err(e) => {
      println!("{}: {e}", path.display());
      return;
    }
  };
  let png = decode_png(&bytes);
  println!("{}: {}x{}", path.display(), png.bitmap.width, png.bitmap.height);
  for chunk in png.parsed_chunks() {
    match chunk {
      Ok(chunk) => println!("  {chunk}"),
      Err(warning) => println!("  (unreadable) {warning}"),
    }
  }
  for entry in &png.text {
    println!("  text {:?}: {:?}", entry.keyword, entry.text);
  }
  for warning in &png.warnings {
    println!("  warning: {warning}");
  }
}

fn squash(input: &str, output: &str, millis: Option<&String>) -> Result<(), String> {
  let budget = match millis {
    Some(m) => TimeBudget::from_millis(m.parse::<f64>().map_err(|e| format!("{m}: {e}"))?),
    None => TimeBudget::default(),
  };
  let bytes = std::fs::read(input).map_err(|e| format!("{input}: {e}"))?;
  let png = decode_png(&bytes);
  for warning in &png.warnings {
    println!("{input}: warning: {warning}");
  }
  let options = EncodeOptions::default().with_preserve_transparent_colour(true).with_time_budget(budget);
  let squashed = encode_png(&png.bitmap, &options).map_err(|e| format!("{input}: {e}"))?;
  std::fs::write(output, &squashed).map_err(|e| format!("{output}: {e}"))?;
  println!("{input}: {} bytes -> {output}: {} bytes", bytes.len(), squashed.len());
  Ok(())
}
