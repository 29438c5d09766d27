mod repl;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

/// The ZEN language.
#[derive(Parser)]
#[command(name = "zen", version, about, long_about = None)]
struct Cli {
  /// Script files to run (`.zen` or `.zn`). With no files, starts the
  /// REPL.
  files: Vec<PathBuf>,
}

fn main() -> anyhow::Result<ExitCode> {
  let args = Cli::parse();

  if args.files.is_empty() {
    repl::run()?;
    return Ok(ExitCode::SUCCESS);
  }

  for file in &args.files {
    if !run_file(file) {
      return Ok(ExitCode::FAILURE);
    }
  }
  Ok(ExitCode::SUCCESS)
}

/// Run one file in a fresh interpreter. Diagnostics go to stderr;
/// whatever the program prints goes to stdout.
fn run_file(path: &Path) -> bool {
  let display = path.display();

  if !matches!(
    path.extension().and_then(|e| e.to_str()),
    Some("zen" | "zn")
  ) {
    eprintln!("zen: {display}: not a ZEN source file (expected `.zen` or `.zn`)");
    return false;
  }

  let src = match std::fs::read_to_string(path) {
    Ok(src) => src,
    Err(e) => {
      eprintln!("zen: {display}: {e}");
      return false;
    }
  };

  let zen = zen::Zen::new();
  match zen.eval(&src) {
    Ok(_) => true,
    Err(error) => {
      let source = diag::Source::file(display.to_string(), src.as_str());
      eprint!("{}", error.report(source, false));
      false
    }
  }
}
