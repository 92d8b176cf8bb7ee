use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

mod catalog;
mod decode;
mod error;
mod fields;
mod operand;
mod tables;
mod window;

use error::Error;

#[derive(Parser)]
#[command(name = "disasm8086")]
#[command(about = "Disassemble 16-bit 8086 machine code into NASM-style assembly")]
struct Args {
  /// Path to a raw binary file of 8086 machine code
  path: PathBuf,
}

fn setup_logging() -> Result<()> {
  use tracing_subscriber::{fmt, prelude::*, EnvFilter};

  // stdout carries the listing, so logs go to stderr
  let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(filter)
    .try_init()?;
  Ok(())
}

fn read_input(path: &Path) -> Result<Vec<u8>, Error> {
  std::fs::read(path).map_err(|source| Error::InputUnavailable {
    path: path.to_path_buf(),
    source,
  })
}

fn run(path: &Path) -> Result<String, Error> {
  let data = read_input(path)?;
  info!(path = %path.display(), bytes = data.len(), "read input");
  Ok(decode::disassemble(&data)?)
}

fn main() -> Result<()> {
  setup_logging()?;
  let args = Args::parse();
  let listing = run(&args.path)?;
  print!("{listing}");
  Ok(())
}
