use std::{io, path::PathBuf};
use thiserror::Error;

/// A byte the current instruction needs lies past the end of the input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("needs {needed} bytes, only {available} available")]
pub struct Truncated {
  pub needed: usize,
  pub available: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
  #[error("truncated `{mnemonic}` instruction: needs {needed} bytes, only {available} available")]
  TruncatedInstruction {
    mnemonic: &'static str,
    needed: usize,
    available: usize,
  },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid instruction at offset {offset}: {source}")]
pub struct StreamError {
  pub offset: usize,
  pub source: DecodeError,
}

#[derive(Error, Debug)]
pub enum Error {
  #[error("cannot read input file {path:?}")]
  InputUnavailable {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error(transparent)]
  Decode(#[from] StreamError),
}
