use tracing::{debug, info, warn};

use crate::catalog;
use crate::error::{DecodeError, StreamError};
use crate::window::Window;

pub const HEADER: &str = "bits 16";
pub const INVALID_BYTE: &str = "invalidByte";

pub fn disassemble(instructions: &[u8]) -> Result<String, StreamError> {
  let mut lines = vec![HEADER.to_string()];
  let mut index = 0;
  while index < instructions.len() {
    let window = Window::at(instructions, index);
    let (line, bytes_processed) =
      decode(&window).map_err(|source| StreamError { offset: index, source })?;
    debug!(offset = index, len = bytes_processed, "{line}");
    index += bytes_processed;
    lines.push(line);
  }
  info!(
    bytes = instructions.len(),
    lines = lines.len() - 1,
    "disassembled"
  );
  lines.push("".to_string());
  Ok(lines.join("\n"))
}

/// Decodes the instruction at the start of `window`. Unknown bytes become a
/// one-byte placeholder so the stream always advances.
pub fn decode(window: &Window) -> Result<(String, usize), DecodeError> {
  match catalog::dispatch(window) {
    Some(encoding) => {
      let instruction = encoding.decode(window)?;
      Ok((instruction.to_string(), instruction.len))
    }
    None => {
      warn!(byte = ?window.peek(0), "unknown encoding");
      Ok((INVALID_BYTE.to_string(), 1))
    }
  }
}
