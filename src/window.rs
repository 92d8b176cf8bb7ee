use crate::error::Truncated;

/// The longest supported encoding: opcode, mod/rm, 16-bit displacement, 16-bit data.
pub const MAX_INSTRUCTION_LEN: usize = 6;

/// Up to [`MAX_INSTRUCTION_LEN`] bytes of lookahead from the decode cursor.
/// Bytes past the end of the input are absent, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window<'a> {
  bytes: &'a [u8],
}

impl<'a> Window<'a> {
  pub fn new(bytes: &'a [u8]) -> Self {
    Window {
      bytes: &bytes[..bytes.len().min(MAX_INSTRUCTION_LEN)],
    }
  }

  pub fn at(bytes: &'a [u8], cursor: usize) -> Self {
    Window::new(bytes.get(cursor..).unwrap_or_default())
  }

  pub fn available(&self) -> usize {
    self.bytes.len()
  }

  pub fn peek(&self, index: usize) -> Option<u8> {
    self.bytes.get(index).copied()
  }

  pub fn byte(&self, index: usize) -> Result<u8, Truncated> {
    self.peek(index).ok_or(Truncated {
      needed: index + 1,
      available: self.available(),
    })
  }

  /// Fails unless the whole `len`-byte instruction is present.
  pub fn require(&self, len: usize) -> Result<(), Truncated> {
    if self.available() < len {
      return Err(Truncated {
        needed: len,
        available: self.available(),
      });
    }
    Ok(())
  }

  /// Little-endian: low byte at `index`, high byte at `index + 1`.
  pub fn word(&self, index: usize) -> Result<u16, Truncated> {
    let lo = self.byte(index)?;
    let hi = self.byte(index + 1)?;
    Ok((u16::from(hi) << 8) | u16::from(lo))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_window_caps_lookahead() {
    let bytes = [1, 2, 3, 4, 5, 6, 7, 8];
    assert_eq!(Window::new(&bytes).available(), MAX_INSTRUCTION_LEN);
    assert_eq!(Window::at(&bytes, 5).available(), 3);
    assert_eq!(Window::at(&bytes, 8).available(), 0);
    assert_eq!(Window::at(&bytes, 20).available(), 0);
  }

  #[test]
  fn test_absent_bytes_are_not_zero() {
    let window = Window::new(&[0, 0]);
    assert_eq!(window.peek(1), Some(0));
    assert_eq!(window.peek(2), None);
    assert_eq!(
      window.byte(2),
      Err(Truncated {
        needed: 3,
        available: 2
      })
    );
  }

  #[test]
  fn test_require_reports_full_length() {
    let window = Window::new(&[0b10001010, 0b00000110]);
    assert_eq!(window.require(2), Ok(()));
    assert_eq!(
      window.require(4),
      Err(Truncated {
        needed: 4,
        available: 2
      })
    );
  }

  #[test]
  fn test_word_is_little_endian() {
    let window = Window::new(&[0b00101000, 0b00000001]);
    assert_eq!(window.word(0), Ok(296));
    assert_eq!(
      window.word(1),
      Err(Truncated {
        needed: 3,
        available: 2
      })
    );
  }
}
