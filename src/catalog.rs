use std::fmt;

use crate::error::{DecodeError, Truncated};
use crate::fields;
use crate::operand;
use crate::window::Window;

/// Instruction shape: picks both the field extractor and the operand renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
  /// `dw` opcode bits, mod/reg/rm byte, optional displacement.
  RegMemWithReg,
  /// `w` opcode bit, mod/000/rm byte, displacement, data.
  ImmToRegMem,
  /// Arithmetic group: like `ImmToRegMem`, but `s` with `w` means one sign-extended data byte.
  SignedImmToRegMem,
  /// `w` and `reg` packed into the opcode byte, data follows.
  ImmToReg,
  ImmToAcc,
  /// Signed 8-bit increment.
  ShortJump,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
  mask: u8,
  bits: u8,
  sub_op: Option<u8>,
}

impl Pattern {
  const fn exact(opcode: u8) -> Self {
    Pattern {
      mask: 0b1111_1111,
      bits: opcode,
      sub_op: None,
    }
  }

  const fn masked(mask: u8, bits: u8) -> Self {
    Pattern {
      mask,
      bits,
      sub_op: None,
    }
  }

  /// Also require bits 3-5 of the second byte to equal `sub_op`.
  const fn sub_op(mask: u8, bits: u8, sub_op: u8) -> Self {
    Pattern {
      mask,
      bits,
      sub_op: Some(sub_op),
    }
  }

  pub fn matches(&self, window: &Window) -> bool {
    let Some(opcode) = window.peek(0) else {
      return false;
    };
    if opcode & self.mask != self.bits {
      return false;
    }
    // a missing second byte still matches, so extraction reports the truncation
    match (self.sub_op, window.peek(1)) {
      (Some(sub_op), Some(b2)) => (b2 >> 3) & 0b111 == sub_op,
      _ => true,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoding {
  pub mnemonic: &'static str,
  pub pattern: Pattern,
  pub form: Form,
}

const fn entry(mnemonic: &'static str, pattern: Pattern, form: Form) -> Encoding {
  Encoding {
    mnemonic,
    pattern,
    form,
  }
}

const fn jump(mnemonic: &'static str, opcode: u8) -> Encoding {
  entry(mnemonic, Pattern::exact(opcode), Form::ShortJump)
}

const REG_MEM: u8 = 0b1111_1100;
const WIDE: u8 = 0b1111_1110;
const SIGNED_IMMEDIATE: u8 = 0b100000_00;

// encodings overlap, so order matters: the first match wins
pub static CATALOG: [Encoding; 32] = [
  entry("mov", Pattern::masked(REG_MEM, 0b100010_00), Form::RegMemWithReg),
  entry("mov", Pattern::sub_op(WIDE, 0b1100011_0, 0b000), Form::ImmToRegMem),
  entry("mov", Pattern::masked(0b1111_0000, 0b1011_0000), Form::ImmToReg),
  entry("add", Pattern::masked(REG_MEM, 0b000000_00), Form::RegMemWithReg),
  entry("add", Pattern::sub_op(REG_MEM, SIGNED_IMMEDIATE, 0b000), Form::SignedImmToRegMem),
  entry("add", Pattern::masked(WIDE, 0b0000010_0), Form::ImmToAcc),
  entry("sub", Pattern::masked(REG_MEM, 0b001010_00), Form::RegMemWithReg),
  entry("sub", Pattern::sub_op(REG_MEM, SIGNED_IMMEDIATE, 0b101), Form::SignedImmToRegMem),
  entry("sub", Pattern::masked(WIDE, 0b0010110_0), Form::ImmToAcc),
  entry("cmp", Pattern::masked(REG_MEM, 0b001110_00), Form::RegMemWithReg),
  entry("cmp", Pattern::sub_op(REG_MEM, SIGNED_IMMEDIATE, 0b111), Form::SignedImmToRegMem),
  entry("cmp", Pattern::masked(WIDE, 0b0011110_0), Form::ImmToAcc),
  jump("je", 0b01110100),
  jump("jl", 0b01111100),
  jump("jle", 0b01111110),
  jump("jb", 0b01110010),
  jump("jbe", 0b01110110),
  jump("jp", 0b01111010),
  jump("jo", 0b01110000),
  jump("js", 0b01111000),
  jump("jne", 0b01110101),
  jump("jnl", 0b01111101),
  jump("jnle", 0b01111111),
  jump("jnb", 0b01110011),
  jump("jnbe", 0b01110111),
  jump("jnp", 0b01111011),
  jump("jno", 0b01110001),
  jump("jns", 0b01111001),
  jump("jcxz", 0b11100011),
  jump("loop", 0b11100010),
  jump("loopz", 0b11100001),
  jump("loopnz", 0b11100000),
];

/// One decoded instruction and the number of bytes it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
  pub mnemonic: &'static str,
  pub operands: String,
  pub len: usize,
}

impl fmt::Display for Instruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.mnemonic, self.operands)
  }
}

impl Encoding {
  pub fn decode(&self, window: &Window) -> Result<Instruction, DecodeError> {
    let fields = fields::extract(self.form, window).map_err(
      |Truncated { needed, available }| DecodeError::TruncatedInstruction {
        mnemonic: self.mnemonic,
        needed,
        available,
      },
    )?;
    Ok(Instruction {
      mnemonic: self.mnemonic,
      operands: operand::render(self.form, &fields),
      len: fields.len,
    })
  }
}

pub fn dispatch(window: &Window) -> Option<&'static Encoding> {
  CATALOG.iter().find(|encoding| encoding.pattern.matches(window))
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn mnemonic(bytes: &[u8]) -> Option<&'static str> {
    dispatch(&Window::new(bytes)).map(|encoding| encoding.mnemonic)
  }

  #[test]
  fn test_sub_opcode_selects_arithmetic_mnemonic() {
    assert_eq!(mnemonic(&[0b100000_1_1, 0b11_000_110, 2]), Some("add"));
    assert_eq!(mnemonic(&[0b100000_1_1, 0b11_101_110, 2]), Some("sub"));
    assert_eq!(mnemonic(&[0b100000_1_1, 0b11_111_110, 2]), Some("cmp"));
    // 001 is `or`, which is not supported
    assert_eq!(mnemonic(&[0b100000_1_1, 0b11_001_110, 2]), None);
  }

  #[test]
  fn test_mov_immediate_requires_zero_sub_opcode() {
    assert_eq!(mnemonic(&[0b1100011_0, 0b00_000_111, 40]), Some("mov"));
    assert_eq!(mnemonic(&[0b1100011_0, 0b00_001_111, 40]), None);
  }

  #[test]
  fn test_every_jump_opcode_dispatches_to_itself() {
    let jumps: Vec<_> = CATALOG
      .iter()
      .filter(|encoding| encoding.form == Form::ShortJump)
      .collect();
    assert_eq!(jumps.len(), 20);
    for encoding in &jumps {
      let opcode = encoding.pattern.bits;
      assert_eq!(mnemonic(&[opcode, 0]), Some(encoding.mnemonic));
    }
  }

  #[test]
  fn test_unknown_and_empty_windows() {
    assert_eq!(mnemonic(&[0b11111111]), None);
    assert_eq!(mnemonic(&[]), None);
  }

  #[test]
  fn test_decode_is_pure() {
    let window = Window::new(&[0b100000_1_1, 0b10_000_010, 0xe8, 0x03, 0x1d]);
    let encoding = dispatch(&window).unwrap();
    let first = encoding.decode(&window).unwrap();
    assert_eq!(first, encoding.decode(&window).unwrap());
    assert_eq!(first.to_string(), "add [bp + si + 1000], word 29");
    assert_eq!(first.len, 5);
  }

  #[test]
  fn test_truncation_names_the_instruction() {
    let window = Window::new(&[0b100000_1_1]);
    assert_eq!(
      dispatch(&window).unwrap().decode(&window),
      Err(DecodeError::TruncatedInstruction {
        mnemonic: "add",
        needed: 2,
        available: 1,
      })
    );
  }
}
