use std::fmt;

use crate::catalog::Form;
use crate::error::Truncated;
use crate::tables::DIRECT_ADDRESS_RM;
use crate::window::Window;

pub const MODE_MEMORY: u8 = 0b_00;
pub const MODE_DISP8: u8 = 0b_01;
pub const MODE_DISP16: u8 = 0b_10;
pub const MODE_REGISTER: u8 = 0b_11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Immediate {
  Byte(u8),
  Word(u16),
  /// A data byte widened to 16 bits because both `s` and `w` are set.
  SignExtended(i16),
  /// Signed instruction-pointer increment of a jump or loop.
  Relative(i8),
}

impl fmt::Display for Immediate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Immediate::Byte(value) => write!(f, "{value}"),
      Immediate::Word(value) => write!(f, "{value}"),
      Immediate::SignExtended(value) => write!(f, "{value}"),
      Immediate::Relative(value) => write!(f, "{value}"),
    }
  }
}

/// The bitfields of one instruction, plus how many bytes it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fields {
  pub d: bool,
  pub w: bool,
  pub s: bool,
  pub mode: u8,
  pub reg: u8,
  pub rm: u8,
  pub disp: Option<u16>,
  pub data: Option<Immediate>,
  pub len: usize,
}

pub fn extract(form: Form, window: &Window) -> Result<Fields, Truncated> {
  match form {
    Form::RegMemWithReg => reg_mem_with_reg(window),
    Form::ImmToRegMem => imm_to_reg_mem(window, false),
    Form::SignedImmToRegMem => imm_to_reg_mem(window, true),
    Form::ImmToReg => imm_to_reg(window),
    Form::ImmToAcc => imm_to_acc(window),
    Form::ShortJump => short_jump(window),
  }
}

pub fn displacement_len(mode: u8, rm: u8) -> usize {
  match (mode, rm) {
    (MODE_MEMORY, DIRECT_ADDRESS_RM) => 2,
    (MODE_DISP8, _) => 1,
    (MODE_DISP16, _) => 2,
    _ => 0,
  }
}

pub fn sign_extend(byte: u8) -> i16 {
  ((u16::from(byte) << 8) as i16) >> 8
}

fn bit(byte: u8, index: u8) -> bool {
  (byte >> index) & 1 == 1
}

fn mod_reg_rm(window: &Window) -> Result<(u8, u8, u8), Truncated> {
  let b2 = window.byte(1)?;
  Ok((b2 >> 6, (b2 >> 3) & 0b111, b2 & 0b111))
}

// displacement bytes always start right after the mod/reg/rm byte
fn displacement(window: &Window, mode: u8, rm: u8) -> Result<Option<u16>, Truncated> {
  match displacement_len(mode, rm) {
    1 => Ok(Some(u16::from(window.byte(2)?))),
    2 => Ok(Some(window.word(2)?)),
    _ => Ok(None),
  }
}

fn data_len(w: bool, s: bool) -> usize {
  if w && !s {
    2
  } else {
    1
  }
}

fn immediate(window: &Window, index: usize, w: bool, s: bool) -> Result<Immediate, Truncated> {
  match (w, s) {
    (false, _) => Ok(Immediate::Byte(window.byte(index)?)),
    (true, true) => Ok(Immediate::SignExtended(sign_extend(window.byte(index)?))),
    (true, false) => Ok(Immediate::Word(window.word(index)?)),
  }
}

// lengths are fixed by the first two bytes, so check them before reading the rest
fn reg_mem_with_reg(window: &Window) -> Result<Fields, Truncated> {
  let b1 = window.byte(0)?;
  let (mode, reg, rm) = mod_reg_rm(window)?;
  let len = 2 + displacement_len(mode, rm);
  window.require(len)?;
  Ok(Fields {
    d: bit(b1, 1),
    w: bit(b1, 0),
    mode,
    reg,
    rm,
    disp: displacement(window, mode, rm)?,
    len,
    ..Fields::default()
  })
}

fn imm_to_reg_mem(window: &Window, sign_extends: bool) -> Result<Fields, Truncated> {
  let b1 = window.byte(0)?;
  let (mode, reg, rm) = mod_reg_rm(window)?;
  let w = bit(b1, 0);
  let s = sign_extends && bit(b1, 1);
  // data follows the displacement
  let data_index = 2 + displacement_len(mode, rm);
  let len = data_index + data_len(w, s);
  window.require(len)?;
  Ok(Fields {
    w,
    s,
    mode,
    reg,
    rm,
    disp: displacement(window, mode, rm)?,
    data: Some(immediate(window, data_index, w, s)?),
    len,
    ..Fields::default()
  })
}

fn imm_to_reg(window: &Window) -> Result<Fields, Truncated> {
  let b1 = window.byte(0)?;
  let w = bit(b1, 3);
  let len = 1 + data_len(w, false);
  window.require(len)?;
  Ok(Fields {
    w,
    mode: MODE_REGISTER,
    reg: b1 & 0b111,
    data: Some(immediate(window, 1, w, false)?),
    len,
    ..Fields::default()
  })
}

fn imm_to_acc(window: &Window) -> Result<Fields, Truncated> {
  let w = bit(window.byte(0)?, 0);
  let len = 1 + data_len(w, false);
  window.require(len)?;
  Ok(Fields {
    w,
    mode: MODE_REGISTER,
    data: Some(immediate(window, 1, w, false)?),
    len,
    ..Fields::default()
  })
}

fn short_jump(window: &Window) -> Result<Fields, Truncated> {
  window.require(2)?;
  let increment = window.byte(1)? as i8;
  Ok(Fields {
    data: Some(Immediate::Relative(increment)),
    len: 2,
    ..Fields::default()
  })
}
