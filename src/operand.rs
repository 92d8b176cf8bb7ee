use std::{fmt, iter};

use crate::catalog::Form;
use crate::fields::{Fields, Immediate, MODE_MEMORY, MODE_REGISTER};
use crate::tables::{self, DIRECT_ADDRESS_RM};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
  Direct(u16),
  Base(&'static str),
  Displaced(&'static str, u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
  Byte,
  Word,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
  Register(&'static str),
  Memory(Address),
  Immediate { value: Immediate, size: Option<Size> },
}

impl fmt::Display for Address {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Address::Direct(disp) => write!(f, "[{disp}]"),
      Address::Base(base) => write!(f, "[{base}]"),
      Address::Displaced(base, disp) => write!(f, "[{base} + {disp}]"),
    }
  }
}

impl fmt::Display for Size {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Size::Byte => write!(f, "byte"),
      Size::Word => write!(f, "word"),
    }
  }
}

impl fmt::Display for Operand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Operand::Register(name) => write!(f, "{name}"),
      Operand::Memory(address) => write!(f, "{address}"),
      Operand::Immediate { value, size: Some(size) } => write!(f, "{size} {value}"),
      Operand::Immediate { value, size: None } => write!(f, "{value}"),
    }
  }
}

/// Renders the comma-separated operand list, destination first.
pub fn render(form: Form, fields: &Fields) -> String {
  let data = fields.data.map(|value| Operand::Immediate { value, size: None });
  let operands: Vec<Operand> = match form {
    Form::RegMemWithReg => {
      let (reg, rm) = (reg_operand(fields), rm_operand(fields));
      if fields.d {
        vec![reg, rm]
      } else {
        vec![rm, reg]
      }
    }
    Form::ImmToRegMem | Form::SignedImmToRegMem => {
      let size = size_prefix(fields);
      let data = fields.data.map(|value| Operand::Immediate { value, size });
      iter::once(rm_operand(fields)).chain(data).collect()
    }
    Form::ImmToReg => iter::once(reg_operand(fields)).chain(data).collect(),
    Form::ImmToAcc => iter::once(Operand::Register(tables::accumulator(fields.w)))
      .chain(data)
      .collect(),
    Form::ShortJump => data.into_iter().collect(),
  };
  operands
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join(", ")
}

pub fn reg_operand(fields: &Fields) -> Operand {
  Operand::Register(tables::register(fields.reg, fields.w))
}

pub fn rm_operand(fields: &Fields) -> Operand {
  if fields.mode == MODE_REGISTER {
    return Operand::Register(tables::register(fields.rm, fields.w));
  }
  let address = match (fields.mode, fields.rm, fields.disp) {
    (MODE_MEMORY, DIRECT_ADDRESS_RM, Some(disp)) => Address::Direct(disp),
    (_, rm, Some(disp)) => Address::Displaced(tables::effective_address(rm), disp),
    (_, rm, None) => Address::Base(tables::effective_address(rm)),
  };
  Operand::Memory(address)
}

// register destinations already imply the operand size
fn size_prefix(fields: &Fields) -> Option<Size> {
  if fields.mode == MODE_REGISTER {
    None
  } else if fields.w {
    Some(Size::Word)
  } else {
    Some(Size::Byte)
  }
}
