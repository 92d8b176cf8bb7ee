const BYTE_REGISTERS: [&str; 8] = ["al", "cl", "dl", "bl", "ah", "ch", "dh", "bh"];
const WORD_REGISTERS: [&str; 8] = ["ax", "cx", "dx", "bx", "sp", "bp", "si", "di"];

// indexed by rm when mod != 11; rm = 110 under mod = 00 is a direct address instead
const EFFECTIVE_ADDRESSES: [&str; 8] = [
  "bx + si", "bx + di", "bp + si", "bp + di", "si", "di", "bp", "bx",
];

pub const DIRECT_ADDRESS_RM: u8 = 0b_110;

pub fn register(code: u8, wide: bool) -> &'static str {
  let table = if wide { &WORD_REGISTERS } else { &BYTE_REGISTERS };
  table[usize::from(code & 0b111)]
}

pub fn accumulator(wide: bool) -> &'static str {
  register(0b_000, wide)
}

pub fn effective_address(rm: u8) -> &'static str {
  EFFECTIVE_ADDRESSES[usize::from(rm & 0b111)]
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_register_table_is_complete() {
    let names: Vec<_> = [false, true]
      .into_iter()
      .flat_map(|wide| (0..8).map(move |code| register(code, wide)))
      .collect();
    assert_eq!(names.len(), 16);
    let mut unique = names.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), 16);
  }

  #[test]
  fn test_register_lookup() {
    assert_eq!(register(0b_100, false), "ah");
    assert_eq!(register(0b_100, true), "sp");
    assert_eq!(register(0b_111, true), "di");
    assert_eq!(accumulator(false), "al");
    assert_eq!(accumulator(true), "ax");
  }

  #[test]
  fn test_effective_address_lookup() {
    assert_eq!(effective_address(0b_000), "bx + si");
    assert_eq!(effective_address(0b_011), "bp + di");
    assert_eq!(effective_address(DIRECT_ADDRESS_RM), "bp");
    assert_eq!(effective_address(0b_111), "bx");
  }
}
