//! Fuzz target for capability override parsing.
//!
//! Tests that:
//! - No panics on arbitrary input
//! - Accepted values name a level the ladder knows how to print
//! - Parsing ignores case and surrounding whitespace
//! - Rejected values never turn into a forced configuration

#![no_main]

use arbitrary::Arbitrary;
use dispatch::{DispatchConfig, parse_override};
use libfuzzer_sys::fuzz_target;
use platform::Ladder;

#[derive(Arbitrary, Debug)]
struct Input {
  value: String,
  ladder: u8,
}

const LADDERS: [Ladder; 5] = [Ladder::X86_64, Ladder::AARCH64, Ladder::POWERPC64, Ladder::S390X, Ladder::RISCV64];

fuzz_target!(|input: Input| {
  let ladder = LADDERS[usize::from(input.ladder) % LADDERS.len()];
  let parsed = parse_override(&input.value, &ladder);

  match &parsed {
    Ok(Some(level)) => assert!(!ladder.label(*level).is_empty()),
    Ok(None) => assert!(input.value.trim().is_empty(), "non-empty value parsed as no override"),
    Err(err) => assert_eq!(err.value, input.value.trim()),
  }

  let padded = format!("  {}\t", input.value.to_ascii_uppercase());
  assert_eq!(parse_override(&padded, &ladder).ok(), parsed.clone().ok(), "case or whitespace changed the result");

  if parsed.is_err() && ladder == Ladder::current() {
    assert_eq!(DispatchConfig::from_override_value(Some(&input.value)), DispatchConfig::AUTO);
  }
});
