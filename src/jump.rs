//! Jump operand parsing.
//!
//! A `J` instruction is followed by its comparison byte and then a pair of
//! signed offsets:
//!
//! ```text
//! base sign digit+ '*' [base] sign digit+ '*'
//! ```
//!
//! `base` is `b` (binary) or `h` (hex, digits in either case) and applies to
//! both numbers; repeating it before the second number is optional. For
//! example `Jkb+1011*b-1*` jumps forward 11 cells when the data cell holds
//! `k` and back one cell otherwise.
//!
//! The byte at the start offset only selects the base. The pair itself is
//! the first match found scanning forward from there, which need not begin
//! at the start offset.

use std::ops::Range;

use crate::error::{Fault, Result};

const BINARY: u8 = b'b';
const HEX: u8 = b'h';
const TERMINATOR: u8 = b'*';

/// A parsed jump operand pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JumpPair {
    /// CP offset taken when the data cell equals the comparison byte.
    pub on_equal: i64,
    /// CP offset taken otherwise.
    pub on_differ: i64,
    /// Where in the scanned bytes the match was found, terminators included.
    pub span: Range<usize>,
}

/// Parse the jump pair selected by `bytes[start]`.
///
/// Fails with `InvalidNumberFormat` if `bytes[start]` is not a base marker,
/// `MalformedJumpSyntax` if no pair matches anywhere from `start` on,
/// `JumpLiteralOverflow` if a literal doesn't fit an `i64`, and
/// `JumpOffsetTooLarge` if a magnitude exceeds `limit`.
pub fn parse_pair(bytes: &[u8], start: usize, limit: usize) -> Result<JumpPair> {
    let marker = bytes.get(start).copied().unwrap_or(0);
    let radix = match marker {
        BINARY => 2,
        HEX => 16,
        other => return Err(Fault::InvalidNumberFormat(other)),
    };

    let (first, second, span) = (start..bytes.len())
        .find_map(|at| match_pair_at(bytes, at, marker, radix))
        .ok_or(Fault::MalformedJumpSyntax)?;

    let on_equal = literal_value(first, radix)?;
    let on_differ = literal_value(second, radix)?;
    if on_equal.unsigned_abs() > limit as u64 || on_differ.unsigned_abs() > limit as u64 {
        return Err(Fault::JumpOffsetTooLarge { limit });
    }

    Ok(JumpPair {
        on_equal,
        on_differ,
        span,
    })
}

/// Try to match the full grammar at `at`. Returns both signed literals.
fn match_pair_at(
    bytes: &[u8],
    at: usize,
    marker: u8,
    radix: u32,
) -> Option<(&[u8], &[u8], Range<usize>)> {
    if bytes[at] != marker {
        return None;
    }
    let (first, pos) = signed_literal(bytes, at + 1, radix)?;
    let mut pos = expect(bytes, pos, TERMINATOR)?;
    if bytes.get(pos) == Some(&marker) {
        pos += 1;
    }
    let (second, pos) = signed_literal(bytes, pos, radix)?;
    let end = expect(bytes, pos, TERMINATOR)?;
    Some((first, second, at..end))
}

/// A sign followed by at least one digit. Returns the literal, sign
/// included, and the position just past it.
fn signed_literal(bytes: &[u8], pos: usize, radix: u32) -> Option<(&[u8], usize)> {
    match bytes.get(pos) {
        Some(b'+') | Some(b'-') => {}
        _ => return None,
    }
    let digits = bytes[pos + 1..]
        .iter()
        .take_while(|&&b| digit_value(b, radix).is_some())
        .count();
    if digits == 0 {
        return None;
    }
    let end = pos + 1 + digits;
    Some((&bytes[pos..end], end))
}

fn expect(bytes: &[u8], pos: usize, want: u8) -> Option<usize> {
    (bytes.get(pos) == Some(&want)).then_some(pos + 1)
}

#[inline(always)]
fn digit_value(byte: u8, radix: u32) -> Option<u32> {
    (byte as char).to_digit(radix)
}

/// Value of a matched literal. Leading zeros are allowed in any number.
fn literal_value(literal: &[u8], radix: u32) -> Result<i64> {
    let negative = literal[0] == b'-';
    let mut magnitude: u64 = 0;
    for &b in &literal[1..] {
        let d = digit_value(b, radix).ok_or(Fault::MalformedJumpSyntax)?;
        magnitude = magnitude
            .checked_mul(radix as u64)
            .and_then(|m| m.checked_add(d as u64))
            .ok_or(Fault::JumpLiteralOverflow)?;
    }
    if negative {
        0i64.checked_sub_unsigned(magnitude).ok_or(Fault::JumpLiteralOverflow)
    } else {
        i64::try_from(magnitude).map_err(|_| Fault::JumpLiteralOverflow)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn parser_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..128), start in 0usize..140) {
            let _ = parse_pair(&bytes, start, 30_000);
        }

        #[test]
        fn formatted_pairs_parse_back(x in -30_000i64..=30_000, y in -30_000i64..=30_000, hex in any::<bool>()) {
            let fmt = |v: i64| {
                let sign = if v < 0 { '-' } else { '+' };
                if hex { format!("{sign}{:x}", v.unsigned_abs()) } else { format!("{sign}{:b}", v.unsigned_abs()) }
            };
            let src = format!("{}{}*{}*", if hex { 'h' } else { 'b' }, fmt(x), fmt(y));
            let pair = parse_pair(src.as_bytes(), 0, 30_000).unwrap();
            prop_assert_eq!((pair.on_equal, pair.on_differ), (x, y));
            prop_assert_eq!(pair.span, 0..src.len());
        }
    }
}
