//! Parsing of textual scalars.

use super::Mismatch;
use crate::decode::float_of_kind;
use crate::types::{FloatKind, IntKind};
use crate::value::Value;

pub(super) fn parse_bool(text: &str) -> Result<bool, Mismatch> {
    match text {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Mismatch::new(format!(
            "must be parseable as type bool (got {text:?})"
        ))),
    }
}

/// Parses an integer literal with an optional sign and a `0x`, `0o` or
/// `0b` radix prefix.
pub(super) fn parse_int(text: &str, kind: IntKind) -> Result<Value, Mismatch> {
    let unparseable = || {
        Mismatch::new(format!(
            "must be parseable as type {} (got {text:?})",
            kind.as_str()
        ))
    };

    let (negative, unsigned) = text
        .strip_prefix('-')
        .map_or_else(|| (false, text.strip_prefix('+').unwrap_or(text)), |rest| (true, rest));
    let (radix, digits) = split_radix(unsigned);
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(unparseable());
    }
    let magnitude = i128::from_str_radix(digits, radix).map_err(|_| {
        if digits.chars().all(|ch| ch.is_digit(radix)) {
            overflow(kind, text)
        } else {
            unparseable()
        }
    })?;
    let value = if negative { -magnitude } else { magnitude };

    if value < 0 && !kind.is_signed() {
        return Err(Mismatch::new(format!(
            "must be an unsigned integer for type {} (got {text:?})",
            kind.as_str()
        )));
    }
    Value::int_of_kind(kind, value).ok_or_else(|| overflow(kind, text))
}

/// Parses a decimal float, refusing values that overflow `kind`.
///
/// Explicit infinity literals are accepted; a finite literal that rounds
/// to infinity is an overflow.
pub(super) fn parse_float(text: &str, kind: FloatKind) -> Result<Value, Mismatch> {
    let value: f64 = text.parse().map_err(|_| {
        Mismatch::new(format!(
            "must be parseable as type {} (got {text:?})",
            kind.as_str()
        ))
    })?;
    if value.is_infinite() && !is_infinity_literal(text) {
        return Err(overflow_float(kind, text));
    }
    float_of_kind(kind, value).ok_or_else(|| overflow_float(kind, text))
}

fn split_radix(text: &str) -> (u32, &str) {
    [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| text.strip_prefix(prefix).map(|rest| (radix, rest)))
        .unwrap_or((10, text))
}

fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

fn overflow(kind: IntKind, text: &str) -> Mismatch {
    Mismatch::new(format!(
        "overflows destination type {} (got {text:?})",
        kind.as_str()
    ))
}

fn overflow_float(kind: FloatKind, text: &str) -> Mismatch {
    Mismatch::new(format!(
        "overflows destination type {} (got {text:?})",
        kind.as_str()
    ))
}
