//! Token classification
//!
//! A token is tried, in order, as a number, as a bound variable/macro name
//! and as an operator spelling.

use crate::env::Environment;
use crate::ops::{self, OpSpec};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'a> {
    Number(Value),
    Reference(&'a str),
    Operator(&'static OpSpec),
    Unrecognized(&'a str),
}

pub fn classify<'a>(token: &'a str, env: &Environment) -> Token<'a> {
    if let Some(v) = parse_number(token) {
        return Token::Number(v);
    }
    if env.is_bound(token) {
        return Token::Reference(token);
    }
    match ops::lookup(token) {
        Some(spec) => Token::Operator(spec),
        None => Token::Unrecognized(token),
    }
}

/// Decimal or float first, then binary, octal and hexadecimal integers.
///
/// Whole decimals become integers (`2.0` -> `2`). Bare radix digits never
/// shadow an operator spelling, so `e` stays the constant.
pub fn parse_number(token: &str) -> Option<Value> {
    if let Some(n) = parse_decimal(token) {
        return Some(Value::normalized(n));
    }
    if ops::is_operator(token) {
        return None;
    }
    parse_radix(token, 2, 'b')
        .or_else(|| parse_radix(token, 8, 'o'))
        .or_else(|| parse_radix(token, 16, 'x'))
        .map(Value::Int)
}

fn parse_decimal(token: &str) -> Option<f64> {
    if token.contains('_') {
        return without_separators(token)?.parse().ok();
    }
    token.parse().ok()
}

/// Optional sign, optional `0b`/`0o`/`0x` prefix, digits with `_` separators
fn parse_radix(token: &str, radix: u32, prefix: char) -> Option<i64> {
    let (negative, body) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let digits = strip_radix_prefix(body, prefix).unwrap_or(body);
    let digits = if digits.contains('_') {
        without_separators(digits)?
    } else {
        digits.to_string()
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let magnitude = u64::from_str_radix(&digits, radix).ok()?;
    if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}

fn strip_radix_prefix(body: &str, prefix: char) -> Option<&str> {
    let mut chars = body.chars();
    match (chars.next(), chars.next()) {
        (Some('0'), Some(p)) if p.to_ascii_lowercase() == prefix => Some(chars.as_str()),
        _ => None,
    }
}

/// Single underscores are allowed between digits, nowhere else
fn without_separators(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'_' {
            let before = i.checked_sub(1).map(|j| bytes[j]);
            let after = bytes.get(i + 1).copied();
            let ok = |c: Option<u8>| c.map_or(false, |c| c.is_ascii_alphanumeric());
            if !ok(before) || !ok(after) {
                return None;
            }
        }
    }
    Some(s.replace('_', ""))
}

/// `name=` with a name of letters, digits, `_` or `-`
pub fn assignment_target(token: &str) -> Option<&str> {
    let name = token.strip_suffix('=')?;
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        Some(name)
    } else {
        None
    }
}
