//! Persisted key=value text format shared by the index and the all-index.
//!
//! The escaping rules are part of the on-disk contract with already-deployed
//! mirrors: `\`, `=` and `:` are backslash-escaped, tab/newline/CR use their
//! mnemonic escapes, every space in a key and a leading space in a value are
//! escaped, and anything outside printable ASCII is written as `\uXXXX`
//! (UTF-16 units, surrogate pairs for astral code points).

use crate::engine::index::errors::IndexError;
use std::str::Chars;

/// Renders one `key=value` line.
pub fn format_line(key: &str, value: &str) -> String {
    format!("{}={}", escape(key, true), escape(value, false))
}

/// Parses one line. Returns `None` for blank lines and `#`/`!` comments.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<(String, String)>, IndexError> {
    let line = line.trim_start();
    if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
        return Ok(None);
    }

    let mut key = String::new();
    let mut value = String::new();
    let mut in_value = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let decoded = unescape_one(&mut chars, line_no)?;
                if in_value {
                    value.push(decoded);
                } else {
                    key.push(decoded);
                }
            }
            '=' if !in_value => in_value = true,
            _ if in_value => value.push(c),
            _ => key.push(c),
        }
    }

    if !in_value {
        return Err(IndexError::Corrupt {
            line: line_no,
            reason: "missing '=' separator".to_string(),
        });
    }
    Ok(Some((key, value)))
}

fn escape(text: &str, escape_all_spaces: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '=' => out.push_str("\\="),
            ':' => out.push_str("\\:"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ' ' if escape_all_spaces || i == 0 => out.push_str("\\ "),
            c if (' '..='\u{7e}').contains(&c) => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{:04x}", unit));
                }
            }
        }
    }
    out
}

fn unescape_one(chars: &mut Chars<'_>, line_no: usize) -> Result<char, IndexError> {
    match chars.next() {
        None => Err(IndexError::Corrupt {
            line: line_no,
            reason: "trailing backslash".to_string(),
        }),
        Some('t') => Ok('\t'),
        Some('n') => Ok('\n'),
        Some('r') => Ok('\r'),
        Some('f') => Ok('\x0c'),
        Some('u') => {
            let unit = read_utf16_unit(chars, line_no)?;
            if (0xd800..=0xdbff).contains(&unit) {
                // High surrogate: a paired \uXXXX low surrogate must follow.
                if chars.next() != Some('\\') || chars.next() != Some('u') {
                    return Err(IndexError::Corrupt {
                        line: line_no,
                        reason: "unpaired surrogate in \\u escape".to_string(),
                    });
                }
                let low = read_utf16_unit(chars, line_no)?;
                if !(0xdc00..=0xdfff).contains(&low) {
                    return Err(IndexError::Corrupt {
                        line: line_no,
                        reason: "invalid low surrogate in \\u escape".to_string(),
                    });
                }
                let code = 0x10000 + ((unit - 0xd800) << 10) + (low - 0xdc00);
                return char::from_u32(code).ok_or_else(|| IndexError::Corrupt {
                    line: line_no,
                    reason: "invalid code point in \\u escape".to_string(),
                });
            }
            char::from_u32(unit).ok_or_else(|| IndexError::Corrupt {
                line: line_no,
                reason: "unpaired surrogate in \\u escape".to_string(),
            })
        }
        // Lenient on unknown single-character escapes, matching the legacy
        // reader: the escaped character is kept as-is (covers \=, \:, \ ).
        Some(other) => Ok(other),
    }
}

fn read_utf16_unit(chars: &mut Chars<'_>, line_no: usize) -> Result<u32, IndexError> {
    let mut unit = 0u32;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| IndexError::Corrupt {
                line: line_no,
                reason: "malformed \\u escape".to_string(),
            })?;
        unit = unit * 16 + digit;
    }
    Ok(unit)
}
