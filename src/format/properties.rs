//! The legacy key-value properties format.
//!
//! Resources in this format are plain text: one `key=value` pair per
//! logical line, `#`/`!` comments, backslash line continuations, and
//! `\uXXXX` escapes. Encoding is auto-detected from a leading byte order
//! mark (UTF-8, UTF-16BE/LE, or UTF-32BE/LE); without a mark the bytes
//! must be strictly valid UTF-8. The acquirer additionally retries a
//! strict UTF-8 failure with [`load_latin1`] when the lookup is served by
//! the pre-seeded built-in loader, preserving compatibility with
//! single-byte-encoded sources.

use crate::error::DecodeError;
use crate::store::ResourceMap;

use super::{FormatLoader, PROPERTIES_FORMAT};

/// Built-in loader for the legacy properties format.
///
/// Pre-seeded into every [`super::FormatRegistry`] under the
/// [`PROPERTIES_FORMAT`] identifier; callers may displace it by registering
/// their own loader for that identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertiesLoader;

impl PropertiesLoader {
    /// The filename extension this loader serves.
    pub const EXTENSION: &'static str = PROPERTIES_FORMAT;
}

impl FormatLoader for PropertiesLoader {
    fn extensions(&self) -> Vec<String> {
        vec![Self::EXTENSION.to_string()]
    }

    fn load(&self, bytes: &[u8]) -> Result<ResourceMap, DecodeError> {
        parse(&decode_unicode(bytes)?)
    }
}

/// Decodes resource bytes using the encoding named by a leading byte order
/// mark, defaulting to strict UTF-8 when no mark is present.
///
/// # Errors
///
/// An invalid byte sequence for the selected encoding is a hard
/// [`DecodeError::InvalidBytes`]; it is never silently re-interpreted here.
pub fn decode_unicode(bytes: &[u8]) -> Result<String, DecodeError> {
    // UTF-32LE shares its first two bytes with UTF-16LE; check it first
    if let Some(rest) = bytes.strip_prefix(&[0x00, 0x00, 0xFE, 0xFF]) {
        decode_utf32(rest, true)
    } else if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE, 0x00, 0x00]) {
        decode_utf32(rest, false)
    } else if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        decode_utf8(rest)
    } else if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        decode_utf16(rest, encoding_rs::UTF_16BE, "UTF-16BE")
    } else if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        decode_utf16(rest, encoding_rs::UTF_16LE, "UTF-16LE")
    } else {
        decode_utf8(bytes)
    }
}

/// Decodes resource bytes as ISO-8859-1, where every byte is its own code
/// point. This decoding cannot fail; it exists for the built-in loader's
/// legacy retry.
#[must_use]
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| char::from(byte)).collect()
}

/// Parses resource bytes as ISO-8859-1 properties text.
///
/// # Errors
///
/// Returns a decode error for malformed `\uXXXX` escapes.
pub fn load_latin1(bytes: &[u8]) -> Result<ResourceMap, DecodeError> {
    parse(&decode_latin1(bytes))
}

fn decode_utf8(bytes: &[u8]) -> Result<String, DecodeError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| DecodeError::InvalidBytes { encoding: "UTF-8" })
}

fn decode_utf16(
    bytes: &[u8],
    encoding: &'static encoding_rs::Encoding,
    name: &'static str,
) -> Result<String, DecodeError> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(std::borrow::Cow::into_owned)
        .ok_or(DecodeError::InvalidBytes { encoding: name })
}

fn decode_utf32(bytes: &[u8], big_endian: bool) -> Result<String, DecodeError> {
    let encoding = if big_endian { "UTF-32BE" } else { "UTF-32LE" };
    if bytes.len() % 4 != 0 {
        return Err(DecodeError::InvalidBytes { encoding });
    }
    bytes
        .chunks_exact(4)
        .map(|unit| {
            let unit = [unit[0], unit[1], unit[2], unit[3]];
            let scalar = if big_endian {
                u32::from_be_bytes(unit)
            } else {
                u32::from_le_bytes(unit)
            };
            char::from_u32(scalar).ok_or(DecodeError::InvalidBytes { encoding })
        })
        .collect()
}

/// Parses decoded properties text into a flat store.
///
/// # Errors
///
/// Returns a decode error for malformed `\uXXXX` escapes; anything else is
/// accepted, matching the permissiveness of the traditional format.
pub fn parse(text: &str) -> Result<ResourceMap, DecodeError> {
    let naturals = natural_lines(text);
    let mut map = ResourceMap::new();
    let mut index = 0;
    while index < naturals.len() {
        let line_number = index + 1;
        let first = strip_leading_whitespace(naturals[index]);
        index += 1;
        if first.is_empty() || first.starts_with('#') || first.starts_with('!') {
            continue;
        }
        let mut logical = first.to_string();
        while ends_with_continuation(&logical) && index < naturals.len() {
            logical.pop();
            // continuation lines are never comments and never blank-skipped
            logical.push_str(strip_leading_whitespace(naturals[index]));
            index += 1;
        }
        let (raw_key, raw_value) = split_key_value(&logical);
        let key = unescape(raw_key, line_number)?;
        let value = unescape(raw_value, line_number)?;
        map.insert(key, value);
    }
    Ok(map)
}

/// Splits on `\n`, `\r\n`, or lone `\r`.
fn natural_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut cursor = 0;
    while cursor < bytes.len() {
        match bytes[cursor] {
            b'\n' => {
                lines.push(&text[start..cursor]);
                cursor += 1;
                start = cursor;
            }
            b'\r' => {
                lines.push(&text[start..cursor]);
                cursor += if bytes.get(cursor + 1) == Some(&b'\n') { 2 } else { 1 };
                start = cursor;
            }
            _ => cursor += 1,
        }
    }
    lines.push(&text[start..]);
    lines
}

fn strip_leading_whitespace(line: &str) -> &str {
    line.trim_start_matches([' ', '\t', '\x0C'])
}

/// A logical line continues when it ends with an odd number of backslashes.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&ch| ch == '\\').count() % 2 == 1
}

/// Splits a logical line into raw key and raw value.
///
/// The key ends at the first unescaped `=`, `:`, or whitespace; whitespace
/// around the separator is skipped; the value keeps its trailing
/// whitespace.
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut terminator = None;
    for (offset, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '=' | ':' => {
                terminator = Some((offset, true));
                break;
            }
            ' ' | '\t' | '\x0C' => {
                terminator = Some((offset, false));
                break;
            }
            _ => {}
        }
    }
    let Some((offset, explicit)) = terminator else {
        return (line, "");
    };
    let key = &line[..offset];
    let mut rest = strip_leading_whitespace(&line[offset + usize::from(explicit)..]);
    if !explicit {
        if let Some(stripped) = rest.strip_prefix(['=', ':']) {
            rest = strip_leading_whitespace(stripped);
        }
    }
    (key, rest)
}

fn unescape(raw: &str, line: usize) -> Result<String, DecodeError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            // dangling continuation backslash at end of input
            None => break,
            Some('u') => out.push(unescape_unicode(&mut chars, line)?),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('f') => out.push('\x0C'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
        }
    }
    Ok(out)
}

fn unescape_unicode(chars: &mut std::str::Chars<'_>, line: usize) -> Result<char, DecodeError> {
    let high = read_hex4(chars, line)?;
    if (0xDC00..=0xDFFF).contains(&high) {
        // unpaired low surrogate
        return Err(DecodeError::MalformedEscape { line });
    }
    if (0xD800..=0xDBFF).contains(&high) {
        // a high surrogate must pair with an immediately following \uDCxx
        if chars.next() != Some('\\') || chars.next() != Some('u') {
            return Err(DecodeError::MalformedEscape { line });
        }
        let low = read_hex4(chars, line)?;
        if !(0xDC00..=0xDFFF).contains(&low) {
            return Err(DecodeError::MalformedEscape { line });
        }
        let scalar = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        return char::from_u32(scalar).ok_or(DecodeError::MalformedEscape { line });
    }
    char::from_u32(high).ok_or(DecodeError::MalformedEscape { line })
}

fn read_hex4(chars: &mut std::str::Chars<'_>, line: usize) -> Result<u32, DecodeError> {
    let mut scalar = 0u32;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|ch| ch.to_digit(16))
            .ok_or(DecodeError::MalformedEscape { line })?;
        scalar = scalar * 16 + digit;
    }
    Ok(scalar)
}
