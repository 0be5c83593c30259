//! STATIC_CONTENT serialization
//!
//! A [`ContentSet`] becomes one `  "<path>": "<value>"` line per asset, in
//! discovery order. Values are double-quoted scalars that YAML and JSON
//! read the same way, so the block can be pasted under any `data:` key.
//!
//! Escaping covers backslash, double quote, `\n`, `\r`, `\t`, every other
//! control character, and the characters YAML would treat as line breaks or
//! a byte-order mark. Everything else is emitted literally.

use crate::asset::{AssetKind, ContentSet};
use crate::{Error, Result};

const INDENT: &str = "  ";

/// Render the STATIC_CONTENT block for a content set.
pub fn serialize_static_content(content: &ContentSet) -> String {
    content
        .iter()
        .map(|asset| {
            let value = match asset.kind {
                AssetKind::Text => escape(&asset.content),
                // Base64 alphabet needs no escaping
                AssetKind::Binary => asset.content.clone(),
            };
            format!("{}\"{}\": \"{}\"", INDENT, escape(asset.path.as_str()), value)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape a string for use inside a double-quoted scalar.
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if needs_unicode_escape(c) => {
                escaped.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => escaped.push(c),
        }
    }
    escaped
}

/// Control characters, YAML line/paragraph separators, BOM and the
/// non-characters YAML refuses in a stream.
fn needs_unicode_escape(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}' | '\u{fffe}' | '\u{ffff}')
}

/// Inverse of [`escape`].
pub fn unescape(escaped: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 {
                    return Err(format!("truncated \\u escape '{}'", hex));
                }
                let code = u32::from_str_radix(&hex, 16)
                    .map_err(|_| format!("invalid \\u escape '{}'", hex))?;
                let decoded = char::from_u32(code)
                    .ok_or_else(|| format!("\\u{} is not a scalar value", hex))?;
                out.push(decoded);
            }
            Some(other) => return Err(format!("unknown escape '\\{}'", other)),
            None => return Err("dangling backslash".to_string()),
        }
    }
    Ok(out)
}

/// Parse a STATIC_CONTENT block back into `(path, value)` pairs.
///
/// Text values come back unescaped; binary values come back as the base64
/// text that was embedded.
pub fn parse_static_content(block: &str) -> Result<Vec<(String, String)>> {
    let mut entries = Vec::new();
    for (idx, line) in block.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            continue;
        }

        let (key, rest) = take_quoted(trimmed).map_err(|m| Error::parse(line_no, m))?;
        let rest = rest
            .strip_prefix(": ")
            .ok_or_else(|| Error::parse(line_no, "expected ': ' after key"))?;
        let (value, tail) = take_quoted(rest).map_err(|m| Error::parse(line_no, m))?;
        if !tail.trim().is_empty() {
            return Err(Error::parse(line_no, "trailing characters after value"));
        }

        let key = unescape(key).map_err(|m| Error::parse(line_no, m))?;
        let value = unescape(value).map_err(|m| Error::parse(line_no, m))?;
        entries.push((key, value));
    }
    Ok(entries)
}

/// Split `"..."rest` into the raw (still escaped) body and `rest`.
fn take_quoted(s: &str) -> std::result::Result<(&str, &str), String> {
    let body = s
        .strip_prefix('"')
        .ok_or_else(|| "expected opening quote".to_string())?;
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Ok((&body[..i], &body[i + 1..])),
            _ => {}
        }
    }
    Err("missing closing quote".to_string())
}
