//! ToUnicode CMap parsing.
//!
//! Reads the `bfchar` and `bfrange` sections of a `/ToUnicode` stream. Both
//! forms of `bfrange` are supported: a start value that is incremented across
//! the range, and an explicit array of destination strings. Destinations are
//! UTF-16BE and may hold several characters (ligatures).

use std::collections::HashMap;

use crate::error::BackendError;

/// Ranges wider than this are clipped. Real CMaps never come close; a larger
/// range only appears in damaged streams.
const MAX_RANGE_LEN: u32 = 0x1_0000;

/// Character code to Unicode string mapping read from a ToUnicode stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToUnicodeCMap {
    mappings: HashMap<u32, String>,
}

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Hex(&'a str),
    ArrayStart,
    ArrayEnd,
    Word(&'a str),
}

impl ToUnicodeCMap {
    /// Parse the decoded bytes of a ToUnicode stream.
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let text = String::from_utf8_lossy(data);
        let tokens = tokenize(&text);
        let mut mappings = HashMap::new();

        let mut i = 0;
        while i < tokens.len() {
            match tokens[i] {
                Token::Word("beginbfchar") => {
                    i = parse_bfchar(&tokens, i + 1, &mut mappings)?;
                }
                Token::Word("beginbfrange") => {
                    i = parse_bfrange(&tokens, i + 1, &mut mappings)?;
                }
                _ => i += 1,
            }
        }

        Ok(Self { mappings })
    }

    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' if bytes.get(i + 1) == Some(&b'<') => {
                tokens.push(Token::Word("<<"));
                i += 2;
            }
            b'<' => {
                let start = i + 1;
                let end = text[start..].find('>').map_or(bytes.len(), |e| start + e);
                tokens.push(Token::Hex(&text[start..end]));
                i = end + 1;
            }
            b'[' => {
                tokens.push(Token::ArrayStart);
                i += 1;
            }
            b']' => {
                tokens.push(Token::ArrayEnd);
                i += 1;
            }
            b'%' => {
                i = text[i..].find(['\n', '\r']).map_or(bytes.len(), |e| i + e);
            }
            b if b.is_ascii_whitespace() => i += 1,
            _ => {
                let start = i;
                while i < bytes.len()
                    && !bytes[i].is_ascii_whitespace()
                    && !matches!(bytes[i], b'<' | b'[' | b']' | b'%')
                {
                    i += 1;
                }
                tokens.push(Token::Word(&text[start..i]));
            }
        }
    }
    tokens
}

fn parse_hex_code(hex: &str) -> Result<u32, BackendError> {
    let digits: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.is_empty() {
        return Err(BackendError::Parse("empty hex code in CMap".to_string()));
    }
    u32::from_str_radix(&digits, 16)
        .map_err(|e| BackendError::Parse(format!("invalid hex code <{hex}> in CMap: {e}")))
}

/// Hex digits to UTF-16BE code units. Two-digit values are single bytes and
/// map straight to U+0000..U+00FF.
fn hex_to_units(hex: &str) -> Result<Vec<u16>, BackendError> {
    let digits: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() == 2 {
        let byte = u8::from_str_radix(&digits, 16)
            .map_err(|e| BackendError::Parse(format!("invalid hex <{hex}> in CMap: {e}")))?;
        return Ok(vec![u16::from(byte)]);
    }
    if digits.is_empty() || digits.len() % 4 != 0 {
        return Err(BackendError::Parse(format!(
            "UTF-16BE destination <{hex}> must have a multiple of 4 hex digits"
        )));
    }
    (0..digits.len())
        .step_by(4)
        .map(|at| {
            u16::from_str_radix(&digits[at..at + 4], 16)
                .map_err(|e| BackendError::Parse(format!("invalid hex <{hex}> in CMap: {e}")))
        })
        .collect()
}

fn units_to_string(units: &[u16]) -> Result<String, BackendError> {
    String::from_utf16(units)
        .map_err(|e| BackendError::Parse(format!("invalid UTF-16BE in CMap: {e}")))
}

/// Entries run as `<src> <dst>` pairs until `endbfchar`.
fn parse_bfchar(
    tokens: &[Token<'_>],
    mut i: usize,
    mappings: &mut HashMap<u32, String>,
) -> Result<usize, BackendError> {
    while i < tokens.len() {
        match (&tokens[i], tokens.get(i + 1)) {
            (Token::Word("endbfchar"), _) => return Ok(i + 1),
            (Token::Hex(src), Some(Token::Hex(dst))) => {
                let code = parse_hex_code(src)?;
                mappings.insert(code, units_to_string(&hex_to_units(dst)?)?);
                i += 2;
            }
            _ => i += 1,
        }
    }
    Ok(i)
}

/// Entries are `<lo> <hi> <dst>` or `<lo> <hi> [<dst0> <dst1> ...]` until
/// `endbfrange`.
fn parse_bfrange(
    tokens: &[Token<'_>],
    mut i: usize,
    mappings: &mut HashMap<u32, String>,
) -> Result<usize, BackendError> {
    while i < tokens.len() {
        if tokens[i] == Token::Word("endbfrange") {
            return Ok(i + 1);
        }
        let (Token::Hex(lo), Some(Token::Hex(hi))) = (&tokens[i], tokens.get(i + 1)) else {
            i += 1;
            continue;
        };
        let lo = parse_hex_code(lo)?;
        let hi = parse_hex_code(hi)?.min(lo.saturating_add(MAX_RANGE_LEN - 1));
        i += 2;

        match tokens.get(i) {
            Some(Token::Hex(dst)) => {
                let mut units = hex_to_units(dst)?;
                for code in lo..=hi {
                    if let Ok(text) = units_to_string(&units) {
                        mappings.insert(code, text);
                    }
                    // Only the last code unit advances across the range.
                    if let Some(last) = units.last_mut() {
                        *last = last.wrapping_add(1);
                    }
                }
                i += 1;
            }
            Some(Token::ArrayStart) => {
                i += 1;
                let mut code = lo;
                while let Some(Token::Hex(dst)) = tokens.get(i) {
                    if code <= hi {
                        mappings.insert(code, units_to_string(&hex_to_units(dst)?)?);
                    }
                    code = code.saturating_add(1);
                    i += 1;
                }
                if tokens.get(i) == Some(&Token::ArrayEnd) {
                    i += 1;
                }
            }
            _ => {}
        }
    }
    Ok(i)
}
