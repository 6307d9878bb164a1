//! Font resources: code splitting, glyph widths, descent and text.
//!
//! A [`LoadedFont`] is built once per font resource name and cached by the
//! interpreter. Loading never fails: unreadable pieces of a font dictionary
//! fall back to defaults and log a warning.

use std::collections::HashMap;

use tracing::warn;

use crate::cmap::ToUnicodeCMap;
use crate::encoding::{BaseEncoding, FontEncoding};
use crate::lopdf_backend::{decode_stream, name_of, object_to_f64, resolve_ref};
use crate::standard_fonts::{self, StandardFont};

/// Width used when nothing else describes a glyph.
pub const FALLBACK_WIDTH: f64 = 600.0;

/// `/DW` default for CID fonts.
const DEFAULT_CID_WIDTH: f64 = 1000.0;

#[derive(Debug, Clone)]
enum Widths {
    /// Single-byte codes: `/Widths` starting at `/FirstChar`, then the
    /// standard font table, then `/MissingWidth`.
    Simple {
        first_char: u32,
        widths: Vec<f64>,
        standard: Option<&'static StandardFont>,
        missing_width: Option<f64>,
    },
    /// Two-byte codes with `/W` entries and `/DW` default.
    Composite {
        widths: HashMap<u32, f64>,
        default_width: f64,
    },
}

/// A font resource ready for text showing.
#[derive(Debug, Clone)]
pub struct LoadedFont {
    base_name: String,
    widths: Widths,
    encoding: Option<FontEncoding>,
    to_unicode: Option<ToUnicodeCMap>,
    descent: f64,
}

impl LoadedFont {
    /// Load the font dictionary registered under `resource_name`.
    pub fn load(doc: &lopdf::Document, resource_name: &str, dict: &lopdf::Dictionary) -> Self {
        let base_name = dict
            .get(b"BaseFont")
            .ok()
            .and_then(|o| name_of(resolve_ref(doc, o)))
            .map(|n| strip_subset_prefix(&n).to_string())
            .unwrap_or_else(|| resource_name.to_string());
        let subtype = dict.get(b"Subtype").ok().and_then(|o| name_of(resolve_ref(doc, o)));
        let standard = standard_fonts::lookup(&base_name);
        let to_unicode = load_to_unicode(doc, dict, &base_name);

        if subtype.as_deref() == Some("Type0") {
            let descendant = descendant_font(doc, dict);
            if descendant.is_none() {
                warn!(font = %base_name, "Type0 font without a descendant font, using default widths");
            }
            let (widths, default_width) = descendant
                .map(|d| cid_widths(doc, d))
                .unwrap_or_else(|| (HashMap::new(), DEFAULT_CID_WIDTH));
            let descent = descendant
                .and_then(|d| descriptor_descent(doc, d))
                .or(standard.map(|s| s.descender))
                .unwrap_or(0.0);
            return Self {
                base_name,
                widths: Widths::Composite {
                    widths,
                    default_width,
                },
                encoding: None,
                to_unicode,
                descent,
            };
        }

        let default_base = match subtype.as_deref() {
            Some("TrueType") => BaseEncoding::WinAnsi,
            _ => BaseEncoding::Standard,
        };
        let first_char = dict
            .get(b"FirstChar")
            .ok()
            .and_then(|o| object_to_f64(resolve_ref(doc, o)).ok())
            .map_or(0, |v| v.max(0.0) as u32);
        let widths = dict
            .get(b"Widths")
            .ok()
            .and_then(|o| resolve_ref(doc, o).as_array().ok())
            .map(|arr| {
                arr.iter()
                    .map(|o| object_to_f64(resolve_ref(doc, o)).unwrap_or(0.0))
                    .collect()
            })
            .unwrap_or_default();
        let missing_width = font_descriptor(doc, dict)
            .and_then(|d| d.get(b"MissingWidth").ok())
            .and_then(|o| object_to_f64(resolve_ref(doc, o)).ok());
        let descent = descriptor_descent(doc, dict)
            .or(standard.map(|s| s.descender))
            .unwrap_or(0.0);

        Self {
            encoding: Some(load_encoding(doc, dict, default_base)),
            base_name,
            widths: Widths::Simple {
                first_char,
                widths,
                standard,
                missing_width,
            },
            to_unicode,
            descent,
        }
    }

    /// Stand-in for a font name missing from the resources: single-byte
    /// codes, Standard encoding and the fallback width.
    pub fn missing(resource_name: &str) -> Self {
        Self {
            base_name: resource_name.to_string(),
            widths: Widths::Simple {
                first_char: 0,
                widths: Vec::new(),
                standard: None,
                missing_width: None,
            },
            encoding: Some(FontEncoding::new(BaseEncoding::Standard)),
            to_unicode: None,
            descent: 0.0,
        }
    }

    /// Base font name without subset prefix.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.widths, Widths::Composite { .. })
    }

    /// Split a string operand into character codes, with the byte length of
    /// each code. A trailing odd byte of a two-byte font is dropped.
    pub fn codes(&self, bytes: &[u8]) -> Vec<(u32, usize)> {
        if self.is_composite() {
            bytes
                .chunks_exact(2)
                .map(|pair| ((u32::from(pair[0]) << 8) | u32::from(pair[1]), 2))
                .collect()
        } else {
            bytes.iter().map(|b| (u32::from(*b), 1)).collect()
        }
    }

    /// Glyph width in thousandths of text space.
    pub fn width(&self, code: u32) -> f64 {
        match &self.widths {
            Widths::Simple {
                first_char,
                widths,
                standard,
                missing_width,
            } => code
                .checked_sub(*first_char)
                .and_then(|i| widths.get(i as usize).copied())
                .or_else(|| standard.and_then(|s| s.width(code)))
                .or(*missing_width)
                .unwrap_or(FALLBACK_WIDTH),
            Widths::Composite {
                widths,
                default_width,
            } => widths.get(&code).copied().unwrap_or(*default_width),
        }
    }

    /// Descent in thousandths of text space, never positive.
    pub fn descent(&self) -> f64 {
        self.descent
    }

    /// Text for `code`: ToUnicode first, then the simple font encoding.
    /// Composite fonts without ToUnicode read the code as a Unicode scalar.
    pub fn decode(&self, code: u32) -> Option<String> {
        if let Some(cmap) = &self.to_unicode {
            if let Some(text) = cmap.lookup(code) {
                return Some(text.to_string());
            }
            if self.is_composite() {
                return None;
            }
        }
        match &self.encoding {
            Some(encoding) => u8::try_from(code).ok().and_then(|b| encoding.decode(b)),
            None => char::from_u32(code).map(String::from),
        }
    }
}

/// Remove a `ABCDEF+` subset tag.
pub fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => {
            rest
        }
        _ => name,
    }
}

fn font_descriptor<'a>(
    doc: &'a lopdf::Document,
    dict: &'a lopdf::Dictionary,
) -> Option<&'a lopdf::Dictionary> {
    dict.get(b"FontDescriptor")
        .ok()
        .and_then(|o| resolve_ref(doc, o).as_dict().ok())
}

fn descriptor_descent(doc: &lopdf::Document, dict: &lopdf::Dictionary) -> Option<f64> {
    font_descriptor(doc, dict)?
        .get(b"Descent")
        .ok()
        .and_then(|o| object_to_f64(resolve_ref(doc, o)).ok())
        .map(|d| -d.abs())
}

fn descendant_font<'a>(
    doc: &'a lopdf::Document,
    dict: &'a lopdf::Dictionary,
) -> Option<&'a lopdf::Dictionary> {
    let arr = resolve_ref(doc, dict.get(b"DescendantFonts").ok()?)
        .as_array()
        .ok()?;
    resolve_ref(doc, arr.first()?).as_dict().ok()
}

/// Read `/W` and `/DW` of a CIDFont. `/W` mixes `c [w1 w2 ...]` and
/// `cfirst clast w` entries.
fn cid_widths(doc: &lopdf::Document, cid_font: &lopdf::Dictionary) -> (HashMap<u32, f64>, f64) {
    let default_width = cid_font
        .get(b"DW")
        .ok()
        .and_then(|o| object_to_f64(resolve_ref(doc, o)).ok())
        .unwrap_or(DEFAULT_CID_WIDTH);
    let mut widths = HashMap::new();
    let Some(entries) = cid_font
        .get(b"W")
        .ok()
        .and_then(|o| resolve_ref(doc, o).as_array().ok())
    else {
        return (widths, default_width);
    };

    let number = |o: &lopdf::Object| object_to_f64(resolve_ref(doc, o)).ok();
    let mut i = 0;
    while i < entries.len() {
        let Some(first) = number(&entries[i]) else {
            i += 1;
            continue;
        };
        let first = first.max(0.0) as u32;
        match entries.get(i + 1).map(|o| resolve_ref(doc, o)) {
            Some(lopdf::Object::Array(list)) => {
                for (offset, w) in list.iter().enumerate() {
                    if let Some(w) = number(w) {
                        widths.insert(first + offset as u32, w);
                    }
                }
                i += 2;
            }
            Some(last) => {
                let (Some(last), Some(w)) = (number(last), entries.get(i + 2).and_then(number))
                else {
                    warn!("malformed /W entry in CID font, ignoring the rest");
                    break;
                };
                let last = (last.max(0.0) as u32).min(first.saturating_add(0xFFFF));
                for code in first..=last {
                    widths.insert(code, w);
                }
                i += 3;
            }
            None => break,
        }
    }
    (widths, default_width)
}

fn load_to_unicode(
    doc: &lopdf::Document,
    dict: &lopdf::Dictionary,
    base_name: &str,
) -> Option<ToUnicodeCMap> {
    let stream = resolve_ref(doc, dict.get(b"ToUnicode").ok()?)
        .as_stream()
        .ok()?;
    let parsed = decode_stream(stream).and_then(|bytes| ToUnicodeCMap::parse(&bytes));
    match parsed {
        Ok(cmap) => Some(cmap),
        Err(e) => {
            warn!(font = %base_name, error = %e, "ignoring unreadable ToUnicode CMap");
            None
        }
    }
}

fn load_encoding(
    doc: &lopdf::Document,
    dict: &lopdf::Dictionary,
    default_base: BaseEncoding,
) -> FontEncoding {
    let Some(obj) = dict.get(b"Encoding").ok().map(|o| resolve_ref(doc, o)) else {
        return FontEncoding::new(default_base);
    };
    if let Some(name) = name_of(obj) {
        return FontEncoding::new(BaseEncoding::from_name(&name).unwrap_or(default_base));
    }
    let Ok(enc_dict) = obj.as_dict() else {
        return FontEncoding::new(default_base);
    };

    let base = enc_dict
        .get(b"BaseEncoding")
        .ok()
        .and_then(|o| name_of(resolve_ref(doc, o)))
        .and_then(|n| BaseEncoding::from_name(&n))
        .unwrap_or(default_base);
    let mut encoding = FontEncoding::new(base);
    if let Some(diffs) = enc_dict
        .get(b"Differences")
        .ok()
        .and_then(|o| resolve_ref(doc, o).as_array().ok())
    {
        apply_differences(&mut encoding, diffs);
    }
    encoding
}

/// `[code /name1 /name2 ... code /name ...]`: each name takes the next code.
fn apply_differences(encoding: &mut FontEncoding, diffs: &[lopdf::Object]) {
    let mut code: Option<u32> = None;
    for obj in diffs {
        match obj {
            lopdf::Object::Integer(i) => code = u32::try_from(*i).ok(),
            lopdf::Object::Name(name) => {
                if let Some(c) = code {
                    if let Ok(byte) = u8::try_from(c) {
                        encoding.set_difference(byte, String::from_utf8_lossy(name));
                    }
                    code = Some(c + 1);
                }
            }
            _ => {}
        }
    }
}
