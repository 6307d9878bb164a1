//! Simple font encodings and glyph names.
//!
//! A simple font maps each byte to a glyph name through a base encoding
//! (Standard, WinAnsi or MacRoman) overlaid with the font's `/Differences`.
//! Glyph names then resolve to Unicode through a built-in name table, the
//! `uniXXXX` and `uXXXX` conventions, and composition of accented Latin
//! names such as `eacute`.

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

/// Base encoding named by `/Encoding` or `/BaseEncoding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseEncoding {
    Standard,
    WinAnsi,
    MacRoman,
}

impl BaseEncoding {
    /// Map a PDF encoding name. Unknown names give `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "StandardEncoding" => Some(Self::Standard),
            "WinAnsiEncoding" => Some(Self::WinAnsi),
            "MacRomanEncoding" => Some(Self::MacRoman),
            _ => None,
        }
    }

    pub fn decode(self, code: u8) -> Option<char> {
        match self {
            Self::Standard => standard_char(code),
            Self::WinAnsi => win_ansi_char(code),
            Self::MacRoman => mac_roman_char(code),
        }
    }
}

/// Base encoding plus `/Differences` overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct FontEncoding {
    base: BaseEncoding,
    differences: HashMap<u8, String>,
}

impl FontEncoding {
    pub fn new(base: BaseEncoding) -> Self {
        Self {
            base,
            differences: HashMap::new(),
        }
    }

    pub fn base(&self) -> BaseEncoding {
        self.base
    }

    /// Assign a glyph name to `code`, replacing the base encoding's entry.
    pub fn set_difference(&mut self, code: u8, glyph_name: impl Into<String>) {
        self.differences.insert(code, glyph_name.into());
    }

    /// Text for `code`. A code overridden by `/Differences` with a glyph name
    /// that does not resolve gives `None`; it does not fall back to the base.
    pub fn decode(&self, code: u8) -> Option<String> {
        match self.differences.get(&code) {
            Some(name) => glyph_name_to_unicode(name),
            None => self.base.decode(code).map(String::from),
        }
    }
}

/// Resolve a glyph name to its Unicode text.
pub fn glyph_name_to_unicode(name: &str) -> Option<String> {
    // Suffixes such as `.sc` or `.alt` name variants of the same character.
    let name = name.split('.').next().unwrap_or(name);
    if name.is_empty() {
        return None;
    }

    if let Some(c) = named_glyph(name) {
        return Some(c.to_string());
    }

    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return Some(c.to_string());
        }
    }

    if let Some(hex) = name.strip_prefix("uni") {
        if let Some(text) = parse_uni_sequence(hex) {
            return Some(text);
        }
    }
    if let Some(hex) = name.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return u32::from_str_radix(hex, 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from);
        }
    }

    compose_accented(name)
}

/// `uniXXXX` may carry several code points, four hex digits each.
fn parse_uni_sequence(hex: &str) -> Option<String> {
    if hex.is_empty() || hex.len() % 4 != 0 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    (0..hex.len())
        .step_by(4)
        .map(|at| {
            u32::from_str_radix(&hex[at..at + 4], 16)
                .ok()
                .and_then(char::from_u32)
        })
        .collect()
}

const ACCENTS: [(&str, char); 8] = [
    ("acute", '\u{0301}'),
    ("grave", '\u{0300}'),
    ("circumflex", '\u{0302}'),
    ("dieresis", '\u{0308}'),
    ("tilde", '\u{0303}'),
    ("ring", '\u{030A}'),
    ("cedilla", '\u{0327}'),
    ("caron", '\u{030C}'),
];

/// `Aacute`, `ccedilla`, `scaron` and the like: one Latin letter followed by
/// an accent name, composed to a single precomposed character.
fn compose_accented(name: &str) -> Option<String> {
    let mut chars = name.chars();
    let base = chars.next().filter(char::is_ascii_alphabetic)?;
    let accent = chars.as_str();
    let (_, mark) = ACCENTS.iter().find(|(suffix, _)| *suffix == accent)?;
    let composed: String = [base, *mark].into_iter().nfc().collect();
    (composed.chars().count() == 1).then_some(composed)
}

fn named_glyph(name: &str) -> Option<char> {
    let c = match name {
        "space" => ' ',
        "nbspace" => '\u{00A0}',
        "exclam" => '!',
        "quotedbl" => '"',
        "numbersign" => '#',
        "dollar" => '$',
        "percent" => '%',
        "ampersand" => '&',
        "quotesingle" => '\'',
        "parenleft" => '(',
        "parenright" => ')',
        "asterisk" => '*',
        "plus" => '+',
        "comma" => ',',
        "hyphen" => '-',
        "period" => '.',
        "slash" => '/',
        "zero" => '0',
        "one" => '1',
        "two" => '2',
        "three" => '3',
        "four" => '4',
        "five" => '5',
        "six" => '6',
        "seven" => '7',
        "eight" => '8',
        "nine" => '9',
        "colon" => ':',
        "semicolon" => ';',
        "less" => '<',
        "equal" => '=',
        "greater" => '>',
        "question" => '?',
        "at" => '@',
        "bracketleft" => '[',
        "backslash" => '\\',
        "bracketright" => ']',
        "asciicircum" => '^',
        "underscore" => '_',
        "grave" => '`',
        "braceleft" => '{',
        "bar" => '|',
        "braceright" => '}',
        "asciitilde" => '~',
        "quoteleft" => '\u{2018}',
        "quoteright" => '\u{2019}',
        "quotesinglbase" => '\u{201A}',
        "quotedblleft" => '\u{201C}',
        "quotedblright" => '\u{201D}',
        "quotedblbase" => '\u{201E}',
        "guilsinglleft" => '\u{2039}',
        "guilsinglright" => '\u{203A}',
        "guillemotleft" => '\u{00AB}',
        "guillemotright" => '\u{00BB}',
        "bullet" => '\u{2022}',
        "endash" => '\u{2013}',
        "emdash" => '\u{2014}',
        "ellipsis" => '\u{2026}',
        "dagger" => '\u{2020}',
        "daggerdbl" => '\u{2021}',
        "perthousand" => '\u{2030}',
        "Euro" => '\u{20AC}',
        "fi" => '\u{FB01}',
        "fl" => '\u{FB02}',
        "ff" => '\u{FB00}',
        "ffi" => '\u{FB03}',
        "ffl" => '\u{FB04}',
        "copyright" => '\u{00A9}',
        "registered" => '\u{00AE}',
        "trademark" => '\u{2122}',
        "degree" => '\u{00B0}',
        "section" => '\u{00A7}',
        "paragraph" => '\u{00B6}',
        "minus" => '\u{2212}',
        "multiply" => '\u{00D7}',
        "divide" => '\u{00F7}',
        "plusminus" => '\u{00B1}',
        "fraction" => '\u{2044}',
        "florin" => '\u{0192}',
        "exclamdown" => '\u{00A1}',
        "questiondown" => '\u{00BF}',
        "cent" => '\u{00A2}',
        "sterling" => '\u{00A3}',
        "yen" => '\u{00A5}',
        "currency" => '\u{00A4}',
        "brokenbar" => '\u{00A6}',
        "ordfeminine" => '\u{00AA}',
        "ordmasculine" => '\u{00BA}',
        "logicalnot" => '\u{00AC}',
        "sfthyphen" => '\u{00AD}',
        "mu" => '\u{00B5}',
        "periodcentered" => '\u{00B7}',
        "onequarter" => '\u{00BC}',
        "onehalf" => '\u{00BD}',
        "threequarters" => '\u{00BE}',
        "onesuperior" => '\u{00B9}',
        "twosuperior" => '\u{00B2}',
        "threesuperior" => '\u{00B3}',
        "germandbls" => '\u{00DF}',
        "AE" => '\u{00C6}',
        "ae" => '\u{00E6}',
        "OE" => '\u{0152}',
        "oe" => '\u{0153}',
        "Oslash" => '\u{00D8}',
        "oslash" => '\u{00F8}',
        "Eth" => '\u{00D0}',
        "eth" => '\u{00F0}',
        "Thorn" => '\u{00DE}',
        "thorn" => '\u{00FE}',
        "Lslash" => '\u{0141}',
        "lslash" => '\u{0142}',
        "dotlessi" => '\u{0131}',
        "acute" => '\u{00B4}',
        "dieresis" => '\u{00A8}',
        "macron" => '\u{00AF}',
        "cedilla" => '\u{00B8}',
        "circumflex" => '\u{02C6}',
        "tilde" => '\u{02DC}',
        "ring" => '\u{02DA}',
        "caron" => '\u{02C7}',
        "breve" => '\u{02D8}',
        "dotaccent" => '\u{02D9}',
        "hungarumlaut" => '\u{02DD}',
        "ogonek" => '\u{02DB}',
        _ => return None,
    };
    Some(c)
}

fn win_ansi_char(code: u8) -> Option<char> {
    match code {
        0x20..=0x7E => Some(char::from(code)),
        0x80..=0x9F => {
            let c = match code {
                0x80 => '\u{20AC}',
                0x82 => '\u{201A}',
                0x83 => '\u{0192}',
                0x84 => '\u{201E}',
                0x85 => '\u{2026}',
                0x86 => '\u{2020}',
                0x87 => '\u{2021}',
                0x88 => '\u{02C6}',
                0x89 => '\u{2030}',
                0x8A => '\u{0160}',
                0x8B => '\u{2039}',
                0x8C => '\u{0152}',
                0x8E => '\u{017D}',
                0x91 => '\u{2018}',
                0x92 => '\u{2019}',
                0x93 => '\u{201C}',
                0x94 => '\u{201D}',
                0x95 => '\u{2022}',
                0x96 => '\u{2013}',
                0x97 => '\u{2014}',
                0x98 => '\u{02DC}',
                0x99 => '\u{2122}',
                0x9A => '\u{0161}',
                0x9B => '\u{203A}',
                0x9C => '\u{0153}',
                0x9E => '\u{017E}',
                0x9F => '\u{0178}',
                _ => return None,
            };
            Some(c)
        }
        0xA0..=0xFF => Some(char::from(code)),
        _ => None,
    }
}

#[rustfmt::skip]
const MAC_ROMAN_HIGH: [char; 128] = [
    'Ä', 'Å', 'Ç', 'É', 'Ñ', 'Ö', 'Ü', 'á', 'à', 'â', 'ä', 'ã', 'å', 'ç', 'é', 'è',
    'ê', 'ë', 'í', 'ì', 'î', 'ï', 'ñ', 'ó', 'ò', 'ô', 'ö', 'õ', 'ú', 'ù', 'û', 'ü',
    '†', '°', '¢', '£', '§', '•', '¶', 'ß', '®', '©', '™', '´', '¨', '≠', 'Æ', 'Ø',
    '∞', '±', '≤', '≥', '¥', 'µ', '∂', '∑', '∏', 'π', '∫', 'ª', 'º', '\u{2126}', 'æ', 'ø',
    '¿', '¡', '¬', '√', 'ƒ', '≈', '∆', '«', '»', '…', '\u{00A0}', 'À', 'Ã', 'Õ', 'Œ', 'œ',
    '–', '—', '“', '”', '‘', '’', '÷', '◊', 'ÿ', 'Ÿ', '⁄', '€', '‹', '›', 'ﬁ', 'ﬂ',
    '‡', '·', '‚', '„', '‰', 'Â', 'Ê', 'Á', 'Ë', 'È', 'Í', 'Î', 'Ï', 'Ì', 'Ó', 'Ô',
    '\u{F8FF}', 'Ò', 'Ú', 'Û', 'Ù', 'ı', 'ˆ', '˜', '¯', '˘', '˙', '˚', '¸', '˝', '˛', 'ˇ',
];

fn mac_roman_char(code: u8) -> Option<char> {
    match code {
        0x20..=0x7E => Some(char::from(code)),
        0x80..=0xFF => Some(MAC_ROMAN_HIGH[usize::from(code - 0x80)]),
        _ => None,
    }
}

fn standard_char(code: u8) -> Option<char> {
    let c = match code {
        0x27 => '\u{2019}',
        0x60 => '\u{2018}',
        0x20..=0x7E => char::from(code),
        0xA1 => '¡',
        0xA2 => '¢',
        0xA3 => '£',
        0xA4 => '⁄',
        0xA5 => '¥',
        0xA6 => 'ƒ',
        0xA7 => '§',
        0xA8 => '¤',
        0xA9 => '\'',
        0xAA => '“',
        0xAB => '«',
        0xAC => '‹',
        0xAD => '›',
        0xAE => 'ﬁ',
        0xAF => 'ﬂ',
        0xB1 => '–',
        0xB2 => '†',
        0xB3 => '‡',
        0xB4 => '·',
        0xB6 => '¶',
        0xB7 => '•',
        0xB8 => '‚',
        0xB9 => '„',
        0xBA => '”',
        0xBB => '»',
        0xBC => '…',
        0xBD => '‰',
        0xBF => '¿',
        0xC1 => '`',
        0xC2 => '´',
        0xC3 => 'ˆ',
        0xC4 => '˜',
        0xC5 => '¯',
        0xC6 => '˘',
        0xC7 => '˙',
        0xC8 => '¨',
        0xCA => '˚',
        0xCB => '¸',
        0xCD => '˝',
        0xCE => '˛',
        0xCF => 'ˇ',
        0xD0 => '—',
        0xE1 => 'Æ',
        0xE3 => 'ª',
        0xE8 => 'Ł',
        0xE9 => 'Ø',
        0xEA => 'Œ',
        0xEB => 'º',
        0xF1 => 'æ',
        0xF5 => 'ı',
        0xF8 => 'ł',
        0xF9 => 'ø',
        0xFA => 'œ',
        0xFB => 'ß',
        _ => return None,
    };
    Some(c)
}
