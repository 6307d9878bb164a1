//! Built-in metrics for the standard Type1 fonts.
//!
//! PDFs may use the standard fonts without embedding them or giving
//! `/Widths`. Widths here come from the Adobe AFM files for the printable
//! ASCII range (codes 32 to 126), where the Standard, WinAnsi and MacRoman
//! encodings agree. Units are 1/1000 of text space.

/// Metrics for one standard font.
#[derive(Debug)]
pub struct StandardFont {
    /// Widths for codes 32..=126, or `None` for fixed-pitch fonts.
    ascii_widths: Option<[u16; 95]>,
    /// Advance used for every code of a fixed-pitch font.
    fixed_width: u16,
    /// AFM descender (negative).
    pub descender: f64,
}

impl StandardFont {
    /// Width of `code`, if the table covers it.
    pub fn width(&self, code: u32) -> Option<f64> {
        match &self.ascii_widths {
            None => Some(f64::from(self.fixed_width)),
            Some(widths) => {
                let index = usize::try_from(code.checked_sub(32)?).ok()?;
                widths.get(index).map(|w| f64::from(*w))
            }
        }
    }
}

/// Look up a standard font by base font name (subset prefix already removed).
///
/// Oblique variants share the upright widths, and the common TrueType
/// equivalents (`Arial`, `TimesNewRoman`, `CourierNew`, with or without a
/// `,Bold` or `-Bold` style suffix) map to the matching standard font.
pub fn lookup(name: &str) -> Option<&'static StandardFont> {
    let (family, style) = split_style(name);
    let bold = style.contains("Bold");
    let italic = style.contains("Italic") || style.contains("Oblique");
    match family {
        "Courier" | "CourierNew" | "CourierNewPSMT" => Some(&COURIER),
        "Helvetica" | "Arial" | "ArialMT" => Some(if bold { &HELVETICA_BOLD } else { &HELVETICA }),
        "Times" | "TimesNewRoman" | "TimesNewRomanPSMT" => Some(match (bold, italic) {
            (false, false) => &TIMES_ROMAN,
            (true, false) => &TIMES_BOLD,
            (false, true) => &TIMES_ITALIC,
            (true, true) => &TIMES_BOLD_ITALIC,
        }),
        _ => None,
    }
}

/// Split `Times-BoldItalic`, `Arial,Bold` or `TimesNewRomanPS-BoldMT` into
/// family and style. `Times-Roman` has an empty style.
fn split_style(name: &str) -> (&str, &str) {
    let (family, style) = match name.find([',', '-']) {
        Some(i) => (&name[..i], &name[i + 1..]),
        None => (name, ""),
    };
    let family = family.strip_suffix("PS").unwrap_or(family);
    (family, style)
}

static COURIER: StandardFont = StandardFont {
    ascii_widths: None,
    fixed_width: 600,
    descender: -157.0,
};

#[rustfmt::skip]
static HELVETICA: StandardFont = StandardFont {
    ascii_widths: Some([
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
        1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
        333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
        556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
    ]),
    fixed_width: 0,
    descender: -207.0,
};

#[rustfmt::skip]
static HELVETICA_BOLD: StandardFont = StandardFont {
    ascii_widths: Some([
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
        975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
        333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
        611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
    ]),
    fixed_width: 0,
    descender: -207.0,
};

#[rustfmt::skip]
static TIMES_ROMAN: StandardFont = StandardFont {
    ascii_widths: Some([
        250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
        921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
        556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
        333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
        500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
    ]),
    fixed_width: 0,
    descender: -217.0,
};

#[rustfmt::skip]
static TIMES_BOLD: StandardFont = StandardFont {
    ascii_widths: Some([
        250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
        930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
        611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
        333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
        556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
    ]),
    fixed_width: 0,
    descender: -217.0,
};

#[rustfmt::skip]
static TIMES_ITALIC: StandardFont = StandardFont {
    ascii_widths: Some([
        250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 675, 675, 675, 500,
        920, 611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722,
        611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, 389, 278, 389, 422, 500,
        333, 500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722, 500, 500,
        500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541,
    ]),
    fixed_width: 0,
    descender: -217.0,
};

#[rustfmt::skip]
static TIMES_BOLD_ITALIC: StandardFont = StandardFont {
    ascii_widths: Some([
        250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
        832, 667, 667, 667, 722, 667, 667, 722, 778, 389, 500, 667, 611, 889, 722, 722,
        611, 722, 667, 556, 611, 722, 667, 889, 667, 611, 611, 333, 278, 333, 570, 500,
        333, 500, 500, 444, 500, 444, 333, 500, 556, 278, 278, 500, 278, 778, 556, 500,
        500, 500, 389, 389, 278, 556, 444, 667, 500, 444, 389, 348, 220, 348, 570,
    ]),
    fixed_width: 0,
    descender: -218.0,
};
