//! Shared PDF fixtures for integration tests.
//!
//! Documents are built with lopdf. Every page gets the same resources:
//! `/F1` Helvetica (WinAnsi), `/F2` a Type0 font whose ToUnicode maps codes
//! `0x0001..=0x0003` to Cyrillic letters, and `/X1` a Form XObject drawing
//! the word "Inside" at the origin of its matrix `[1 0 0 1 72 400]`.

#![allow(dead_code)]

use lopdf::{Document, Object, ObjectId, Stream, dictionary};

const TO_UNICODE: &[u8] = b"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
1 beginbfrange
<0001> <0003> [<041C> <0438> <0440>]
endbfrange
endcmap
end
end";

/// One page of a fixture document.
pub struct TestPage {
    pub content: Vec<u8>,
    pub rotate: i64,
}

impl TestPage {
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            rotate: 0,
        }
    }

    pub fn rotated(mut self, rotate: i64) -> Self {
        self.rotate = rotate;
        self
    }
}

/// Build a Letter-sized PDF from `pages`.
pub fn build_pdf(pages: Vec<TestPage>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let helvetica = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let to_unicode = doc.add_object(Stream::new(dictionary! {}, TO_UNICODE.to_vec()));
    let cid_font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => "ABCDEF+CyrSans",
        "DW" => 600i64,
    });
    let type0 = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "ABCDEF+CyrSans",
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(cid_font)],
        "ToUnicode" => to_unicode,
    });

    let form = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => vec![0.into(), 0.into(), 200.into(), 50.into()],
            "Matrix" => vec![1.into(), 0.into(), 0.into(), 1.into(), 72.into(), 400.into()],
        },
        b"BT /F1 12 Tf 0 0 Td (Inside) Tj ET".to_vec(),
    ));

    let mut kids = Vec::new();
    for page in &pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, page.content.clone()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Rotate" => page.rotate,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => helvetica, "F2" => type0 },
                "XObject" => dictionary! { "X1" => form },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}

/// Content placing each `(text, x0, top)` in Helvetica 12 so that the word's
/// bbox starts at `x0` and its top-left `top` matches.
///
/// Helvetica's descent is -207, so the baseline sits at
/// `792 - top - 12 + 2.484` in PDF space.
pub fn words_content(words: &[(&str, f64, f64)]) -> Vec<u8> {
    let mut content = String::from("BT /F1 12 Tf\n");
    for (text, x0, top) in words {
        let baseline = 792.0 - top - 12.0 + 2.484;
        content.push_str(&format!("1 0 0 1 {x0} {baseline} Tm ({text}) Tj\n"));
    }
    content.push_str("ET\n");
    content.into_bytes()
}

/// Stroked ruling grid. `xs` and `ys` are PDF-space coordinates; every
/// horizontal spans `xs`, every vertical spans `ys`.
pub fn grid_content(xs: &[f64], ys: &[f64]) -> String {
    let (x_min, x_max) = (xs[0], xs[xs.len() - 1]);
    let (y_min, y_max) = (ys[0], ys[ys.len() - 1]);
    let mut content = String::from("0.5 w\n");
    for y in ys {
        content.push_str(&format!("{x_min} {y} m {x_max} {y} l S\n"));
    }
    for x in xs {
        content.push_str(&format!("{x} {y_min} m {x} {y_max} l S\n"));
    }
    content
}

/// Helvetica 12 text shown at PDF-space baseline positions.
pub fn text_at(items: &[(&str, f64, f64)]) -> String {
    let mut content = String::from("BT /F1 12 Tf\n");
    for (text, x, y) in items {
        content.push_str(&format!("1 0 0 1 {x} {y} Tm ({text}) Tj\n"));
    }
    content.push_str("ET\n");
    content
}
