//! Glyph boxes from interpreter char events.
//!
//! The box of a glyph spans its advance width horizontally and one font
//! size vertically, starting at the font descent below the baseline. It is
//! placed with the text rendering matrix and flipped to a top-left origin.

use pdfrows_core::{BBox, Char, Ctm, Point};

use crate::handler::CharEvent;

/// Build a [`Char`] in top-left page coordinates from `event`.
///
/// `page_height` is the upright page height; `top = page_height - max_y`.
/// Codes without resolved text become `(cid:N)` with the decimal code.
pub fn char_from_event(event: &CharEvent, page_height: f64) -> Char {
    // Trm = [Tfs*Th 0 0 Tfs 0 Trise] x Tm x CTM
    let font_matrix = Ctm::new(
        event.font_size * event.h_scaling,
        0.0,
        0.0,
        event.font_size,
        0.0,
        event.rise,
    );
    let trm = font_matrix
        .concat(&Ctm::from_array(event.text_matrix))
        .concat(&Ctm::from_array(event.ctm));

    let width = event.displacement / 1000.0;
    let descent = event.descent / 1000.0;
    let corners = [
        Point::new(0.0, descent),
        Point::new(width, descent),
        Point::new(width, descent + 1.0),
        Point::new(0.0, descent + 1.0),
    ]
    .map(|p| trm.transform_point(p));

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in corners {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    Char {
        text: event
            .unicode
            .clone()
            .unwrap_or_else(|| format!("(cid:{})", event.char_code)),
        bbox: BBox::new(min_x, page_height - max_y, max_x, page_height - min_y),
        fontname: event.font_name.clone(),
        size: event.font_size,
        upright: trm.b.abs() < 1e-6 && trm.c.abs() < 1e-6,
        char_code: event.char_code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_HEIGHT: f64 = 792.0;

    fn default_event() -> CharEvent {
        CharEvent {
            char_code: 65,
            unicode: Some("A".to_string()),
            font_name: "Helvetica".to_string(),
            font_size: 12.0,
            text_matrix: [1.0, 0.0, 0.0, 1.0, 72.0, 720.0],
            ctm: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            displacement: 667.0,
            h_scaling: 1.0,
            rise: 0.0,
            descent: -250.0,
        }
    }

    fn assert_approx(actual: f64, expected: f64, what: &str) {
        assert!(
            (actual - expected).abs() < 0.01,
            "{what}: expected {expected}, got {actual}"
        );
    }

    #[test]
    fn simple_horizontal_text_bbox() {
        let ch = char_from_event(&default_event(), PAGE_HEIGHT);

        // Baseline 720, descent 3: y spans 717..729.
        assert_approx(ch.bbox.x0, 72.0, "x0");
        assert_approx(ch.bbox.top, 63.0, "top");
        assert_approx(ch.bbox.x1, 80.004, "x1");
        assert_approx(ch.bbox.bottom, 75.0, "bottom");
        assert_approx(ch.bbox.height(), 12.0, "height");

        assert_eq!(ch.text, "A");
        assert_eq!(ch.fontname, "Helvetica");
        assert_eq!(ch.size, 12.0);
        assert!(ch.upright);
        assert_eq!(ch.char_code, 65);
    }

    #[test]
    fn zero_descent_sits_on_baseline() {
        let event = CharEvent {
            descent: 0.0,
            ..default_event()
        };
        let ch = char_from_event(&event, PAGE_HEIGHT);
        assert_approx(ch.bbox.bottom, 72.0, "bottom");
        assert_approx(ch.bbox.top, 60.0, "top");
    }

    #[test]
    fn rise_shifts_box_up() {
        let event = CharEvent {
            rise: 5.0,
            ..default_event()
        };
        let ch = char_from_event(&event, PAGE_HEIGHT);
        assert_approx(ch.bbox.top, 58.0, "top");
        assert_approx(ch.bbox.bottom, 70.0, "bottom");
    }

    #[test]
    fn horizontal_scaling_narrows_box() {
        let event = CharEvent {
            h_scaling: 0.5,
            ..default_event()
        };
        let ch = char_from_event(&event, PAGE_HEIGHT);
        assert_approx(ch.bbox.width(), 4.002, "width");
        assert_approx(ch.bbox.height(), 12.0, "height");
    }

    #[test]
    fn ctm_scale_and_translation_apply() {
        let event = CharEvent {
            text_matrix: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            ctm: [2.0, 0.0, 0.0, 2.0, 100.0, 100.0],
            ..default_event()
        };
        let ch = char_from_event(&event, PAGE_HEIGHT);
        assert_approx(ch.bbox.x0, 100.0, "x0");
        assert_approx(ch.bbox.x1, 116.008, "x1");
        assert_approx(ch.bbox.height(), 24.0, "height");
        assert!(ch.upright);
    }

    #[test]
    fn rotated_text_is_not_upright() {
        let event = CharEvent {
            text_matrix: [0.0, 1.0, -1.0, 0.0, 200.0, 400.0],
            ..default_event()
        };
        let ch = char_from_event(&event, PAGE_HEIGHT);
        assert_approx(ch.bbox.x0, 191.0, "x0");
        assert_approx(ch.bbox.x1, 203.0, "x1");
        assert_approx(ch.bbox.top, 383.996, "top");
        assert_approx(ch.bbox.bottom, 392.0, "bottom");
        assert!(!ch.upright);
    }

    #[test]
    fn unresolved_text_names_the_code() {
        let unmapped = |char_code| CharEvent {
            unicode: None,
            char_code,
            ..default_event()
        };
        assert_eq!(char_from_event(&unmapped(0x7F), PAGE_HEIGHT).text, "(cid:127)");
        assert_eq!(char_from_event(&unmapped(3), PAGE_HEIGHT).text, "(cid:3)");
    }
}
