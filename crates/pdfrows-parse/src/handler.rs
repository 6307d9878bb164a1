//! Callbacks emitted by the content stream interpreter.
//!
//! The interpreter reports every shown glyph and every painted path to a
//! [`ContentHandler`]. The facade crate collects these events into chars and
//! painted paths for one page.

use pdfrows_core::PathSegment;

/// How a path was painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOp {
    Stroke,
    Fill,
    FillAndStroke,
}

impl PaintOp {
    pub fn strokes(self) -> bool {
        matches!(self, PaintOp::Stroke | PaintOp::FillAndStroke)
    }

    pub fn fills(self) -> bool {
        matches!(self, PaintOp::Fill | PaintOp::FillAndStroke)
    }
}

/// A glyph shown by `Tj`, `TJ`, `'` or `"`.
///
/// Carries the text state needed to place the glyph box on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct CharEvent {
    /// Character code as read from the string operand.
    pub char_code: u32,
    /// Resolved text, or `None` when neither ToUnicode nor an encoding knew the code.
    pub unicode: Option<String>,
    /// Base font name with any subset prefix removed.
    pub font_name: String,
    pub font_size: f64,
    /// Text matrix at the moment the glyph was shown.
    pub text_matrix: [f64; 6],
    /// CTM at the moment the glyph was shown, including the page rotation.
    pub ctm: [f64; 6],
    /// Glyph width in thousandths of text space.
    pub displacement: f64,
    /// Horizontal scaling as a fraction (`Tz 100` is `1.0`).
    pub h_scaling: f64,
    pub rise: f64,
    /// Font descent in thousandths of text space (zero or negative).
    pub descent: f64,
}

/// A path made visible by a painting operator.
#[derive(Debug, Clone, PartialEq)]
pub struct PathEvent {
    /// Segments in page space (bottom-left origin).
    pub segments: Vec<PathSegment>,
    pub paint_op: PaintOp,
    pub line_width: f64,
}

/// Receiver for interpreter events. Both methods default to no-ops.
pub trait ContentHandler {
    fn on_char(&mut self, _event: CharEvent) {}

    fn on_path_painted(&mut self, _event: PathEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfrows_core::Point;

    #[derive(Default)]
    struct CollectingHandler {
        chars: Vec<CharEvent>,
        paths: Vec<PathEvent>,
    }

    impl ContentHandler for CollectingHandler {
        fn on_char(&mut self, event: CharEvent) {
            self.chars.push(event);
        }

        fn on_path_painted(&mut self, event: PathEvent) {
            self.paths.push(event);
        }
    }

    struct NoopHandler;
    impl ContentHandler for NoopHandler {}

    fn sample_char_event() -> CharEvent {
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
            descent: -207.0,
        }
    }

    fn sample_path_event(paint_op: PaintOp) -> PathEvent {
        PathEvent {
            segments: vec![
                PathSegment::MoveTo(Point::new(0.0, 0.0)),
                PathSegment::LineTo(Point::new(100.0, 0.0)),
            ],
            paint_op,
            line_width: 0.5,
        }
    }

    #[test]
    fn paint_op_stroke_and_fill_flags() {
        assert!(PaintOp::Stroke.strokes() && !PaintOp::Stroke.fills());
        assert!(!PaintOp::Fill.strokes() && PaintOp::Fill.fills());
        assert!(PaintOp::FillAndStroke.strokes() && PaintOp::FillAndStroke.fills());
    }

    #[test]
    fn collecting_handler_keeps_event_order() {
        let mut handler = CollectingHandler::default();
        handler.on_char(sample_char_event());
        handler.on_path_painted(sample_path_event(PaintOp::Stroke));
        handler.on_char(CharEvent {
            char_code: 66,
            unicode: Some("B".to_string()),
            ..sample_char_event()
        });

        assert_eq!(handler.chars.len(), 2);
        assert_eq!(handler.chars[1].char_code, 66);
        assert_eq!(handler.paths.len(), 1);
        assert_eq!(handler.paths[0].line_width, 0.5);
    }

    #[test]
    fn noop_handler_accepts_events_through_trait_object() {
        let mut handler = NoopHandler;
        let dyn_handler: &mut dyn ContentHandler = &mut handler;
        dyn_handler.on_char(sample_char_event());
        dyn_handler.on_path_painted(sample_path_event(PaintOp::Fill));
    }
}
