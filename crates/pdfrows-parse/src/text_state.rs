//! Text state for the content stream interpreter.
//!
//! Tracks the text parameters set by `Tc Tw Tz TL Tf Tr Ts` together with the
//! text and line matrices driven by `BT Tm Td TD T*` and glyph advances.

use pdfrows_core::Ctm;

/// Text parameters plus the text and line matrices.
///
/// The parameters belong to the graphics state and follow `q`/`Q` with the
/// rest of it. The matrices only live inside a `BT`/`ET` block; `BT` resets
/// them to identity.
#[derive(Debug, Clone, PartialEq)]
pub struct TextState {
    /// `Tc`: extra space after every glyph.
    pub char_spacing: f64,
    /// `Tw`: extra space after each single-byte code 32.
    pub word_spacing: f64,
    /// `Tz`, as a percentage (100 is normal).
    pub h_scaling: f64,
    /// `TL`.
    pub leading: f64,
    /// Resource name of the current font (e.g. `F1`), not its base font.
    pub font_resource: String,
    pub font_size: f64,
    /// `Tr`. Every mode still produces chars, including invisible text.
    pub render_mode: i64,
    /// `Ts`.
    pub rise: f64,
    text_matrix: Ctm,
    line_matrix: Ctm,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 100.0,
            leading: 0.0,
            font_resource: String::new(),
            font_size: 0.0,
            render_mode: 0,
            rise: 0.0,
            text_matrix: Ctm::identity(),
            line_matrix: Ctm::identity(),
        }
    }
}

impl TextState {
    pub fn text_matrix(&self) -> &Ctm {
        &self.text_matrix
    }

    pub fn line_matrix(&self) -> &Ctm {
        &self.line_matrix
    }

    /// Horizontal scaling as a fraction.
    pub fn h_scaling_normalized(&self) -> f64 {
        self.h_scaling / 100.0
    }

    /// `BT`.
    pub fn begin_text(&mut self) {
        self.text_matrix = Ctm::identity();
        self.line_matrix = Ctm::identity();
    }

    /// `Tf`.
    pub fn set_font(&mut self, font_resource: String, font_size: f64) {
        self.font_resource = font_resource;
        self.font_size = font_size;
    }

    /// `Tm`: replace both matrices.
    pub fn set_text_matrix(&mut self, m: Ctm) {
        self.text_matrix = m;
        self.line_matrix = m;
    }

    /// `Td`: translate the line matrix and restart the text matrix from it.
    pub fn move_text_position(&mut self, tx: f64, ty: f64) {
        let translation = Ctm::new(1.0, 0.0, 0.0, 1.0, tx, ty);
        self.line_matrix = translation.concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    /// `TD`: `-ty TL` followed by `tx ty Td`.
    pub fn move_text_position_and_set_leading(&mut self, tx: f64, ty: f64) {
        self.leading = -ty;
        self.move_text_position(tx, ty);
    }

    /// `T*`.
    pub fn move_to_next_line(&mut self) {
        self.move_text_position(0.0, -self.leading);
    }

    /// Move the text matrix right by `tx` text space units.
    pub fn advance_text_position(&mut self, tx: f64) {
        let translation = Ctm::new(1.0, 0.0, 0.0, 1.0, tx, 0.0);
        self.text_matrix = translation.concat(&self.text_matrix);
    }

    /// Copy the graphics-state parameters from `saved`, keeping the current
    /// text and line matrices. Used by `Q`.
    pub fn restore_params(&mut self, saved: &TextState) {
        let (text_matrix, line_matrix) = (self.text_matrix, self.line_matrix);
        *self = saved.clone();
        self.text_matrix = text_matrix;
        self.line_matrix = line_matrix;
    }
}
