//! Content stream interpreter.
//!
//! Walks the operators of a decoded content stream, keeps the graphics and
//! text state, and reports shown glyphs and painted paths to a
//! [`ContentHandler`]. Form XObjects are interpreted recursively with their
//! own `/Matrix` and `/Resources`.

use std::collections::HashMap;

use lopdf::content::Content;
use lopdf::{Object, Stream};
use pdfrows_core::{Ctm, ExtractOptions, PathBuilder};
use tracing::{debug, warn};

use crate::error::BackendError;
use crate::font::LoadedFont;
use crate::handler::{CharEvent, ContentHandler, PaintOp, PathEvent};
use crate::lopdf_backend::{decode_stream, object_to_f64, resolve_ref};
use crate::text_state::TextState;

/// Graphics state carried across `q`/`Q` and into Form XObjects.
#[derive(Debug, Clone)]
pub(crate) struct InterpreterState {
    ctm: Ctm,
    line_width: f64,
    text: TextState,
    stack: Vec<SavedState>,
}

#[derive(Debug, Clone)]
struct SavedState {
    ctm: Ctm,
    line_width: f64,
    text: TextState,
}

impl InterpreterState {
    pub(crate) fn new(ctm: Ctm) -> Self {
        Self {
            ctm,
            line_width: 1.0,
            text: TextState::default(),
            stack: Vec::new(),
        }
    }

    fn save(&mut self) {
        self.stack.push(SavedState {
            ctm: self.ctm,
            line_width: self.line_width,
            text: self.text.clone(),
        });
    }

    /// `Q` with nothing saved is ignored.
    fn restore(&mut self) {
        if let Some(saved) = self.stack.pop() {
            self.ctm = saved.ctm;
            self.line_width = saved.line_width;
            self.text.restore_params(&saved.text);
        }
    }

    /// `cm`: the new matrix applies before the current CTM.
    fn concat_matrix(&mut self, m: &Ctm) {
        self.ctm = m.concat(&self.ctm);
    }
}

/// Interpret `stream_bytes` with `resources`, reporting to `handler`.
///
/// `depth` is the Form XObject nesting level of this stream; page content
/// runs at depth 0.
pub(crate) fn interpret_content(
    doc: &lopdf::Document,
    stream_bytes: &[u8],
    resources: &lopdf::Dictionary,
    handler: &mut dyn ContentHandler,
    options: &ExtractOptions,
    depth: usize,
    state: &mut InterpreterState,
) -> Result<(), BackendError> {
    let content = Content::decode(stream_bytes)
        .map_err(|e| BackendError::lopdf("content stream decode error", e))?;

    let mut fonts: HashMap<String, LoadedFont> = HashMap::new();
    let mut path = PathBuilder::new(state.ctm);

    for op in &content.operations {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            // --- Graphics state ---
            "q" => state.save(),
            "Q" => {
                state.restore();
                path.set_ctm(state.ctm);
            }
            "cm" => {
                if let Some(m) = matrix_operand(operands) {
                    state.concat_matrix(&m);
                    path.set_ctm(state.ctm);
                }
            }
            "w" => {
                if let Some(v) = number(operands, 0) {
                    state.line_width = v;
                }
            }

            // --- Text objects and state ---
            "BT" => state.text.begin_text(),
            "ET" => {}
            "Tf" => {
                if let (Some(name), Some(size)) = (name_operand(operands, 0), number(operands, 1)) {
                    if !fonts.contains_key(&name) {
                        let font = load_font(doc, resources, &name);
                        fonts.insert(name.clone(), font);
                    }
                    state.text.set_font(name, size);
                }
            }
            "Tc" => {
                if let Some(v) = number(operands, 0) {
                    state.text.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = number(operands, 0) {
                    state.text.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = number(operands, 0) {
                    state.text.h_scaling = v;
                }
            }
            "TL" => {
                if let Some(v) = number(operands, 0) {
                    state.text.leading = v;
                }
            }
            "Ts" => {
                if let Some(v) = number(operands, 0) {
                    state.text.rise = v;
                }
            }
            "Tr" => {
                if let Some(v) = number(operands, 0) {
                    state.text.render_mode = v as i64;
                }
            }

            // --- Text positioning ---
            "Td" => {
                if let (Some(tx), Some(ty)) = (number(operands, 0), number(operands, 1)) {
                    state.text.move_text_position(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (number(operands, 0), number(operands, 1)) {
                    state.text.move_text_position_and_set_leading(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = matrix_operand(operands) {
                    state.text.set_text_matrix(m);
                }
            }
            "T*" => state.text.move_to_next_line(),

            // --- Text showing ---
            "Tj" => {
                if let Some(bytes) = string_operand(operands, 0) {
                    show_string(state, &fonts, handler, bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    show_positioned(state, &fonts, handler, items);
                }
            }
            "'" => {
                state.text.move_to_next_line();
                if let Some(bytes) = string_operand(operands, 0) {
                    show_string(state, &fonts, handler, bytes);
                }
            }
            "\"" => {
                if let (Some(aw), Some(ac)) = (number(operands, 0), number(operands, 1)) {
                    state.text.word_spacing = aw;
                    state.text.char_spacing = ac;
                }
                state.text.move_to_next_line();
                if let Some(bytes) = string_operand(operands, 2) {
                    show_string(state, &fonts, handler, bytes);
                }
            }

            // --- Path construction ---
            "m" => {
                if let (Some(x), Some(y)) = (number(operands, 0), number(operands, 1)) {
                    path.move_to(x, y);
                }
            }
            "l" => {
                if let (Some(x), Some(y)) = (number(operands, 0), number(operands, 1)) {
                    path.line_to(x, y);
                }
            }
            "c" => {
                if let (Some(x), Some(y)) = (number(operands, 4), number(operands, 5)) {
                    path.curve_to(x, y);
                }
            }
            "v" | "y" => {
                if let (Some(x), Some(y)) = (number(operands, 2), number(operands, 3)) {
                    path.curve_to(x, y);
                }
            }
            "h" => path.close_path(),
            "re" => {
                if let (Some(x), Some(y), Some(w), Some(h)) = (
                    number(operands, 0),
                    number(operands, 1),
                    number(operands, 2),
                    number(operands, 3),
                ) {
                    path.rectangle(x, y, w, h);
                }
            }

            // --- Path painting ---
            "S" => paint(&mut path, state, handler, PaintOp::Stroke),
            "s" => {
                path.close_path();
                paint(&mut path, state, handler, PaintOp::Stroke);
            }
            "f" | "F" | "f*" => paint(&mut path, state, handler, PaintOp::Fill),
            "B" | "B*" => paint(&mut path, state, handler, PaintOp::FillAndStroke),
            "b" | "b*" => {
                path.close_path();
                paint(&mut path, state, handler, PaintOp::FillAndStroke);
            }
            "n" => {
                path.take_and_reset();
            }

            // --- XObjects ---
            "Do" => {
                if let Some(name) = name_operand(operands, 0) {
                    handle_do(doc, resources, handler, options, depth, state, &name)?;
                }
            }

            // Colour, clipping, marked content, inline images and the rest
            // do not affect glyph or ruling geometry.
            _ => {}
        }
    }

    Ok(())
}

fn load_font(doc: &lopdf::Document, resources: &lopdf::Dictionary, name: &str) -> LoadedFont {
    let dict = resources
        .get(b"Font")
        .ok()
        .map(|fonts| resolve_ref(doc, fonts))
        .and_then(|fonts| fonts.as_dict().ok())
        .and_then(|fonts| fonts.get(name.as_bytes()).ok())
        .map(|font| resolve_ref(doc, font))
        .and_then(|font| font.as_dict().ok());
    match dict {
        Some(dict) => LoadedFont::load(doc, name, dict),
        None => {
            warn!(font = name, "font resource not found, using fallback metrics");
            LoadedFont::missing(name)
        }
    }
}

/// Show one string operand, advancing the text matrix after each glyph.
fn show_string(
    state: &mut InterpreterState,
    fonts: &HashMap<String, LoadedFont>,
    handler: &mut dyn ContentHandler,
    bytes: &[u8],
) {
    let fallback;
    let font = match fonts.get(&state.text.font_resource) {
        Some(font) => font,
        None => {
            fallback = LoadedFont::missing(&state.text.font_resource);
            &fallback
        }
    };

    let ctm = state.ctm.to_array();
    let text = &mut state.text;
    let h_scaling = text.h_scaling_normalized();

    for (code, len) in font.codes(bytes) {
        let width = font.width(code);
        handler.on_char(CharEvent {
            char_code: code,
            unicode: font.decode(code),
            font_name: font.base_name().to_string(),
            font_size: text.font_size,
            text_matrix: text.text_matrix().to_array(),
            ctm,
            displacement: width,
            h_scaling,
            rise: text.rise,
            descent: font.descent(),
        });

        let word_spacing = if code == 32 && len == 1 {
            text.word_spacing
        } else {
            0.0
        };
        let tx = (width / 1000.0 * text.font_size + text.char_spacing + word_spacing) * h_scaling;
        text.advance_text_position(tx);
    }
}

/// `TJ`: strings interleaved with adjustments in thousandths of text space.
fn show_positioned(
    state: &mut InterpreterState,
    fonts: &HashMap<String, LoadedFont>,
    handler: &mut dyn ContentHandler,
    items: &[Object],
) {
    for item in items {
        match item {
            Object::String(bytes, _) => show_string(state, fonts, handler, bytes),
            Object::Integer(_) | Object::Real(_) => {
                if let Ok(adjust) = object_to_f64(item) {
                    let text = &mut state.text;
                    let tx = -adjust / 1000.0 * text.font_size * text.h_scaling_normalized();
                    text.advance_text_position(tx);
                }
            }
            _ => {}
        }
    }
}

fn paint(
    path: &mut PathBuilder,
    state: &InterpreterState,
    handler: &mut dyn ContentHandler,
    paint_op: PaintOp,
) {
    if path.is_empty() {
        return;
    }
    let painted = path.take_and_reset();
    handler.on_path_painted(PathEvent {
        segments: painted.segments,
        paint_op,
        line_width: state.line_width,
    });
}

/// `Do`: interpret Form XObjects, ignore images and anything else.
fn handle_do(
    doc: &lopdf::Document,
    resources: &lopdf::Dictionary,
    handler: &mut dyn ContentHandler,
    options: &ExtractOptions,
    depth: usize,
    state: &mut InterpreterState,
    name: &str,
) -> Result<(), BackendError> {
    let Some(stream) = resources
        .get(b"XObject")
        .ok()
        .map(|xobjects| resolve_ref(doc, xobjects))
        .and_then(|xobjects| xobjects.as_dict().ok())
        .and_then(|xobjects| xobjects.get(name.as_bytes()).ok())
        .map(|xobject| resolve_ref(doc, xobject))
        .and_then(|xobject| xobject.as_stream().ok())
    else {
        debug!(xobject = name, "XObject not found in resources");
        return Ok(());
    };

    let is_form = stream
        .dict
        .get(b"Subtype")
        .ok()
        .and_then(|subtype| subtype.as_name().ok())
        == Some(b"Form".as_slice());
    if !is_form {
        return Ok(());
    }

    if depth >= options.max_recursion_depth {
        warn!(
            xobject = name,
            limit = options.max_recursion_depth,
            "Form XObject nesting limit reached, skipping"
        );
        return Ok(());
    }

    handle_form_xobject(doc, resources, handler, options, depth, state, name, stream)
}

#[allow(clippy::too_many_arguments)]
fn handle_form_xobject(
    doc: &lopdf::Document,
    parent_resources: &lopdf::Dictionary,
    handler: &mut dyn ContentHandler,
    options: &ExtractOptions,
    depth: usize,
    state: &mut InterpreterState,
    name: &str,
    stream: &Stream,
) -> Result<(), BackendError> {
    let content_bytes = decode_stream(stream).map_err(|e| {
        BackendError::Interpreter(format!("failed to decode Form XObject /{name} stream: {e}"))
    })?;

    let form_resources = stream
        .dict
        .get(b"Resources")
        .ok()
        .map(|res| resolve_ref(doc, res))
        .and_then(|res| res.as_dict().ok())
        .unwrap_or(parent_resources);

    state.save();
    if let Some(matrix) = stream
        .dict
        .get(b"Matrix")
        .ok()
        .map(|m| resolve_ref(doc, m))
        .and_then(|m| m.as_array().ok())
        .and_then(|m| matrix_operand(m))
    {
        state.concat_matrix(&matrix);
    }

    let result = interpret_content(
        doc,
        &content_bytes,
        form_resources,
        handler,
        options,
        depth + 1,
        state,
    );
    state.restore();
    result
}

fn number(operands: &[Object], index: usize) -> Option<f64> {
    operands.get(index).and_then(|o| object_to_f64(o).ok())
}

fn matrix_operand(operands: &[Object]) -> Option<Ctm> {
    if operands.len() < 6 {
        return None;
    }
    let mut m = [0.0; 6];
    for (slot, operand) in m.iter_mut().zip(operands) {
        *slot = object_to_f64(operand).ok()?;
    }
    Some(Ctm::from_array(m))
}

fn name_operand(operands: &[Object], index: usize) -> Option<String> {
    match operands.get(index) {
        Some(Object::Name(name)) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

fn string_operand(operands: &[Object], index: usize) -> Option<&[u8]> {
    match operands.get(index) {
        Some(Object::String(bytes, _)) => Some(bytes),
        _ => None,
    }
}
