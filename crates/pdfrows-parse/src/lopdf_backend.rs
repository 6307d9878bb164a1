//! lopdf-based PDF parsing backend.
//!
//! Implements [`PdfBackend`] using the [lopdf](https://crates.io/crates/lopdf)
//! crate for document parsing. Also hosts the small object helpers shared by
//! the font loader and the interpreter.

use std::sync::LazyLock;

use pdfrows_core::{BBox, ExtractOptions, PdfError};

use crate::backend::PdfBackend;
use crate::error::BackendError;
use crate::handler::ContentHandler;
use crate::interpreter::{InterpreterState, interpret_content};
use crate::page_geometry::PageGeometry;

/// US Letter, used when neither the page nor its ancestors give a MediaBox.
const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: lopdf::Document,
    /// Page object IDs in document order.
    page_ids: Vec<lopdf::ObjectId>,
}

impl LopdfDocument {
    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// A reference to a single page within a [`LopdfDocument`].
#[derive(Debug, Clone, Copy)]
pub struct LopdfPage {
    /// The lopdf object ID for this page.
    pub object_id: lopdf::ObjectId,
    /// The 0-based page index.
    pub index: usize,
}

/// The lopdf-based PDF backend.
///
/// # Example
///
/// ```ignore
/// use pdfrows_parse::{LopdfBackend, PdfBackend};
///
/// let doc = LopdfBackend::open(pdf_bytes)?;
/// let page = LopdfBackend::get_page(&doc, 0)?;
/// LopdfBackend::interpret_page(&doc, &page, &mut handler, &options)?;
/// ```
pub struct LopdfBackend;

impl PdfBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Page = LopdfPage;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::lopdf("failed to parse PDF", e))?;

        if inner.is_encrypted() {
            return Err(BackendError::Core(PdfError::PasswordRequired));
        }

        // get_pages is keyed by 1-based page number, so values are in order.
        let page_ids = inner.get_pages().values().copied().collect();

        Ok(LopdfDocument { inner, page_ids })
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_ids.len()
    }

    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error> {
        let object_id = doc
            .page_ids
            .get(index)
            .copied()
            .ok_or(BackendError::Core(PdfError::PageOutOfRange {
                index,
                count: doc.page_ids.len(),
            }))?;
        Ok(LopdfPage { object_id, index })
    }

    fn page_media_box(doc: &Self::Document, page: &Self::Page) -> Result<BBox, Self::Error> {
        let Some(obj) = resolve_inherited(&doc.inner, page.object_id, b"MediaBox")? else {
            let [x0, y0, x1, y1] = DEFAULT_MEDIA_BOX;
            return Ok(BBox::new(x0, y0, x1, y1));
        };
        let array = resolve_ref(&doc.inner, obj)
            .as_array()
            .map_err(|e| BackendError::lopdf("MediaBox is not an array", e))?;
        extract_bbox_from_array(array)
    }

    fn page_rotate(doc: &Self::Document, page: &Self::Page) -> Result<i32, Self::Error> {
        match resolve_inherited(&doc.inner, page.object_id, b"Rotate")? {
            Some(obj) => {
                let rotation = resolve_ref(&doc.inner, obj)
                    .as_i64()
                    .map_err(|e| BackendError::lopdf("Rotate is not an integer", e))?;
                Ok(rotation as i32)
            }
            None => Ok(0),
        }
    }

    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        handler: &mut dyn ContentHandler,
        options: &ExtractOptions,
    ) -> Result<(), Self::Error> {
        let inner = &doc.inner;

        let page_dict = inner
            .get_object(page.object_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::lopdf("failed to get page dictionary", e))?;

        let content_bytes = get_page_content_bytes(inner, page_dict)?;
        if content_bytes.len() > options.max_stream_bytes {
            return Err(BackendError::Core(PdfError::ResourceLimitExceeded {
                limit_name: "max_stream_bytes".to_string(),
                limit_value: options.max_stream_bytes,
                actual_value: content_bytes.len(),
            }));
        }

        let resources = get_page_resources(inner, page.object_id)?;

        let geometry = PageGeometry::new(
            Self::page_media_box(doc, page)?,
            Self::page_rotate(doc, page)?,
        );
        let mut state = InterpreterState::new(geometry.initial_ctm());

        interpret_content(
            inner,
            &content_bytes,
            resources,
            handler,
            options,
            0,
            &mut state,
        )
    }
}

/// Extract a [`BBox`] from a lopdf array of 4 numbers `[x0, y0, x1, y1]`.
///
/// The values are kept in PDF order; [`PageGeometry`] normalizes them.
fn extract_bbox_from_array(array: &[lopdf::Object]) -> Result<BBox, BackendError> {
    if array.len() != 4 {
        return Err(BackendError::Parse(format!(
            "expected 4-element array for box, got {}",
            array.len()
        )));
    }
    let x0 = object_to_f64(&array[0])?;
    let y0 = object_to_f64(&array[1])?;
    let x1 = object_to_f64(&array[2])?;
    let y1 = object_to_f64(&array[3])?;
    Ok(BBox::new(x0, y0, x1, y1))
}

/// Convert a lopdf numeric object (Integer or Real) to f64.
pub(crate) fn object_to_f64(obj: &lopdf::Object) -> Result<f64, BackendError> {
    match obj {
        lopdf::Object::Integer(i) => Ok(*i as f64),
        lopdf::Object::Real(f) => Ok(f64::from(*f)),
        _ => Err(BackendError::Parse(format!("expected number, got {obj:?}"))),
    }
}

/// Name object as a string, or `None` for other object kinds.
pub(crate) fn name_of(obj: &lopdf::Object) -> Option<String> {
    obj.as_name()
        .ok()
        .map(|name| String::from_utf8_lossy(name).into_owned())
}

/// Resolve an indirect reference, returning the referenced object.
///
/// Non-references and dangling references come back unchanged.
pub(crate) fn resolve_ref<'a>(doc: &'a lopdf::Document, obj: &'a lopdf::Object) -> &'a lopdf::Object {
    match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Stream data, decompressed when the stream has a `/Filter`.
pub(crate) fn decode_stream(stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::lopdf("failed to decompress stream", e))
    } else {
        Ok(stream.content.clone())
    }
}

/// Look up a key in the page dictionary, walking up the page tree
/// (via /Parent) if the key is not found on the page itself.
fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: lopdf::ObjectId,
    key: &[u8],
) -> Result<Option<&'a lopdf::Object>, BackendError> {
    let mut current_id = page_id;
    // Bounded walk; a /Parent cycle would otherwise never end.
    for _ in 0..64 {
        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::lopdf("failed to get page tree node", e))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }

        match dict.get(b"Parent") {
            Ok(parent) => {
                current_id = parent
                    .as_reference()
                    .map_err(|e| BackendError::lopdf("invalid /Parent reference", e))?;
            }
            Err(_) => return Ok(None),
        }
    }
    Ok(None)
}

/// Content bytes of a page. A `/Contents` array is joined with single spaces.
fn get_page_content_bytes(
    doc: &lopdf::Document,
    page_dict: &lopdf::Dictionary,
) -> Result<Vec<u8>, BackendError> {
    let contents = match page_dict.get(b"Contents") {
        Ok(obj) => resolve_ref(doc, obj),
        Err(_) => return Ok(Vec::new()),
    };

    match contents {
        lopdf::Object::Stream(stream) => decode_stream(stream),
        lopdf::Object::Array(items) => {
            let mut content = Vec::new();
            for item in items {
                let stream = resolve_ref(doc, item)
                    .as_stream()
                    .map_err(|e| BackendError::lopdf("/Contents array item is not a stream", e))?;
                let bytes = decode_stream(stream)?;
                if !content.is_empty() {
                    content.push(b' ');
                }
                content.extend_from_slice(&bytes);
            }
            Ok(content)
        }
        _ => Err(BackendError::Parse(
            "/Contents is not a stream or array".to_string(),
        )),
    }
}

/// Resources dictionary for a page, inherited if needed; empty when absent.
fn get_page_resources(
    doc: &lopdf::Document,
    page_id: lopdf::ObjectId,
) -> Result<&lopdf::Dictionary, BackendError> {
    static EMPTY_DICT: LazyLock<lopdf::Dictionary> = LazyLock::new(lopdf::Dictionary::new);

    match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => resolve_ref(doc, obj)
            .as_dict()
            .map_err(|e| BackendError::lopdf("/Resources is not a dictionary", e)),
        None => Ok(&EMPTY_DICT),
    }
}

/// Build a PDF with `page_count` empty Letter pages.
#[cfg(test)]
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    use lopdf::{Document, Object, ObjectId, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let mut page_ids: Vec<Object> = Vec::new();
    for _ in 0..page_count {
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        page_ids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids,
            "Count" => page_count as i64,
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

/// Build a one-page PDF whose page dictionary gets `extra` entries, with the
/// Pages node carrying `parent_extra` and a Helvetica `/F1` in the resources.
#[cfg(test)]
fn create_test_pdf_with(
    content: &[u8],
    extra: lopdf::Dictionary,
    parent_extra: lopdf::Dictionary,
) -> Vec<u8> {
    use lopdf::{Document, Object, ObjectId, Stream, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));

    let mut page = dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        },
    };
    for (key, value) in extra.iter() {
        page.set(key.clone(), value.clone());
    }
    let page_id = doc.add_object(page);

    let mut pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::from(page_id)],
        "Count" => 1i64,
    };
    for (key, value) in parent_extra.iter() {
        pages.set(key.clone(), value.clone());
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}
