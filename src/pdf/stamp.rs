//! Page stamping
//!
//! Draws a file-name label near the top of every page of a document, backed
//! by a translucent near-white patch so the label stays legible over dark or
//! busy page content. The document is mutated in memory only; the caller
//! decides where the stamped copy is persisted.

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::error::{Error, Result};
use crate::pdf::font::{escape_pdf_string, helvetica_font, text_width};

/// Font size of the stamp label, in points.
pub const STAMP_FONT_SIZE: f32 = 12.0;

/// Distance from the top edge of the page to the label baseline, in points.
const TOP_OFFSET: f32 = 18.0;

/// Extra space the backing patch extends past the label on every side, in points.
const PATCH_MARGIN: f32 = 5.0;

/// Fill alpha of the backing patch.
const PATCH_ALPHA: f32 = 0.5;

/// MediaBox used when a page carries none anywhere in its tree (US Letter).
const LETTER_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Placement of one stamp on one page, in PDF user-space points
/// (origin at the bottom-left of the page).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StampGeometry {
    pub text_x: f32,
    pub baseline_y: f32,
    pub patch_x: f32,
    pub patch_y: f32,
    pub patch_width: f32,
    pub patch_height: f32,
}

/// Compute where the label and its backing patch land on a page.
///
/// The label is centered horizontally and its baseline sits a fixed offset
/// below the top edge. The patch is the label box grown by a fixed margin.
pub fn stamp_geometry(page_width: f32, page_height: f32, label_width: f32) -> StampGeometry {
    let text_x = (page_width - label_width) / 2.0;
    let baseline_y = page_height - TOP_OFFSET;

    StampGeometry {
        text_x,
        baseline_y,
        patch_x: text_x - PATCH_MARGIN,
        patch_y: baseline_y - PATCH_MARGIN,
        patch_width: label_width + 2.0 * PATCH_MARGIN,
        patch_height: STAMP_FONT_SIZE + 2.0 * PATCH_MARGIN,
    }
}

/// Stamp every page of the document at `source` with `label`.
///
/// Returns the stamped document without persisting it. Fails if the source
/// cannot be opened or contains no pages; the caller is expected to abort
/// the whole batch rather than continue with a missing intermediate.
///
/// # Example
///
/// ```no_run
/// use pdf_packet::pdf::stamp_document;
/// use std::path::Path;
///
/// let mut stamped = stamp_document(Path::new("Lecture 1.pdf"), "Lecture 1.pdf")
///     .expect("Failed to stamp");
/// stamped.save("annotated_Lecture 1.pdf").expect("Failed to save");
/// ```
pub fn stamp_document(source: &Path, label: &str) -> Result<Document> {
    let mut doc = Document::load(source).map_err(|source_err| Error::DocumentOpen {
        path: source.to_path_buf(),
        source: source_err,
    })?;

    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    if pages.is_empty() {
        return Err(Error::EmptyPdf(source.to_path_buf()));
    }

    let font_id = doc.add_object(Object::Dictionary(helvetica_font()));
    let state_id = doc.add_object(Object::Dictionary(patch_graphics_state()));
    let label_width = text_width(label, STAMP_FONT_SIZE);

    for page_id in pages {
        let (page_width, page_height) = page_size(&doc, page_id)?;
        let geometry = stamp_geometry(page_width, page_height, label_width);

        let content = stamp_content(&geometry, label);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        register_stamp_resources(&mut doc, page_id, font_id, state_id)?;
        append_page_content(&mut doc, page_id, content_id)?;
    }

    Ok(doc)
}

/// ExtGState dictionary carrying the patch's fill alpha.
fn patch_graphics_state() -> Dictionary {
    let mut state = Dictionary::new();
    state.set("Type", Object::Name(b"ExtGState".to_vec()));
    state.set("ca", Object::Real(PATCH_ALPHA));
    state
}

/// Generate the content stream drawing the patch and then the label.
///
/// The patch is filled inside its own graphics-state scope so the alpha does
/// not bleed into the label, which must stay opaque black.
fn stamp_content(geometry: &StampGeometry, label: &str) -> String {
    let mut content = String::new();

    content.push_str("q\n");
    content.push_str("/GsStamp gs\n");
    content.push_str("0.98 0.98 0.98 rg\n");
    content.push_str(&format!(
        "{:.2} {:.2} {:.2} {:.2} re f\n",
        geometry.patch_x, geometry.patch_y, geometry.patch_width, geometry.patch_height
    ));
    content.push_str("Q\n");

    content.push_str("q\n");
    content.push_str("0 g\n");
    content.push_str("BT\n");
    content.push_str(&format!("/FStamp {} Tf\n", STAMP_FONT_SIZE));
    content.push_str(&format!(
        "1 0 0 1 {:.2} {:.2} Tm\n",
        geometry.text_x, geometry.baseline_y
    ));
    content.push_str(&format!("({}) Tj\n", escape_pdf_string(label)));
    content.push_str("ET\n");
    content.push_str("Q\n");

    content
}

/// Width and height of a page from its MediaBox.
fn page_size(doc: &Document, page_id: ObjectId) -> Result<(f32, f32)> {
    let media_box = resolve_media_box(doc, page_id, 8)?;
    Ok((media_box[2] - media_box[0], media_box[3] - media_box[1]))
}

/// Find the MediaBox for a page, walking up the Pages tree when the page
/// inherits it. The walk is depth-limited so malformed parent cycles cannot
/// recurse forever; anything unresolvable falls back to US Letter.
fn resolve_media_box(doc: &Document, object_id: ObjectId, depth: usize) -> Result<[f32; 4]> {
    if depth == 0 {
        return Ok(LETTER_MEDIA_BOX);
    }

    let dict = match doc.get_object(object_id)? {
        Object::Dictionary(dict) => dict,
        _ => return Ok(LETTER_MEDIA_BOX),
    };

    if let Ok(raw) = dict.get(b"MediaBox") {
        let array = match raw {
            Object::Array(array) => Some(array.clone()),
            Object::Reference(id) => match doc.get_object(*id) {
                Ok(Object::Array(array)) => Some(array.clone()),
                _ => None,
            },
            _ => None,
        };

        if let Some(array) = array {
            let values: Vec<f32> = array.iter().filter_map(object_as_f32).collect();
            if values.len() == 4 {
                return Ok([values[0], values[1], values[2], values[3]]);
            }
        }
    }

    if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
        return resolve_media_box(doc, *parent_id, depth - 1);
    }

    Ok(LETTER_MEDIA_BOX)
}

fn object_as_f32(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value),
        _ => None,
    }
}

/// Add the stamp font and graphics state to a page's Resources.
///
/// Resources may be stored inline or as an indirect reference shared between
/// pages; either way the page ends up with its own dictionary carrying the
/// stamp entries, leaving other pages untouched.
fn register_stamp_resources(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
    state_id: ObjectId,
) -> Result<()> {
    let mut resources = {
        let page = match doc.get_object(page_id)? {
            Object::Dictionary(dict) => dict,
            _ => return Ok(()),
        };
        match page.get(b"Resources") {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            Ok(Object::Reference(id)) => match doc.get_object(*id) {
                Ok(Object::Dictionary(dict)) => dict.clone(),
                _ => Dictionary::new(),
            },
            _ => Dictionary::new(),
        }
    };

    let mut fonts = match resources.get(b"Font") {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        _ => Dictionary::new(),
    };
    fonts.set("FStamp", Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));

    let mut states = match resources.get(b"ExtGState") {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        _ => Dictionary::new(),
    };
    states.set("GsStamp", Object::Reference(state_id));
    resources.set("ExtGState", Object::Dictionary(states));

    if let Object::Dictionary(page_dict) = doc.get_object_mut(page_id)? {
        page_dict.set("Resources", Object::Dictionary(resources));
    }

    Ok(())
}

/// Append a content stream to a page's Contents so the stamp is drawn on top
/// of the original page content.
fn append_page_content(doc: &mut Document, page_id: ObjectId, content_id: ObjectId) -> Result<()> {
    if let Object::Dictionary(page_dict) = doc.get_object_mut(page_id)? {
        let existing = page_dict.get(b"Contents").ok().cloned();

        match existing {
            Some(Object::Reference(id)) => {
                page_dict.set(
                    "Contents",
                    Object::Array(vec![Object::Reference(id), Object::Reference(content_id)]),
                );
            }
            Some(Object::Array(mut array)) => {
                array.push(Object::Reference(content_id));
                page_dict.set("Contents", Object::Array(array));
            }
            _ => {
                page_dict.set("Contents", Object::Reference(content_id));
            }
        }
    }

    Ok(())
}
