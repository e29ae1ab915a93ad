//! Page counting via the document catalog

use std::path::Path;

use lopdf::{Document, Object};

use crate::error::{Error, Result};

/// Count the number of pages in a PDF file.
///
/// Reads the Count field from the catalog's Pages dictionary, which also
/// covers nested page trees.
pub fn count_pages(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let count = count_pages_from_catalog(&doc)?;

    if count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    Ok(count)
}

fn count_pages_from_catalog(doc: &Document) -> Result<usize> {
    let catalog = doc.catalog()?;

    let pages_id = match catalog.get(b"Pages")? {
        Object::Reference(id) => *id,
        _ => return Err(Error::General("Pages is not a reference".to_string())),
    };

    let pages = match doc.get_object(pages_id)? {
        Object::Dictionary(dict) => dict,
        _ => return Err(Error::General("Pages is not a dictionary".to_string())),
    };

    match pages.get(b"Count")? {
        Object::Integer(count) => Ok(*count as usize),
        _ => Err(Error::General("Count is not an integer".to_string())),
    }
}
