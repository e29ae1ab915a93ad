//! Concatenation of stamped documents into one output

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{Error, Result};

/// Append every page of each input, in order, into one document saved at
/// `output`. Intra-document page order is preserved. Returns the page count
/// of the merged document.
///
/// Any input that cannot be opened fails the whole merge; a packet silently
/// missing one of its inputs is worse than no packet.
///
/// # Example
///
/// ```no_run
/// use pdf_packet::pdf::merge_documents;
/// use std::path::{Path, PathBuf};
///
/// let inputs = vec![
///     PathBuf::from("annotated_Lecture 1.pdf"),
///     PathBuf::from("annotated_Lecture 2.pdf"),
/// ];
///
/// let pages = merge_documents(&inputs, Path::new("annotatedMerged.pdf"))
///     .expect("Failed to merge");
/// println!("{pages} pages");
/// ```
pub fn merge_documents<P: AsRef<Path>>(inputs: &[P], output: &Path) -> Result<usize> {
    if inputs.is_empty() {
        return Err(Error::General("no documents to merge".to_string()));
    }

    let mut next_id = 1;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for input in inputs {
        let path = input.as_ref();
        let mut doc = Document::load(path).map_err(|source| Error::ArtifactOpen {
            path: path.to_path_buf(),
            source,
        })?;

        if doc.get_pages().is_empty() {
            return Err(Error::EmptyPdf(path.to_path_buf()));
        }

        // Renumber so this document's objects cannot collide with the ones
        // already collected
        doc.renumber_objects_with(next_id);
        next_id = doc.max_id + 1;

        page_ids.extend(doc.get_pages().into_values());
        objects.extend(doc.objects);
    }

    let mut merged = Document::with_version("1.5");
    merged.objects.extend(objects);

    // max_id must reflect the renumbered objects before new_object_id() is
    // asked for catalog and pages IDs, or the new IDs would collide
    merged.max_id = next_id - 1;

    let pages_id = merged.new_object_id();
    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Count", Object::Integer(page_ids.len() as i64));
    pages_dict.set("Kids", Object::Array(kids));

    let catalog_id = merged.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));

    merged.objects.insert(pages_id, Object::Dictionary(pages_dict));
    merged.objects.insert(catalog_id, Object::Dictionary(catalog));
    merged.trailer.set("Root", Object::Reference(catalog_id));

    // Reparent every page onto the rebuilt Pages node
    for &page_id in &page_ids {
        if let Ok(Object::Dictionary(page_dict)) = merged.get_object_mut(page_id) {
            page_dict.set("Parent", Object::Reference(pages_id));
        }
    }

    merged.compress();
    merged.save(output)?;

    Ok(page_ids.len())
}
