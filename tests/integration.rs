//! Integration tests for the pdf-packet library
//!
//! Input PDFs are synthesized with lopdf so the suite carries no binary
//! fixtures. Each synthesized input gets its own page width, which makes
//! page provenance visible in the merged output.

use std::fs;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, Stream};
use tempfile::TempDir;

use pdf_packet::batch::{
    run_batch, BatchOptions, ANNOTATED_DIR_NAME, ARTIFACT_PREFIX, MERGED_FILE_NAME,
};
use pdf_packet::pdf::{count_pages, stamp_document};
use pdf_packet::Error;

/// Write a minimal PDF with the given page count, every page `width` points
/// wide and 792 points tall.
fn write_pdf(path: &Path, page_count: usize, width: f32) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..page_count {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"0 g\n".to_vec()));

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set("Contents", Object::Reference(content_id));
        page.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width),
                Object::Real(792.0),
            ]),
        );

        kids.push(Object::Reference(doc.add_object(Object::Dictionary(page))));
    }

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Count", Object::Integer(page_count as i64));
    pages.set("Kids", Object::Array(kids));
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(Object::Dictionary(catalog));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc.save(path).expect("failed to write test PDF");
}

/// Page widths of a document, in page order.
fn page_widths(path: &Path) -> Vec<f32> {
    let doc = Document::load(path).expect("failed to load PDF");

    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let dict = match doc.get_object(page_id).expect("page object") {
                Object::Dictionary(dict) => dict.clone(),
                other => panic!("page is not a dictionary: {other:?}"),
            };
            let array = match dict.get(b"MediaBox").expect("MediaBox") {
                Object::Array(array) => array.clone(),
                other => panic!("MediaBox is not an array: {other:?}"),
            };
            match array[2] {
                Object::Real(value) => value,
                Object::Integer(value) => value as f32,
                ref other => panic!("unexpected MediaBox entry: {other:?}"),
            }
        })
        .collect()
}

fn options(dir: &TempDir, keep_annotated: bool) -> BatchOptions {
    BatchOptions {
        directory: dir.path().to_path_buf(),
        keep_annotated,
        reveal_after: false,
    }
}

#[test]
fn merges_in_natural_order_and_conserves_pages() {
    let dir = TempDir::new().expect("failed to create temp directory");

    // Created out of order on purpose; the widths identify the sources
    write_pdf(&dir.path().join("Lecture 2.pdf"), 3, 500.0);
    write_pdf(&dir.path().join("Lecture 10.pdf"), 1, 400.0);
    write_pdf(&dir.path().join("Lecture 1.pdf"), 2, 612.0);

    let summary = run_batch(&options(&dir, false)).expect("batch failed");

    assert_eq!(summary.input_count, 3);
    assert_eq!(summary.page_count, 6);

    let merged = dir.path().join(MERGED_FILE_NAME);
    assert!(merged.exists());
    assert_eq!(count_pages(&merged).expect("count failed"), 6);

    let widths = page_widths(&merged);
    let expected = [612.0, 612.0, 500.0, 500.0, 500.0, 400.0];
    assert_eq!(widths.len(), expected.len());
    for (got, want) in widths.iter().zip(expected.iter()) {
        assert!(
            (got - want).abs() < 0.1,
            "page order mismatch: got {widths:?}"
        );
    }
}

#[test]
fn empty_directory_fails_with_no_input() {
    let dir = TempDir::new().expect("failed to create temp directory");

    let result = run_batch(&options(&dir, false));
    assert!(matches!(result, Err(Error::NoInput(_))));
    assert!(!dir.path().join(MERGED_FILE_NAME).exists());
}

#[test]
fn ephemeral_mode_leaves_only_the_merged_output() {
    let dir = TempDir::new().expect("failed to create temp directory");
    write_pdf(&dir.path().join("a.pdf"), 1, 612.0);
    write_pdf(&dir.path().join("b.pdf"), 2, 612.0);

    run_batch(&options(&dir, false)).expect("batch failed");

    assert!(dir.path().join(MERGED_FILE_NAME).exists());
    assert!(!dir.path().join(ANNOTATED_DIR_NAME).exists());

    for entry in fs::read_dir(dir.path()).expect("read_dir failed") {
        let name = entry.expect("dir entry").file_name();
        let name = name.to_string_lossy();
        assert!(
            !name.starts_with(ARTIFACT_PREFIX),
            "stray intermediate left behind: {name}"
        );
    }
}

#[test]
fn keep_mode_persists_the_stamped_copies() {
    let dir = TempDir::new().expect("failed to create temp directory");
    write_pdf(&dir.path().join("a.pdf"), 1, 612.0);
    write_pdf(&dir.path().join("b.pdf"), 2, 612.0);

    run_batch(&options(&dir, true)).expect("batch failed");

    assert!(dir.path().join(MERGED_FILE_NAME).exists());

    let annotated = dir.path().join(ANNOTATED_DIR_NAME);
    let a = annotated.join("annotated_a.pdf");
    let b = annotated.join("annotated_b.pdf");
    assert!(a.exists());
    assert!(b.exists());
    assert_eq!(count_pages(&a).expect("count failed"), 1);
    assert_eq!(count_pages(&b).expect("count failed"), 2);
}

#[test]
fn corrupt_input_fails_the_batch_and_leaves_existing_output_untouched() {
    let dir = TempDir::new().expect("failed to create temp directory");
    write_pdf(&dir.path().join("Lecture 1.pdf"), 1, 612.0);
    fs::write(dir.path().join("Lecture 2.pdf"), b"not a pdf").expect("write failed");
    write_pdf(&dir.path().join("Lecture 3.pdf"), 1, 612.0);

    let merged = dir.path().join(MERGED_FILE_NAME);
    fs::write(&merged, b"previous packet").expect("write failed");

    let result = run_batch(&options(&dir, false));
    match result {
        Err(Error::DocumentOpen { path, .. }) => {
            assert_eq!(path, dir.path().join("Lecture 2.pdf"));
        }
        other => panic!("expected DocumentOpen, got {other:?}"),
    }

    let bytes = fs::read(&merged).expect("read failed");
    assert_eq!(bytes, b"previous packet");
}

#[test]
fn rerun_does_not_ingest_its_own_output() {
    let dir = TempDir::new().expect("failed to create temp directory");
    write_pdf(&dir.path().join("a.pdf"), 2, 612.0);
    write_pdf(&dir.path().join("b.pdf"), 3, 612.0);

    let first = run_batch(&options(&dir, false)).expect("first run failed");
    let second = run_batch(&options(&dir, false)).expect("second run failed");

    assert_eq!(first.page_count, 5);
    assert_eq!(second.input_count, first.input_count);
    assert_eq!(second.page_count, first.page_count);
}

#[test]
fn zero_page_input_fails_the_batch() {
    let dir = TempDir::new().expect("failed to create temp directory");
    write_pdf(&dir.path().join("empty.pdf"), 0, 612.0);

    let result = run_batch(&options(&dir, false));
    assert!(matches!(result, Err(Error::EmptyPdf(_))));
    assert!(!dir.path().join(MERGED_FILE_NAME).exists());
}

#[test]
fn stamping_preserves_page_count_and_draws_the_label() {
    let dir = TempDir::new().expect("failed to create temp directory");
    let input = dir.path().join("Notes 1.pdf");
    write_pdf(&input, 2, 612.0);

    let mut stamped = stamp_document(&input, "Notes 1.pdf").expect("stamp failed");
    let output = dir.path().join("stamped.pdf");
    stamped.save(&output).expect("save failed");

    let doc = Document::load(&output).expect("load failed");
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 2);

    for (_, page_id) in pages {
        let content = doc.get_page_content(page_id).expect("page content");
        let text = String::from_utf8_lossy(&content);
        assert!(text.contains("re f"), "backing patch missing");
        assert!(text.contains("(Notes 1.pdf) Tj"), "label missing");
    }
}
