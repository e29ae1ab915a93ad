//! Stamp font metrics
//!
//! The stamp label is drawn in Helvetica, one of the base fonts every PDF
//! viewer provides, so no font data needs to be embedded. Label widths are
//! measured from the standard AFM glyph widths because the centered x
//! position depends on an accurate measurement.

use lopdf::{Dictionary, Object};

/// Glyph widths for printable ASCII (32..=126) in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Width used for glyphs outside the table.
const DEFAULT_WIDTH: u16 = 556;

/// Font dictionary for the Helvetica base font with WinAnsiEncoding.
pub fn helvetica_font() -> Dictionary {
    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    font
}

/// Measure the rendered width of `text` at `font_size`, in points.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    let milli_ems: u32 = text.chars().map(|c| u32::from(glyph_width(c))).sum();
    milli_ems as f32 * font_size / 1000.0
}

fn glyph_width(c: char) -> u16 {
    let code = c as u32;
    if (32..=126).contains(&code) {
        HELVETICA_WIDTHS[(code - 32) as usize]
    } else {
        DEFAULT_WIDTH
    }
}

/// Escape special characters in PDF literal strings
pub fn escape_pdf_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
        .replace('\r', "\\r")
        .replace('\n', "\\n")
}
