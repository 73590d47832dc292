//! PDF painting backend for composed reports.
//!
//! Translates the pure draw commands of a [`Document`] into a PDF through
//! `printpdf`, flipping the top-down layout axis into PDF's bottom-up one
//! and resolving centered text with a Helvetica width approximation. The
//! whole document is rendered to bytes before anything touches the file
//! system, so a failed export never leaves a partial file behind.

use printpdf::{
    path::PaintMode, BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference,
    Rect as PdfRect, Rgb as PdfRgb,
};

use crate::error::{Error, Result};

use super::{Align, Document, DrawOp, Rgb, PAGE_HEIGHT, PAGE_WIDTH};

/// Millimeters per typographic point.
const MM_PER_PT: f32 = 0.352_778;

/// Render a composed document into PDF bytes.
///
/// # Errors
///
/// Returns a report-unavailable error when the backend cannot provide the
/// builtin font or serialize the document.
pub fn render(document: &Document) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        "Blood Sugar Tracker Report",
        mm(PAGE_WIDTH),
        mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| Error::report_unavailable(format!("PDF font unavailable: {err}")))?;

    for (index, page) in document.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = doc.add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
            doc.get_page(page_index).get_layer(layer_index)
        };

        for op in &page.ops {
            paint(&layer, &font, op);
        }
    }

    doc.save_to_bytes()
        .map_err(|err| Error::report_unavailable(format!("PDF serialization failed: {err}")))
}

/// Paint one draw command onto a layer, converting the top-down y axis.
fn paint(layer: &PdfLayerReference, font: &IndirectFontRef, op: &DrawOp) {
    match op {
        DrawOp::FillRect { x, y, w, h, color } => {
            layer.set_fill_color(pdf_color(*color));
            let rect = PdfRect::new(
                mm(*x),
                mm(PAGE_HEIGHT - y - h),
                mm(x + w),
                mm(PAGE_HEIGHT - y),
            )
            .with_mode(PaintMode::Fill);
            layer.add_rect(rect);
        }
        DrawOp::Text {
            x,
            y,
            size,
            color,
            align,
            content,
        } => {
            layer.set_fill_color(pdf_color(*color));
            let left = match align {
                Align::Left => *x,
                Align::Center => x - text_width_mm(content, *size) / 2.0,
            };
            layer.use_text(
                content.clone(),
                (*size).into(),
                mm(left),
                mm(PAGE_HEIGHT - y),
                font,
            );
        }
    }
}

fn mm(value: f32) -> Mm {
    Mm(value.into())
}

fn pdf_color(color: Rgb) -> Color {
    Color::Rgb(PdfRgb::new(
        (f32::from(color.r) / 255.0).into(),
        (f32::from(color.g) / 255.0).into(),
        (f32::from(color.b) / 255.0).into(),
        None,
    ))
}

/// Approximate rendered width of a Helvetica string.
///
/// Good enough for centering headings and footers; per-glyph metrics are
/// not worth carrying for a four-column table.
fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    let ems: f32 = text.chars().map(char_width_em).sum();
    ems * size_pt * MM_PER_PT
}

/// Rough advance width of a character in ems.
fn char_width_em(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.28,
        'f' | 't' | 'r' | 'I' | ' ' | '(' | ')' | '[' | ']' | '-' | '/' => 0.33,
        'm' | 'w' | 'M' | 'W' | '@' | '%' => 0.89,
        'A'..='Z' => 0.72,
        '0'..='9' => 0.56,
        _ => 0.55,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::{ReadingDraft, ReadingKind};
    use crate::report::compose;
    use crate::stats::summarize;
    use chrono::{DateTime, TimeZone, Utc};

    fn generated_on() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap()
    }

    fn sample_readings(count: usize) -> Vec<crate::reading::Reading> {
        (0..count)
            .map(|i| {
                ReadingDraft::new(
                    "2024-06-14",
                    format!("{:02}:00", i % 24),
                    "95",
                    ReadingKind::Fasting,
                )
                .build(generated_on())
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let readings = sample_readings(3);
        let doc = compose(&readings, summarize(&readings), "Last Week", generated_on());

        let bytes = render(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_empty_report() {
        let doc = compose(&[], summarize(&[]), "Last 3 Days", generated_on());
        let bytes = render(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_multi_page_report() {
        let readings = sample_readings(40);
        let doc = compose(&readings, summarize(&readings), "Last Week", generated_on());
        assert!(doc.pages.len() > 1);

        let bytes = render(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_text_width_grows_with_size() {
        let narrow = text_width_mm("Blood Sugar", 10.0);
        let wide = text_width_mm("Blood Sugar", 20.0);
        assert!(wide > narrow * 1.9);
    }

    #[test]
    fn test_text_width_scales_with_length() {
        assert!(text_width_mm("abcdef", 10.0) > text_width_mm("abc", 10.0));
        assert!(text_width_mm("", 10.0) == 0.0);
    }

    #[test]
    fn test_title_fits_on_page() {
        // A 20pt title centered at x=105 must stay inside the page.
        let width = text_width_mm("Blood Sugar Tracker Report", 20.0);
        assert!(width < PAGE_WIDTH);
    }
}
