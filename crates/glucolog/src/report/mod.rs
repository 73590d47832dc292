//! Report generation for glucolog.
//!
//! [`compose`] lays out the report as pure draw commands on A4 portrait
//! pages (millimeters, origin top-left, y growing downward); the [`pdf`]
//! backend turns a composed [`Document`] into PDF bytes. Keeping layout and
//! painting apart makes every coordinate testable without a PDF library.
//!
//! The value color bands here are deliberately not the same policy as the
//! table view's [`crate::stats::Level`]: at 180 mg/dL the table says
//! Elevated while the report prints yellow, and the two definitions are
//! kept independent.

pub mod pdf;

use chrono::{DateTime, NaiveDate, Utc};

use crate::reading::{Reading, DATE_FORMAT};
use crate::stats::Summary;

pub use pdf::render;

/// Page width in millimeters (A4 portrait).
pub const PAGE_WIDTH: f32 = 210.0;

/// Page height in millimeters (A4 portrait).
pub const PAGE_HEIGHT: f32 = 297.0;

/// Lowest row start allowed before breaking to a new page.
const PAGE_BOTTOM: f32 = 270.0;

/// Row start on the first page, just under the table header bar.
const FIRST_ROW_Y: f32 = 90.0;

/// Row start on continuation pages.
const CONTINUATION_ROW_Y: f32 = 20.0;

/// Height of one table row in millimeters.
const ROW_HEIGHT: f32 = 8.0;

const TITLE_BLUE: Rgb = Rgb::new(0, 102, 204);
const HEADER_GREY: Rgb = Rgb::new(100, 100, 100);
const FOOTER_GREY: Rgb = Rgb::new(150, 150, 150);
const STATS_FILL: Rgb = Rgb::new(240, 248, 255);
const ROW_EVEN: Rgb = Rgb::new(250, 250, 250);
const RED: Rgb = Rgb::new(220, 38, 38);
const GREEN: Rgb = Rgb::new(34, 197, 94);
const YELLOW: Rgb = Rgb::new(234, 179, 8);
const BLACK: Rgb = Rgb::new(0, 0, 0);
const WHITE: Rgb = Rgb::new(255, 255, 255);

/// An RGB color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Construct a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Horizontal anchoring of a text draw command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// `x` is the left edge of the text.
    Left,
    /// `x` is the horizontal center of the text.
    Center,
}

/// One drawing instruction for the page painter.
///
/// Coordinates are millimeters from the top-left corner of the page; text
/// `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// A filled rectangle.
    FillRect {
        /// Left edge.
        x: f32,
        /// Top edge.
        y: f32,
        /// Width.
        w: f32,
        /// Height.
        h: f32,
        /// Fill color.
        color: Rgb,
    },
    /// A run of text.
    Text {
        /// Anchor x position, interpreted per `align`.
        x: f32,
        /// Baseline y position.
        y: f32,
        /// Font size in points.
        size: f32,
        /// Text color.
        color: Rgb,
        /// Horizontal anchoring.
        align: Align,
        /// The text itself.
        content: String,
    },
}

/// One page of draw commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Commands in paint order.
    pub ops: Vec<DrawOp>,
}

/// A composed multi-page report, ready for a painting backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Pages in order.
    pub pages: Vec<Page>,
}

/// Color band for a reading value in the report body.
///
/// Red outside 70–180, green in the 70–100 fasting range, yellow for
/// everything else (including values that fail to parse).
#[must_use]
pub fn value_color(value: f64) -> Rgb {
    if value < 70.0 || value > 180.0 {
        RED
    } else if (70.0..=100.0).contains(&value) {
        GREEN
    } else {
        YELLOW
    }
}

/// File name of the exported artifact for the given export date.
#[must_use]
pub fn report_file_name(date: NaiveDate) -> String {
    format!("blood-sugar-report-{}.pdf", date.format(DATE_FORMAT))
}

/// Lay out the report for the given readings and statistics.
///
/// Page 1 carries the title block, the statistics box, and the table
/// header; body rows follow at a fixed pitch and spill onto continuation
/// pages (without repeating the header bar). Every page gets the
/// disclaimer and page-number footer.
#[must_use]
pub fn compose(
    readings: &[Reading],
    summary: Summary,
    period_label: &str,
    generated_on: DateTime<Utc>,
) -> Document {
    let mut pages = vec![Page::default()];
    let page = pages.last_mut().unwrap_or_else(|| unreachable!());

    // Title block
    page.ops.push(DrawOp::Text {
        x: 105.0,
        y: 20.0,
        size: 20.0,
        color: TITLE_BLUE,
        align: Align::Center,
        content: "Blood Sugar Tracker Report".to_string(),
    });
    page.ops.push(DrawOp::Text {
        x: 105.0,
        y: 28.0,
        size: 10.0,
        color: HEADER_GREY,
        align: Align::Center,
        content: format!("Generated: {}", generated_on.format(DATE_FORMAT)),
    });
    page.ops.push(DrawOp::Text {
        x: 20.0,
        y: 40.0,
        size: 12.0,
        color: BLACK,
        align: Align::Left,
        content: format!("Period: {period_label}"),
    });

    // Statistics box
    page.ops.push(DrawOp::FillRect {
        x: 20.0,
        y: 45.0,
        w: 170.0,
        h: 25.0,
        color: STATS_FILL,
    });
    let stats_lines = [
        (25.0, 53.0, format!("Total Readings: {}", readings.len())),
        (25.0, 60.0, format!("Average: {:.1} mg/dL", summary.avg)),
        (80.0, 60.0, format!("Min: {} mg/dL", format_value(summary.min))),
        (130.0, 60.0, format!("Max: {} mg/dL", format_value(summary.max))),
    ];
    for (x, y, content) in stats_lines {
        page.ops.push(DrawOp::Text {
            x,
            y,
            size: 11.0,
            color: BLACK,
            align: Align::Left,
            content,
        });
    }

    // Table header bar, first page only
    page.ops.push(DrawOp::FillRect {
        x: 20.0,
        y: 80.0,
        w: 170.0,
        h: ROW_HEIGHT,
        color: TITLE_BLUE,
    });
    for (x, caption) in [
        (25.0, "Date"),
        (60.0, "Time"),
        (90.0, "Reading (mg/dL)"),
        (140.0, "Type"),
    ] {
        page.ops.push(DrawOp::Text {
            x,
            y: 85.0,
            size: 10.0,
            color: WHITE,
            align: Align::Left,
            content: caption.to_string(),
        });
    }

    // Body rows
    let mut y = FIRST_ROW_Y;
    for (index, reading) in readings.iter().enumerate() {
        if y > PAGE_BOTTOM {
            pages.push(Page::default());
            y = CONTINUATION_ROW_Y;
        }
        let page = pages.last_mut().unwrap_or_else(|| unreachable!());

        let background = if index % 2 == 0 { ROW_EVEN } else { WHITE };
        page.ops.push(DrawOp::FillRect {
            x: 20.0,
            y,
            w: 170.0,
            h: ROW_HEIGHT,
            color: background,
        });

        let baseline = y + 5.0;
        page.ops.push(DrawOp::Text {
            x: 25.0,
            y: baseline,
            size: 10.0,
            color: BLACK,
            align: Align::Left,
            content: reading.display_date(),
        });
        page.ops.push(DrawOp::Text {
            x: 60.0,
            y: baseline,
            size: 10.0,
            color: BLACK,
            align: Align::Left,
            content: reading.time.clone(),
        });
        page.ops.push(DrawOp::Text {
            x: 100.0,
            y: baseline,
            size: 10.0,
            color: value_color(reading.value_mgdl()),
            align: Align::Left,
            content: reading.value.clone(),
        });
        page.ops.push(DrawOp::Text {
            x: 140.0,
            y: baseline,
            size: 10.0,
            color: BLACK,
            align: Align::Left,
            content: reading.kind.label().to_string(),
        });

        y += ROW_HEIGHT;
    }

    // Footer on every page, numbered once the page count is known
    let total = pages.len();
    for (index, page) in pages.iter_mut().enumerate() {
        page.ops.push(DrawOp::Text {
            x: 105.0,
            y: 285.0,
            size: 8.0,
            color: FOOTER_GREY,
            align: Align::Center,
            content:
                "Disclaimer: This is for tracking purposes only. Consult your healthcare provider."
                    .to_string(),
        });
        page.ops.push(DrawOp::Text {
            x: 105.0,
            y: 290.0,
            size: 8.0,
            color: FOOTER_GREY,
            align: Align::Center,
            content: format!("Page {} of {}", index + 1, total),
        });
    }

    Document { pages }
}

/// Print a statistic the way the summary block shows it: whole numbers
/// without a decimal point, anything else as-is.
fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::{ReadingDraft, ReadingKind};
    use crate::stats::summarize;
    use chrono::TimeZone;

    fn generated_on() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap()
    }

    fn reading(date: &str, time: &str, value: &str) -> Reading {
        ReadingDraft::new(date, time, value, ReadingKind::Fasting)
            .build(generated_on())
            .unwrap()
    }

    fn texts(page: &Page) -> Vec<&str> {
        page.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { content, .. } => Some(content.as_str()),
                DrawOp::FillRect { .. } => None,
            })
            .collect()
    }

    fn find_text<'a>(page: &'a Page, needle: &str) -> &'a DrawOp {
        page.ops
            .iter()
            .find(|op| matches!(op, DrawOp::Text { content, .. } if content == needle))
            .unwrap_or_else(|| panic!("no text op '{needle}'"))
    }

    #[test]
    fn test_value_color_bands() {
        assert_eq!(value_color(69.9), RED);
        assert_eq!(value_color(70.0), GREEN);
        assert_eq!(value_color(100.0), GREEN);
        assert_eq!(value_color(100.1), YELLOW);
        assert_eq!(value_color(180.0), YELLOW);
        assert_eq!(value_color(180.1), RED);
    }

    #[test]
    fn test_value_color_non_numeric_is_yellow() {
        assert_eq!(value_color(f64::NAN), YELLOW);
    }

    #[test]
    fn test_report_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(report_file_name(date), "blood-sugar-report-2024-06-15.pdf");
    }

    #[test]
    fn test_header_block() {
        let readings = vec![reading("2024-06-14", "08:00", "95")];
        let summary = summarize(&readings);
        let doc = compose(&readings, summary, "Last Week", generated_on());

        assert_eq!(doc.pages.len(), 1);
        let page = &doc.pages[0];

        let title = find_text(page, "Blood Sugar Tracker Report");
        assert!(matches!(
            title,
            DrawOp::Text { x, y, size, color, align: Align::Center, .. }
                if *x == 105.0 && *y == 20.0 && *size == 20.0 && *color == TITLE_BLUE
        ));

        assert!(texts(page).contains(&"Generated: 2024-06-15"));
        assert!(texts(page).contains(&"Period: Last Week"));
    }

    #[test]
    fn test_statistics_block() {
        let readings = vec![
            reading("2024-06-14", "08:00", "90"),
            reading("2024-06-14", "12:00", "110"),
            reading("2024-06-14", "20:00", "70"),
        ];
        let summary = summarize(&readings);
        let doc = compose(&readings, summary, "Last Week", generated_on());
        let page = &doc.pages[0];

        assert!(page.ops.contains(&DrawOp::FillRect {
            x: 20.0,
            y: 45.0,
            w: 170.0,
            h: 25.0,
            color: STATS_FILL,
        }));
        assert!(texts(page).contains(&"Total Readings: 3"));
        assert!(texts(page).contains(&"Average: 90.0 mg/dL"));
        assert!(texts(page).contains(&"Min: 70 mg/dL"));
        assert!(texts(page).contains(&"Max: 110 mg/dL"));
    }

    #[test]
    fn test_average_keeps_one_decimal() {
        let readings = vec![
            reading("2024-06-14", "08:00", "95"),
            reading("2024-06-14", "20:00", "190"),
        ];
        let summary = summarize(&readings);
        let doc = compose(&readings, summary, "Last Week", generated_on());

        assert!(texts(&doc.pages[0]).contains(&"Average: 142.5 mg/dL"));
    }

    #[test]
    fn test_table_header_bar() {
        let readings = vec![reading("2024-06-14", "08:00", "95")];
        let doc = compose(&readings, summarize(&readings), "Last Week", generated_on());
        let page = &doc.pages[0];

        assert!(page.ops.contains(&DrawOp::FillRect {
            x: 20.0,
            y: 80.0,
            w: 170.0,
            h: 8.0,
            color: TITLE_BLUE,
        }));
        for caption in ["Date", "Time", "Reading (mg/dL)", "Type"] {
            let op = find_text(page, caption);
            assert!(matches!(
                op,
                DrawOp::Text { y, size, color, .. }
                    if *y == 85.0 && *size == 10.0 && *color == WHITE
            ));
        }
    }

    #[test]
    fn test_row_shading_alternates_by_index() {
        let readings = vec![
            reading("2024-06-14", "08:00", "95"),
            reading("2024-06-13", "08:00", "96"),
            reading("2024-06-12", "08:00", "97"),
        ];
        let doc = compose(&readings, summarize(&readings), "Last Week", generated_on());
        let page = &doc.pages[0];

        let row_fills: Vec<&Rgb> = page
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { y, color, .. } if *y >= FIRST_ROW_Y => Some(color),
                _ => None,
            })
            .collect();
        assert_eq!(row_fills, vec![&ROW_EVEN, &WHITE, &ROW_EVEN]);
    }

    #[test]
    fn test_row_cells() {
        let readings = vec![reading("2024-06-14", "07:30", "190")];
        let doc = compose(&readings, summarize(&readings), "Last Week", generated_on());
        let page = &doc.pages[0];

        let date = find_text(page, "2024-06-14");
        assert!(matches!(date, DrawOp::Text { x, y, .. } if *x == 25.0 && *y == 95.0));
        let time = find_text(page, "07:30");
        assert!(matches!(time, DrawOp::Text { x, .. } if *x == 60.0));
        let value = find_text(page, "190");
        assert!(matches!(
            value,
            DrawOp::Text { x, color, .. } if *x == 100.0 && *color == RED
        ));
        let kind = find_text(page, "Fasting");
        assert!(matches!(
            kind,
            DrawOp::Text { x, color, .. } if *x == 140.0 && *color == BLACK
        ));
    }

    #[test]
    fn test_pagination_boundary() {
        // Rows start at y=90 and advance by 8; the 23rd row lands at y=266
        // and the 24th would start past 270, forcing a second page.
        let fits: Vec<Reading> = (0..23)
            .map(|i| reading("2024-06-14", &format!("{:02}:00", i % 24), "95"))
            .collect();
        let doc = compose(&fits, summarize(&fits), "Last Week", generated_on());
        assert_eq!(doc.pages.len(), 1);

        let spills: Vec<Reading> = (0..24)
            .map(|i| reading("2024-06-14", &format!("{:02}:00", i % 24), "95"))
            .collect();
        let doc = compose(&spills, summarize(&spills), "Last Week", generated_on());
        assert_eq!(doc.pages.len(), 2);

        // The spilled row starts at the top-of-content cursor.
        let second = &doc.pages[1];
        assert!(second.ops.iter().any(|op| matches!(
            op,
            DrawOp::FillRect { y, .. } if *y == CONTINUATION_ROW_Y
        )));
        // The header bar is not repeated on continuation pages.
        assert!(!second
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::FillRect { color, .. } if *color == TITLE_BLUE)));
    }

    #[test]
    fn test_footer_on_every_page() {
        let readings: Vec<Reading> = (0..24)
            .map(|i| reading("2024-06-14", &format!("{:02}:00", i % 24), "95"))
            .collect();
        let doc = compose(&readings, summarize(&readings), "Last Week", generated_on());
        assert_eq!(doc.pages.len(), 2);

        for (index, page) in doc.pages.iter().enumerate() {
            let disclaimer = find_text(
                page,
                "Disclaimer: This is for tracking purposes only. Consult your healthcare provider.",
            );
            assert!(matches!(
                disclaimer,
                DrawOp::Text { y, size, color, .. }
                    if *y == 285.0 && *size == 8.0 && *color == FOOTER_GREY
            ));

            let number = find_text(page, &format!("Page {} of 2", index + 1));
            assert!(matches!(number, DrawOp::Text { y, .. } if *y == 290.0));
        }
    }

    #[test]
    fn test_empty_collection_still_composes() {
        let doc = compose(&[], Summary::EMPTY, "Last 3 Days", generated_on());
        assert_eq!(doc.pages.len(), 1);

        let page = &doc.pages[0];
        assert!(texts(page).contains(&"Total Readings: 0"));
        assert!(texts(page).contains(&"Average: 0.0 mg/dL"));
        assert!(texts(page).contains(&"Page 1 of 1"));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(70.0), "70");
        assert_eq!(format_value(95.5), "95.5");
    }
}
