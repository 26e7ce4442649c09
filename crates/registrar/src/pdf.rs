//! Printable schedule export.
//!
//! Writes a minimal PDF 1.4 file by hand: landscape A4 pages, the two
//! standard Helvetica faces (no embedded fonts), and uncompressed content
//! streams. Text is encoded as WinAnsi; characters outside Latin-1 print
//! as `?`.

use crate::db::{ScheduleItem, Student, Weekday};

/// Points per millimetre.
const MM: f64 = 72.0 / 25.4;

const PAGE_WIDTH: f64 = 841.89;
const PAGE_HEIGHT: f64 = 595.28;

const MARGIN_SIDE: f64 = 10.0 * MM;
const MARGIN_TOP: f64 = 15.0 * MM;
/// Rows are not drawn below this line.
const MARGIN_BOTTOM: f64 = 20.0 * MM;
const CELL_PADDING: f64 = 1.0 * MM;

const TITLE_SIZE: f64 = 16.0;
const TITLE_HEIGHT: f64 = 10.0 * MM;
const GAP: f64 = 5.0 * MM;
const RULE_WIDTH: f64 = 0.5 * MM;

const ROW_HEIGHT: f64 = 8.0 * MM;
const HEADER_SIZE: f64 = 10.0;
const BODY_SIZE: f64 = 9.0;

const HEADERS: [&str; 6] = ["Days", "Time", "Subject", "Title", "Instructor", "Location"];
const COLUMN_PERCENT: [f64; 6] = [12.0, 20.0, 13.0, 25.0, 15.0, 15.0];

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Regular,
    Bold,
}

impl Face {
    fn resource(self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

/// Glyph widths for ' '..='~' in 1/1000 em, from the Adobe core font metrics.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width used for Latin-1 glyphs above ASCII.
const FALLBACK_WIDTH: u16 = 556;

fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7e | 0xa0..=0xff => c as u8,
            _ => b'?',
        })
        .collect()
}

fn text_width(bytes: &[u8], face: Face, size: f64) -> f64 {
    let table = match face {
        Face::Regular => &HELVETICA_WIDTHS,
        Face::Bold => &HELVETICA_BOLD_WIDTHS,
    };

    let units: u32 = bytes
        .iter()
        .map(|&b| match b {
            0x20..=0x7e => u32::from(table[usize::from(b - 0x20)]),
            _ => u32::from(FALLBACK_WIDTH),
        })
        .sum();

    f64::from(units) * size / 1000.0
}

/// Encodes `text`, cutting it down and appending an ellipsis when it is
/// wider than `max_width` points.
fn fit(text: &str, face: Face, size: f64, max_width: f64) -> Vec<u8> {
    let mut bytes = encode(text);
    if text_width(&bytes, face, size) <= max_width {
        return bytes;
    }

    let ellipsis = ELLIPSIS.as_bytes();
    let budget = max_width - text_width(ellipsis, face, size);
    while !bytes.is_empty() && text_width(&bytes, face, size) > budget {
        bytes.pop();
    }
    while bytes.last() == Some(&b' ') {
        bytes.pop();
    }
    bytes.extend_from_slice(ellipsis);
    bytes
}

/// Appends `bytes` as a PDF literal string.
fn push_literal(out: &mut Vec<u8>, bytes: &[u8]) {
    out.push(b'(');
    for &b in bytes {
        if matches!(b, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(b);
    }
    out.push(b')');
}

struct Table {
    left: f64,
    widths: [f64; 6],
}

impl Table {
    fn new() -> Self {
        let printable = PAGE_WIDTH - 2.0 * MARGIN_SIDE;
        Self {
            left: MARGIN_SIDE,
            widths: COLUMN_PERCENT.map(|p| printable * p / 100.0),
        }
    }
}

/// Content of the pages written so far, plus the cursor on the last one.
struct Pages {
    finished: Vec<Vec<u8>>,
    current: Vec<u8>,
    y: f64,
}

impl Pages {
    fn new() -> Self {
        Self {
            finished: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - MARGIN_TOP,
        }
    }

    fn ops(&mut self, ops: &str) {
        self.current.extend_from_slice(ops.as_bytes());
        self.current.push(b'\n');
    }

    fn text(&mut self, face: Face, size: f64, x: f64, baseline: f64, bytes: &[u8]) {
        self.ops(&format!(
            "BT /{} {:.1} Tf {:.2} {:.2} Td",
            face.resource(),
            size,
            x,
            baseline
        ));
        push_literal(&mut self.current, bytes);
        self.ops(" Tj ET");
    }

    fn new_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.finished.push(page);
        self.y = PAGE_HEIGHT - MARGIN_TOP;
    }

    fn title(&mut self, title: &str) {
        let width = PAGE_WIDTH - 2.0 * MARGIN_SIDE;
        let bytes = fit(title, Face::Bold, TITLE_SIZE, width);
        let x = MARGIN_SIDE + (width - text_width(&bytes, Face::Bold, TITLE_SIZE)) / 2.0;
        let baseline = self.y - TITLE_HEIGHT / 2.0 - 0.3 * TITLE_SIZE;

        self.ops("0 g");
        self.text(Face::Bold, TITLE_SIZE, x, baseline, &bytes);
        self.y -= TITLE_HEIGHT + GAP;

        self.ops(&format!(
            "q 0 0.4 0.2 RG {:.2} w {:.2} {:.2} m {:.2} {:.2} l S Q",
            RULE_WIDTH,
            MARGIN_SIDE,
            self.y,
            PAGE_WIDTH - MARGIN_SIDE,
            self.y
        ));
        self.y -= GAP;
    }

    /// Draws one bordered row, breaking to a new page (with a fresh header)
    /// first when the row would run into the bottom margin.
    fn row(&mut self, table: &Table, cells: &[String; 6], header: bool) {
        if !header && self.y - ROW_HEIGHT < MARGIN_BOTTOM {
            self.new_page();
            self.header(table);
        }

        let (face, size, align, paint) = if header {
            (Face::Bold, HEADER_SIZE, Align::Center, "B")
        } else {
            (Face::Regular, BODY_SIZE, Align::Left, "S")
        };

        let bottom = self.y - ROW_HEIGHT;
        let baseline = bottom + ROW_HEIGHT / 2.0 - 0.3 * size;

        self.ops("q 0.2 w 0 G 0.941 g");
        let mut x = table.left;
        for width in table.widths {
            self.ops(&format!(
                "{:.2} {:.2} {:.2} {:.2} re {}",
                x, bottom, width, ROW_HEIGHT, paint
            ));
            x += width;
        }
        self.ops("Q 0 g");

        let mut x = table.left;
        for (cell, width) in cells.iter().zip(table.widths) {
            let bytes = fit(cell, face, size, width - 2.0 * CELL_PADDING);
            let text_x = match align {
                Align::Left => x + CELL_PADDING,
                Align::Center => x + (width - text_width(&bytes, face, size)) / 2.0,
            };
            self.text(face, size, text_x, baseline, &bytes);
            x += width;
        }

        self.y = bottom;
    }

    fn header(&mut self, table: &Table) {
        self.row(table, &HEADERS.map(String::from), true);
    }

    fn finish(mut self) -> Vec<Vec<u8>> {
        self.finished.push(self.current);
        self.finished
    }
}

fn row_cells(item: &ScheduleItem) -> [String; 6] {
    let days: Vec<&str> = item.days.iter().map(|d| Weekday::abbreviation(*d)).collect();

    [
        days.join(", "),
        format!("{} - {}", item.start_time, item.end_time),
        item.subject_code.clone(),
        item.subject_name.clone(),
        format!("{} {}", item.teacher_first_name, item.teacher_last_name),
        format!("{} {}", item.building, item.room_number),
    ]
}

/// Assembles the objects and cross-reference table around the page
/// content streams.
fn assemble(pages: Vec<Vec<u8>>) -> Vec<u8> {
    // 1 catalog, 2 page tree, 3-4 fonts, then a page and a content stream
    // object per page.
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 5 + 2 * i).collect();
    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");

    let mut objects: Vec<Vec<u8>> = vec![
        b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", pages.len()).into_bytes(),
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_vec(),
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_vec(),
    ];

    for (content, page_id) in pages.into_iter().zip(&page_ids) {
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                page_id + 1
            )
            .into_bytes(),
        );

        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend_from_slice(&content);
        stream.extend_from_slice(b"\nendstream");
        objects.push(stream);
    }

    let mut out = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_at = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for offset in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );

    out
}

/// Renders a student's schedule as a PDF document.
///
/// Items are printed in the order given; callers pass them ordered by
/// first meeting day, then start time.
pub fn render_schedule(student: &Student, items: &[ScheduleItem]) -> Vec<u8> {
    let table = Table::new();
    let mut pages = Pages::new();

    pages.title(&format!(
        "Schedule for {} {} ({})",
        student.first_name, student.last_name, student.student_id
    ));
    pages.header(&table);
    for item in items {
        pages.row(&table, &row_cells(item), false);
    }

    assemble(pages.finish())
}
