//! PDF report: title, applicant table and a timestamp footer on landscape A4

use std::fs::File;
use std::io::{BufReader, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDateTime};
use log::{debug, info, warn};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rect, Rgb,
    path::PaintMode,
};

use crate::roster::Applicants;

use super::Exporter;

const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;

/// Millimetres per point
const PT: f32 = 25.4 / 72.0;

const MARGIN: f32 = 24.0 * PT;
const TITLE_SIZE: f32 = 18.0;
const NORMAL_SIZE: f32 = 10.0;
const TABLE_SIZE: f32 = 9.0;
const SPACER: f32 = 12.0 * PT;
const CELL_PADDING: f32 = 6.0 * PT;
const HEADER_HEIGHT: f32 = 18.0 * PT;
const ROW_HEIGHT: f32 = 15.0 * PT;
const GRID_WIDTH: f32 = 0.3;

/// Top of the table on the first page, below the title and spacer
const FIRST_TABLE_TOP: f32 = PAGE_HEIGHT - MARGIN - TITLE_SIZE * PT - SPACER;

const EMPTY_MESSAGE: &str = "표시할 데이터가 없습니다.";

/// Font files probed when none is configured; builtin fonts can't draw Hangul
const FONT_CANDIDATES: &[&str] = &[
    "/System/Library/Fonts/Supplemental/AppleGothic.ttf",
    "/Library/Fonts/AppleGothic.ttf",
    "C:\\Windows\\Fonts\\malgun.ttf",
    "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
    "/usr/share/fonts/nanum/NanumGothic.ttf",
];

/// Where the report's font comes from
#[derive(Debug, Clone, PartialEq, Eq)]
enum FontSource {
    /// Configured file, else the first installed candidate, else builtin
    Auto(Option<PathBuf>),
    /// Helvetica only; non-ASCII text is replaced
    Builtin,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Builtin fonts only cover ASCII reliably
    ascii_only: bool,
}

/// Text the chosen font can draw
fn printable(s: &str, ascii_only: bool) -> String {
    if ascii_only {
        s.chars().map(|c| if c.is_ascii() { c } else { '?' }).collect()
    } else {
        s.to_string()
    }
}

/// Report text, laid out into pages but not drawn yet
struct Report {
    title: String,
    body: Body,
    footer: String,
}

enum Body {
    Message(String),
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
        /// Row span of each page; the header is drawn at the top of every one
        pages: Vec<Range<usize>>,
    },
}

/// PDF writer for the applicant table
pub struct PdfOutput {
    font: FontSource,
    generated_at: NaiveDateTime,
}

impl PdfOutput {
    pub fn new(font_path: Option<PathBuf>) -> Self {
        Self {
            font: FontSource::Auto(font_path),
            generated_at: Local::now().naive_local(),
        }
    }

    /// Report using only the builtin Helvetica fonts
    pub fn builtin() -> Self {
        Self {
            font: FontSource::Builtin,
            generated_at: Local::now().naive_local(),
        }
    }

    /// Fix the footer timestamp
    pub fn with_timestamp(mut self, at: NaiveDateTime) -> Self {
        self.generated_at = at;
        self
    }

    fn load_fonts(&self, doc: &PdfDocumentReference) -> Result<Fonts> {
        let path = match &self.font {
            FontSource::Auto(configured) => resolve_font_path(configured.as_deref()),
            FontSource::Builtin => None,
        };

        if let Some(path) = path {
            debug!("embedding font {}", path.display());
            let file = File::open(&path)
                .with_context(|| format!("Failed to open font: {}", path.display()))?;
            let font = doc
                .add_external_font(BufReader::new(file))
                .map_err(|e| anyhow!("Failed to load font {}: {:?}", path.display(), e))?;
            return Ok(Fonts {
                regular: font.clone(),
                bold: font,
                ascii_only: false,
            });
        }

        if self.font != FontSource::Builtin {
            warn!("no Hangul-capable font found, pass --pdf-font; non-ASCII text will not render");
        }
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| anyhow!("Failed to load builtin font: {:?}", e))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| anyhow!("Failed to load builtin font: {:?}", e))?;
        Ok(Fonts {
            regular,
            bold,
            ascii_only: true,
        })
    }

    fn compose(&self, applicants: &Applicants, ascii_only: bool) -> Report {
        let text = |s: &str| printable(s, ascii_only);

        let body = if applicants.is_empty() {
            Body::Message(text(EMPTY_MESSAGE))
        } else {
            let header: Vec<String> = applicants
                .numbered_header()
                .iter()
                .map(|h| text(h))
                .collect();
            let rows: Vec<Vec<String>> = applicants
                .numbered_rows(&applicants.rows)
                .map(|row| row.iter().map(|c| text(c)).collect())
                .collect();
            let pages = paginate(rows.len());
            Body::Table {
                header,
                rows,
                pages,
            }
        };

        Report {
            title: text(&applicants.report_title()),
            body,
            footer: self.generated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }

    /// Build the document in memory
    pub fn render_to_bytes(&self, applicants: &Applicants) -> Result<Vec<u8>> {
        let title = applicants.report_title();
        let (doc, page, layer) =
            PdfDocument::new(title.as_str(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let fonts = self.load_fonts(&doc)?;
        let report = self.compose(applicants, fonts.ascii_only);

        let mut cursor = Cursor {
            doc: &doc,
            layer: doc.get_page(page).get_layer(layer),
            y: PAGE_HEIGHT - MARGIN,
        };

        cursor.y -= TITLE_SIZE * PT;
        let x = (PAGE_WIDTH - text_width(&report.title, TITLE_SIZE)) / 2.0;
        cursor.layer.use_text(
            report.title.as_str(),
            TITLE_SIZE,
            Mm(x.max(MARGIN)),
            Mm(cursor.y),
            &fonts.bold,
        );
        cursor.y -= SPACER;

        match &report.body {
            Body::Message(message) => {
                cursor.y -= NORMAL_SIZE * PT;
                cursor.layer.use_text(
                    message.as_str(),
                    NORMAL_SIZE,
                    Mm(MARGIN),
                    Mm(cursor.y),
                    &fonts.regular,
                );
            }
            Body::Table {
                header,
                rows,
                pages,
            } => {
                let widths = column_widths(header, rows);
                draw_table(&mut cursor, &fonts, header, rows, pages, &widths);
            }
        }

        cursor.y -= SPACER;
        if cursor.y - NORMAL_SIZE * PT < MARGIN {
            cursor.new_page();
        }
        cursor.y -= NORMAL_SIZE * PT;
        cursor.layer.use_text(
            report.footer.as_str(),
            NORMAL_SIZE,
            Mm(MARGIN),
            Mm(cursor.y),
            &fonts.regular,
        );

        let bytes = doc
            .save_to_bytes()
            .map_err(|e| anyhow!("Failed to write PDF: {:?}", e))?;
        info!("built PDF '{}' with {} row(s)", title, applicants.len());
        Ok(bytes)
    }
}

/// Split table rows into pages, leaving room for the header on each
fn paginate(row_count: usize) -> Vec<Range<usize>> {
    let fit = |room: f32| ((room / ROW_HEIGHT).floor() as usize).max(1);
    let first = fit(FIRST_TABLE_TOP - MARGIN - HEADER_HEIGHT);
    let rest = fit(PAGE_HEIGHT - 2.0 * MARGIN - HEADER_HEIGHT);

    let mut pages = Vec::new();
    let mut start = 0;
    let mut room = first;
    while start < row_count {
        let end = (start + room).min(row_count);
        pages.push(start..end);
        start = end;
        room = rest;
    }
    pages
}

/// First usable font: the configured one, then the installed candidates
fn resolve_font_path(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = configured {
        return Some(path.to_path_buf());
    }
    FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// Rough advance width in mm: ASCII at half an em, everything else a full em
fn text_width(text: &str, size: f32) -> f32 {
    let ems: f32 = text.chars().map(|c| if c.is_ascii() { 0.55 } else { 1.0 }).sum();
    ems * size * PT
}

/// Natural column widths, shrunk proportionally to fit between the margins
fn column_widths(header: &[String], rows: &[Vec<String>]) -> Vec<f32> {
    let mut widths: Vec<f32> = header
        .iter()
        .map(|h| text_width(h, TABLE_SIZE) + 2.0 * CELL_PADDING)
        .collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = w.max(text_width(cell, TABLE_SIZE) + 2.0 * CELL_PADDING);
            }
        }
    }

    let available = PAGE_WIDTH - 2.0 * MARGIN;
    let total: f32 = widths.iter().sum();
    if total > available {
        let scale = available / total;
        widths.iter_mut().for_each(|w| *w *= scale);
    }
    widths
}

struct Cursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    /// Top of the free area, in mm from the page bottom
    y: f32,
}

impl Cursor<'_> {
    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
    }
}

fn draw_table(
    cursor: &mut Cursor<'_>,
    fonts: &Fonts,
    header: &[String],
    rows: &[Vec<String>],
    pages: &[Range<usize>],
    widths: &[f32],
) {
    let left = (PAGE_WIDTH - widths.iter().sum::<f32>()) / 2.0;

    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            cursor.new_page();
        }
        draw_row(cursor, fonts, header, widths, left, HEADER_HEIGHT, true);
        for row in &rows[page.clone()] {
            draw_row(cursor, fonts, row, widths, left, ROW_HEIGHT, false);
        }
    }
}

fn draw_row(
    cursor: &mut Cursor<'_>,
    fonts: &Fonts,
    cells: &[String],
    widths: &[f32],
    left: f32,
    height: f32,
    is_header: bool,
) {
    let top = cursor.y;
    let bottom = top - height;
    let right = left + widths.iter().sum::<f32>();
    let layer = &cursor.layer;

    if is_header {
        layer.set_fill_color(grey(0.83));
        layer.add_rect(
            Rect::new(Mm(left), Mm(bottom), Mm(right), Mm(top)).with_mode(PaintMode::Fill),
        );
    }

    layer.set_fill_color(grey(0.0));
    let baseline = bottom + (height - TABLE_SIZE * PT * 0.7) / 2.0;
    let mut x = left;
    for (cell, width) in cells.iter().zip(widths) {
        let text_x = x + ((width - text_width(cell, TABLE_SIZE)) / 2.0).max(0.0);
        layer.use_text(cell.as_str(), TABLE_SIZE, Mm(text_x), Mm(baseline), &fonts.regular);
        x += width;
    }

    layer.set_outline_color(grey(0.5));
    layer.set_outline_thickness(GRID_WIDTH);
    layer.add_line(segment((left, top), (right, top)));
    layer.add_line(segment((left, bottom), (right, bottom)));
    let mut x = left;
    layer.add_line(segment((x, top), (x, bottom)));
    for width in widths {
        x += width;
        layer.add_line(segment((x, top), (x, bottom)));
    }

    cursor.y = bottom;
}

fn grey(level: f32) -> Color {
    Color::Rgb(Rgb::new(level, level, level, None))
}

fn segment(from: (f32, f32), to: (f32, f32)) -> Line {
    Line {
        points: vec![
            (Point::new(Mm(from.0), Mm(from.1)), false),
            (Point::new(Mm(to.0), Mm(to.1)), false),
        ],
        is_closed: false,
    }
}

impl Exporter for PdfOutput {
    fn render(&self, applicants: &Applicants, writer: &mut dyn Write) -> Result<()> {
        let bytes = self.render_to_bytes(applicants)?;
        writer.write_all(&bytes)?;
        Ok(())
    }
}
