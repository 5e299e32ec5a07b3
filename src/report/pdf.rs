//! Paginated (PDF) report rendering.
//!
//! Rendering happens in two steps: [`layout_pages`] turns the report into
//! positioned, wrapped lines on A4 pages, and [`render_pdf`] draws those
//! lines with the built-in Helvetica fonts.

use super::document::{Block, Bullet, Fact, RankedEntry, ReportDocument, SectionKind};
use crate::error::ReportError;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use serde::Serialize;
use tracing::{debug, warn};

/// Millimetres per typographic point.
const MM_PER_PT: f32 = 0.3528;

/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.5;

/// Page geometry, in millimetres.
#[derive(Debug, Clone, Copy)]
pub struct PageSetup {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
}

impl Default for PageSetup {
    /// A4 with narrow margins.
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineStyle {
    Title,
    Info,
    Heading,
    Subheading,
    Body,
    Footer,
}

impl LineStyle {
    fn font_size(self) -> f32 {
        match self {
            LineStyle::Title => 20.0,
            LineStyle::Heading => 14.0,
            LineStyle::Subheading => 12.0,
            LineStyle::Info => 12.0,
            LineStyle::Body => 11.0,
            LineStyle::Footer => 10.0,
        }
    }

    fn bold(self) -> bool {
        matches!(
            self,
            LineStyle::Title | LineStyle::Heading | LineStyle::Subheading
        )
    }

    /// Vertical space a line of this style takes.
    fn leading_mm(self) -> f32 {
        self.font_size() * MM_PER_PT * 1.4
    }

    /// Extra space before the first line of a block in this style.
    fn space_before_mm(self) -> f32 {
        match self {
            LineStyle::Title => 0.0,
            LineStyle::Heading => 6.0,
            LineStyle::Subheading => 3.0,
            _ => 1.0,
        }
    }
}

/// One line of text at a fixed position. `y_mm` is measured from the
/// bottom of the page, as in PDF coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLine {
    pub style: LineStyle,
    pub text: String,
    pub x_mm: f32,
    pub y_mm: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

/// A report laid out on pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagedDocument {
    pub title: String,
    pub pages: Vec<Page>,
}

impl PagedDocument {
    /// All text in reading order, one line per row.
    pub fn text(&self) -> String {
        self.pages
            .iter()
            .flat_map(|p| &p.lines)
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Text of every line with the given style, in reading order.
    pub fn lines_with_style(&self, style: LineStyle) -> Vec<&str> {
        self.pages
            .iter()
            .flat_map(|p| &p.lines)
            .filter(|l| l.style == style)
            .map(|l| l.text.as_str())
            .collect()
    }
}

struct Layout {
    setup: PageSetup,
    pages: Vec<Page>,
    cursor_mm: f32,
}

impl Layout {
    fn new(setup: PageSetup) -> Self {
        Self {
            setup,
            pages: vec![Page { lines: Vec::new() }],
            cursor_mm: setup.height_mm - setup.margin_mm,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(Page { lines: Vec::new() });
        self.cursor_mm = self.setup.height_mm - self.setup.margin_mm;
    }

    fn max_chars(&self, style: LineStyle, indent_mm: f32) -> usize {
        let usable = self.setup.width_mm - 2.0 * self.setup.margin_mm - indent_mm;
        let glyph = style.font_size() * AVG_GLYPH_EM * MM_PER_PT;
        ((usable / glyph) as usize).max(10)
    }

    /// Place one logical line, wrapping it and breaking pages as needed.
    fn push(&mut self, style: LineStyle, text: &str, indent_mm: f32) {
        let first_page_line = self
            .pages
            .last()
            .map(|p| p.lines.is_empty())
            .unwrap_or(true);
        if !first_page_line {
            self.cursor_mm -= style.space_before_mm();
        }

        let wrapped = wrap(text, self.max_chars(style, indent_mm));
        for (i, row) in wrapped.into_iter().enumerate() {
            if self.cursor_mm - style.leading_mm() < self.setup.margin_mm {
                self.new_page();
            }
            self.cursor_mm -= style.leading_mm();

            // Continuation rows hang under the text, past the list marker.
            let hang = if i > 0 && indent_mm > 0.0 { 4.0 } else { 0.0 };
            let line = PlacedLine {
                style,
                text: row,
                x_mm: self.setup.margin_mm + indent_mm + hang,
                y_mm: self.cursor_mm,
            };
            if let Some(page) = self.pages.last_mut() {
                page.lines.push(line);
            }
        }
    }
}

/// Greedy word wrap. Words longer than a line are kept whole.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut rows = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > max_chars && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }

    rows
}

fn fact_line(fact: &Fact) -> String {
    format!("- {}: {}", fact.label, fact.value_text())
}

fn ranked_line(entry: &RankedEntry) -> String {
    format!(
        "{} {}. {} - {}",
        entry.marker.tag(),
        entry.rank,
        entry.country,
        entry.medals_text()
    )
}

fn bullet_line(bullet: &Bullet) -> String {
    match &bullet.lead {
        Some(lead) => format!("- {}: {}", lead, bullet.text),
        None => format!("- {}", bullet.text),
    }
}

/// Lay the report out on pages.
pub fn layout_pages(document: &ReportDocument, setup: PageSetup) -> PagedDocument {
    const LIST_INDENT_MM: f32 = 5.0;

    let mut layout = Layout::new(setup);

    layout.push(LineStyle::Title, &document.title.to_uppercase(), 0.0);
    layout.push(
        LineStyle::Info,
        &format!("Date: {}", document.date_label()),
        0.0,
    );

    for section in &document.sections {
        layout.push(LineStyle::Heading, &section.heading.to_uppercase(), 0.0);

        let body_style = if section.kind == SectionKind::Footer {
            LineStyle::Footer
        } else {
            LineStyle::Body
        };

        for block in &section.blocks {
            match block {
                Block::Paragraph(text) => layout.push(body_style, text, 0.0),
                Block::Subheading(text) => layout.push(LineStyle::Subheading, text, 0.0),
                Block::Facts(facts) => facts
                    .iter()
                    .for_each(|f| layout.push(body_style, &fact_line(f), LIST_INDENT_MM)),
                Block::Ranking(entries) => entries
                    .iter()
                    .for_each(|e| layout.push(body_style, &ranked_line(e), LIST_INDENT_MM)),
                Block::Bullets(bullets) => bullets
                    .iter()
                    .for_each(|b| layout.push(body_style, &bullet_line(b), LIST_INDENT_MM)),
            }
        }
    }

    debug!("Report laid out on {} pages", layout.pages.len());

    PagedDocument {
        title: document.title.clone(),
        pages: layout.pages,
    }
}

/// WinAnsi characters outside Latin-1 (code points 0x80..=0x9F).
const WIN_ANSI_EXTRAS: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

/// Whether the built-in fonts (WinAnsiEncoding) can draw `c`.
fn is_win_ansi(c: char) -> bool {
    matches!(c as u32, 0x20..=0x7E | 0xA0..=0xFF) || WIN_ANSI_EXTRAS.contains(c)
}

/// Base letter for Latin Extended-A letters that WinAnsi lacks.
fn fold_latin(c: char) -> Option<char> {
    const FOLDS: &[(&str, char)] = &[
        ("ĀĂĄ", 'A'), ("āăą", 'a'), ("ĆĈĊČ", 'C'), ("ćĉċč", 'c'),
        ("ĎĐ", 'D'), ("ďđ", 'd'), ("ĒĔĖĘĚ", 'E'), ("ēĕėęě", 'e'),
        ("ĜĞĠĢ", 'G'), ("ĝğġģ", 'g'), ("ĤĦ", 'H'), ("ĥħ", 'h'),
        ("ĨĪĬĮİ", 'I'), ("ĩīĭįı", 'i'), ("Ĵ", 'J'), ("ĵ", 'j'),
        ("Ķ", 'K'), ("ķ", 'k'), ("ĹĻĽĿŁ", 'L'), ("ĺļľŀł", 'l'),
        ("ŃŅŇ", 'N'), ("ńņň", 'n'), ("ŌŎŐ", 'O'), ("ōŏő", 'o'),
        ("ŔŖŘ", 'R'), ("ŕŗř", 'r'), ("ŚŜŞȘ", 'S'), ("śŝşș", 's'),
        ("ŢŤŦȚ", 'T'), ("ţťŧț", 't'), ("ŨŪŬŮŰŲ", 'U'), ("ũūŭůűų", 'u'),
        ("Ŵ", 'W'), ("ŵ", 'w'), ("Ŷ", 'Y'), ("ŷ", 'y'), ("ŹŻ", 'Z'), ("źż", 'z'),
    ];
    FOLDS
        .iter()
        .find(|(from, _)| from.contains(c))
        .map(|(_, to)| *to)
}

/// Restrict text to what the built-in fonts can draw. Accented Latin
/// letters lose their accent; anything else becomes `?`.
fn pdf_safe(text: &str) -> String {
    let safe: String = text
        .chars()
        .map(|c| {
            if is_win_ansi(c) {
                c
            } else {
                fold_latin(c).unwrap_or('?')
            }
        })
        .collect();

    if safe != text {
        warn!("PDF text changed to fit the built-in font: {:?} -> {:?}", text, safe);
    }
    safe
}

fn pdf_error(err: impl std::fmt::Debug) -> ReportError {
    ReportError::Pdf(format!("{:?}", err))
}

/// Draw a laid-out document and return the PDF bytes.
pub fn render_pdf(paged: &PagedDocument, setup: PageSetup) -> Result<Vec<u8>, ReportError> {
    let width = Mm(setup.width_mm);
    let height = Mm(setup.height_mm);

    let (doc, first_page, first_layer) = PdfDocument::new(&paged.title, width, height, "Page 1");
    let regular: IndirectFontRef = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold: IndirectFontRef = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    let page_count = paged.pages.len();
    for (i, page) in paged.pages.iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, format!("Page {}", i + 1))
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for line in &page.lines {
            let font = if line.style.bold() { &bold } else { &regular };
            layer.use_text(
                pdf_safe(&line.text),
                line.style.font_size(),
                Mm(line.x_mm),
                Mm(line.y_mm),
                font,
            );
        }

        // Page numbers are drawn here, outside the laid-out content.
        layer.use_text(
            format!("Page {} of {}", i + 1, page_count),
            8.0,
            Mm(setup.width_mm - setup.margin_mm - 20.0),
            Mm(setup.margin_mm / 2.0),
            &regular,
        );
    }

    doc.save_to_bytes().map_err(pdf_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MedalRecord, MedalTable};
    use crate::report::assembler::{assemble, ReportSettings};
    use chrono::NaiveDate;

    fn sample_document() -> ReportDocument {
        let table = MedalTable::new(vec![
            MedalRecord::new("United States", 2008, 36, 39, 37, 112),
            MedalRecord::new("China", 2008, 48, 22, 30, 100),
            MedalRecord::new("India", 2008, 1, 0, 2, 3),
        ]);
        let date = NaiveDate::from_ymd_opt(2024, 8, 11).unwrap();
        assemble(&table, &ReportSettings::default(), date)
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("a bb ccc", 4), vec!["a bb", "ccc"]);
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("unbreakable", 4), vec!["unbreakable"]);
    }

    #[test]
    fn test_layout_headings() {
        let paged = layout_pages(&sample_document(), PageSetup::default());
        let headings = paged.lines_with_style(LineStyle::Heading);
        assert_eq!(
            headings,
            vec![
                "EXECUTIVE SUMMARY",
                "TOP PERFORMING COUNTRIES",
                "INDIA'S OLYMPIC PERFORMANCE",
                "IMPORTANT TRENDS WE FOUND",
                "REPORT DETAILS",
            ]
        );
    }

    #[test]
    fn test_layout_ranking_tags() {
        let text = layout_pages(&sample_document(), PageSetup::default()).text();
        assert!(text.contains("[G] 1. United States - 112 medals"));
        assert!(text.contains("[S] 2. China - 100 medals"));
        assert!(text.contains("[B] 3. India - 3 medals"));
    }

    #[test]
    fn test_lines_stay_inside_margins() {
        let setup = PageSetup::default();
        let paged = layout_pages(&sample_document(), setup);

        assert!(paged.pages.len() > 1);
        for line in paged.pages.iter().flat_map(|p| &p.lines) {
            assert!(line.y_mm >= setup.margin_mm);
            assert!(line.y_mm <= setup.height_mm - setup.margin_mm);
        }
    }

    #[test]
    fn test_small_pages_break_more() {
        let small = PageSetup {
            width_mm: 105.0,
            height_mm: 148.0,
            margin_mm: 10.0,
        };
        let a4 = layout_pages(&sample_document(), PageSetup::default());
        let a6 = layout_pages(&sample_document(), small);
        assert!(a6.pages.len() > a4.pages.len());
    }

    #[test]
    fn test_pdf_safe() {
        assert_eq!(pdf_safe("Côte d'Ivoire"), "Côte d'Ivoire");
        assert_eq!(pdf_safe("🥇 Gold"), "? Gold");
    }

    #[test]
    fn test_pdf_safe_keeps_win_ansi_punctuation() {
        let text = "Team\u{2019}s \u{201C}best\u{201D} run \u{2013} 1996\u{2014}2008 \u{2026}";
        assert_eq!(pdf_safe(text), text);
        assert_eq!(pdf_safe("Škoda Žilina"), "Škoda Žilina");
    }

    #[test]
    fn test_pdf_safe_folds_accented_letters() {
        assert_eq!(pdf_safe("Česko"), "Cesko");
        assert_eq!(pdf_safe("Türkiye, Polska Łódź"), "Türkiye, Polska Lódz");
        assert_eq!(pdf_safe("România"), "România");
        assert_eq!(pdf_safe("中国"), "??");
    }

    #[test]
    fn test_render_pdf_bytes() {
        let paged = layout_pages(&sample_document(), PageSetup::default());
        let bytes = render_pdf(&paged, PageSetup::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
