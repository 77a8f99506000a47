//! Minimal PDF writer for text-only analyses
//!
//! Produces an uncompressed PDF 1.4 document using the built-in Helvetica
//! font, so no font embedding is needed. Lines are wrapped by the font's
//! glyph widths, laid out from a fixed top margin at a fixed line height,
//! and continue on new pages when a page fills up.

use std::fmt::Write as _;

/// Millimetres to PDF points
const MM: f32 = 72.0 / 25.4;

/// Helvetica advance widths for WinAnsi codes 32..=126, in 1/1000 em (AFM)
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// Width assumed outside printable ASCII; no Latin-1 Helvetica glyph is wider
const FALLBACK_WIDTH: u32 = 1000;

/// Page geometry and typography for PDF exports
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    /// Page width in points
    pub page_width: f32,
    /// Page height in points
    pub page_height: f32,
    /// Margin on every side, in points
    pub margin: f32,
    /// Distance between consecutive baselines, in points
    pub line_height: f32,
    /// Font size in points
    pub font_size: f32,
}

impl Default for PdfLayout {
    /// A4 portrait, 10 mm margins and line height, 16 pt text
    fn default() -> Self {
        Self {
            page_width: 210.0 * MM,
            page_height: 297.0 * MM,
            margin: 10.0 * MM,
            line_height: 10.0 * MM,
            font_size: 16.0,
        }
    }
}

impl PdfLayout {
    /// Printable line width in 1/1000 em of the font size
    pub fn line_capacity(&self) -> u32 {
        let printable = self.page_width - 2.0 * self.margin;
        let units = (printable * 1000.0 / self.font_size).floor();
        if units >= 1.0 { units as u32 } else { 1 }
    }

    /// Rendered width of `line` in points
    pub fn text_width(&self, line: &str) -> f32 {
        text_units(line) as f32 * self.font_size / 1000.0
    }

    /// Baselines that fit between the top and bottom margins
    pub fn lines_per_page(&self) -> usize {
        let usable = self.page_height - 2.0 * self.margin;
        let extra = (usable / self.line_height).floor();
        if extra >= 0.0 { extra as usize + 1 } else { 1 }
    }

    /// Render `text` into a complete PDF document
    pub fn render(&self, text: &str) -> Vec<u8> {
        let lines = wrap_text(text, self.line_capacity());
        let pages: Vec<&[String]> = if lines.is_empty() {
            vec![lines.as_slice()]
        } else {
            lines.chunks(self.lines_per_page()).collect()
        };

        let mut writer = PdfWriter::new();
        // Objects 1-3 are fixed; each page adds a page object and its content stream
        let page_ids: Vec<usize> = (0..pages.len()).map(|i| 4 + 2 * i).collect();
        let kids = page_ids
            .iter()
            .map(|id| format!("{id} 0 R"))
            .collect::<Vec<_>>()
            .join(" ");

        writer.object("<< /Type /Catalog /Pages 2 0 R >>");
        writer.object(&format!(
            "<< /Type /Pages /Kids [{kids}] /Count {} >>",
            pages.len()
        ));
        writer.object("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>");

        for (page, page_id) in pages.iter().zip(&page_ids) {
            writer.object(&format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                self.page_width,
                self.page_height,
                page_id + 1
            ));
            writer.stream(&self.page_content(page));
        }

        writer.finish()
    }

    fn page_content(&self, lines: &[String]) -> Vec<u8> {
        let mut content = String::new();
        for (index, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let from_top = self.margin + index as f32 * self.line_height;
            let _ = writeln!(
                content,
                "BT /F1 {:.1} Tf {:.2} {:.2} Td ({}) Tj ET",
                self.font_size,
                self.margin,
                self.page_height - from_top,
                escape_text(line)
            );
        }
        encode_latin1(&content)
    }
}

/// Advance width of one character in 1/1000 em
fn glyph_units(c: char) -> u32 {
    u32::from(c)
        .checked_sub(32)
        .and_then(|index| HELVETICA_WIDTHS.get(index as usize))
        .map_or(FALLBACK_WIDTH, |width| u32::from(*width))
}

/// Advance width of `text` in 1/1000 em
pub fn text_units(text: &str) -> u32 {
    text.chars().map(glyph_units).sum()
}

/// Longest prefix of `word` within `max_units`, never less than one character
fn split_to_fit(word: &str, max_units: u32) -> (&str, &str) {
    let mut used = 0;
    for (index, c) in word.char_indices() {
        let width = glyph_units(c);
        if index > 0 && used + width > max_units {
            return word.split_at(index);
        }
        used += width;
    }
    (word, "")
}

/// Word-wrap `text` so no line is wider than `max_units` (1/1000 em).
///
/// Blank lines are kept so paragraph breaks survive. Words wider than a
/// whole line are split.
pub fn wrap_text(text: &str, max_units: u32) -> Vec<String> {
    let max_units = max_units.max(1);
    let space = glyph_units(' ');
    let mut wrapped = Vec::new();

    for source_line in text.lines() {
        let mut current = String::new();
        let mut current_units = 0;

        for mut word in source_line.split_whitespace() {
            while text_units(word) > max_units {
                if !current.is_empty() {
                    wrapped.push(std::mem::take(&mut current));
                    current_units = 0;
                }
                let (head, tail) = split_to_fit(word, max_units);
                wrapped.push(head.to_string());
                word = tail;
            }
            if word.is_empty() {
                continue;
            }

            let word_units = text_units(word);
            let separator = if current.is_empty() { 0 } else { space };
            if current_units + separator + word_units > max_units {
                wrapped.push(std::mem::take(&mut current));
                current_units = 0;
            } else if separator > 0 {
                current.push(' ');
                current_units += separator;
            }
            current.push_str(word);
            current_units += word_units;
        }
        wrapped.push(current);
    }

    while wrapped.last().is_some_and(String::is_empty) {
        wrapped.pop();
    }
    wrapped
}

/// Escape PDF string delimiters
fn escape_text(line: &str) -> String {
    let mut escaped = String::with_capacity(line.len());
    for c in line.chars() {
        if matches!(c, '(' | ')' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Single-byte encoding for the standard font; characters outside Latin-1 become `?`
fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

struct PdfWriter {
    buffer: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut buffer = b"%PDF-1.4\n".to_vec();
        // Binary marker so transfer tools treat the file as binary
        buffer.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");
        Self {
            buffer,
            offsets: Vec::new(),
        }
    }

    fn begin(&mut self) -> usize {
        self.offsets.push(self.buffer.len());
        let id = self.offsets.len();
        self.buffer.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
        id
    }

    fn object(&mut self, body: &str) {
        self.begin();
        self.buffer.extend_from_slice(body.as_bytes());
        self.buffer.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, data: &[u8]) {
        self.begin();
        self.buffer
            .extend_from_slice(format!("<< /Length {} >>\nstream\n", data.len()).as_bytes());
        self.buffer.extend_from_slice(data);
        self.buffer.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn finish(mut self) -> Vec<u8> {
        let xref_offset = self.buffer.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", self.offsets.len() + 1);
        for offset in &self.offsets {
            let _ = write!(xref, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            self.offsets.len() + 1
        );
        self.buffer.extend_from_slice(xref.as_bytes());
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_text(pdf: &[u8]) -> String {
        String::from_utf8_lossy(pdf).into_owned()
    }

    #[test]
    fn test_default_layout_geometry() {
        let layout = PdfLayout::default();
        assert!((33_600..33_700).contains(&layout.line_capacity()));
        assert_eq!(layout.lines_per_page(), 28);
    }

    #[test]
    fn test_glyph_widths() {
        assert_eq!(text_units("W"), 944);
        assert_eq!(text_units("i l"), 222 + 278 + 222);
        assert_eq!(text_units("~"), 584);
        assert_eq!(text_units("é"), FALLBACK_WIDTH);
    }

    #[test]
    fn test_wrap_measures_glyphs() {
        assert_eq!(wrap_text("WWW iii", 3000), ["WWW", "iii"]);
        assert_eq!(wrap_text("iiiiiiiiii", 3000), ["iiiiiiiiii"]);
        assert_eq!(wrap_text("WWWWWWWWWW", 3000), ["WWW", "WWW", "WWW", "W"]);
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "the quick brown fox jumps over the lazy dog";
        let lines = wrap_text(text, 4000);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| text_units(l) <= 4000));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_splits_long_words_and_keeps_paragraphs() {
        let lines = wrap_text("MM MMMMM\n\nMM\n\n", 2000);
        assert_eq!(lines, ["MM", "MM", "MM", "M", "", "MM"]);
    }

    #[test]
    fn test_uppercase_lines_stay_inside_margins() {
        let layout = PdfLayout::default();
        let printable = layout.page_width - 2.0 * layout.margin;
        let lines = wrap_text(
            &"RECOMMENDATION: BUY MSFT WWWW MMMM ".repeat(4),
            layout.line_capacity(),
        );

        assert!(lines.len() > 2);
        for line in &lines {
            assert!(layout.text_width(line) <= printable, "{line} overflows");
        }
    }

    #[test]
    fn test_single_page_document() {
        let pdf = PdfLayout::default().render("Buy now. (Strong) demand\\supply");
        let text = as_text(&pdf);

        assert!(pdf.starts_with(b"%PDF-1.4"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("/Count 1"));
        assert!(text.contains("(Buy now. \\(Strong\\) demand\\\\supply) Tj"));
    }

    #[test]
    fn test_first_line_at_top_margin() {
        let layout = PdfLayout::default();
        let text = as_text(&layout.render("first\nsecond"));
        let first_y = layout.page_height - layout.margin;
        let second_y = first_y - layout.line_height;
        assert!(text.contains(&format!("{:.2} {first_y:.2} Td (first)", layout.margin)));
        assert!(text.contains(&format!("{:.2} {second_y:.2} Td (second)", layout.margin)));
    }

    #[test]
    fn test_overflow_continues_on_new_pages() {
        let layout = PdfLayout::default();
        let body: Vec<String> = (0..60).map(|i| format!("line {i}")).collect();
        let text = as_text(&layout.render(&body.join("\n")));

        assert!(text.contains("/Count 3"));
        assert!(text.contains("/Kids [4 0 R 6 0 R 8 0 R]"));
        assert!(text.contains("(line 59) Tj"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let pdf = PdfLayout::default().render("hello");
        let text = as_text(&pdf);
        let xref_start = text.find("xref\n").unwrap();
        let entries: Vec<usize> = text[xref_start..]
            .lines()
            .skip(3)
            .take_while(|line| line.ends_with(" n "))
            .map(|line| line[..10].parse().unwrap())
            .collect();

        assert_eq!(entries.len(), 5);
        for (index, offset) in entries.iter().enumerate() {
            let expected = format!("{} 0 obj", index + 1);
            assert!(pdf[*offset..].starts_with(expected.as_bytes()));
        }
    }

    #[test]
    fn test_non_latin_characters_are_replaced() {
        let pdf = PdfLayout::default().render("Target ¥ 漢");
        assert!(pdf.windows(3).any(|w| w == b"\xA5 ?"));
    }
}
