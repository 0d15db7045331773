//! Minimal PDF 1.4 writer
//!
//! Just enough of the format for the performance report: Helvetica text in
//! two weights, thin rules and at most one RGB image per document. Positions
//! are given in millimetres from the top-left corner of an A4 page.

use chrono::{DateTime, Utc};

use crate::core::constants::report_layout::{PAGE_HEIGHT, PAGE_WIDTH};

const POINTS_PER_MM: f64 = 72.0 / 25.4;
const IMAGE_NAME: &str = "Im1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// Flate-compressed 8-bit RGB pixels
#[derive(Debug, Clone)]
pub struct PdfImage {
    pub width_px: u32,
    pub height_px: u32,
    pub compressed_rgb: Vec<u8>,
}

#[derive(Debug)]
pub struct PdfBuilder {
    pages: Vec<Vec<u8>>,
    image: Option<PdfImage>,
    title: String,
    created_at: DateTime<Utc>,
}

impl PdfBuilder {
    pub fn new(title: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            pages: vec![Vec::new()],
            image: None,
            title: title.to_string(),
            created_at,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Start a new page; subsequent drawing goes there.
    pub fn add_page(&mut self) {
        self.pages.push(Vec::new());
    }

    /// Draw `text` with its baseline at `y` on the current page.
    pub fn text(&mut self, x: f64, y: f64, size: f64, font: Font, text: &str) {
        let op = text_op(x, y, size, font, text);
        self.current_page().extend(op);
    }

    /// Draw `text` on an earlier page. Out-of-range pages are ignored.
    pub fn text_on_page(&mut self, page: usize, x: f64, y: f64, size: f64, font: Font, text: &str) {
        if let Some(content) = self.pages.get_mut(page) {
            content.extend(text_op(x, y, size, font, text));
        }
    }

    /// Horizontal rule from `x1` to `x2` at `y`
    pub fn rule(&mut self, x1: f64, x2: f64, y: f64) {
        let line = format!(
            "0.3 w 0.6 G {} {} m {} {} l S 0 G\n",
            number(to_points(x1)),
            number(flip_y(y)),
            number(to_points(x2)),
            number(flip_y(y))
        );
        self.current_page().extend(line.into_bytes());
    }

    /// Place `image` with its top-left corner at (`x`, `y`).
    pub fn image(&mut self, image: PdfImage, x: f64, y: f64, width: f64, height: f64) {
        let placement = format!(
            "q {} 0 0 {} {} {} cm /{IMAGE_NAME} Do Q\n",
            number(to_points(width)),
            number(to_points(height)),
            number(to_points(x)),
            number(flip_y(y + height))
        );
        self.current_page().extend(placement.into_bytes());
        self.image = Some(image);
    }

    /// Serialize the document.
    pub fn finish(self) -> Vec<u8> {
        let mut objects: Vec<Vec<u8>> = Vec::new();
        let page_count = self.pages.len();

        // 1 catalog, 2 page tree, 3-4 fonts, 5 info, 6 image (optional), then
        // one page and one content stream per page
        let first_page_id = if self.image.is_some() { 7 } else { 6 };
        let page_ids: Vec<usize> = (0..page_count).map(|i| first_page_id + i * 2).collect();

        objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());

        let kids: Vec<String> = page_ids.iter().map(|id| format!("{id} 0 R")).collect();
        objects.push(
            format!(
                "<< /Type /Pages /Kids [{}] /Count {page_count} >>",
                kids.join(" ")
            )
            .into_bytes(),
        );

        for base in ["Helvetica", "Helvetica-Bold"] {
            objects.push(
                format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{base} /Encoding /WinAnsiEncoding >>"
                )
                .into_bytes(),
            );
        }

        let mut info = b"<< /Title (".to_vec();
        info.extend(escape_text(&self.title));
        info.extend(
            format!(
                ") /Producer (arbflow {}) /CreationDate (D:{}Z) >>",
                env!("CARGO_PKG_VERSION"),
                self.created_at.format("%Y%m%d%H%M%S")
            )
            .into_bytes(),
        );
        objects.push(info);

        let xobjects = match &self.image {
            Some(image) => {
                let mut stream = format!(
                    "<< /Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceRGB \
                     /BitsPerComponent 8 /Filter /FlateDecode /Length {} >>\nstream\n",
                    image.width_px,
                    image.height_px,
                    image.compressed_rgb.len()
                )
                .into_bytes();
                stream.extend_from_slice(&image.compressed_rgb);
                stream.extend_from_slice(b"\nendstream");
                objects.push(stream);
                format!(" /XObject << /{IMAGE_NAME} 6 0 R >>")
            }
            None => String::new(),
        };

        for (page, content) in page_ids.iter().zip(self.pages) {
            objects.push(
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >>{xobjects} >> /Contents {} 0 R >>",
                    number(to_points(PAGE_WIDTH)),
                    number(to_points(PAGE_HEIGHT)),
                    page + 1
                )
                .into_bytes(),
            );
            let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
            stream.extend(content);
            stream.extend_from_slice(b"endstream");
            objects.push(stream);
        }

        let mut out = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (index, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend(format!("{} 0 obj\n", index + 1).into_bytes());
            out.extend_from_slice(body);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_offset = out.len();
        out.extend(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).into_bytes());
        for offset in offsets {
            out.extend(format!("{offset:010} 00000 n \n").into_bytes());
        }
        out.extend(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R /Info 5 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
                objects.len() + 1
            )
            .into_bytes(),
        );
        out
    }

    fn current_page(&mut self) -> &mut Vec<u8> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

fn text_op(x: f64, y: f64, size: f64, font: Font, text: &str) -> Vec<u8> {
    let mut op = format!(
        "BT /{} {} Tf {} {} Td (",
        font.resource_name(),
        number(size),
        number(to_points(x)),
        number(flip_y(y))
    )
    .into_bytes();
    op.extend(escape_text(text));
    op.extend_from_slice(b") Tj ET\n");
    op
}

fn to_points(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

fn flip_y(mm_from_top: f64) -> f64 {
    to_points(PAGE_HEIGHT - mm_from_top)
}

fn number(value: f64) -> String {
    let formatted = format!("{value:.2}");
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Encode a literal string for WinAnsi Helvetica. Characters outside Latin-1
/// are replaced with `?`.
fn escape_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(ch as u8);
            }
            '\n' | '\r' | '\t' => out.push(b' '),
            c if (c as u32) < 0x20 => {}
            c if (c as u32) <= 0xFF => out.push(c as u32 as u8),
            _ => out.push(b'?'),
        }
    }
    out
}
