//! Branded performance report
//!
//! Vertical layout is computed top-down: each block starts where the previous
//! one ended plus a fixed margin, so an optional logo pushes everything below
//! it down without overlap.

use chrono::{DateTime, Utc};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use log::{debug, warn};
use std::io::{self, Write};
use std::ops::Range;

use super::pdf::{Font, PdfBuilder, PdfImage};
use crate::branding::BrandingAsset;
use crate::core::constants::export_names::{FALLBACK_TENANT, REPORT_TABLE_HEADER};
use crate::core::constants::report_layout::*;
use crate::workspace::{ChannelRecord, WorkspaceSnapshot};

/// Longest source label before it is cut to fit its column
const MAX_SOURCE_CHARS: usize = 48;
/// Distance from a row's top edge to its text baseline
const ROW_BASELINE_OFFSET: f64 = 5.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoPlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Rows of the table drawn on one page
#[derive(Debug, Clone, PartialEq)]
pub struct TableChunk {
    pub page: usize,
    pub top: f64,
    pub rows: Range<usize>,
}

/// Start positions of the report blocks, in millimetres from the page top.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub logo: Option<LogoPlacement>,
    pub title_y: f64,
    pub subtitle_y: f64,
    pub table_y: f64,
}

impl ReportLayout {
    /// Lay out the header blocks for a logo of `logo_size_px` (if any) drawn
    /// `logo_width` millimetres wide.
    pub fn compute(logo_size_px: Option<(u32, u32)>, logo_width: f64) -> Self {
        let logo = logo_size_px
            .filter(|&(w, h)| w > 0 && h > 0)
            .map(|(w, h)| {
                let mut width = logo_width;
                let mut height = width * f64::from(h) / f64::from(w);
                if height > MAX_LOGO_HEIGHT {
                    width *= MAX_LOGO_HEIGHT / height;
                    height = MAX_LOGO_HEIGHT;
                }
                LogoPlacement {
                    x: LEFT_MARGIN,
                    y: TOP_MARGIN,
                    width,
                    height,
                }
            });

        let title_y = match &logo {
            Some(placement) => placement.y + placement.height + BLOCK_MARGIN,
            None => TITLE_OFFSET_WITHOUT_LOGO,
        };
        let subtitle_y = title_y + SUBTITLE_GAP;
        let table_y = subtitle_y + TABLE_GAP;

        Self {
            logo,
            title_y,
            subtitle_y,
            table_y,
        }
    }

    /// Split `row_count` data rows over pages. Every page repeats the header
    /// row, so a page holding `n` rows needs `n + 1` row heights.
    pub fn table_chunks(&self, row_count: usize) -> Vec<TableChunk> {
        let mut chunks = Vec::new();
        let mut page = 0;
        let mut top = self.table_y;
        let mut start = 0;

        loop {
            let capacity = data_rows_fitting(top);
            if capacity == 0 && page == 0 {
                page = 1;
                top = TOP_MARGIN;
                continue;
            }

            let end = (start + capacity.max(1)).min(row_count);
            chunks.push(TableChunk {
                page,
                top,
                rows: start..end,
            });
            start = end;
            if start >= row_count {
                return chunks;
            }
            page += 1;
            top = TOP_MARGIN;
        }
    }
}

fn data_rows_fitting(top: f64) -> usize {
    let rows = ((PAGE_HEIGHT - BOTTOM_MARGIN - top) / ROW_HEIGHT).floor();
    if rows < 1.0 { 0 } else { rows as usize - 1 }
}

/// Logo pixels flattened onto a white background
struct DecodedLogo {
    width_px: u32,
    height_px: u32,
    rgb: Vec<u8>,
}

/// Decode the branding asset. A malformed asset is logged and skipped; it
/// never fails the report.
fn decode_logo(asset: &BrandingAsset) -> Option<DecodedLogo> {
    let image = match image::load_from_memory(asset.bytes()) {
        Ok(image) => image,
        Err(err) => {
            warn!("Skipping logo: could not decode branding image: {err}");
            return None;
        }
    };

    let rgba = image.to_rgba8();
    let (width_px, height_px) = rgba.dimensions();
    if width_px == 0 || height_px == 0 {
        warn!("Skipping logo: branding image has no pixels");
        return None;
    }

    let mut rgb = Vec::with_capacity(width_px as usize * height_px as usize * 3);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        for channel in [r, g, b] {
            rgb.push(over_white(channel, a));
        }
    }

    Some(DecodedLogo {
        width_px,
        height_px,
        rgb,
    })
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let alpha = u32::from(alpha);
    ((u32::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255) as u8
}

fn compress(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

fn fit_cell(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Render the report for `snapshot` as PDF bytes.
pub fn render_report(
    snapshot: &WorkspaceSnapshot,
    logo: Option<&BrandingAsset>,
    logo_width: f64,
    generated_at: DateTime<Utc>,
) -> Vec<u8> {
    let decoded = logo.and_then(decode_logo);
    let layout = ReportLayout::compute(
        decoded.as_ref().map(|l| (l.width_px, l.height_px)),
        logo_width,
    );
    debug!("Report layout: {layout:?}");

    let company = snapshot.company_name.trim();
    let tenant = if company.is_empty() {
        FALLBACK_TENANT
    } else {
        company
    };
    let title = format!("{tenant} Performance Report");
    let mut pdf = PdfBuilder::new(&title, generated_at);

    if let (Some(decoded), Some(placement)) = (decoded, layout.logo) {
        match compress(&decoded.rgb) {
            Ok(compressed_rgb) => pdf.image(
                PdfImage {
                    width_px: decoded.width_px,
                    height_px: decoded.height_px,
                    compressed_rgb,
                },
                placement.x,
                placement.y,
                placement.width,
                placement.height,
            ),
            Err(err) => warn!("Skipping logo: could not compress image data: {err}"),
        }
    }

    pdf.text(LEFT_MARGIN, layout.title_y, TITLE_FONT_SIZE, Font::Bold, &title);
    pdf.text(
        LEFT_MARGIN,
        layout.subtitle_y,
        SUBTITLE_FONT_SIZE,
        Font::Regular,
        &format!(
            "{tenant} workspace, channel performance as of {} UTC",
            generated_at.format("%Y-%m-%d %H:%M")
        ),
    );

    let records = snapshot.post_level();
    let chunks = layout.table_chunks(records.len());
    for chunk in &chunks {
        while pdf.page_count() <= chunk.page {
            pdf.add_page();
        }
        draw_table_chunk(&mut pdf, chunk, &records[chunk.rows.clone()]);
    }

    let pages = pdf.page_count();
    for page in 0..pages {
        pdf.text_on_page(
            page,
            LEFT_MARGIN,
            FOOTER_BASELINE,
            FOOTER_FONT_SIZE,
            Font::Regular,
            &format!("Page {} of {pages}", page + 1),
        );
    }

    pdf.finish()
}

fn draw_table_chunk(pdf: &mut PdfBuilder, chunk: &TableChunk, records: &[ChannelRecord]) {
    let columns = column_offsets();
    let table_right = columns[2] + COLUMN_WIDTHS[2];

    for (x, label) in columns.iter().zip(REPORT_TABLE_HEADER) {
        pdf.text(
            *x,
            chunk.top + ROW_BASELINE_OFFSET,
            TABLE_FONT_SIZE,
            Font::Bold,
            label,
        );
    }
    pdf.rule(LEFT_MARGIN, table_right, chunk.top + ROW_HEIGHT);

    for (i, record) in records.iter().enumerate() {
        let baseline = chunk.top + (i + 1) as f64 * ROW_HEIGHT + ROW_BASELINE_OFFSET;
        let cells = [
            fit_cell(&record.source, MAX_SOURCE_CHARS),
            record.users.to_string(),
            record.views.to_string(),
        ];
        for (x, cell) in columns.iter().zip(&cells) {
            pdf.text(*x, baseline, TABLE_FONT_SIZE, Font::Regular, cell);
        }
    }
}

fn column_offsets() -> [f64; 3] {
    [
        LEFT_MARGIN,
        LEFT_MARGIN + COLUMN_WIDTHS[0],
        LEFT_MARGIN + COLUMN_WIDTHS[0] + COLUMN_WIDTHS[1],
    ]
}
