//! Cluster plots
//!
//! A plotted cluster has one row per member. Rows share a position axis that
//! starts at the smallest start position in the cluster, and every symbol of
//! a motif (both codons included) is drawn as one coloured cell. Each cluster
//! is written as `cluster_<rank>.png` and `cluster_<rank>.svg`.

use crate::constants::{DEFAULT_NUM_PLOTTED_CLUSTERS, DEFAULT_PLOT_CELL_SIZE};
use crate::report::{ClusterReport, ClusterSummary};
use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use svg::node::element::{Rectangle, Text};
use svg::Document;
use tracing::{debug, info, warn};

const LABEL_WIDTH: f32 = 140.0;
const TITLE_HEIGHT: f32 = 28.0;
const MAX_PNG_WIDTH: u32 = 16_384;
const BACKGROUND: [u8; 3] = [255, 255, 255];

/// Colour assigned to each symbol
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolColors {
    entries: Vec<(u8, [u8; 3])>,
    fallback: [u8; 3],
}

impl Default for SymbolColors {
    fn default() -> Self {
        Self {
            entries: vec![
                (b'A', [0xff, 0x57, 0x33]),
                (b'C', [0x33, 0xff, 0x57]),
                (b'G', [0x33, 0x57, 0xff]),
                (b'T', [0xff, 0xff, 0x33]),
            ],
            fallback: [0, 0, 0],
        }
    }
}

impl SymbolColors {
    /// RGB colour of a symbol (case-insensitive)
    pub fn rgb(&self, symbol: u8) -> [u8; 3] {
        let upper = symbol.to_ascii_uppercase();
        self.entries
            .iter()
            .find(|(s, _)| *s == upper)
            .map(|(_, rgb)| *rgb)
            .unwrap_or(self.fallback)
    }

    /// Colour of a symbol as `#rrggbb`
    pub fn hex(&self, symbol: u8) -> String {
        let [r, g, b] = self.rgb(symbol);
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

/// Drawing parameters
#[derive(Clone, Debug)]
pub struct PlotOptions {
    /// How many top-ranked clusters to draw
    pub num_clusters: usize,
    /// Edge length of one symbol cell in pixels
    pub cell_size: u32,
    /// Symbol colours
    pub colors: SymbolColors,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            num_clusters: DEFAULT_NUM_PLOTTED_CLUSTERS,
            cell_size: DEFAULT_PLOT_CELL_SIZE,
            colors: SymbolColors::default(),
        }
    }
}

/// One member row of a cluster plot
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlotRow {
    /// Sequence the motif came from
    pub sequence_id: String,
    /// Start position in the sequence
    pub start_position: usize,
    /// Column of the first cell, relative to the leftmost member
    pub offset: usize,
    /// Start codon, content and stop codon
    pub symbols: String,
}

/// Row layout of one cluster
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterLayout {
    /// Rank of the cluster in the report
    pub rank: usize,
    /// Rows in member order
    pub rows: Vec<PlotRow>,
    /// Number of columns spanned by all rows
    pub columns: usize,
}

impl ClusterLayout {
    /// Lay out the members of a report cluster
    pub fn from_summary(summary: &ClusterSummary) -> Self {
        let origin = summary
            .entries
            .iter()
            .map(|e| e.start_position())
            .min()
            .unwrap_or(0);

        let rows: Vec<PlotRow> = summary
            .entries
            .iter()
            .map(|e| PlotRow {
                sequence_id: e.sequence_id().to_string(),
                start_position: e.start_position(),
                offset: e.start_position() - origin,
                symbols: format!("{}{}{}", e.start_codon(), e.content(), e.stop_codon()),
            })
            .collect();

        let columns = rows
            .iter()
            .map(|r| r.offset + r.symbols.len())
            .max()
            .unwrap_or(0);

        Self {
            rank: summary.rank,
            rows,
            columns,
        }
    }
}

/// Cell size actually used for a raster of `columns` cells
fn raster_cell_size(columns: usize, requested: u32) -> u32 {
    let columns = columns.max(1) as u64;
    let fit = (MAX_PNG_WIDTH as u64 / columns).max(1) as u32;
    requested.clamp(1, fit.max(1))
}

/// Draw a cluster as a raster image, one cell row per member
pub fn render_png(layout: &ClusterLayout, options: &PlotOptions) -> RgbImage {
    let cell = raster_cell_size(layout.columns, options.cell_size);
    let width = (layout.columns as u32 * cell).max(1);
    let height = (layout.rows.len() as u32 * cell).max(1);
    let margin = cell / 10;

    let mut img = RgbImage::from_pixel(width, height, Rgb(BACKGROUND));
    for (row_index, row) in layout.rows.iter().enumerate() {
        let top = row_index as u32 * cell + margin;
        let bottom = (row_index as u32 + 1) * cell - margin;
        for (column, symbol) in row.symbols.bytes().enumerate() {
            let color = Rgb(options.colors.rgb(symbol));
            let left = (row.offset + column) as u32 * cell;
            for x in left..left + cell {
                for y in top..bottom {
                    img.put_pixel(x, y, color);
                }
            }
        }
    }
    img
}

/// Draw a cluster as an SVG document with labels and symbol letters
pub fn render_svg(layout: &ClusterLayout, options: &PlotOptions) -> Document {
    let cell = options.cell_size.max(1) as f32;
    let width = LABEL_WIDTH + layout.columns as f32 * cell + cell;
    let height = TITLE_HEIGHT + layout.rows.len() as f32 * cell + cell;

    let mut doc = Document::new()
        .set("viewBox", (0, 0, width, height))
        .set("width", width)
        .set("height", height)
        .add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", width)
                .set("height", height)
                .set("fill", "#ffffff"),
        )
        .add(
            Text::new(format!(
                "Cluster {}: {} entries",
                layout.rank,
                layout.rows.len()
            ))
            .set("x", LABEL_WIDTH)
            .set("y", TITLE_HEIGHT * 0.7)
            .set("font-family", "sans-serif")
            .set("font-size", 14)
            .set("fill", "#111827"),
        );

    for (row_index, row) in layout.rows.iter().enumerate() {
        let y = TITLE_HEIGHT + row_index as f32 * cell;
        doc = doc.add(
            Text::new(format!("{} (Start: {})", row.sequence_id, row.start_position))
                .set("x", LABEL_WIDTH - 6.0)
                .set("y", y + cell * 0.75)
                .set("text-anchor", "end")
                .set("font-family", "monospace")
                .set("font-size", cell * 0.7)
                .set("fill", "#374151"),
        );

        for (column, symbol) in row.symbols.bytes().enumerate() {
            let x = LABEL_WIDTH + (row.offset + column) as f32 * cell;
            doc = doc
                .add(
                    Rectangle::new()
                        .set("x", x)
                        .set("y", y + cell * 0.1)
                        .set("width", cell)
                        .set("height", cell * 0.8)
                        .set("fill", options.colors.hex(symbol)),
                )
                .add(
                    Text::new((symbol as char).to_string())
                        .set("x", x + cell * 0.5)
                        .set("y", y + cell * 0.75)
                        .set("text-anchor", "middle")
                        .set("font-family", "monospace")
                        .set("font-size", cell * 0.6)
                        .set("fill", "#ffffff"),
                );
        }
    }
    doc
}

/// Write PNG and SVG plots of the top clusters into a folder
///
/// Returns the paths written, PNG before SVG for each cluster.
pub fn plot_report(report: &ClusterReport, folder: &Path, options: &PlotOptions) -> Result<Vec<PathBuf>> {
    if report.is_empty() {
        warn!("Cluster report is empty; nothing to plot");
        return Ok(Vec::new());
    }

    fs::create_dir_all(folder)
        .with_context(|| format!("Failed to create folder: {}", folder.display()))?;

    let mut written = Vec::new();
    for summary in report.clusters.iter().take(options.num_clusters) {
        let layout = ClusterLayout::from_summary(summary);
        debug!(
            "  cluster {}: {} rows over {} columns",
            layout.rank,
            layout.rows.len(),
            layout.columns
        );

        let png_path = folder.join(format!("cluster_{}.png", layout.rank));
        render_png(&layout, options)
            .save(&png_path)
            .with_context(|| format!("Failed to write plot: {}", png_path.display()))?;
        written.push(png_path);

        let svg_path = folder.join(format!("cluster_{}.svg", layout.rank));
        svg::save(&svg_path, &render_svg(&layout, options))
            .with_context(|| format!("Failed to write plot: {}", svg_path.display()))?;
        written.push(svg_path);
    }

    info!(
        "Saved plots of {} clusters to {}",
        written.len() / 2,
        folder.display()
    );
    Ok(written)
}
