use eframe::egui::Color32;

use crate::color::ColorMap;
use crate::data::model::Spectrogram;
use crate::data::scale::DisplayBounds;

/// Pixels per sample along each axis.
const OVERSAMPLE: usize = 2;

/// Largest texture side we upload.
pub const MAX_RASTER_SIDE: usize = 4096;

// ---------------------------------------------------------------------------
// Cell geometry ("auto"/nearest shading)
// ---------------------------------------------------------------------------

/// Edges of the cells centred on `centers` (ascending): half-way between
/// neighbours, the outer edges pushed out by half the adjacent spacing.
/// A lone centre gets a cell of width 1.
pub fn cell_edges(centers: &[f64]) -> Vec<f64> {
    match centers {
        [] => Vec::new(),
        [only] => vec![only - 0.5, only + 0.5],
        [first, second, ..] => {
            let n = centers.len();
            let last = centers[n - 1];
            let before_last = centers[n - 2];

            let mut edges = Vec::with_capacity(n + 1);
            edges.push(first - (second - first) / 2.0);
            edges.extend(centers.windows(2).map(|w| (w[0] + w[1]) / 2.0));
            edges.push(last + (last - before_last) / 2.0);
            edges
        }
    }
}

/// Index of the cell containing `v`, or `None` outside every cell.
///
/// Cells are half-open `[lo, hi)` between consecutive edges, in either
/// order; the topmost edge itself belongs to the cell ending there.
pub fn cell_index(edges: &[f64], v: f64) -> Option<usize> {
    let spans = || edges.windows(2).map(|w| (w[0].min(w[1]), w[0].max(w[1])));
    if let Some(i) = spans().position(|(lo, hi)| lo <= v && v < hi) {
        return Some(i);
    }
    let (_, top) = extent(edges)?;
    spans().position(|(lo, hi)| hi == top && v == top && lo <= v)
}

/// For each of `pixels` equal slots across `range`, the cells that overlap
/// it. With `descending`, slot 0 sits at the top of the range.
fn pixel_cells(edges: &[f64], range: (f64, f64), pixels: usize, descending: bool) -> Vec<Vec<usize>> {
    let mut slots = vec![Vec::new(); pixels];
    let step = (range.1 - range.0) / pixels as f64;
    if pixels == 0 || step.is_nan() || step <= 0.0 {
        return slots;
    }

    let slot_of = |v: f64| {
        let offset = if descending { range.1 - v } else { v - range.0 };
        offset / step
    };

    for (cell, w) in edges.windows(2).enumerate() {
        let (a, b) = (slot_of(w[0]), slot_of(w[1]));
        let (lo, hi) = (a.min(b), a.max(b));
        if !lo.is_finite() || !hi.is_finite() {
            continue;
        }
        let first = (lo.floor().max(0.0) as usize).min(pixels - 1);
        let last = (hi.ceil() as usize).clamp(first + 1, pixels);
        for slot in &mut slots[first..last] {
            slot.push(cell);
        }
    }
    slots
}

// ---------------------------------------------------------------------------
// Raster
// ---------------------------------------------------------------------------

/// A spectrogram rendered to pixels. Row 0 is the highest frequency.
#[derive(Debug, Clone)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color32>,
    /// Time extent covered by the image (s).
    pub x_range: (f64, f64),
    /// Frequency extent covered by the image (Hz).
    pub y_range: (f64, f64),
}

impl Raster {
    /// Paint every cell onto a uniform pixel grid spanning the cell edges.
    ///
    /// Each cell is placed by its own edges, so an axis that isn't ascending
    /// still draws. Up to `MAX_RASTER_SIDE` pixels per axis; beyond that a
    /// pixel covers several cells and shows the largest of them, which keeps
    /// short transients visible. Pixels no cell reaches are transparent.
    pub fn render(sg: &Spectrogram, bounds: &DisplayBounds, cmap: &ColorMap) -> Self {
        let t_edges = cell_edges(&sg.times_s);
        let f_edges = cell_edges(&sg.frequencies_hz);
        let x_range = extent(&t_edges).unwrap_or((0.0, 1.0));
        let y_range = extent(&f_edges).unwrap_or((0.0, 1.0));

        let width = (sg.n_times() * OVERSAMPLE).clamp(1, MAX_RASTER_SIDE);
        let height = (sg.n_freqs() * OVERSAMPLE).clamp(1, MAX_RASTER_SIDE);

        let columns = pixel_cells(&t_edges, x_range, width, false);
        let rows = pixel_cells(&f_edges, y_range, height, true);

        let mut pixels = Vec::with_capacity(width * height);
        for bins in &rows {
            for samples in &columns {
                let peak = samples
                    .iter()
                    .flat_map(|&t| bins.iter().map(move |&f| (t, f)))
                    .map(|(t, f)| sg.at(t, f))
                    .fold(f64::NAN, f64::max);
                pixels.push(cmap.color_for(peak, bounds.vmin, bounds.vmax));
            }
        }

        log::debug!("Rasterised {}x{} spectrogram into {width}x{height} pixels", sg.n_times(), sg.n_freqs());

        Raster {
            width,
            height,
            pixels,
            x_range,
            y_range,
        }
    }

    /// Value under a plot coordinate, for hover read-outs.
    pub fn sample_at(sg: &Spectrogram, time_s: f64, freq_hz: f64) -> Option<f64> {
        let t = cell_index(&cell_edges(&sg.times_s), time_s)?;
        let f = cell_index(&cell_edges(&sg.frequencies_hz), freq_hz)?;
        Some(sg.at(t, f))
    }

    /// Unmultiplied RGBA bytes, row by row.
    pub fn rgba(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_array()).collect()
    }
}

/// Smallest and largest finite edge. A zero-width extent is widened to 1.
fn extent(edges: &[f64]) -> Option<(f64, f64)> {
    let (lo, hi) = edges
        .iter()
        .copied()
        .filter(|e| e.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, e| match acc {
            Some((lo, hi)) => Some((lo.min(e), hi.max(e))),
            None => Some((e, e)),
        })?;
    if hi > lo {
        Some((lo, hi))
    } else {
        Some((lo - 0.5, lo + 0.5))
    }
}
