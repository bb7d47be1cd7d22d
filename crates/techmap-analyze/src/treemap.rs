//! Squarified treemap layout of the most frequent technologies.
//!
//! Tile areas are proportional to counts. Placement follows the squarified
//! algorithm (Bruls, Huizing, van Wijk): items, largest first, are packed
//! into strips along the shorter side of the free space, and a strip keeps
//! growing while that improves its worst aspect ratio.

use serde::Serialize;
use tracing::debug;

use crate::color::{ColorScale, Rgb};
use crate::frequency::FrequencyTable;

/// Default number of entries laid out.
pub const DEFAULT_LIMIT: usize = 25;

/// Intensity used when every selected count is equal.
const FLAT_INTENSITY: f64 = 1.0;

/// Axis-aligned rectangle; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// `max(w/h, h/w)`; 1.0 is a square.
    pub fn aspect_ratio(&self) -> f64 {
        (self.width / self.height).max(self.height / self.width)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// One labelled tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapTile {
    pub technology: String,
    pub frequency: usize,
    /// `"<technology> (<frequency>)"`.
    pub label: String,
    /// Linear position of the count between the subset's min (0.0) and max (1.0).
    pub intensity: f64,
    pub color: Rgb,
    pub bounds: Rect,
}

/// Tiles ordered by frequency descending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapLayout {
    pub width: f64,
    pub height: f64,
    pub tiles: Vec<TreemapTile>,
}

impl TreemapLayout {
    /// Nothing to render.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile(&self, technology: &str) -> Option<&TreemapTile> {
        self.tiles.iter().find(|t| t.technology == technology)
    }

    /// Sum of tile areas.
    pub fn covered_area(&self) -> f64 {
        self.tiles.iter().map(|t| t.bounds.area()).sum()
    }
}

/// Maps a frequency table to a treemap layout on a fixed canvas.
#[derive(Debug, Clone)]
pub struct TreemapRenderer {
    width: f64,
    height: f64,
    limit: usize,
    scale: ColorScale,
}

impl TreemapRenderer {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            limit: DEFAULT_LIMIT,
            scale: ColorScale::default(),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_scale(mut self, scale: ColorScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Lay out the first `limit` entries of `table`.
    ///
    /// An empty table (or a zero limit) gives an empty layout.
    pub fn layout(&self, table: &FrequencyTable) -> TreemapLayout {
        let selected: Vec<_> = table
            .top(self.limit)
            .iter()
            .filter(|e| e.frequency > 0)
            .collect();

        let empty = TreemapLayout {
            width: self.width,
            height: self.height,
            tiles: Vec::new(),
        };
        if selected.is_empty() || self.width <= 0.0 || self.height <= 0.0 {
            debug!("No technology data to lay out");
            return empty;
        }

        let counts: Vec<f64> = selected.iter().map(|e| e.frequency as f64).collect();
        let total: f64 = counts.iter().sum();
        let canvas_area = self.width * self.height;
        let sizes: Vec<f64> = counts.iter().map(|c| c / total * canvas_area).collect();

        let rects = squarify(&sizes, Rect::new(0.0, 0.0, self.width, self.height));

        let min = counts.iter().copied().fold(f64::INFINITY, f64::min);
        let max = counts.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let tiles = selected
            .iter()
            .zip(rects)
            .map(|(entry, bounds)| {
                let intensity = if max > min {
                    (entry.frequency as f64 - min) / (max - min)
                } else {
                    FLAT_INTENSITY
                };
                TreemapTile {
                    technology: entry.technology.clone(),
                    frequency: entry.frequency,
                    label: format!("{} ({})", entry.technology, entry.frequency),
                    intensity,
                    color: self.scale.at(intensity),
                    bounds,
                }
            })
            .collect();

        TreemapLayout {
            width: self.width,
            height: self.height,
            tiles,
        }
    }
}

impl Default for TreemapRenderer {
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}

/// Squarified packing of `sizes` (already in canvas area units, sorted
/// descending) into `space`.
pub fn squarify(sizes: &[f64], mut space: Rect) -> Vec<Rect> {
    let mut rects = Vec::with_capacity(sizes.len());
    let mut start = 0;

    while start < sizes.len() {
        let remaining = &sizes[start..];
        let mut end = 1;
        while end < remaining.len()
            && worst_ratio(&remaining[..end], space) >= worst_ratio(&remaining[..end + 1], space)
        {
            end += 1;
        }

        let strip = &remaining[..end];
        rects.extend(layout_strip(strip, space));
        space = leftover(strip, space);
        start += end;
    }

    rects
}

/// Stack `sizes` in one strip along the shorter side of `space`.
fn layout_strip(sizes: &[f64], space: Rect) -> Vec<Rect> {
    let covered: f64 = sizes.iter().sum();
    let mut rects = Vec::with_capacity(sizes.len());

    if space.width >= space.height {
        // Column on the left edge, full height.
        let strip_width = covered / space.height;
        let mut y = space.y;
        for size in sizes {
            let h = size / strip_width;
            rects.push(Rect::new(space.x, y, strip_width, h));
            y += h;
        }
    } else {
        // Row on the top edge, full width.
        let strip_height = covered / space.width;
        let mut x = space.x;
        for size in sizes {
            let w = size / strip_height;
            rects.push(Rect::new(x, space.y, w, strip_height));
            x += w;
        }
    }

    rects
}

/// Free space after placing a strip of `sizes`.
fn leftover(sizes: &[f64], space: Rect) -> Rect {
    let covered: f64 = sizes.iter().sum();
    if space.width >= space.height {
        let strip_width = covered / space.height;
        Rect::new(
            space.x + strip_width,
            space.y,
            space.width - strip_width,
            space.height,
        )
    } else {
        let strip_height = covered / space.width;
        Rect::new(
            space.x,
            space.y + strip_height,
            space.width,
            space.height - strip_height,
        )
    }
}

fn worst_ratio(sizes: &[f64], space: Rect) -> f64 {
    layout_strip(sizes, space)
        .iter()
        .map(Rect::aspect_ratio)
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyAggregator;

    const EPS: f64 = 1e-6;

    fn table(rows: &[&str]) -> FrequencyTable {
        FrequencyAggregator::aggregate(rows.iter().copied())
    }

    #[test]
    fn test_empty_table_gives_empty_layout() {
        let layout = TreemapRenderer::default().layout(&FrequencyTable::default());
        assert!(layout.is_empty());
        assert_eq!(layout.covered_area(), 0.0);
    }

    #[test]
    fn test_areas_fill_canvas() {
        let t = table(&["a, b, c", "a, b", "a, d", "e", "a, f, g", "b"]);
        let layout = TreemapRenderer::new(300.0, 200.0).layout(&t);
        assert_eq!(layout.len(), t.len());
        assert!((layout.covered_area() - 60_000.0).abs() < EPS);
    }

    #[test]
    fn test_area_proportional_to_count() {
        let t = table(&["battery", "battery, motor", ""]);
        let layout = TreemapRenderer::default().layout(&t);
        assert_eq!(layout.len(), 2);
        let battery = layout.tile("battery").unwrap().bounds.area();
        let motor = layout.tile("motor").unwrap().bounds.area();
        assert!((battery / motor - 2.0).abs() < EPS);
    }

    #[test]
    fn test_tiles_stay_inside_canvas() {
        let rows: Vec<String> = (0..40)
            .map(|i| (0..=(i % 7)).map(|j| format!("k{}", i + j)).collect::<Vec<_>>().join(", "))
            .collect();
        let t = FrequencyAggregator::aggregate(&rows);
        let layout = TreemapRenderer::new(120.0, 80.0).layout(&t);
        for tile in &layout.tiles {
            let b = tile.bounds;
            assert!(b.x >= -EPS && b.y >= -EPS);
            assert!(b.x + b.width <= 120.0 + EPS);
            assert!(b.y + b.height <= 80.0 + EPS);
        }
    }

    #[test]
    fn test_limit_applies() {
        let rows: Vec<String> = (0..40).map(|i| format!("k{}", i)).collect();
        let t = FrequencyAggregator::aggregate(&rows);
        let layout = TreemapRenderer::default().layout(&t);
        assert_eq!(layout.len(), DEFAULT_LIMIT);
        let layout = TreemapRenderer::default().with_limit(3).layout(&t);
        assert_eq!(layout.len(), 3);
    }

    #[test]
    fn test_intensity_range() {
        let t = table(&["a, b, c", "a, b", "a"]);
        let layout = TreemapRenderer::default().layout(&t);
        assert!((layout.tile("a").unwrap().intensity - 1.0).abs() < EPS);
        assert!((layout.tile("b").unwrap().intensity - 0.5).abs() < EPS);
        assert!(layout.tile("c").unwrap().intensity.abs() < EPS);
    }

    #[test]
    fn test_equal_counts_flat_intensity() {
        let t = table(&["a, b"]);
        let layout = TreemapRenderer::default().layout(&t);
        assert!(layout.tiles.iter().all(|tile| tile.intensity == FLAT_INTENSITY));
    }

    #[test]
    fn test_labels() {
        let t = table(&["Lidar", "Lidar"]);
        let layout = TreemapRenderer::default().layout(&t);
        assert_eq!(layout.tiles[0].label, "Lidar (2)");
    }

    #[test]
    fn test_squarify_equal_sizes_are_square() {
        let rects = squarify(&[1.0, 1.0, 1.0, 1.0], Rect::new(0.0, 0.0, 2.0, 2.0));
        assert_eq!(rects.len(), 4);
        for r in rects {
            assert!((r.aspect_ratio() - 1.0).abs() < EPS);
            assert!((r.area() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_squarify_classic_example() {
        // Bruls et al. example: 6x4 canvas.
        let sizes = [6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0];
        let rects = squarify(&sizes, Rect::new(0.0, 0.0, 6.0, 4.0));
        assert_eq!(rects.len(), sizes.len());
        // First strip holds the two 6s as a 3-wide column.
        assert!((rects[0].width - 3.0).abs() < EPS);
        assert!((rects[0].height - 2.0).abs() < EPS);
        assert!((rects[1].y - 2.0).abs() < EPS);
        let total: f64 = rects.iter().map(Rect::area).sum();
        assert!((total - 24.0).abs() < EPS);
    }
}
