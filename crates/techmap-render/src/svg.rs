//! SVG treemap drawing.

use std::path::Path;

use once_cell::sync::Lazy;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{info, warn};

use techmap_analyze::TreemapLayout;
use techmap_core::{Error, Result};

/// Height of the title band above the tiles, in pixels.
const TITLE_BAND: u32 = 48;

/// Drawing settings. Font selection is resolved once per process.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub font_family: String,
    pub label_size: f64,
    pub title_size: f64,
    /// Tile fill opacity.
    pub fill_alpha: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".into(),
            label_size: 12.0,
            title_size: 16.0,
            fill_alpha: 0.7,
        }
    }
}

static GLOBAL_CONFIG: Lazy<RenderConfig> = Lazy::new(|| {
    let mut config = RenderConfig::default();
    if let Ok(family) = std::env::var("TECHMAP_FONT_FAMILY") {
        if !family.trim().is_empty() {
            config.font_family = family;
        }
    }
    info!("Treemap font family: {}", config.font_family);
    config
});

impl RenderConfig {
    /// Process-wide configuration (`TECHMAP_FONT_FAMILY` overrides the font).
    pub fn global() -> &'static RenderConfig {
        &GLOBAL_CONFIG
    }
}

/// Result of a render request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered { tiles: usize },
    /// The layout had no tiles; nothing was drawn.
    Skipped,
}

/// Draw `layout` as an SVG document.
///
/// Returns `None` for an empty layout.
pub fn render_to_string(
    layout: &TreemapLayout,
    title: &str,
    config: &RenderConfig,
) -> Result<Option<String>> {
    if layout.is_empty() {
        warn!("No technology data available for visualization.");
        return Ok(None);
    }

    let mut buf = String::new();
    {
        let size = (
            layout.width.ceil() as u32,
            layout.height.ceil() as u32 + TITLE_BAND,
        );
        let root = SVGBackend::with_string(&mut buf, size).into_drawing_area();
        draw(&root, layout, title, config)?;
        root.present().map_err(render_err)?;
    }
    Ok(Some(buf))
}

/// Draw `layout` to an SVG file at `path`.
///
/// An empty layout leaves the file system untouched.
pub fn render_to_file(
    layout: &TreemapLayout,
    title: &str,
    path: &Path,
    config: &RenderConfig,
) -> Result<RenderOutcome> {
    match render_to_string(layout, title, config)? {
        Some(svg) => {
            std::fs::write(path, svg)?;
            info!("Treemap with {} tiles saved to {}", layout.len(), path.display());
            Ok(RenderOutcome::Rendered {
                tiles: layout.len(),
            })
        }
        None => Ok(RenderOutcome::Skipped),
    }
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    layout: &TreemapLayout,
    title: &str,
    config: &RenderConfig,
) -> Result<()> {
    root.fill(&WHITE).map_err(render_err)?;

    let centered = Pos::new(HPos::Center, VPos::Center);
    let title_style = TextStyle::from(FontDesc::new(
        FontFamily::Name(&config.font_family),
        config.title_size,
        FontStyle::Normal,
    ))
    .color(&BLACK)
    .pos(centered);
    let label_style = TextStyle::from(FontDesc::new(
        FontFamily::Name(&config.font_family),
        config.label_size,
        FontStyle::Normal,
    ))
    .color(&BLACK)
    .pos(centered);

    let title_pos = ((layout.width / 2.0) as i32, (TITLE_BAND / 2) as i32);
    root.draw(&Text::new(title, title_pos, title_style.clone()))
        .map_err(render_err)?;

    let offset = TITLE_BAND as f64;
    for tile in &layout.tiles {
        let b = tile.bounds;
        let top_left = (b.x.round() as i32, (b.y + offset).round() as i32);
        let bottom_right = (
            (b.x + b.width).round() as i32,
            (b.y + b.height + offset).round() as i32,
        );

        let fill = RGBColor(tile.color.0, tile.color.1, tile.color.2).mix(config.fill_alpha);
        root.draw(&Rectangle::new([top_left, bottom_right], fill.filled()))
            .map_err(render_err)?;
        root.draw(&Rectangle::new(
            [top_left, bottom_right],
            WHITE.stroke_width(1),
        ))
        .map_err(render_err)?;

        let (cx, cy) = b.center();
        let label_pos = (cx.round() as i32, (cy + offset).round() as i32);
        root.draw(&Text::new(tile.label.as_str(), label_pos, label_style.clone()))
            .map_err(render_err)?;
    }

    Ok(())
}

fn render_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Render(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use techmap_analyze::{FrequencyAggregator, FrequencyTable, TreemapRenderer};

    fn sample_layout() -> TreemapLayout {
        let table = FrequencyAggregator::aggregate(["Lidar, Radar", "Lidar", "Sonar"]);
        TreemapRenderer::new(400.0, 300.0).layout(&table)
    }

    #[test]
    fn test_render_to_string_contains_labels() {
        let svg = render_to_string(&sample_layout(), "Technology (Top 25)", &RenderConfig::default())
            .unwrap()
            .unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Lidar (2)"));
        assert!(svg.contains("Technology (Top 25)"));
    }

    #[test]
    fn test_empty_layout_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("treemap.svg");
        let layout = TreemapRenderer::default().layout(&FrequencyTable::default());

        let outcome = render_to_file(&layout, "t", &path, &RenderConfig::default()).unwrap();
        assert_eq!(outcome, RenderOutcome::Skipped);
        assert!(!path.exists());
    }

    #[test]
    fn test_render_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("treemap.svg");

        let outcome =
            render_to_file(&sample_layout(), "t", &path, RenderConfig::global()).unwrap();
        assert_eq!(outcome, RenderOutcome::Rendered { tiles: 3 });
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Sonar (1)"));
    }
}
