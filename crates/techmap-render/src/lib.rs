//! TechMap Render — draws a treemap layout to SVG.
//!
//! Layout is computed elsewhere; this crate only maps tiles to pixels.

pub mod svg;

pub use svg::{render_to_file, render_to_string, RenderConfig, RenderOutcome};
