//! TechMap Analyze — turns noisy model output into a technology frequency
//! table and lays the most frequent entries out as a squarified treemap.
//!
//! Everything here is pure: no I/O, no clocks, no network.

pub mod color;
pub mod frequency;
pub mod normalize;
pub mod treemap;

pub use color::{ColorScale, Rgb};
pub use frequency::{FrequencyAggregator, FrequencyTable, TechnologyCount};
pub use normalize::{normalize, NormalizeRule, TextNormalizer, CATEGORY_MARKER};
pub use treemap::{Rect, TreemapLayout, TreemapRenderer, TreemapTile, DEFAULT_LIMIT};
