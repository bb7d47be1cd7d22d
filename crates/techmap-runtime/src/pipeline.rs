//! Pipeline — title → suggestion → keywords → frequency table → treemap.

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use techmap_analyze::{FrequencyAggregator, TextNormalizer, TreemapRenderer};
use techmap_core::{Result, TechMapConfig};
use techmap_extract::{CompletionBackend, KeywordExtractor};

use crate::dataset::Dataset;
use crate::types::{RowResult, RunReport, RunSummary};

/// Sequences extraction, normalization, aggregation and layout for a dataset.
pub struct Pipeline<B> {
    extractor: KeywordExtractor<B>,
    normalizer: TextNormalizer,
    treemap: TreemapRenderer,
    concurrency: usize,
}

impl<B: CompletionBackend> Pipeline<B> {
    pub fn new(extractor: KeywordExtractor<B>, config: &TechMapConfig) -> Self {
        Self {
            extractor,
            normalizer: TextNormalizer::default(),
            treemap: TreemapRenderer::default().with_limit(config.top_n),
            concurrency: config.concurrency.max(1),
        }
    }

    /// Sequential pipeline with default normalizer and a top-25 treemap.
    pub fn sequential(extractor: KeywordExtractor<B>) -> Self {
        Self {
            extractor,
            normalizer: TextNormalizer::default(),
            treemap: TreemapRenderer::default(),
            concurrency: 1,
        }
    }

    pub fn with_normalizer(mut self, normalizer: TextNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_treemap(mut self, treemap: TreemapRenderer) -> Self {
        self.treemap = treemap;
        self
    }

    /// Maximum extraction calls in flight; 1 runs rows strictly in order.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn extractor(&self) -> &KeywordExtractor<B> {
        &self.extractor
    }

    /// Run over the `title_column` of `dataset`.
    ///
    /// A missing column fails before any external call is made.
    pub async fn run(&self, dataset: &Dataset, title_column: &str) -> Result<RunReport> {
        let titles = dataset.column(title_column)?;
        Ok(self.run_titles(&titles).await)
    }

    /// Run over an ordered list of titles. Per-row failures never abort the run.
    pub async fn run_titles(&self, titles: &[String]) -> RunReport {
        info!(
            "Processing {} patent titles (concurrency={})",
            titles.len(),
            self.concurrency
        );

        // `buffered` yields results in input order regardless of completion order.
        let extractions: Vec<_> = stream::iter(titles.iter())
            .map(|title| self.extractor.extract(title))
            .buffered(self.concurrency)
            .collect()
            .await;

        let rows: Vec<RowResult> = titles
            .iter()
            .zip(extractions)
            .enumerate()
            .map(|(i, (title, extraction))| {
                let keywords = self.normalizer.normalize(&extraction.raw);
                debug!("Row {}: '{}' -> '{}'", i, title, keywords);
                RowResult {
                    title: title.clone(),
                    raw_suggestion: extraction.raw,
                    keywords,
                    warning: extraction.warning,
                }
            })
            .collect();

        let frequency = FrequencyAggregator::aggregate(rows.iter().map(|r| r.keywords.as_str()));
        let treemap = self.treemap.layout(&frequency);
        if treemap.is_empty() {
            warn!("No technology data available for visualization.");
        }

        let report = RunReport {
            rows,
            frequency,
            treemap,
            generated_at: chrono::Utc::now(),
        };

        let summary = RunSummary::from(&report);
        info!(
            "Run complete: rows={}, failed={}, warnings={}, technologies={}, tiles={}",
            summary.rows,
            summary.failed_rows,
            summary.warnings,
            summary.technologies,
            summary.treemap_tiles
        );

        report
    }
}
