//! Report export: keyword table, frequency table, treemap drawing, JSON.

use std::io::Write;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use tracing::info;

use techmap_analyze::FrequencyTable;
use techmap_core::{Error, Result};
use techmap_render::{render_to_file, RenderConfig, RenderOutcome};

use crate::types::{RowResult, RunReport};

pub const KEYWORDS_FILE: &str = "keywords.csv";
pub const FREQUENCY_FILE: &str = "technology_frequency.csv";
pub const TREEMAP_FILE: &str = "treemap.svg";
pub const REPORT_FILE: &str = "report.json";

/// UTF-8 byte order mark, so spreadsheet tools detect the encoding.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Files written by [`export_all`].
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub keywords: PathBuf,
    pub frequency: PathBuf,
    /// `None` when there was nothing to draw.
    pub treemap: Option<PathBuf>,
    pub report: PathBuf,
}

fn csv_err(e: csv::Error) -> Error {
    Error::Dataset(format!("CSV write failed: {}", e))
}

/// Write `<title_column>,keywords` rows.
pub fn write_keywords_csv<W: Write>(writer: W, title_column: &str, rows: &[RowResult]) -> Result<()> {
    let mut out = WriterBuilder::new().from_writer(writer);
    out.write_record([title_column, "keywords"]).map_err(csv_err)?;
    for row in rows {
        out.write_record([row.title.as_str(), row.keywords.as_str()])
            .map_err(csv_err)?;
    }
    out.flush()?;
    Ok(())
}

/// Write `technology,frequency` rows, most frequent first, prefixed with a BOM.
pub fn write_frequency_csv<W: Write>(mut writer: W, table: &FrequencyTable) -> Result<()> {
    writer.write_all(UTF8_BOM)?;
    let mut out = WriterBuilder::new().from_writer(writer);
    out.write_record(["technology", "frequency"]).map_err(csv_err)?;
    for (technology, frequency) in table.iter() {
        out.write_record([technology, frequency.to_string().as_str()])
            .map_err(csv_err)?;
    }
    out.flush()?;
    Ok(())
}

/// Write every artifact of `report` into `out_dir`.
pub fn export_all(
    report: &RunReport,
    out_dir: &Path,
    title_column: &str,
    top_n: usize,
) -> Result<ExportPaths> {
    std::fs::create_dir_all(out_dir)?;

    let keywords = out_dir.join(KEYWORDS_FILE);
    write_keywords_csv(std::fs::File::create(&keywords)?, title_column, &report.rows)?;

    let frequency = out_dir.join(FREQUENCY_FILE);
    write_frequency_csv(std::fs::File::create(&frequency)?, &report.frequency)?;

    let treemap_path = out_dir.join(TREEMAP_FILE);
    let title = format!("Technology (Top {})", top_n);
    let treemap = match render_to_file(&report.treemap, &title, &treemap_path, RenderConfig::global())? {
        RenderOutcome::Rendered { .. } => Some(treemap_path),
        RenderOutcome::Skipped => None,
    };

    let report_path = out_dir.join(REPORT_FILE);
    std::fs::write(&report_path, serde_json::to_string_pretty(report)?)?;

    info!("Exported results to {}", out_dir.display());

    Ok(ExportPaths {
        keywords,
        frequency,
        treemap,
        report: report_path,
    })
}
