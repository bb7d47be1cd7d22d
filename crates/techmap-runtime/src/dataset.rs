//! Tabular input: a CSV file with a header row.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use techmap_core::{Error, Result};

const BOM: char = '\u{feff}';

/// In-memory table of string cells.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

impl Dataset {
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let dataset = Self::from_reader(file)?;
        debug!("Read {} rows from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    /// Parse CSV with a header row. Short rows are padded with empty cells.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| Error::Dataset(format!("Failed to read header row: {}", e)))?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = if i == 0 { h.trim_start_matches(BOM) } else { h };
                h.trim().to_string()
            })
            .collect();

        let mut records = Vec::new();
        for (row_num, result) in reader.records().enumerate() {
            let record = result
                .map_err(|e| Error::Dataset(format!("Failed to read row {}: {}", row_num + 1, e)))?;
            let mut cells: Vec<String> = record.iter().map(|c| c.to_string()).collect();
            cells.resize(headers.len().max(cells.len()), String::new());
            records.push(cells);
        }

        Ok(Self { headers, records })
    }

    /// Build a single-column dataset directly from values.
    pub fn from_column(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            headers: vec![name.into()],
            records: values.into_iter().map(|v| vec![v]).collect(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All values of `name`, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<String>> {
        let idx = self
            .headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::MissingColumn {
                column: name.to_string(),
                available: self.headers.clone(),
            })?;

        Ok(self
            .records
            .iter()
            .map(|r| r.get(idx).cloned().unwrap_or_default())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_column() {
        let csv = "번호,발명명칭\n1,배터리 셀\n2,\"Motor, brushless\"\n";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(
            ds.column("발명명칭").unwrap(),
            vec!["배터리 셀".to_string(), "Motor, brushless".to_string()]
        );
    }

    #[test]
    fn test_bom_stripped_from_first_header() {
        let csv = "\u{feff}발명명칭,id\nDrone,1\n";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.headers()[0], "발명명칭");
        assert_eq!(ds.column("발명명칭").unwrap(), vec!["Drone".to_string()]);
    }

    #[test]
    fn test_missing_column() {
        let csv = "id,title\n1,Drone\n";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        match ds.column("발명명칭") {
            Err(Error::MissingColumn { column, available }) => {
                assert_eq!(column, "발명명칭");
                assert_eq!(available, vec!["id".to_string(), "title".to_string()]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_short_rows_and_blank_cells() {
        let csv = "id,title\n1\n2,\n3,Robot\n";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(
            ds.column("title").unwrap(),
            vec![String::new(), String::new(), "Robot".to_string()]
        );
    }

    #[test]
    fn test_from_csv_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patents.csv");
        std::fs::write(&path, "title\nA\nB\n").unwrap();
        let ds = Dataset::from_csv_path(&path).unwrap();
        assert_eq!(ds.column("title").unwrap().len(), 2);
    }

    #[test]
    fn test_from_column() {
        let ds = Dataset::from_column("title", vec!["x".into()]);
        assert_eq!(ds.headers(), &["title".to_string()]);
        assert_eq!(ds.column("title").unwrap(), vec!["x".to_string()]);
    }
}
