//! Global technology frequency table over per-row keyword strings.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

/// One `(technology, frequency)` row of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnologyCount {
    pub technology: String,
    pub frequency: usize,
}

/// Keyword counts sorted by frequency descending.
///
/// Ties keep the order in which the keyword was first seen across rows.
/// Keys are matched exactly (case-sensitive) and are never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    entries: Vec<TechnologyCount>,
}

impl FrequencyTable {
    pub fn entries(&self) -> &[TechnologyCount] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first `n` entries (the `n` most frequent).
    pub fn top(&self, n: usize) -> &[TechnologyCount] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn get(&self, technology: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.technology == technology)
            .map(|e| e.frequency)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.frequency).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries
            .iter()
            .map(|e| (e.technology.as_str(), e.frequency))
    }
}

/// Folds normalized keyword strings into a [`FrequencyTable`].
pub struct FrequencyAggregator;

impl FrequencyAggregator {
    /// Count every distinct keyword once per row.
    ///
    /// Each row is split on commas; pieces are trimmed and empty pieces
    /// dropped before the per-row deduplication.
    pub fn aggregate<I, S>(rows: I) -> FrequencyTable
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut entries: Vec<TechnologyCount> = Vec::new();
        let mut row_count = 0usize;

        for row in rows {
            row_count += 1;
            let mut seen: HashSet<&str> = HashSet::new();
            for keyword in row.as_ref().split(',').map(str::trim) {
                if keyword.is_empty() || !seen.insert(keyword) {
                    continue;
                }
                match index.get(keyword) {
                    Some(&i) => entries[i].frequency += 1,
                    None => {
                        index.insert(keyword.to_string(), entries.len());
                        entries.push(TechnologyCount {
                            technology: keyword.to_string(),
                            frequency: 1,
                        });
                    }
                }
            }
        }

        // Stable: equal counts keep first-seen order.
        entries.sort_by(|a, b| b.frequency.cmp(&a.frequency));

        debug!(
            "Aggregated {} rows into {} distinct technologies",
            row_count,
            entries.len()
        );

        FrequencyTable { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(table: &FrequencyTable) -> Vec<(&str, usize)> {
        table.iter().collect()
    }

    #[test]
    fn test_first_seen_tie_break() {
        let table = FrequencyAggregator::aggregate(["a, b", "a", "c"]);
        assert_eq!(pairs(&table), vec![("a", 2), ("b", 1), ("c", 1)]);
    }

    #[test]
    fn test_duplicate_within_row_counts_once() {
        let table = FrequencyAggregator::aggregate(["x, x, y"]);
        assert_eq!(pairs(&table), vec![("x", 1), ("y", 1)]);
        assert_eq!(table.total(), 2);
    }

    #[test]
    fn test_whitespace_variants_deduplicated() {
        let table = FrequencyAggregator::aggregate(["Lidar, Lidar ,  Lidar"]);
        assert_eq!(pairs(&table), vec![("Lidar", 1)]);
    }

    #[test]
    fn test_empty_rows_contribute_nothing() {
        let table = FrequencyAggregator::aggregate(["", " , ,", "motor"]);
        assert_eq!(pairs(&table), vec![("motor", 1)]);
        assert!(table.get("").is_none());
    }

    #[test]
    fn test_no_rows() {
        let table = FrequencyAggregator::aggregate(Vec::<String>::new());
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn test_case_sensitive_keys() {
        let table = FrequencyAggregator::aggregate(["AI, ai", "AI"]);
        assert_eq!(pairs(&table), vec![("AI", 2), ("ai", 1)]);
    }

    #[test]
    fn test_higher_count_moves_ahead() {
        let table = FrequencyAggregator::aggregate(["b", "a, b", "a", "a"]);
        assert_eq!(pairs(&table), vec![("a", 3), ("b", 2)]);
    }

    #[test]
    fn test_sentence_treated_as_one_keyword() {
        let table = FrequencyAggregator::aggregate(["This patent relates to batteries"]);
        assert_eq!(table.get("This patent relates to batteries"), Some(1));
    }

    #[test]
    fn test_top() {
        let table = FrequencyAggregator::aggregate(["a, b, c"]);
        assert_eq!(table.top(2).len(), 2);
        assert_eq!(table.top(10).len(), 3);
    }

    #[test]
    fn test_serializes_as_rows() {
        let table = FrequencyAggregator::aggregate(["a, b", "a"]);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json[0]["technology"], "a");
        assert_eq!(json[0]["frequency"], 2);
    }
}
