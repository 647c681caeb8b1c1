//! Class label table for sketch classification.
//!
//! The table is an ordered list of class names where position `i`
//! corresponds to output index `i` of the model's final layer. It is
//! loaded once at startup and never changes afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default sketch classes - MUST match the label order the model was
/// trained with (index-sensitive).
pub const DEFAULT_LABELS: [&str; 30] = [
    "ant", "apple", "axe", "backpack", "banana",
    "barn", "basket", "bear", "bed", "bee",
    "bench", "bread", "bridge", "broccoli", "broom",
    "bucket", "bush", "butterfly", "carrot", "cat",
    "chair", "cloud", "cow", "cup", "dog",
    "donut", "door", "duck", "feather", "fence",
];

/// Ordered class label table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    /// Creates a label table from an ordered list of class names
    pub fn new(labels: Vec<String>) -> Result<Self> {
        if labels.is_empty() {
            return Err(Error::Labels("label table is empty".to_string()));
        }
        if labels.iter().any(|l| l.trim().is_empty()) {
            return Err(Error::Labels("label table contains blank entries".to_string()));
        }
        Ok(Self { labels })
    }

    /// The built-in 30-class sketch label set
    pub fn default_sketch() -> Self {
        Self {
            labels: DEFAULT_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Loads a label table from a JSON file containing an array of strings
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let labels: Vec<String> = serde_json::from_str(&json)
            .map_err(|e| Error::Labels(format!("failed to parse label file: {}", e)))?;
        Self::new(labels)
    }

    /// Resolve an output index to its class name
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(|s| s.as_str())
    }

    /// Number of classes in the table
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Checks the table against the model's output dimensionality.
    /// A mismatch is a startup-time fatal error.
    pub fn ensure_matches(&self, num_classes: usize) -> Result<()> {
        if self.labels.len() != num_classes {
            return Err(Error::Labels(format!(
                "label table has {} entries but the model outputs {} classes",
                self.labels.len(),
                num_classes
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_table() {
        let table = LabelTable::default_sketch();
        assert_eq!(table.len(), 30);
        assert_eq!(table.get(0), Some("ant"));
        assert_eq!(table.get(1), Some("apple"));
        assert_eq!(table.get(29), Some("fence"));
        assert_eq!(table.get(30), None);
    }

    #[test]
    fn test_empty_table_rejected() {
        let result = LabelTable::new(Vec::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_entry_rejected() {
        let result = LabelTable::new(vec!["apple".to_string(), "  ".to_string()]);
        assert!(result.is_err());
    }

    #[test]
    fn test_ensure_matches() {
        let table = LabelTable::default_sketch();
        assert!(table.ensure_matches(30).is_ok());
        assert!(table.ensure_matches(38).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["cat", "dog", "duck"]"#).unwrap();

        let table = LabelTable::from_file(file.path()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(2), Some("duck"));
    }

    #[test]
    fn test_from_file_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result = LabelTable::from_file(file.path());
        assert!(matches!(result, Err(Error::Labels(_))));
    }
}
