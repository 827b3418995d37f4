use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use crate::error::{FilterError, Result};

/// Message id to label, as stored in truth and prediction files
pub type Classification = BTreeMap<String, String>;

/// Read a whitespace-separated `id label` file.
///
/// Blank lines are skipped and columns past the second are ignored.
pub fn read_classification<P: AsRef<Path>>(path: P) -> Result<Classification> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    parse_classification(&content)
        .map_err(|e| FilterError::Parse(format!("{}: {}", path.display(), e)))
}

/// Write `id label` lines, one per message, ordered by id
pub fn write_classification<P: AsRef<Path>>(path: P, labels: &Classification) -> Result<()> {
    std::fs::write(path, format_classification(labels))?;
    Ok(())
}

fn parse_classification(content: &str) -> std::result::Result<Classification, String> {
    let mut labels = Classification::new();

    for (number, line) in content.lines().enumerate() {
        let mut columns = line.split_whitespace();
        let Some(id) = columns.next() else {
            continue;
        };
        let label = columns
            .next()
            .ok_or_else(|| format!("line {} has no label: '{}'", number + 1, line))?;
        labels.insert(id.to_string(), label.to_string());
    }

    Ok(labels)
}

fn format_classification(labels: &Classification) -> String {
    let mut out = String::new();
    for (id, label) in labels {
        let _ = writeln!(out, "{} {}", id, label);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_skips_blank_lines() {
        let labels = parse_classification("a SPAM\n\n  \nb OK extra\n").unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels["a"], "SPAM");
        assert_eq!(labels["b"], "OK");
    }

    #[test]
    fn test_parse_rejects_missing_label() {
        let err = parse_classification("a SPAM\nlonely\n").unwrap_err();
        assert!(err.contains("line 2"));
    }

    #[test]
    fn test_write_then_read_is_identity() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("!prediction.txt");

        let mut labels = Classification::new();
        labels.insert("0042.msg".to_string(), "SPAM".to_string());
        labels.insert("0001.msg".to_string(), "OK".to_string());
        labels.insert("abc".to_string(), "OK".to_string());

        write_classification(&path, &labels).unwrap();
        assert_eq!(read_classification(&path).unwrap(), labels);
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_classification(temp_dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, FilterError::Io(_)));
    }
}
