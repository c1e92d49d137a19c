use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

use crate::errors::{ScanError, ScanResult};

/// Reads a pattern set from a file, one pattern per line.
///
/// Lines are kept verbatim and in input order: no trimming, no
/// empty-line filtering, no deduplication. An empty file yields an empty
/// pattern set, which is valid (the matcher then never matches).
///
/// A read failure mid-stream returns an error rather than a partial
/// sequence.
pub fn load_patterns(path: &Path) -> ScanResult<Vec<String>> {
    let file = File::open(path).map_err(|e| ScanError::from_io(path, e))?;
    let reader = BufReader::new(file);

    let mut patterns = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| ScanError::read_error(path, e))?;
        patterns.push(line);
    }

    debug!("Loaded {} patterns from {}", patterns.len(), path.display());
    Ok(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_preserves_order_and_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("patterns.txt");
        let mut file = File::create(&path).unwrap();
        write!(file, "foo\nba[rz]\nfoo\n  spaced  \n\nlast").unwrap();

        let patterns = load_patterns(&path).unwrap();
        assert_eq!(
            patterns,
            vec!["foo", "ba[rz]", "foo", "  spaced  ", "", "last"]
        );
    }

    #[test]
    fn test_load_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("patterns.txt");
        File::create(&path).unwrap();

        let patterns = load_patterns(&path).unwrap();
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent.txt");

        let err = load_patterns(&path).unwrap_err();
        assert!(matches!(err, ScanError::FileNotFound(_)));
    }

    #[test]
    fn test_malformed_patterns_load_fine() {
        // Validity is not the loader's concern
        let dir = tempdir().unwrap();
        let path = dir.path().join("patterns.txt");
        let mut file = File::create(&path).unwrap();
        write!(file, "(\n[z-a]").unwrap();

        let patterns = load_patterns(&path).unwrap();
        assert_eq!(patterns, vec!["(", "[z-a]"]);
    }
}
