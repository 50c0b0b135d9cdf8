//! Checks a statement file must pass before the engine sees it.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

use crate::render::format_bytes;

/// Ensure `path` is an existing `.csv` file no larger than `max_bytes`.
/// Returns its size in bytes.
pub fn validate_statement_file(path: &Path, max_bytes: u64) -> Result<u64> {
    if !path.is_file() {
        bail!("CSV not found: {} (pass --csv <path>)", path.display());
    }

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        bail!("Please upload a valid CSV file: {}", path.display());
    }

    let size = fs::metadata(path)
        .with_context(|| format!("stat {}", path.display()))?
        .len();
    if size > max_bytes {
        bail!(
            "File size {} exceeds {} limit: {}",
            format_bytes(size),
            format_bytes(max_bytes),
            path.display()
        );
    }

    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_accepts_small_csv() {
        let mut f = tempfile::Builder::new().suffix(".CSV").tempfile().unwrap();
        let header = "Description,Withdrawal,Deposit,Balance,Who\n";
        f.write_all(header.as_bytes()).unwrap();
        f.flush().unwrap();
        let size = validate_statement_file(f.path(), 1024).unwrap();
        assert_eq!(size, header.len() as u64);
    }

    #[test]
    fn test_rejects_other_extensions() {
        let f = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let err = validate_statement_file(f.path(), 1024).unwrap_err();
        assert!(err.to_string().contains("valid CSV"));
    }

    #[test]
    fn test_rejects_oversized() {
        let mut f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        f.write_all(&[b'x'; 2048]).unwrap();
        f.flush().unwrap();
        let err = validate_statement_file(f.path(), 1024).unwrap_err();
        assert!(err.to_string().contains("exceeds 1.00 KB limit"));
    }

    #[test]
    fn test_rejects_missing() {
        let err = validate_statement_file(Path::new("/no/such/file.csv"), 1024).unwrap_err();
        assert!(err.to_string().contains("CSV not found"));
    }
}
