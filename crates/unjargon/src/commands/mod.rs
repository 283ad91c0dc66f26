//! Command implementations.

use anyhow::Context;
use camino::Utf8Path;

pub mod activation;
pub mod annotate;
pub mod info;
pub mod lookup;
pub mod schema;
pub mod terms;

/// Read a file after checking its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Check the size before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn reads_within_limit() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("page.html")).unwrap();
        std::fs::write(&path, "<p>Per Seat</p>").unwrap();
        assert_eq!(read_input_file(&path, Some(100)).unwrap(), "<p>Per Seat</p>");
        assert!(read_input_file(&path, None).is_ok());
    }

    #[test]
    fn rejects_over_limit() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("page.html")).unwrap();
        std::fs::write(&path, "<p>Per Seat</p>").unwrap();
        let err = read_input_file(&path, Some(4)).unwrap_err();
        assert!(err.to_string().contains("input too large"));
    }

    #[test]
    fn missing_file_names_path() {
        let err = read_input_file(Utf8Path::new("/nonexistent/page.html"), None).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/page.html"));
    }
}
