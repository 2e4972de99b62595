// src/utils.rs
use anyhow::{Context, Result};
use std::path::Path;

pub const PDF_MIME: &str = "application/pdf";
pub const DOC_MIME: &str = "application/msword";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const OCTET_STREAM_MIME: &str = "application/octet-stream";

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Content type a browser would report for a CV file picked from disk
pub fn content_type_for(filename: &str) -> &'static str {
    match get_file_extension(filename).as_deref() {
        Some("pdf") => PDF_MIME,
        Some("doc") => DOC_MIME,
        Some("docx") => DOCX_MIME,
        _ => OCTET_STREAM_MIME,
    }
}

/// Size in megabytes, for log lines and messages
pub fn size_in_mb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

/// Trim a trailing slash so endpoint paths can be appended
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Ensure the parent directory of `path` exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension("resume.pdf"), Some("pdf".to_string()));
        assert_eq!(get_file_extension("CV.DOCX"), Some("docx".to_string()));
        assert_eq!(get_file_extension("noext"), None);
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("jane.pdf"), PDF_MIME);
        assert_eq!(content_type_for("jane.Doc"), DOC_MIME);
        assert_eq!(content_type_for("jane.docx"), DOCX_MIME);
        assert_eq!(content_type_for("jane.txt"), OCTET_STREAM_MIME);
        assert_eq!(content_type_for("jane"), OCTET_STREAM_MIME);
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:8000/"),
            "http://localhost:8000"
        );
        assert_eq!(
            normalize_base_url(" http://localhost:3000 "),
            "http://localhost:3000"
        );
    }

    #[test]
    fn test_ensure_parent_dir_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a").join("b").join("storage.toml");
        ensure_parent_dir(&file).unwrap();
        assert!(dir.path().join("a").join("b").is_dir());
        ensure_parent_dir(Path::new("storage.toml")).unwrap();
    }
}
