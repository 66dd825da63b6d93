//! URL list loading.

use std::io::ErrorKind;
use std::path::Path;

/// Parse a URL list: one target per line, trimmed, blank lines dropped.
///
/// Order and duplicates are kept.
pub fn parse_targets(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load the URL list at `path`.
///
/// A missing or unreadable file is treated as an empty list.
pub async fn load_targets<P: AsRef<Path>>(path: P) -> Vec<String> {
    let path = path.as_ref();
    match tokio::fs::read_to_string(path).await {
        Ok(text) => parse_targets(&text),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("URL list {} not found, no targets to check", path.display());
            Vec::new()
        }
        Err(e) => {
            tracing::warn!("Failed to read URL list {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_targets() {
        let text = "  https://a.example.com  \n\n\thttps://b.example.com\r\n   \nhttps://a.example.com\n";
        assert_eq!(
            parse_targets(text),
            vec![
                "https://a.example.com",
                "https://b.example.com",
                "https://a.example.com",
            ]
        );
    }

    #[tokio::test]
    async fn test_load_targets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        std::fs::write(&path, "https://one.example.com\nhttps://two.example.com\n").unwrap();

        assert_eq!(load_targets(&path).await.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_list_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_targets(dir.path().join("urls.txt")).await.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_list_is_empty() {
        // A directory cannot be read as a file
        let dir = tempfile::tempdir().unwrap();
        assert!(load_targets(dir.path()).await.is_empty());
    }
}
