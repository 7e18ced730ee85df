//! Document loading and chunking

pub mod chunker;

pub use chunker::TextChunker;

use std::path::Path;

use crate::error::{Error, Result};

/// Load a text document for chain construction.
///
/// Missing, unreadable and empty documents are all `Error::Document`;
/// existence in the store is the session layer's concern, not ours.
pub async fn load_document(path: &Path) -> Result<String> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        Error::Document(format!(
            "Failed to read document '{}': {}",
            path.display(),
            e
        ))
    })?;

    if content.trim().is_empty() {
        return Err(Error::Document(format!(
            "Document '{}' is empty",
            path.display()
        )));
    }

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_document_reads_content() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "some document text").unwrap();

        let content = load_document(file.path()).await.unwrap();
        assert!(content.contains("some document text"));
    }

    #[tokio::test]
    async fn test_missing_document_is_a_document_error() {
        let err = load_document(Path::new("/nonexistent/nope.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Document(_)));
    }

    #[tokio::test]
    async fn test_empty_document_is_a_document_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "   \n\t ").unwrap();

        let err = load_document(file.path()).await.unwrap_err();
        assert!(matches!(err, Error::Document(_)));
        assert!(err.to_string().contains("empty"));
    }
}
