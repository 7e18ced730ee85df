//! Filesystem document store
//!
//! Membership in the document list is derived by directory scan at query
//! time; nothing about the store is persisted separately and documents are
//! never deleted by this system.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::DocumentInfo;

/// Extensions accepted for upload and activation
const ALLOWED_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// Directory-backed store of text documents
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    /// Create a store rooted at `root`, creating the directory if needed
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `filename` carries an accepted text extension
    pub fn is_allowed_extension(filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                ALLOWED_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }

    /// Resolve a client-supplied filename to a path inside the store.
    ///
    /// Filenames must be bare names; separators and parent references are
    /// rejected so a request can never escape the store directory.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf> {
        if filename.is_empty() {
            return Err(Error::Validation("No file provided".to_string()));
        }
        if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
            return Err(Error::Validation(format!(
                "Invalid document name: {}",
                filename
            )));
        }
        Ok(self.root.join(filename))
    }

    /// Whether a document with this name exists in the store
    pub fn exists(&self, filename: &str) -> bool {
        self.resolve(filename)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    /// Write a document, overwriting on name collision
    pub async fn save(&self, filename: &str, data: &[u8]) -> Result<PathBuf> {
        let path = self.resolve(filename)?;
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| Error::Internal(format!("Failed to save file: {}", e)))?;
        Ok(path)
    }

    /// Enumerate all `.txt`/`.md` documents, marking the active one
    pub fn list(&self, active: Option<&str>) -> Result<Vec<DocumentInfo>> {
        let mut documents = Vec::new();

        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }

            let filename = entry.file_name().to_string_lossy().to_string();
            if !Self::is_allowed_extension(&filename) {
                continue;
            }

            documents.push(DocumentInfo {
                active: active == Some(filename.as_str()),
                filename,
                size: metadata.len(),
            });
        }

        documents.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_check_accepts_txt_and_md_only() {
        assert!(DocumentStore::is_allowed_extension("notes.txt"));
        assert!(DocumentStore::is_allowed_extension("README.md"));
        assert!(DocumentStore::is_allowed_extension("UPPER.TXT"));
        assert!(!DocumentStore::is_allowed_extension("report.pdf"));
        assert!(!DocumentStore::is_allowed_extension("archive.tar.gz"));
        assert!(!DocumentStore::is_allowed_extension("no_extension"));
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path()).unwrap();

        assert!(matches!(
            store.resolve("../etc/passwd"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            store.resolve("sub/dir.txt"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(store.resolve(""), Err(Error::Validation(_))));
        assert!(store.resolve("fine.txt").is_ok());
    }

    #[tokio::test]
    async fn test_list_filters_extensions_and_marks_active() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path()).unwrap();

        store.save("a.txt", b"hello").await.unwrap();
        store.save("b.md", b"# heading").await.unwrap();
        store.save("c.pdf", b"%PDF").await.unwrap();

        let docs = store.list(Some("a.txt")).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].filename, "a.txt");
        assert!(docs[0].active);
        assert_eq!(docs[0].size, 5);
        assert_eq!(docs[1].filename, "b.md");
        assert!(!docs[1].active);
    }

    #[tokio::test]
    async fn test_save_overwrites_on_collision() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path()).unwrap();

        store.save("doc.txt", b"first version").await.unwrap();
        store.save("doc.txt", b"second").await.unwrap();

        let docs = store.list(None).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].size, 6);
    }
}
