/// Media storage service - manages uploaded audio files on disk
use crate::error::{Result, ServerError};
use std::path::PathBuf;
use tokio::fs;

/// Prefix of every source reference this service hands out
const SOURCE_REF_PREFIX: &str = "media/";

#[derive(Debug, Clone)]
pub struct MediaStorage {
    base_path: PathBuf,
}

impl MediaStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Initialize the storage directory
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    /// Store an uploaded file and return its opaque source reference
    ///
    /// The reference embeds an upload timestamp so two files with the same
    /// original name never collide.
    pub async fn store(&self, original_name: &str, data: &[u8]) -> Result<String> {
        let filename = format!(
            "{}-{}",
            chrono::Utc::now().timestamp_millis(),
            sanitize_filename(original_name)
        );
        let path = self.base_path.join(&filename);

        fs::write(&path, data).await?;

        Ok(format!("{SOURCE_REF_PREFIX}{filename}"))
    }

    /// Delete the file behind a source reference
    ///
    /// A reference whose file is already gone is not an error; the desired
    /// end state holds either way.
    pub async fn delete(&self, source_ref: &str) -> Result<()> {
        let path = self.resolve(source_ref)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Map a source reference back to a path inside the storage directory
    fn resolve(&self, source_ref: &str) -> Result<PathBuf> {
        let filename = source_ref
            .strip_prefix(SOURCE_REF_PREFIX)
            .ok_or_else(|| ServerError::BadRequest("Invalid source reference".to_string()))?;

        // References are single path components; anything else is a
        // traversal attempt
        if filename.is_empty() || filename.contains('/') || filename.contains("..") {
            return Err(ServerError::BadRequest(
                "Invalid source reference".to_string(),
            ));
        }

        Ok(self.base_path.join(filename))
    }
}

fn sanitize_filename(name: &str) -> String {
    let mut cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    // `resolve` treats ".." as traversal, so the name must not contain it
    while cleaned.contains("..") {
        cleaned = cleaned.replace("..", "_");
    }

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_delete() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(temp_dir.path().to_path_buf());
        storage.initialize().await.unwrap();

        let source_ref = storage.store("song.mp3", b"fake audio data").await.unwrap();
        assert!(source_ref.starts_with("media/"));
        assert!(source_ref.ends_with("song.mp3"));

        let path = storage.resolve(&source_ref).unwrap();
        assert!(path.exists());

        storage.delete(&source_ref).await.unwrap();
        assert!(!path.exists());

        // Deleting again is fine
        storage.delete(&source_ref).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_traversal_references() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(temp_dir.path().to_path_buf());

        assert!(storage.delete("media/../../etc/passwd").await.is_err());
        assert!(storage.delete("not-media/file.mp3").await.is_err());
        assert!(storage.delete("media/").await.is_err());
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("My Song (live).mp3"), "My_Song__live_.mp3");
        assert_eq!(sanitize_filename("✨"), "_");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[test]
    fn test_sanitize_filename_removes_dot_dot() {
        assert_eq!(sanitize_filename("../../evil"), "____evil");
        assert_eq!(sanitize_filename("..foo"), "_foo");
        assert_eq!(sanitize_filename("a..b..c"), "a_b_c");
        assert!(!sanitize_filename("....").contains(".."));
    }

    #[tokio::test]
    async fn test_dot_dot_names_stay_deletable() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(temp_dir.path().to_path_buf());
        storage.initialize().await.unwrap();

        // The handed-out reference must survive its own resolve
        let source_ref = storage.store("..sneaky..mp3", b"data").await.unwrap();
        let path = storage.resolve(&source_ref).unwrap();
        assert!(path.exists());
        assert!(path.starts_with(temp_dir.path()));

        storage.delete(&source_ref).await.unwrap();
        assert!(!path.exists());
    }
}
