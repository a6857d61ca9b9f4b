//! Photo storage under the upload root.
//!
//! Uploads are written to a hidden `.<name>.part` file first and renamed to
//! their final name only once the product record referencing them has been
//! persisted, so a failed save never leaves a visible orphan. A crash between
//! the store write and the rename leaves a record whose photo 404s until it
//! is re-uploaded.

use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};

#[derive(Clone, Debug)]
pub struct UploadsConfig {
    pub path: PathBuf,
    /// Upper bound on a multipart product submission
    pub max_upload_bytes: usize,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./uploads"),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl FromEnv for UploadsConfig {
    /// - UPLOADS_PATH: defaults to ./uploads
    /// - UPLOADS_MAX_BYTES: defaults to 10 MiB
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            path: PathBuf::from(env_or_default("UPLOADS_PATH", "./uploads")),
            max_upload_bytes: env_parse_or("UPLOADS_MAX_BYTES", defaults.max_upload_bytes)?,
        })
    }
}

/// Unique stored name for an uploaded file: `<uuid-v4>-<original>` with
/// spaces, colons and both slash kinds removed.
pub fn unique_photo_name(original: &str) -> String {
    let cleaned: String = original
        .chars()
        .filter(|c| !matches!(c, ' ' | ':' | '\\' | '/'))
        .collect();
    format!("{}-{}", Uuid::new_v4(), cleaned.trim())
}

/// Content type guessed from the file extension.
pub fn content_type_for(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Upload root with traversal-safe lookups
#[derive(Clone, Debug)]
pub struct PhotoStore {
    root: PathBuf,
}

impl PhotoStore {
    /// Create the root directory if needed and pin its canonical path.
    pub async fn open(root: impl AsRef<Path>) -> CatalogResult<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root).await?;
        let root = fs::canonicalize(root).await?;

        info!(root = %root.display(), "Upload root ready");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start an upload for a client-supplied filename.
    pub async fn stage(&self, original_filename: &str) -> CatalogResult<StagedPhoto> {
        let name = unique_photo_name(original_filename);
        let temp_path = self.root.join(format!(".{}.part", name));
        let final_path = self.root.join(&name);

        let file = File::create(&temp_path).await?;

        info!(foto = %name, original = %original_filename, "Staging photo");
        Ok(StagedPhoto {
            name,
            temp_path,
            final_path,
            file: Some(file),
            settled: false,
        })
    }

    /// Map a requested photo name to a file inside the root.
    ///
    /// Rejects empty names, separators, drive prefixes, `.`/`..`, hidden
    /// names (staged uploads), and anything whose canonical path leaves the
    /// root, e.g. through a symlink.
    pub async fn resolve(&self, filename: &str) -> CatalogResult<PathBuf> {
        let malformed = filename.is_empty()
            || filename.starts_with('.')
            || filename
                .chars()
                .any(|c| matches!(c, '/' | '\\' | ':' | '\0'));

        if malformed {
            warn!(filename, "Rejected photo name");
            return Err(CatalogError::InvalidPhotoName(filename.to_string()));
        }

        let canonical = match fs::canonicalize(self.root.join(filename)).await {
            Ok(path) => path,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CatalogError::PhotoNotFound(filename.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        if !canonical.starts_with(&self.root) {
            warn!(filename, "Photo path escapes upload root");
            return Err(CatalogError::InvalidPhotoName(filename.to_string()));
        }

        Ok(canonical)
    }

    /// Open a stored photo for streaming.
    pub async fn open_photo(&self, filename: &str) -> CatalogResult<File> {
        let path = self.resolve(filename).await?;
        match File::open(&path).await {
            Ok(file) => Ok(file),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CatalogError::PhotoNotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Readiness probe: the root still exists and is a directory.
    pub async fn check(&self) -> Result<(), String> {
        match fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(format!("{} is not a directory", self.root.display())),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// An upload written to a hidden temporary file, not yet visible by name.
///
/// Dropping it without [`commit`](Self::commit) removes the temporary file.
#[derive(Debug)]
pub struct StagedPhoto {
    name: String,
    temp_path: PathBuf,
    final_path: PathBuf,
    file: Option<File>,
    settled: bool,
}

impl StagedPhoto {
    /// The name the photo will have once committed.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn write_chunk(&mut self, chunk: &[u8]) -> CatalogResult<()> {
        match self.file.as_mut() {
            Some(file) => Ok(file.write_all(chunk).await?),
            None => Err(CatalogError::Storage(format!(
                "staged photo {} already closed",
                self.name
            ))),
        }
    }

    /// Flush and atomically move the file to its final name.
    pub async fn commit(mut self) -> CatalogResult<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
            file.sync_all().await?;
        }

        fs::rename(&self.temp_path, &self.final_path).await?;
        self.settled = true;

        info!(foto = %self.name, "Photo stored");
        Ok(())
    }

    pub async fn discard(mut self) {
        self.file.take();
        if let Err(e) = fs::remove_file(&self.temp_path).await {
            warn!(foto = %self.name, error = %e, "Could not remove staged photo");
        }
        self.settled = true;
    }
}

impl Drop for StagedPhoto {
    fn drop(&mut self) {
        if !self.settled {
            self.file.take();
            let _ = std::fs::remove_file(&self.temp_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    async fn read(store: &PhotoStore, name: &str) -> CatalogResult<Vec<u8>> {
        use tokio::io::AsyncReadExt;
        let mut file = store.open_photo(name).await?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).await?;
        Ok(bytes)
    }

    async fn store() -> (TempDir, PhotoStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = PhotoStore::open(dir.path()).await.unwrap();
        (dir, store)
    }

    #[test]
    fn test_unique_names_for_same_upload() {
        let names: HashSet<_> = (0..1000).map(|_| unique_photo_name("photo.png")).collect();
        assert_eq!(names.len(), 1000);
    }

    #[test]
    fn test_unique_name_strips_unsafe_characters() {
        let name = unique_photo_name(" C:\\fotos\\mi foto.png ");
        let (uuid, rest) = name.split_at(36);
        assert!(Uuid::parse_str(uuid).is_ok());
        assert_eq!(rest, "-Cfotosmifoto.png");
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.PNG"), "image/png");
        assert_eq!(content_type_for("a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("notas"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_open_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("uploads").join("img");
        let store = PhotoStore::open(&nested).await.unwrap();
        assert!(store.root().is_dir());
        assert!(store.check().await.is_ok());
    }

    #[tokio::test]
    async fn test_staged_photo_visible_only_after_commit() {
        let (_dir, store) = store().await;

        let mut staged = store.stage("photo.png").await.unwrap();
        staged.write_chunk(b"\x89PNG").await.unwrap();
        staged.write_chunk(b"data").await.unwrap();
        let name = staged.name().to_string();

        assert!(matches!(
            read(&store, &name).await,
            Err(CatalogError::PhotoNotFound(_))
        ));

        staged.commit().await.unwrap();

        assert_eq!(read(&store, &name).await.unwrap(), b"\x89PNGdata");
        assert!(!store.root().join(format!(".{}.part", name)).exists());
    }

    #[tokio::test]
    async fn test_discard_leaves_nothing() {
        let (_dir, store) = store().await;

        let mut staged = store.stage("photo.png").await.unwrap();
        staged.write_chunk(b"data").await.unwrap();
        staged.discard().await;

        assert_eq!(std::fs::read_dir(store.root()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_drop_without_commit_cleans_up() {
        let (_dir, store) = store().await;

        {
            let mut staged = store.stage("photo.png").await.unwrap();
            staged.write_chunk(b"data").await.unwrap();
        }

        assert_eq!(std::fs::read_dir(store.root()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_resolve_rejects_traversal() {
        let (dir, store) = store().await;
        std::fs::write(dir.path().join("ok.png"), b"x").unwrap();

        for name in [
            "",
            ".",
            "..",
            "../etc/passwd",
            "../../etc/passwd",
            "/etc/passwd",
            "sub/ok.png",
            "..\\ok.png",
            "C:ok.png",
            ".hidden.part",
        ] {
            assert!(
                matches!(
                    store.resolve(name).await,
                    Err(CatalogError::InvalidPhotoName(_))
                ),
                "{name:?} should be rejected"
            );
        }

        assert!(store.resolve("ok.png").await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolve_rejects_symlink_escape() {
        let (dir, store) = store().await;
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret"), b"top secret").unwrap();
        std::os::unix::fs::symlink(outside.path().join("secret"), dir.path().join("link.png"))
            .unwrap();

        assert!(matches!(
            read(&store, "link.png").await,
            Err(CatalogError::InvalidPhotoName(_))
        ));
    }

    #[test]
    fn test_uploads_config_from_env() {
        temp_env::with_vars(
            [
                ("UPLOADS_PATH", Some("/srv/fotos")),
                ("UPLOADS_MAX_BYTES", None),
            ],
            || {
                let config = UploadsConfig::from_env().unwrap();
                assert_eq!(config.path, PathBuf::from("/srv/fotos"));
                assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
            },
        );
    }
}
