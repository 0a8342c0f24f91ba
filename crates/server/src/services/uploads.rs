//! File upload pipeline for logos and the district map image.
//!
//! Two purposes with distinct filename policies share one pipeline:
//!
//! - **Map image** - a single fixed-name `.jpg` under the site-assets
//!   directory, overwritten on every accepted upload.
//! - **Company logo** - named `{slug}.{ext}` under the logo directory,
//!   with `.png`, `.jpg` and `.jpeg` accepted.
//!
//! Rejection (wrong extension, oversized) never leaves a partial file on
//! disk: the whole upload is buffered and validated before a single write.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum::extract::Multipart;

/// Maximum accepted upload size in bytes.
pub const MAX_UPLOAD_BYTES: usize = 10_000_000;

/// Fixed filename of the district map image under the site-assets directory.
pub const MAP_IMAGE_FILENAME: &str = "plan.jpg";

/// Extensions accepted for company logos.
const LOGO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// All extensions a logo may have been stored under at some point. Deletion
/// sweeps every one of them, not only the recorded extension, because a
/// re-upload under a different extension leaves the old file behind.
const LOGO_SWEEP_EXTENSIONS: &[&str] = &["jpg", "png", "jpeg"];

/// Errors produced by the upload pipeline.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The request carried no file in the expected field.
    #[error("aucun fichier reçu")]
    MissingFile,

    /// The file's extension is not in the whitelist for this purpose.
    #[error("extension '{0}' non autorisée")]
    Extension(String),

    /// The file exceeds [`MAX_UPLOAD_BYTES`].
    #[error("fichier trop volumineux (max {MAX_UPLOAD_BYTES} octets)")]
    TooLarge,

    /// The multipart body could not be read.
    #[error("envoi mal formé: {0}")]
    Malformed(String),

    /// Writing or removing the file failed.
    #[error("erreur disque: {0}")]
    Io(#[from] std::io::Error),
}

/// A file received through a multipart form, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied filename, used only for its extension.
    pub original_name: String,
    pub bytes: Vec<u8>,
}

/// Decoded multipart submission: text fields plus at most one file.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

/// Read a single-file multipart form into memory.
///
/// Text fields are collected into a map; the field named `file_field` is
/// buffered as the upload. Additional file fields are rejected (uploads are
/// single-file operations).
///
/// # Errors
///
/// Returns `UploadError::Malformed` on a broken multipart stream and
/// `UploadError::TooLarge` when the file exceeds the size limit.
pub async fn read_upload_form(
    multipart: &mut Multipart,
    file_field: &str,
) -> Result<UploadForm, UploadError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Malformed(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(file_name) = field.file_name() {
            if name != file_field || form.file.is_some() {
                return Err(UploadError::Malformed(format!(
                    "unexpected file field '{name}'"
                )));
            }
            let original_name = file_name.to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| UploadError::Malformed(e.to_string()))?;
            if bytes.len() > MAX_UPLOAD_BYTES {
                return Err(UploadError::TooLarge);
            }
            form.file = Some(UploadedFile {
                original_name,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| UploadError::Malformed(e.to_string()))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

/// Filesystem store for uploaded media.
#[derive(Debug, Clone)]
pub struct MediaStore {
    site_assets_dir: PathBuf,
    logo_dir: PathBuf,
}

impl MediaStore {
    #[must_use]
    pub fn new(site_assets_dir: impl Into<PathBuf>, logo_dir: impl Into<PathBuf>) -> Self {
        Self {
            site_assets_dir: site_assets_dir.into(),
            logo_dir: logo_dir.into(),
        }
    }

    /// Directory holding site-wide images.
    #[must_use]
    pub fn site_assets_dir(&self) -> &Path {
        &self.site_assets_dir
    }

    /// Directory holding company logos.
    #[must_use]
    pub fn logo_dir(&self) -> &Path {
        &self.logo_dir
    }

    /// Store the district map image under its fixed filename.
    ///
    /// Only `.jpg` originals are accepted. An existing map image is
    /// overwritten.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Extension` for anything but `.jpg`,
    /// `UploadError::TooLarge` above the size limit, `UploadError::Io` on a
    /// failed write.
    pub async fn store_map_image(&self, file: &UploadedFile) -> Result<(), UploadError> {
        let ext = extension_of(&file.original_name)
            .ok_or_else(|| UploadError::Extension(String::new()))?;
        if ext != "jpg" {
            return Err(UploadError::Extension(ext));
        }
        if file.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge);
        }

        tokio::fs::create_dir_all(&self.site_assets_dir).await?;
        tokio::fs::write(self.site_assets_dir.join(MAP_IMAGE_FILENAME), &file.bytes).await?;
        Ok(())
    }

    /// Store a company logo as `{slug}.{original-extension}` and return the
    /// stored filename.
    ///
    /// An existing file with the same name is overwritten; a prior logo
    /// stored under a different extension is left in place (it is swept at
    /// account deletion).
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Extension` for extensions outside
    /// `.png`/`.jpg`/`.jpeg`, `UploadError::TooLarge` above the size limit,
    /// `UploadError::Io` on a failed write.
    pub async fn store_logo(&self, slug: &str, file: &UploadedFile) -> Result<String, UploadError> {
        let ext = extension_of(&file.original_name)
            .ok_or_else(|| UploadError::Extension(String::new()))?;
        if !LOGO_EXTENSIONS.contains(&ext.as_str()) {
            return Err(UploadError::Extension(ext));
        }
        if file.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge);
        }

        let filename = format!("{slug}.{ext}");
        tokio::fs::create_dir_all(&self.logo_dir).await?;
        tokio::fs::write(self.logo_dir.join(&filename), &file.bytes).await?;
        Ok(filename)
    }

    /// Remove every file a logo may have been stored under.
    ///
    /// Takes the recorded logo filename, strips its extension, and attempts
    /// removal of the base name under all accepted extensions. Missing
    /// files are a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Io` only for filesystem failures other than
    /// the file not existing.
    pub async fn remove_logo_files(&self, logo: &str) -> Result<(), UploadError> {
        let base = logo.rsplit_once('.').map_or(logo, |(base, _)| base);

        for ext in LOGO_SWEEP_EXTENSIONS {
            let path = self.logo_dir.join(format!("{base}.{ext}"));
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(UploadError::Io(e)),
            }
        }
        Ok(())
    }
}

/// Lowercased extension of a client filename, if any.
fn extension_of(original_name: &str) -> Option<String> {
    Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn media() -> (tempfile::TempDir, MediaStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path().join("site"), dir.path().join("logo"));
        (dir, store)
    }

    fn file(name: &str, bytes: &[u8]) -> UploadedFile {
        UploadedFile {
            original_name: name.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_map_image_jpg_only() {
        let (_dir, store) = media();

        assert!(matches!(
            store.store_map_image(&file("plan.png", b"x")).await,
            Err(UploadError::Extension(_))
        ));

        store.store_map_image(&file("nouveau-plan.JPG", b"jpegdata")).await.unwrap();
        let stored = store.site_assets_dir().join(MAP_IMAGE_FILENAME);
        assert_eq!(std::fs::read(stored).unwrap(), b"jpegdata");
    }

    #[tokio::test]
    async fn test_map_image_overwrites() {
        let (_dir, store) = media();
        store.store_map_image(&file("a.jpg", b"first")).await.unwrap();
        store.store_map_image(&file("b.jpg", b"second")).await.unwrap();
        let stored = store.site_assets_dir().join(MAP_IMAGE_FILENAME);
        assert_eq!(std::fs::read(stored).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_logo_rejects_gif_without_writing() {
        let (_dir, store) = media();
        assert!(matches!(
            store.store_logo("acme", &file("logo.gif", b"gifdata")).await,
            Err(UploadError::Extension(_))
        ));
        // The logo directory stays untouched - not even created.
        assert!(!store.logo_dir().exists());
    }

    #[tokio::test]
    async fn test_logo_named_after_slug() {
        let (_dir, store) = media();
        let filename = store
            .store_logo("cafe-de-lerable", &file("IMG_0042.PNG", b"pngdata"))
            .await
            .unwrap();
        assert_eq!(filename, "cafe-de-lerable.png");
        assert!(store.logo_dir().join(&filename).exists());
    }

    #[tokio::test]
    async fn test_logo_size_limit() {
        let (_dir, store) = media();
        let big = vec![0u8; MAX_UPLOAD_BYTES + 1];
        assert!(matches!(
            store.store_logo("acme", &file("logo.png", &big)).await,
            Err(UploadError::TooLarge)
        ));
        assert!(!store.logo_dir().exists());
    }

    #[tokio::test]
    async fn test_remove_logo_files_sweeps_all_extensions() {
        let (_dir, store) = media();
        store.store_logo("acme", &file("v1.jpg", b"old")).await.unwrap();
        store.store_logo("acme", &file("v2.png", b"new")).await.unwrap();

        store.remove_logo_files("acme.jpg").await.unwrap();
        assert!(!store.logo_dir().join("acme.jpg").exists());
        assert!(!store.logo_dir().join("acme.png").exists());
        assert!(!store.logo_dir().join("acme.jpeg").exists());
    }

    #[tokio::test]
    async fn test_remove_logo_files_tolerates_missing() {
        let (_dir, store) = media();
        // Nothing was ever uploaded; directory does not even exist.
        store.remove_logo_files("fantome.png").await.unwrap();
    }
}
