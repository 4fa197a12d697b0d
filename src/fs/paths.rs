//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Deterministic file name for a photo.
pub fn photo_file_name(photo_id: &str) -> String {
    format!("img_{}.jpg", photo_id)
}

/// Final location of a photo under the target directory.
pub fn photo_path(dir: &Path, photo_id: &str) -> PathBuf {
    dir.join(photo_file_name(photo_id))
}

/// Temporary location written while the download is in progress.
pub fn partial_path(dir: &Path, photo_id: &str) -> PathBuf {
    dir.join(format!("{}.part", photo_file_name(photo_id)))
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        return Err(Error::ConfigValidation {
            field: "dirname".to_string(),
            message: format!("{} exists and is not a directory", path.display()),
        });
    }
    if !path.exists() {
        std::fs::create_dir_all(path)?;
        tracing::debug!("Created directory {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_photo_paths() {
        let dir = Path::new("/downloads/photos");
        assert_eq!(
            photo_path(dir, "42"),
            PathBuf::from("/downloads/photos/img_42.jpg")
        );
        assert_eq!(
            partial_path(dir, "42"),
            PathBuf::from("/downloads/photos/img_42.jpg.part")
        );
    }

    #[test]
    fn test_ensure_dir() {
        let root = tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir(&nested).unwrap();

        let file = root.path().join("file");
        std::fs::write(&file, "x").unwrap();
        assert!(matches!(
            ensure_dir(&file),
            Err(Error::ConfigValidation { .. })
        ));
    }
}
