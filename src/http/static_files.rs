//! Report directory resolution for static hosting.

use std::io;
use std::path::{Path, PathBuf};

/// Make sure a report directory exists and return it.
///
/// Uses `configured` when it exists or can be created. Otherwise falls back
/// to `<data_local_dir>/theHarvester/static`.
pub fn ensure_static_dir(configured: &Path) -> io::Result<PathBuf> {
    if configured.is_dir() {
        return Ok(configured.to_path_buf());
    }

    match std::fs::create_dir_all(configured) {
        Ok(()) => {
            tracing::info!(path = %configured.display(), "Created static directory");
            Ok(configured.to_path_buf())
        }
        Err(e) => {
            let fallback = fallback_dir().ok_or(e)?;
            tracing::warn!(
                configured = %configured.display(),
                fallback = %fallback.display(),
                "Static directory unavailable, using fallback"
            );
            std::fs::create_dir_all(&fallback)?;
            Ok(fallback)
        }
    }
}

fn fallback_dir() -> Option<PathBuf> {
    directories::BaseDirs::new()
        .map(|dirs| dirs.data_local_dir().join("theHarvester").join("static"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_missing_directory() {
        let dir = std::env::temp_dir()
            .join(format!("harvest-api-static-{}", uuid::Uuid::new_v4()))
            .join("nested");
        assert!(!dir.exists());

        let resolved = ensure_static_dir(&dir).unwrap();
        assert_eq!(resolved, dir);
        assert!(dir.is_dir());

        // Second call reuses it.
        assert_eq!(ensure_static_dir(&dir).unwrap(), dir);
        let _ = std::fs::remove_dir_all(dir.parent().unwrap());
    }
}
