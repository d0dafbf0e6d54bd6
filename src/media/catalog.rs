//! Media catalog
//!
//! Scans a root directory once and maps stable integer indices to the
//! absolute paths of every eligible media file below it.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// File extensions picked up by the scan (compared case-insensitively).
pub const MEDIA_EXTENSIONS: [&str; 5] = ["mp3", "mp4", "jpg", "png", "gif"];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot open media root {path}: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("media index {index} out of range (catalog has {len} entries)")]
    IndexOutOfRange { index: i64, len: usize },
}

/// Ordered, immutable index → path mapping.
///
/// Built once and shared read-only between connections; an index resolves to
/// the same path for the catalog's whole lifetime.
#[derive(Debug, Clone)]
pub struct MediaCatalog {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl MediaCatalog {
    /// Recursively scans `root` for media files.
    ///
    /// Entries are sorted lexicographically so that the same directory
    /// always produces the same indices. Unreadable subdirectories are
    /// skipped with a warning; only an unreadable root is an error.
    pub fn build(root: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let root = root.as_ref();
        let root = std::fs::canonicalize(root).map_err(|source| CatalogError::Root {
            path: root.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        let mut pending = vec![root.clone()];

        while let Some(dir) = pending.pop() {
            let entries = match std::fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(source) if dir == root => {
                    return Err(CatalogError::Root { path: root, source });
                }
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
                    continue;
                }
            };

            for entry in entries.flatten() {
                let Ok(file_type) = entry.file_type() else {
                    continue;
                };
                let path = entry.path();

                // Symlinked directories are not followed to avoid cycles.
                if file_type.is_dir() {
                    pending.push(path);
                } else if is_media_file(&path) && path.is_file() {
                    files.push(path);
                }
            }
        }

        files.sort();

        tracing::info!(root = %root.display(), files = files.len(), "Media catalog built");

        Ok(Self { root, files })
    }

    /// Normalized (canonical) root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Resolves an index taken from a request target.
    ///
    /// Fails with [`CatalogError::IndexOutOfRange`] for negative indices and
    /// for indices at or past the end of the catalog.
    pub fn resolve(&self, index: i64) -> Result<&Path, CatalogError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.files.get(i))
            .map(PathBuf::as_path)
            .ok_or(CatalogError::IndexOutOfRange {
                index,
                len: self.files.len(),
            })
    }

    /// Name shown to clients: the path with the root prefix removed
    /// (case-insensitively) and separators normalized to `/`.
    pub fn display_name(&self, path: &Path) -> String {
        let root = self.root.to_string_lossy();
        let full = path.to_string_lossy();

        let stripped = if full.len() >= root.len()
            && full.is_char_boundary(root.len())
            && full[..root.len()].eq_ignore_ascii_case(&root)
        {
            &full[root.len()..]
        } else {
            &full[..]
        };

        stripped.replace('\\', "/").trim_start_matches('/').to_string()
    }

    /// `(index, display name)` pairs in catalog order, as handed to the
    /// listing renderer.
    pub fn listing(&self) -> Vec<(usize, String)> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, path)| (i, self.display_name(path)))
            .collect()
    }
}

/// Whether `path` carries one of the [`MEDIA_EXTENSIONS`].
pub fn is_media_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MEDIA_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
