//! Filesystem adapter: discovers image files and decodes them on demand.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use pixel_qa_core::{ImageInfo, ImageSource};
use tracing::{debug, trace, warn};

/// Extensions picked up when scanning directories (compared lowercase).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "tif", "webp", "bmp", "gif"];

/// Image source over files and directories.
///
/// Discovery runs once and is cached, so `count_hint()` and `images()` agree.
/// Directory entries are visited in sorted order.
pub struct FsImageSource {
    roots: Vec<PathBuf>,
    recursive: bool,
    discovered: OnceCell<Vec<PathBuf>>,
}

impl FsImageSource {
    /// Creates a source over `roots`.
    ///
    /// Files given directly are always included, whatever their extension,
    /// so undecodable inputs surface as skipped images instead of vanishing.
    /// Directories contribute files with a known image extension, descending
    /// into subdirectories only when `recursive` is set.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, recursive: bool) -> Self {
        Self {
            roots,
            recursive,
            discovered: OnceCell::new(),
        }
    }

    /// Discovered files, in processing order.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        self.discovered.get_or_init(|| {
            let mut files = Vec::new();
            for root in &self.roots {
                if root.is_file() {
                    files.push(root.clone());
                } else if root.is_dir() {
                    walk(root, self.recursive, &mut files);
                } else {
                    warn!("Path does not exist: {}", root.display());
                }
            }
            debug!("Found {} image files", files.len());
            files
        })
    }
}

fn walk(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) {
    let mut entries: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(rd) => rd.flatten().map(|e| e.path()).collect(),
        Err(e) => {
            warn!("Failed to read directory {}: {e}", dir.display());
            return;
        }
    };
    entries.sort();

    for path in entries {
        if path.is_dir() {
            if recursive {
                walk(&path, recursive, files);
            }
        } else if has_image_extension(&path) {
            files.push(path);
        } else {
            trace!("Ignoring {}", path.display());
        }
    }
}

impl ImageSource for FsImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = Result<ImageInfo>> + Send + '_> {
        Box::new(self.files().iter().map(|path| load_image(path)))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.files().len())
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(e)))
}

/// Decodes one file into an RGB raster, dropping any alpha channel.
///
/// # Errors
///
/// Returns an error naming the path if the file cannot be read or decoded.
pub fn load_image(path: &Path) -> Result<ImageInfo> {
    let decoded =
        image::open(path).with_context(|| format!("Failed to decode {}", path.display()))?;
    Ok(ImageInfo::new(path.to_string_lossy(), &decoded))
}
