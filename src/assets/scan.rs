use std::path::{Path, PathBuf};

use anyhow::Context as _;
use walkdir::WalkDir;

use crate::foundation::error::MosaicResult;

/// File extensions treated as photos (matched case-insensitively).
pub const PHOTO_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "webp", "jfif"];

/// Return `true` when `path` has a photo extension.
pub fn is_photo(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| PHOTO_EXTENSIONS.iter().any(|p| e.eq_ignore_ascii_case(p)))
}

/// List the photos directly inside `dir`, sorted and deduplicated.
pub fn scan_photos(dir: &Path) -> MosaicResult<Vec<PathBuf>> {
    let mut photos = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.with_context(|| format!("scan photo directory '{}'", dir.display()))?;
        if entry.file_type().is_file() && is_photo(entry.path()) {
            photos.push(entry.into_path());
        }
    }
    photos.sort();
    photos.dedup();
    tracing::debug!(dir = %dir.display(), count = photos.len(), "scanned photos");
    Ok(photos)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/scan.rs"]
mod tests;
