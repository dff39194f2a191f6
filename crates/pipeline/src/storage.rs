//! Cell image files on disk.

use std::path::{Path, PathBuf};

/// Suffix for partially written images.
const TEMP_SUFFIX: &str = ".tmp";

/// Write `bytes` to `folder/filename` via a temporary file and a rename, so
/// the final path only ever holds a complete image.
pub async fn write_image_atomically(
    folder: &Path,
    filename: &str,
    bytes: &[u8],
) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(folder).await?;

    let final_path = folder.join(filename);
    let temp_path = folder.join(format!("{filename}{TEMP_SUFFIX}"));

    tokio::fs::write(&temp_path, bytes).await?;
    if let Err(e) = tokio::fs::rename(&temp_path, &final_path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e);
    }
    Ok(final_path)
}
