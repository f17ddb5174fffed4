use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FeedError, Result};

pub const DEFAULT_OUTPUT_DIR: &str = "rss";

/// Path of the feed file for `key` inside `output_dir`.
pub fn feed_path(output_dir: &Path, key: &str) -> PathBuf {
    output_dir.join(format!("{key}.xml"))
}

/// Create the output directory if it does not exist yet.
pub fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir).map_err(|source| FeedError::Write {
        path: output_dir.to_path_buf(),
        source,
    })
}

/// Write a rendered feed, replacing any previous run's file.
pub fn save_feed(output_dir: &Path, key: &str, xml: &str) -> Result<PathBuf> {
    ensure_output_dir(output_dir)?;
    let filepath = feed_path(output_dir, key);

    fs::write(&filepath, xml).map_err(|source| FeedError::Write {
        path: filepath.clone(),
        source,
    })?;

    Ok(filepath)
}
