//! Content loaders for reading game data from files.
//!
//! Tunables come from TOML; catalogs, parcels and missions come from RON.

pub mod config;
pub mod items;
pub mod missions;
pub mod parcels;

pub use config::ConfigLoader;
pub use items::ItemLoader;
pub use missions::MissionLoader;
pub use parcels::ParcelLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;

    use tempfile::NamedTempFile;

    pub fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }
}
