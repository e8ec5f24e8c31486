//! Kingdom map loader.

use std::collections::HashSet;
use std::path::Path;

use merge_core::{GameConfig, Parcel};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Parcel list structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParcelFile {
    pub parcels: Vec<Parcel>,
}

/// Loader for the parcel map from RON files.
pub struct ParcelLoader;

impl ParcelLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<Parcel>> {
        let content = read_file(path)?;
        let file: ParcelFile = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse parcel RON: {}", e))?;

        validate(&file.parcels)?;
        Ok(file.parcels)
    }
}

fn validate(parcels: &[Parcel]) -> LoadResult<()> {
    let mut seen = HashSet::new();
    for parcel in parcels {
        if !seen.insert(parcel.id.as_str()) {
            anyhow::bail!("duplicate parcel id '{}'", parcel.id);
        }
        for requirement in &parcel.requirements {
            if requirement.count == 0 {
                anyhow::bail!("parcel '{}' requires zero items", parcel.id);
            }
            if requirement.min_level == 0 || requirement.min_level > GameConfig::MAX_ITEM_LEVEL {
                anyhow::bail!(
                    "parcel '{}' requires unreachable level {}",
                    parcel.id,
                    requirement.min_level
                );
            }
        }
    }
    Ok(())
}
