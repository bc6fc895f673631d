//! Overlay asset directory: `<root>/moustaches/<name>.png`, `<root>/glasses/<name>.png`.

use std::path::{Path, PathBuf};

use crate::types::OverlayRegion;

/// Locates overlay assets on disk, keyed by region namespace and asset name.
#[derive(Debug, Clone)]
pub struct AssetLibrary {
    root: PathBuf,
}

impl AssetLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the named asset, or None when the name could escape the region directory.
    pub fn path_for(&self, region: OverlayRegion, name: &str) -> Option<PathBuf> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
            || name.contains('\0')
        {
            return None;
        }
        Some(
            self.root
                .join(region.asset_dir())
                .join(format!("{name}.png")),
        )
    }

    /// True when an asset file named `name` exists in `region`'s namespace.
    pub fn exists(&self, region: OverlayRegion, name: &str) -> bool {
        self.path_for(region, name)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }
}
