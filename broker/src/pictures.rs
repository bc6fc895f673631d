//! Picture records created from correspondents' media, and their overlay selections.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use playground_core::{
    make_unique_id, AssetLibrary, OverlayArea, PictureRecord, PlaygroundError, Result,
};
use tracing::{info, warn};

/// Picture code → [`PictureRecord`], validated against the overlay [`AssetLibrary`].
#[derive(Debug)]
pub struct PictureStore {
    pictures: DashMap<String, PictureRecord>,
    assets: AssetLibrary,
}

impl PictureStore {
    pub fn new(assets: AssetLibrary) -> Self {
        Self {
            pictures: DashMap::new(),
            assets,
        }
    }

    pub fn assets(&self) -> &AssetLibrary {
        &self.assets
    }

    /// Creates a record for `source_url` with every overlay slot unset.
    pub fn create(&self, source_url: &str) -> PictureRecord {
        loop {
            let code = make_unique_id();
            if let Entry::Vacant(slot) = self.pictures.entry(code.clone()) {
                let record = PictureRecord::new(code, source_url.to_string());
                slot.insert(record.clone());
                info!(picture_code = %record.code, source_url = %record.source_url, "Picture created");
                return record;
            }
        }
    }

    /// Snapshot of the record for `code`.
    pub fn get(&self, code: &str) -> Option<PictureRecord> {
        self.pictures.get(code).map(|r| r.value().clone())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.pictures.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.pictures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pictures.is_empty()
    }

    /// Chooses `asset_name` for `area` on picture `code`; last write wins.
    ///
    /// Fails without touching the record when the picture is unknown, the area has no
    /// compositor (including the reserved face regions), or no asset file of that name
    /// exists in the area's namespace.
    pub fn set_overlay(
        &self,
        code: &str,
        area: OverlayArea,
        asset_name: &str,
    ) -> Result<PictureRecord> {
        let region = match area {
            OverlayArea::Implemented(region) => region,
            OverlayArea::Reserved(reserved) => {
                warn!(picture_code = %code, area = reserved.as_str(), "Reserved overlay area requested");
                return Err(PlaygroundError::UnsupportedArea(reserved.as_str().to_string()));
            }
        };

        if !self.assets.exists(region, asset_name) {
            return Err(PlaygroundError::AssetNotFound {
                region: region.to_string(),
                name: asset_name.to_string(),
            });
        }

        let mut record = self
            .pictures
            .get_mut(code)
            .ok_or_else(|| PlaygroundError::UnknownPicture(code.to_string()))?;
        record.set_slot(region, asset_name.to_string());
        info!(picture_code = %code, area = %region, asset = %asset_name, "Overlay selected");
        Ok(record.clone())
    }
}
