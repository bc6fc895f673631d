//! Picture record and overlay region types.
//!
//! Only [`OverlayRegion::Moustache`] and [`OverlayRegion::Glasses`] are composited. The four
//! [`ReservedRegion`]s are recognised names with no compositor behind them: they parse, so
//! callers get a precise "not supported" answer instead of an unknown-name error, but they
//! can never be stored in a [`PictureRecord`] and never reach the renderer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlaygroundError;

/// An overlay region with a compositor. Order of variants is the render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayRegion {
    Moustache,
    Glasses,
}

impl OverlayRegion {
    /// All implemented regions, in render order.
    pub const ALL: [OverlayRegion; 2] = [OverlayRegion::Moustache, OverlayRegion::Glasses];

    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayRegion::Moustache => "moustache",
            OverlayRegion::Glasses => "glasses",
        }
    }

    /// Directory (under the asset root) holding this region's assets.
    pub fn asset_dir(&self) -> &'static str {
        match self {
            OverlayRegion::Moustache => "moustaches",
            OverlayRegion::Glasses => "glasses",
        }
    }
}

impl fmt::Display for OverlayRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Region names accepted by the protocol but not implemented by the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservedRegion {
    LeftEye,
    RightEye,
    LeftCheek,
    RightCheek,
}

impl ReservedRegion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservedRegion::LeftEye => "lefteye",
            ReservedRegion::RightEye => "righteye",
            ReservedRegion::LeftCheek => "leftcheek",
            ReservedRegion::RightCheek => "rightcheek",
        }
    }
}

/// A parsed `{area}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayArea {
    Implemented(OverlayRegion),
    Reserved(ReservedRegion),
}

impl FromStr for OverlayArea {
    type Err = PlaygroundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let area = match s {
            "moustache" => OverlayArea::Implemented(OverlayRegion::Moustache),
            "glasses" => OverlayArea::Implemented(OverlayRegion::Glasses),
            "lefteye" => OverlayArea::Reserved(ReservedRegion::LeftEye),
            "righteye" => OverlayArea::Reserved(ReservedRegion::RightEye),
            "leftcheek" => OverlayArea::Reserved(ReservedRegion::LeftCheek),
            "rightcheek" => OverlayArea::Reserved(ReservedRegion::RightCheek),
            other => return Err(PlaygroundError::UnsupportedArea(other.to_string())),
        };
        Ok(area)
    }
}

/// A picture submitted by a correspondent plus the overlays chosen for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureRecord {
    pub code: String,
    pub source_url: String,
    pub moustache: Option<String>,
    pub glasses: Option<String>,
}

impl PictureRecord {
    /// A fresh record with every slot unset.
    pub fn new(code: String, source_url: String) -> Self {
        Self {
            code,
            source_url,
            moustache: None,
            glasses: None,
        }
    }

    pub fn slot(&self, region: OverlayRegion) -> Option<&str> {
        match region {
            OverlayRegion::Moustache => self.moustache.as_deref(),
            OverlayRegion::Glasses => self.glasses.as_deref(),
        }
    }

    /// Replaces the asset chosen for `region`; last write wins.
    pub fn set_slot(&mut self, region: OverlayRegion, asset_name: String) {
        match region {
            OverlayRegion::Moustache => self.moustache = Some(asset_name),
            OverlayRegion::Glasses => self.glasses = Some(asset_name),
        }
    }

    /// Set slots in render order (moustache before glasses).
    pub fn selected_overlays(&self) -> Vec<(OverlayRegion, &str)> {
        OverlayRegion::ALL
            .iter()
            .filter_map(|region| self.slot(*region).map(|name| (*region, name)))
            .collect()
    }
}
