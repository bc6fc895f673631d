//! # face-overlay
//!
//! Picture annotation pipeline: Haar cascade landmark detection ([`FaceLandmarkDetector`]),
//! face-anchored overlay placement and blending ([`compositor`]), and the end-to-end
//! [`PictureRenderer`] (fetch, resize, detect, composite, encode, upload).

pub mod cascade;
pub mod compositor;
pub mod detector;
pub mod error;
pub mod geometry;
pub mod renderer;
pub mod resize;

pub use cascade::{HaarCascade, ScanParams};
pub use compositor::{apply_overlays, blend_overlay, place_glasses, place_moustache, OverlayAsset};
pub use detector::{DetectionResult, FaceLandmarkDetector};
pub use error::{CascadeError, RenderError};
pub use geometry::Rect;
pub use renderer::{compose_picture, PictureRenderer};
pub use resize::resize_area;
