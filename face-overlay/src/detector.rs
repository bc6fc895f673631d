//! Face, nose and eye-pair landmark detection.

use std::path::Path;

use image::imageops;
use image::{GrayImage, Luma, RgbImage};
use tracing::{debug, info};

use crate::cascade::{HaarCascade, ScanParams};
use crate::error::CascadeError;
use crate::geometry::Rect;

pub const FACE_CASCADE_FILE: &str = "haarcascade_frontalface_default.xml";
pub const NOSE_CASCADE_FILE: &str = "haarcascade_mcs_nose.xml";
pub const EYE_CASCADE_FILE: &str = "haarcascade_eye.xml";

/// Landmarks found in one picture.
///
/// `nose` and `eyes` are relative to the top-left corner of `face` and are only ever set
/// when `face` is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetectionResult {
    pub face: Option<Rect>,
    pub nose: Option<Rect>,
    pub eyes: Option<Rect>,
}

/// Holds the three cascades; detection is a pure function of image and cascades.
#[derive(Debug, Clone)]
pub struct FaceLandmarkDetector {
    face: HaarCascade,
    nose: HaarCascade,
    eyes: HaarCascade,
}

impl FaceLandmarkDetector {
    pub fn from_cascades(face: HaarCascade, nose: HaarCascade, eyes: HaarCascade) -> Self {
        Self { face, nose, eyes }
    }

    /// Loads the face, nose and eye cascades from `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Self, CascadeError> {
        let detector = Self::from_cascades(
            HaarCascade::load(&dir.join(FACE_CASCADE_FILE))?,
            HaarCascade::load(&dir.join(NOSE_CASCADE_FILE))?,
            HaarCascade::load(&dir.join(EYE_CASCADE_FILE))?,
        );
        info!(dir = %dir.display(), "Loaded face landmark cascades");
        Ok(detector)
    }

    pub fn face_params() -> ScanParams {
        ScanParams {
            scale_factor: 1.1,
            min_neighbors: 5,
            min_size: Some((30, 30)),
        }
    }

    pub fn feature_params() -> ScanParams {
        ScanParams::default()
    }

    /// Finds the first face, then the first nose and the eye pair inside it.
    pub fn detect(&self, image: &RgbImage) -> DetectionResult {
        let gray = luminance(image);
        let Some(face) = self
            .face
            .detect_multi_scale(&gray, &Self::face_params())
            .into_iter()
            .next()
        else {
            debug!("No face detected");
            return DetectionResult::default();
        };

        let crop = imageops::crop_imm(
            &gray,
            face.x as u32,
            face.y as u32,
            face.width as u32,
            face.height as u32,
        )
        .to_image();

        let nose = self
            .nose
            .detect_multi_scale(&crop, &Self::feature_params())
            .into_iter()
            .next();
        let eye_hits = self.eyes.detect_multi_scale(&crop, &Self::feature_params());
        let eyes = merge_eye_pair(&eye_hits);

        debug!(?face, ?nose, ?eyes, eye_candidates = eye_hits.len(), "Detected landmarks");
        DetectionResult {
            face: Some(face),
            nose,
            eyes,
        }
    }
}

/// BT.601 luma with the fixed-point weights used for RGB to grey conversion.
pub fn luminance(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        let y = (u32::from(r) * 4899 + u32::from(g) * 9617 + u32::from(b) * 1868 + 8192) >> 14;
        Luma([y as u8])
    })
}

/// Merges exactly two eye detections into one box spanning both; any other count yields
/// no eye pair.
pub fn merge_eye_pair(eyes: &[Rect]) -> Option<Rect> {
    let [a, b] = eyes else {
        return None;
    };
    let (left, right) = if a.x < b.x { (a, b) } else { (b, a) };
    let top = left.y.min(right.y);
    let bottom = left.bottom().max(right.bottom());
    Some(Rect::from_corners(left.x, top, right.right(), bottom))
}
