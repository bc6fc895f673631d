//! Face-anchored overlay placement and masked blending.
//!
//! Placements are computed in face-local coordinates, clipped to the face, and blended into
//! the full picture at the face offset.

use std::path::Path;

use image::{GrayImage, Luma, Rgb, RgbImage, RgbaImage};
use playground_core::OverlayRegion;
use tracing::debug;

use crate::detector::DetectionResult;
use crate::geometry::Rect;
use crate::resize::resize_area;

/// An overlay image split into colour, alpha mask and inverted mask.
#[derive(Debug, Clone)]
pub struct OverlayAsset {
    colour: RgbImage,
    mask: GrayImage,
    mask_inv: GrayImage,
}

impl OverlayAsset {
    pub fn load(path: &Path) -> Result<Self, image::ImageError> {
        Ok(Self::from_rgba(&image::open(path)?.to_rgba8()))
    }

    pub fn from_rgba(rgba: &RgbaImage) -> Self {
        let (w, h) = rgba.dimensions();
        let colour = RgbImage::from_fn(w, h, |x, y| {
            let [r, g, b, _] = rgba.get_pixel(x, y).0;
            Rgb([r, g, b])
        });
        let mask = GrayImage::from_fn(w, h, |x, y| Luma([rgba.get_pixel(x, y).0[3]]));
        let mask_inv = GrayImage::from_fn(w, h, |x, y| Luma([255 - rgba.get_pixel(x, y).0[3]]));
        Self {
            colour,
            mask,
            mask_inv,
        }
    }

    pub fn width(&self) -> u32 {
        self.colour.width()
    }

    pub fn height(&self) -> u32 {
        self.colour.height()
    }

    /// Height keeping the asset's aspect ratio at `width`, truncated.
    fn height_for(&self, width: i32) -> i32 {
        if self.width() == 0 {
            return 0;
        }
        (i64::from(width) * i64::from(self.height()) / i64::from(self.width())) as i32
    }
}

/// Clips a face-local placement to the face; `None` when nothing is left.
fn clip_to_face(placement: Rect, face: Rect) -> Option<Rect> {
    let clipped = placement.clip_to(face.width, face.height);
    (!clipped.is_empty()).then_some(clipped)
}

/// Moustache under the nose: twice the nose width, centred on it, top edge at the nose's
/// vertical middle.
pub fn place_moustache(nose: Rect, face: Rect, asset: &OverlayAsset) -> Option<Rect> {
    let width = 2 * nose.width;
    let height = asset.height_for(width);
    let x1 = nose.x + nose.width / 2 - width / 2;
    let y1 = nose.y + nose.height / 2;
    clip_to_face(Rect::new(x1, y1, width, height), face)
}

/// Glasses over the eye pair: 1.3 times its width, centred on it, top edge at its top.
pub fn place_glasses(eyes: Rect, face: Rect, asset: &OverlayAsset) -> Option<Rect> {
    let width = (f64::from(eyes.width) * 1.3) as i32;
    let height = asset.height_for(width);
    let x1 = eyes.x + eyes.width / 2 - width / 2;
    let y1 = eyes.y;
    clip_to_face(Rect::new(x1, y1, width, height), face)
}

/// Blends `asset`, scaled to `placement` (face-local), into `base` in place.
///
/// Destination pixels keep the base where the inverted mask is non-zero, gain the asset
/// where the mask is non-zero, and the two are added with saturation.
pub fn blend_overlay(base: &mut RgbImage, asset: &OverlayAsset, face: Rect, placement: Rect) {
    if placement.is_empty() {
        return;
    }
    let (w, h) = (placement.width as u32, placement.height as u32);
    let colour = resize_area(&asset.colour, w, h);
    let mask = resize_area(&asset.mask, w, h);
    let mask_inv = resize_area(&asset.mask_inv, w, h);

    let origin_x = face.x + placement.x;
    let origin_y = face.y + placement.y;
    for y in 0..h {
        for x in 0..w {
            let (dx, dy) = (origin_x + x as i32, origin_y + y as i32);
            if dx < 0 || dy < 0 || dx as u32 >= base.width() || dy as u32 >= base.height() {
                continue;
            }
            let background = if mask_inv.get_pixel(x, y).0[0] != 0 {
                base.get_pixel(dx as u32, dy as u32).0
            } else {
                [0; 3]
            };
            let foreground = if mask.get_pixel(x, y).0[0] != 0 {
                colour.get_pixel(x, y).0
            } else {
                [0; 3]
            };
            let mixed = [
                background[0].saturating_add(foreground[0]),
                background[1].saturating_add(foreground[1]),
                background[2].saturating_add(foreground[2]),
            ];
            base.put_pixel(dx as u32, dy as u32, Rgb(mixed));
        }
    }
}

/// Applies `overlays` in order. Each asset is loaded through `load` only once its anchor is
/// known, so a slot without a face or anchor is skipped without touching its asset.
pub fn apply_overlays<T, E, F>(
    base: &mut RgbImage,
    detection: &DetectionResult,
    overlays: &[(OverlayRegion, T)],
    mut load: F,
) -> Result<(), E>
where
    F: FnMut(OverlayRegion, &T) -> Result<OverlayAsset, E>,
{
    let Some(face) = detection.face else {
        debug!("No face, overlays skipped");
        return Ok(());
    };
    for (region, selection) in overlays {
        let anchor = match region {
            OverlayRegion::Moustache => detection.nose,
            OverlayRegion::Glasses => detection.eyes,
        };
        let Some(anchor) = anchor else {
            debug!(region = %region, "No anchor for overlay, skipped");
            continue;
        };
        let asset = load(*region, selection)?;
        let placement = match region {
            OverlayRegion::Moustache => place_moustache(anchor, face, &asset),
            OverlayRegion::Glasses => place_glasses(anchor, face, &asset),
        };
        match placement {
            Some(placement) => {
                debug!(region = %region, ?placement, "Applying overlay");
                blend_overlay(base, &asset, face, placement);
            }
            None => debug!(region = %region, "Overlay clipped away, skipped"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::convert::Infallible;

    fn asset(width: u32, height: u32, colour: [u8; 4]) -> OverlayAsset {
        OverlayAsset::from_rgba(&RgbaImage::from_pixel(width, height, Rgba(colour)))
    }

    #[test]
    fn moustache_is_centred_under_nose() {
        let face = Rect::new(0, 0, 300, 300);
        let placed = place_moustache(Rect::new(100, 150, 40, 20), face, &asset(200, 50, [0; 4]));
        assert_eq!(placed, Some(Rect::from_corners(80, 160, 160, 180)));
    }

    #[test]
    fn glasses_span_the_eye_pair() {
        let face = Rect::new(0, 0, 300, 300);
        let placed = place_glasses(Rect::new(80, 120, 100, 30), face, &asset(260, 65, [0; 4]));
        assert_eq!(placed, Some(Rect::from_corners(65, 120, 195, 152)));
    }

    #[test]
    fn placement_is_clipped_to_face() {
        let face = Rect::new(50, 50, 100, 100);
        let placed = place_moustache(Rect::new(5, 90, 40, 20), face, &asset(100, 100, [0; 4]));
        // Unclipped: x1 = 5 + 20 - 40 = -15, y1 = 100, width 80, height 80.
        assert_eq!(placed, None);

        let placed = place_moustache(Rect::new(5, 40, 40, 20), face, &asset(100, 100, [0; 4]));
        assert_eq!(placed, Some(Rect::from_corners(0, 50, 65, 100)));
    }

    #[test]
    fn opaque_pixels_replace_base_and_transparent_keep_it() {
        let mut base = RgbImage::from_pixel(10, 10, Rgb([10, 20, 30]));
        let mut rgba = RgbaImage::from_pixel(2, 1, Rgba([200, 100, 50, 255]));
        rgba.put_pixel(1, 0, Rgba([200, 100, 50, 0]));
        let overlay = OverlayAsset::from_rgba(&rgba);

        blend_overlay(&mut base, &overlay, Rect::new(2, 3, 6, 6), Rect::new(1, 1, 2, 1));

        assert_eq!(base.get_pixel(3, 4).0, [200, 100, 50]);
        assert_eq!(base.get_pixel(4, 4).0, [10, 20, 30]);
        assert_eq!(base.get_pixel(5, 4).0, [10, 20, 30]);
    }

    #[test]
    fn partial_alpha_saturates() {
        let mut base = RgbImage::from_pixel(4, 4, Rgb([200, 200, 200]));
        let overlay = asset(1, 1, [100, 10, 0, 128]);

        blend_overlay(&mut base, &overlay, Rect::new(0, 0, 4, 4), Rect::new(0, 0, 1, 1));

        assert_eq!(base.get_pixel(0, 0).0, [255, 210, 200]);
    }

    #[test]
    fn missing_anchors_skip_overlays() {
        let mut base = RgbImage::from_pixel(50, 50, Rgb([1, 2, 3]));
        let before = base.clone();
        let moustache = asset(10, 5, [255, 255, 255, 255]);
        let detection = DetectionResult {
            face: Some(Rect::new(0, 0, 50, 50)),
            nose: None,
            eyes: None,
        };

        let applied = apply_overlays(
            &mut base,
            &detection,
            &[
                (OverlayRegion::Moustache, &moustache),
                (OverlayRegion::Glasses, &moustache),
            ],
            |_, _| Err("asset loaded without an anchor"),
        );

        assert_eq!(applied, Ok(()));
        assert_eq!(base, before);
    }

    #[test]
    fn no_face_skips_loading() {
        let mut base = RgbImage::from_pixel(20, 20, Rgb([5, 5, 5]));
        let before = base.clone();
        let detection = DetectionResult::default();

        let applied = apply_overlays(
            &mut base,
            &detection,
            &[(OverlayRegion::Moustache, "walrus")],
            |_, _| Err("asset loaded without a face"),
        );

        assert_eq!(applied, Ok(()));
        assert_eq!(base, before);
    }

    #[test]
    fn load_failure_with_anchor_is_returned() {
        let mut base = RgbImage::from_pixel(40, 40, Rgb([5, 5, 5]));
        let detection = DetectionResult {
            face: Some(Rect::new(0, 0, 40, 40)),
            nose: Some(Rect::new(15, 15, 10, 10)),
            eyes: None,
        };

        let applied = apply_overlays(
            &mut base,
            &detection,
            &[(OverlayRegion::Moustache, "walrus")],
            |_, name| Err(format!("no asset {name}")),
        );

        assert_eq!(applied, Err("no asset walrus".to_string()));
    }

    #[test]
    fn glasses_are_drawn_over_moustache() {
        let mut base = RgbImage::from_pixel(60, 60, Rgb([0, 0, 0]));
        let moustache = asset(10, 10, [10, 10, 10, 255]);
        let glasses = asset(10, 10, [90, 90, 90, 255]);
        let detection = DetectionResult {
            face: Some(Rect::new(0, 0, 60, 60)),
            nose: Some(Rect::new(20, 10, 10, 10)),
            eyes: Some(Rect::new(15, 15, 20, 10)),
        };

        apply_overlays(
            &mut base,
            &detection,
            &[
                (OverlayRegion::Moustache, &moustache),
                (OverlayRegion::Glasses, &glasses),
            ],
            |_, asset| Ok::<_, Infallible>((*asset).clone()),
        )
        .unwrap();

        // Moustache covers (15,15)-(35,35); glasses cover (12,15)-(38,41).
        assert_eq!(base.get_pixel(20, 20).0, [90, 90, 90]);
        assert_eq!(base.get_pixel(13, 16).0, [90, 90, 90]);
    }
}
