//! Multi-scale sliding-window evaluation.

use image::imageops::{self, FilterType};
use image::GrayImage;
use tracing::debug;

use super::group::group_rectangles;
use super::integral::IntegralImages;
use super::{Branch, Feature, HaarCascade};
use crate::geometry::Rect;

/// Similarity tolerance used when merging raw hits.
const GROUP_EPS: f64 = 0.2;

/// Scan parameters for [`HaarCascade::detect_multi_scale`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanParams {
    /// Pyramid step between scales; must be > 1.
    pub scale_factor: f64,
    /// Minimum raw hits a merged detection needs, exclusive.
    pub min_neighbors: usize,
    /// Smallest detection size `(width, height)`.
    pub min_size: Option<(u32, u32)>,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 3,
            min_size: None,
        }
    }
}

impl HaarCascade {
    /// Detects objects of every size in `image`.
    ///
    /// The image is shrunk by successive powers of `scale_factor` while the classifier window
    /// stays at its trained size; hits are mapped back to full-image coordinates and merged.
    pub fn detect_multi_scale(&self, image: &GrayImage, params: &ScanParams) -> Vec<Rect> {
        let (img_w, img_h) = image.dimensions();
        let (win_w, win_h) = self.window;
        let scale_factor = if params.scale_factor > 1.0 {
            params.scale_factor
        } else {
            1.1
        };

        let mut hits = Vec::new();
        let mut factor = 1.0f64;
        loop {
            let window = (
                round(f64::from(win_w) * factor),
                round(f64::from(win_h) * factor),
            );
            let scaled = (
                round(f64::from(img_w) / factor),
                round(f64::from(img_h) / factor),
            );
            let range_x = scaled.0 - win_w as i32;
            let range_y = scaled.1 - win_h as i32;
            if range_x <= 0 || range_y <= 0 {
                break;
            }
            if window.0 > img_w as i32 || window.1 > img_h as i32 {
                break;
            }
            let too_small = params
                .min_size
                .is_some_and(|(w, h)| window.0 < w as i32 || window.1 < h as i32);
            if too_small {
                factor *= scale_factor;
                continue;
            }

            let resized;
            let layer = if scaled == (img_w as i32, img_h as i32) {
                image
            } else {
                resized = imageops::resize(
                    image,
                    scaled.0 as u32,
                    scaled.1 as u32,
                    FilterType::Triangle,
                );
                &resized
            };
            let integral = IntegralImages::new(layer);
            let step = if factor > 2.0 { 1 } else { 2 };
            let before = hits.len();

            for y in (0..range_y).step_by(step) {
                for x in (0..range_x).step_by(step) {
                    if self.classify_window(&integral, x, y) {
                        hits.push(Rect::new(
                            round(f64::from(x) * factor),
                            round(f64::from(y) * factor),
                            window.0,
                            window.1,
                        ));
                    }
                }
            }
            debug!(
                factor,
                window_width = window.0,
                hits = hits.len() - before,
                "Scanned pyramid layer"
            );
            factor *= scale_factor;
        }

        group_rectangles(&hits, params.min_neighbors, GROUP_EPS)
    }

    /// Runs every stage on the window whose top-left corner is `(x, y)`.
    fn classify_window(&self, integral: &IntegralImages, x: i32, y: i32) -> bool {
        let (win_w, win_h) = (self.window.0 as i32, self.window.1 as i32);
        let (nw, nh) = (win_w - 2, win_h - 2);
        let area = f64::from(nw * nh);
        let sum = integral.rect_sum(x + 1, y + 1, nw, nh) as f64;
        let sqsum = integral.rect_sqsum(x + 1, y + 1, nw, nh) as f64;
        let variance = area * sqsum - sum * sum;
        let norm = if variance > 0.0 { variance.sqrt() } else { 1.0 };

        for stage in &self.stages {
            let mut total = 0.0f64;
            for tree in &stage.trees {
                let mut index = 0usize;
                let output = loop {
                    let node = &tree.nodes[index];
                    let value = feature_value(&self.features[node.feature], integral, x, y);
                    let next = if value < f64::from(node.threshold) * norm {
                        node.left
                    } else {
                        node.right
                    };
                    match next {
                        Branch::Node(child) => index = child,
                        Branch::Leaf(leaf) => break leaf,
                    }
                };
                total += f64::from(output);
            }
            if total < f64::from(stage.threshold) {
                return false;
            }
        }
        true
    }
}

fn feature_value(feature: &Feature, integral: &IntegralImages, x: i32, y: i32) -> f64 {
    feature
        .rects
        .iter()
        .map(|r| {
            let sum = if feature.tilted {
                integral.tilted_sum(x + r.x, y + r.y, r.width, r.height)
            } else {
                integral.rect_sum(x + r.x, y + r.y, r.width, r.height)
            };
            f64::from(r.weight) * sum as f64
        })
        .sum()
}

/// Round half to even, the rounding OpenCV-trained geometry assumes.
pub(crate) fn round(v: f64) -> i32 {
    v.round_ties_even() as i32
}
