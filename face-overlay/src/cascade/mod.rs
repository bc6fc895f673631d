//! Haar cascade classifiers (Viola-Jones boosted stages of decision trees).
//!
//! A cascade is parsed from OpenCV XML ([`xml`]), evaluated over integral images
//! ([`integral`]) by a multi-scale sliding window ([`detect`]), and the raw hits are merged
//! into detections ([`group`]).

mod detect;
mod group;
mod integral;
mod xml;

use std::fs;
use std::path::Path;

use crate::error::CascadeError;

pub use detect::ScanParams;
pub use group::group_rectangles;
pub use integral::IntegralImages;

/// One rectangle of a Haar feature with its signed weight, in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub weight: f32,
}

/// Weighted sum of two or three rectangles; tilted features are rotated by 45°.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub rects: Vec<WeightedRect>,
    pub tilted: bool,
}

/// Where a tree node sends the window next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Branch {
    /// Index of another node in the same tree.
    Node(usize),
    /// Tree output.
    Leaf(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub feature: usize,
    pub threshold: f32,
    pub left: Branch,
    pub right: Branch,
}

/// Decision tree; evaluation starts at `nodes[0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

/// A window passes the stage when the sum of its tree outputs reaches `threshold`.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub threshold: f32,
    pub trees: Vec<Tree>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HaarCascade {
    /// Training window `(width, height)`.
    pub window: (u32, u32),
    pub stages: Vec<Stage>,
    pub features: Vec<Feature>,
}

impl HaarCascade {
    /// Parses a cascade in either the current or the legacy OpenCV XML layout.
    pub fn from_xml(text: &str) -> Result<Self, CascadeError> {
        let cascade = xml::parse_cascade(text)?;
        cascade.validate()?;
        Ok(cascade)
    }

    pub fn load(path: &Path) -> Result<Self, CascadeError> {
        let text = fs::read_to_string(path).map_err(|source| CascadeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_xml(&text)
    }

    /// Rejects structures evaluation could not walk: out-of-range features, rectangles
    /// outside the window, and node links that do not point forward.
    fn validate(&self) -> Result<(), CascadeError> {
        let (width, height) = self.window;
        if width < 3 || height < 3 {
            return Err(CascadeError::Invalid(format!(
                "window {width}x{height} is too small"
            )));
        }
        if self.stages.is_empty() {
            return Err(CascadeError::Invalid("cascade has no stages".into()));
        }

        for (i, feature) in self.features.iter().enumerate() {
            if feature.rects.is_empty() {
                return Err(CascadeError::Invalid(format!("feature {i} has no rectangles")));
            }
            for r in &feature.rects {
                let inside = if feature.tilted {
                    r.x - r.height >= 0
                        && r.x + r.width <= width as i32
                        && r.y >= 0
                        && r.y + r.width + r.height <= height as i32
                } else {
                    r.x >= 0
                        && r.y >= 0
                        && r.x + r.width <= width as i32
                        && r.y + r.height <= height as i32
                };
                if r.width <= 0 || r.height <= 0 || !inside {
                    return Err(CascadeError::Invalid(format!(
                        "feature {i} has a rectangle outside the {width}x{height} window"
                    )));
                }
            }
        }

        for (s, stage) in self.stages.iter().enumerate() {
            for (t, tree) in stage.trees.iter().enumerate() {
                if tree.nodes.is_empty() {
                    return Err(CascadeError::Invalid(format!("stage {s} tree {t} is empty")));
                }
                for (n, node) in tree.nodes.iter().enumerate() {
                    if node.feature >= self.features.len() {
                        return Err(CascadeError::Invalid(format!(
                            "stage {s} tree {t} node {n} uses unknown feature {}",
                            node.feature
                        )));
                    }
                    for branch in [node.left, node.right] {
                        if let Branch::Node(next) = branch {
                            if next <= n || next >= tree.nodes.len() {
                                return Err(CascadeError::Invalid(format!(
                                    "stage {s} tree {t} node {n} links to node {next}"
                                )));
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn parses_current_layout() {
        let cascade = HaarCascade::from_xml(NEVER_FIRES).unwrap();
        assert_eq!(cascade.window, (24, 24));
        assert_eq!(cascade.stages.len(), 1);
        assert_eq!(cascade.features.len(), 1);

        let node = &cascade.stages[0].trees[0].nodes[0];
        assert_eq!(node.feature, 0);
        assert_eq!(node.threshold, 0.5);
        assert_eq!(node.left, Branch::Leaf(-1.0));
        assert_eq!(node.right, Branch::Leaf(-1.0));
        assert_eq!(
            cascade.features[0].rects[1],
            WeightedRect {
                x: 2,
                y: 7,
                width: 10,
                height: 5,
                weight: 2.0
            }
        );
        assert!(!cascade.features[0].tilted);
    }

    #[test]
    fn parses_legacy_layout() {
        let cascade = HaarCascade::from_xml(LEGACY).unwrap();
        assert_eq!(cascade.window, (20, 20));

        let stage = &cascade.stages[0];
        assert!((stage.threshold - 0.822_689_4).abs() < 1e-6);
        let nodes = &stage.trees[0].nodes;
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].left, Branch::Node(1));
        assert_eq!(nodes[0].right, Branch::Leaf(0.837_810_7));
        assert_eq!(nodes[1].right, Branch::Leaf(-0.25));
        assert!(cascade.features[nodes[1].feature].tilted);
        assert!(!cascade.features[nodes[0].feature].tilted);
    }

    #[test]
    fn rejects_feature_outside_window() {
        let broken = NEVER_FIRES.replace("2 2 10 10 -1.", "20 20 10 10 -1.");
        assert!(matches!(
            HaarCascade::from_xml(&broken),
            Err(CascadeError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_unknown_feature_index() {
        let broken = NEVER_FIRES.replace("0 -1 0 0.5", "0 -1 3 0.5");
        assert!(matches!(
            HaarCascade::from_xml(&broken),
            Err(CascadeError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_malformed_xml() {
        assert!(HaarCascade::from_xml("<opencv_storage><cascade>").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = HaarCascade::load(Path::new("/nonexistent/cascade.xml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cascade.xml"));
    }
}
