//! OpenCV cascade XML reader.
//!
//! The XML is first read into a small element tree, then interpreted as either the current
//! layout (`<cascade>` with separate `<features>` and packed `<internalNodes>`) or the
//! legacy `opencv-haar-classifier` layout (`<size>`, inline features per tree node).

use std::str::FromStr;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{Branch, Feature, HaarCascade, Node, Stage, Tree, WeightedRect};
use crate::error::CascadeError;

#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn named(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Self::default()
        }
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn require(&self, name: &str) -> Result<&Element, CascadeError> {
        self.child(name).ok_or_else(|| {
            CascadeError::Invalid(format!("<{}> is missing <{name}>", self.name))
        })
    }

    /// List entries (OpenCV writes sequence items as `<_>`).
    fn items(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter(|c| c.name == "_")
    }

    fn values<T: FromStr>(&self) -> Result<Vec<T>, CascadeError> {
        self.text
            .split_whitespace()
            .map(|token| {
                token.parse().map_err(|_| {
                    CascadeError::Invalid(format!("bad number {token:?} in <{}>", self.name))
                })
            })
            .collect()
    }

    fn value<T: FromStr>(&self) -> Result<T, CascadeError> {
        let token = self.text.trim();
        token
            .parse()
            .map_err(|_| CascadeError::Invalid(format!("bad number {token:?} in <{}>", self.name)))
    }
}

fn parse_document(text: &str) -> Result<Element, CascadeError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = vec![Element::named(b"#document")];
    loop {
        let event = reader
            .read_event()
            .map_err(|e| CascadeError::Xml(format!("at byte {}: {e}", reader.buffer_position())))?;
        match event {
            Event::Start(start) => stack.push(Element::named(start.name().as_ref())),
            Event::Empty(empty) => {
                let element = Element::named(empty.name().as_ref());
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(element);
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| CascadeError::Xml("unbalanced closing tag".into()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Err(CascadeError::Xml("unbalanced closing tag".into())),
                }
            }
            Event::Text(content) => append_text(&mut stack, &content)?,
            Event::CData(content) => append_text(&mut stack, &content)?,
            Event::Eof => break,
            _ => {}
        }
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(document), true) => Ok(document),
        _ => Err(CascadeError::Xml("unexpected end of document".into())),
    }
}

fn append_text(stack: &mut [Element], raw: &[u8]) -> Result<(), CascadeError> {
    let text = std::str::from_utf8(raw).map_err(|e| CascadeError::Xml(e.to_string()))?;
    if let Some(current) = stack.last_mut() {
        if !current.text.is_empty() {
            current.text.push(' ');
        }
        current.text.push_str(text);
    }
    Ok(())
}

pub(super) fn parse_cascade(text: &str) -> Result<HaarCascade, CascadeError> {
    let document = parse_document(text)?;
    let storage = document
        .children
        .first()
        .ok_or_else(|| CascadeError::Invalid("empty document".into()))?;
    let root = storage
        .children
        .first()
        .ok_or_else(|| CascadeError::Invalid(format!("<{}> holds no cascade", storage.name)))?;

    if root.child("size").is_some() {
        parse_legacy(root)
    } else {
        parse_current(root)
    }
}

fn parse_rects(rects: &Element) -> Result<Vec<WeightedRect>, CascadeError> {
    rects
        .items()
        .map(|item| {
            let v: Vec<f32> = item.values()?;
            if v.len() != 5 {
                return Err(CascadeError::Invalid(format!(
                    "feature rectangle needs 5 values, got {}",
                    v.len()
                )));
            }
            Ok(WeightedRect {
                x: v[0] as i32,
                y: v[1] as i32,
                width: v[2] as i32,
                height: v[3] as i32,
                weight: v[4],
            })
        })
        .collect()
}

fn parse_feature(element: &Element) -> Result<Feature, CascadeError> {
    let tilted = match element.child("tilted") {
        Some(t) => t.value::<i32>()? != 0,
        None => false,
    };
    Ok(Feature {
        rects: parse_rects(element.require("rects")?)?,
        tilted,
    })
}

fn parse_current(root: &Element) -> Result<HaarCascade, CascadeError> {
    if let Some(kind) = root.child("featureType") {
        if !kind.text.trim().eq_ignore_ascii_case("HAAR") {
            return Err(CascadeError::Invalid(format!(
                "unsupported feature type {}",
                kind.text.trim()
            )));
        }
    }
    let width: u32 = root.require("width")?.value()?;
    let height: u32 = root.require("height")?.value()?;

    let features = root
        .require("features")?
        .items()
        .map(parse_feature)
        .collect::<Result<Vec<_>, _>>()?;

    let mut stages = Vec::new();
    for stage in root.require("stages")?.items() {
        let threshold: f32 = stage.require("stageThreshold")?.value()?;
        let mut trees = Vec::new();
        for weak in stage.require("weakClassifiers")?.items() {
            let packed: Vec<f64> = weak.require("internalNodes")?.values()?;
            let leaves: Vec<f32> = weak.require("leafValues")?.values()?;
            trees.push(unpack_tree(&packed, &leaves)?);
        }
        stages.push(Stage { threshold, trees });
    }

    Ok(HaarCascade {
        window: (width, height),
        stages,
        features,
    })
}

/// Unpacks `left right feature threshold` node quadruples. A child `> 0` is a node index,
/// otherwise `-child` indexes `leaves`.
fn unpack_tree(packed: &[f64], leaves: &[f32]) -> Result<Tree, CascadeError> {
    if packed.is_empty() || packed.len() % 4 != 0 {
        return Err(CascadeError::Invalid(format!(
            "internalNodes holds {} values, expected groups of 4",
            packed.len()
        )));
    }
    let branch = |raw: f64| -> Result<Branch, CascadeError> {
        let child = raw as i64;
        if child > 0 {
            return Ok(Branch::Node(child as usize));
        }
        leaves
            .get((-child) as usize)
            .map(|v| Branch::Leaf(*v))
            .ok_or_else(|| CascadeError::Invalid(format!("leaf index {} out of range", -child)))
    };

    let nodes = packed
        .chunks_exact(4)
        .map(|q| {
            if q[2] < 0.0 {
                return Err(CascadeError::Invalid(format!("negative feature index {}", q[2])));
            }
            Ok(Node {
                left: branch(q[0])?,
                right: branch(q[1])?,
                feature: q[2] as usize,
                threshold: q[3] as f32,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Tree { nodes })
}

fn parse_legacy(root: &Element) -> Result<HaarCascade, CascadeError> {
    let size: Vec<u32> = root.require("size")?.values()?;
    let &[width, height] = size.as_slice() else {
        return Err(CascadeError::Invalid(format!(
            "<size> needs 2 values, got {}",
            size.len()
        )));
    };

    let mut features = Vec::new();
    let mut stages = Vec::new();
    for stage in root.require("stages")?.items() {
        let threshold: f32 = stage.require("stage_threshold")?.value()?;
        let mut trees = Vec::new();
        for tree in stage.require("trees")?.items() {
            let mut nodes = Vec::new();
            for node in tree.items() {
                features.push(parse_feature(node.require("feature")?)?);
                nodes.push(Node {
                    feature: features.len() - 1,
                    threshold: node.require("threshold")?.value()?,
                    left: legacy_branch(node, "left")?,
                    right: legacy_branch(node, "right")?,
                });
            }
            trees.push(Tree { nodes });
        }
        stages.push(Stage { threshold, trees });
    }

    Ok(HaarCascade {
        window: (width, height),
        stages,
        features,
    })
}

/// `<{side}_val>` is a leaf value, `<{side}_node>` an index into the same tree.
fn legacy_branch(node: &Element, side: &str) -> Result<Branch, CascadeError> {
    if let Some(value) = node.child(&format!("{side}_val")) {
        return Ok(Branch::Leaf(value.value()?));
    }
    if let Some(index) = node.child(&format!("{side}_node")) {
        return Ok(Branch::Node(index.value()?));
    }
    Err(CascadeError::Invalid(format!(
        "tree node has neither {side}_val nor {side}_node"
    )))
}
