#![allow(dead_code)]

//! Test collaborators for the renderer: scripted media fetcher, in-memory object storage,
//! synthetic cascades and overlay assets on disk.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage, RgbImage};
use playground_core::{FetchedMedia, MediaFetcher, ObjectStorage, StorageError};

/// Single-stump 24×24 cascade; `leaf` is the output of both branches against a zero stage
/// threshold, so a negative leaf never fires and a positive one always does.
pub fn stump_cascade(leaf: f32) -> String {
    format!(
        r#"<?xml version="1.0"?>
<opencv_storage>
<cascade type_id="opencv-cascade-classifier"><stageType>BOOST</stageType>
  <featureType>HAAR</featureType>
  <height>24</height>
  <width>24</width>
  <stages>
    <_>
      <maxWeakCount>1</maxWeakCount>
      <stageThreshold>0.</stageThreshold>
      <weakClassifiers>
        <_>
          <internalNodes>
            0 -1 0 0.5</internalNodes>
          <leafValues>
            {leaf} {leaf}</leafValues></_></weakClassifiers></_></stages>
  <features>
    <_>
      <rects>
        <_>
          2 2 10 10 -1.</_>
        <_>
          2 7 10 5 2.</_></rects></_></features></cascade>
</opencv_storage>
"#
    )
}

/// Writes face/nose/eye cascades into `dir`.
pub fn write_cascades(dir: &Path, face_fires: bool, nose_fires: bool, eyes_fire: bool) {
    let leaf = |fires: bool| if fires { 1.0 } else { -1.0 };
    std::fs::write(
        dir.join(face_overlay::detector::FACE_CASCADE_FILE),
        stump_cascade(leaf(face_fires)),
    )
    .unwrap();
    std::fs::write(
        dir.join(face_overlay::detector::NOSE_CASCADE_FILE),
        stump_cascade(leaf(nose_fires)),
    )
    .unwrap();
    std::fs::write(
        dir.join(face_overlay::detector::EYE_CASCADE_FILE),
        stump_cascade(leaf(eyes_fire)),
    )
    .unwrap();
}

/// Writes an opaque `<dir>/moustaches/<name>.png` and `<dir>/glasses/<name>.png`.
pub fn write_assets(dir: &Path, name: &str) {
    for (sub, colour) in [("moustaches", [200, 30, 30, 255]), ("glasses", [30, 30, 200, 255])] {
        std::fs::create_dir_all(dir.join(sub)).unwrap();
        RgbaImage::from_pixel(40, 10, Rgba(colour))
            .save(dir.join(sub).join(format!("{name}.png")))
            .unwrap();
    }
}

pub fn encode(image: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, format).unwrap();
    bytes.into_inner()
}

/// Serves scripted media by URL; unknown URLs fail.
#[derive(Default)]
pub struct MockFetcher {
    media: Mutex<HashMap<String, FetchedMedia>>,
}

impl MockFetcher {
    pub fn with(url: &str, bytes: Vec<u8>, content_type: Option<&str>) -> Self {
        let fetcher = Self::default();
        fetcher.media.lock().unwrap().insert(
            url.to_string(),
            FetchedMedia {
                bytes,
                content_type: content_type.map(str::to_string),
            },
        );
        fetcher
    }
}

#[async_trait]
impl MediaFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedMedia, StorageError> {
        self.media
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| StorageError::Http(format!("404 for {url}")))
    }
}

/// Keeps uploads in memory and returns `memory://<name>` URLs.
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<Vec<(String, Vec<u8>, String)>>,
}

impl MemoryStorage {
    /// `(name, bytes, content_type)` in upload order.
    pub fn uploads(&self) -> Vec<(String, Vec<u8>, String)> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn put(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, StorageError> {
        self.objects
            .lock()
            .unwrap()
            .push((name.to_string(), bytes, content_type.to_string()));
        Ok(format!("memory://{name}"))
    }
}
