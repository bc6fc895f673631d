#![allow(dead_code)]

//! Test collaborators for the HTTP layer: scripted SMS inbox, media fetcher, in-memory
//! object storage, never-firing cascades and overlay assets on disk.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use broker::{Conversations, HandledMessages, PictureStore, SessionRegistry};
use chrono::{DateTime, Duration, TimeZone, Utc};
use face_overlay::{FaceLandmarkDetector, HaarCascade, PictureRenderer};
use image::{Rgba, RgbaImage};
use playground_core::{
    AssetLibrary, FetchedMedia, InboundMessage, MediaFetcher, MessageQuery, MessageTransport,
    ObjectStorage, OutboundMessage, StorageError, TransportError,
};
use playground_server::AppState;

pub const HORIZON: &str = "2016-05-04 11:59:00.000000";

pub fn at(seconds: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 5, 4, 12, 0, 0).unwrap() + Duration::seconds(seconds)
}

pub fn inbound(id: &str, from: &str, body: &str, seconds: i64) -> InboundMessage {
    InboundMessage {
        id: id.to_string(),
        from: from.to_string(),
        body: body.to_string(),
        created_at: at(seconds),
        num_media: 0,
    }
}

/// Inbox listed newest first; records outbound messages.
#[derive(Default)]
pub struct MockTransport {
    inbox: Mutex<Vec<InboundMessage>>,
    media: Mutex<HashMap<String, Vec<String>>>,
    sent: Mutex<Vec<OutboundMessage>>,
}

impl MockTransport {
    pub fn push(&self, message: InboundMessage) {
        self.inbox.lock().unwrap().push(message);
    }

    pub fn push_with_media(&self, mut message: InboundMessage, urls: &[&str]) {
        message.num_media = urls.len() as u32;
        self.media
            .lock()
            .unwrap()
            .insert(message.id.clone(), urls.iter().map(|u| u.to_string()).collect());
        self.push(message);
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageTransport for MockTransport {
    async fn list_messages(&self, query: &MessageQuery) -> Result<Vec<InboundMessage>, TransportError> {
        let mut listed: Vec<InboundMessage> = self
            .inbox
            .lock()
            .unwrap()
            .iter()
            .filter(|m| query.from.as_deref().map_or(true, |from| m.from == from))
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listed)
    }

    async fn media_urls(&self, message_id: &str) -> Result<Vec<String>, TransportError> {
        Ok(self
            .media
            .lock()
            .unwrap()
            .get(message_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_message(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Serves scripted media by URL; unknown URLs fail.
#[derive(Default)]
pub struct MockFetcher {
    media: Mutex<HashMap<String, FetchedMedia>>,
}

impl MockFetcher {
    pub fn serve(&self, url: &str, bytes: Vec<u8>, content_type: &str) {
        self.media.lock().unwrap().insert(
            url.to_string(),
            FetchedMedia {
                bytes,
                content_type: Some(content_type.to_string()),
            },
        );
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
    names: Mutex<Vec<String>>,
}

impl MemoryStorage {
    pub fn names(&self) -> Vec<String> {
        self.names.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn put(&self, name: &str, _bytes: Vec<u8>, _content_type: &str) -> Result<String, StorageError> {
        self.names.lock().unwrap().push(name.to_string());
        Ok(format!("memory://{name}"))
    }
}

/// Single-stump 24×24 cascade whose stage sum is always -1, so it never fires.
pub const NEVER_FIRES: &str = r#"<?xml version="1.0"?>
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
            -1. -1.</leafValues></_></weakClassifiers></_></stages>
  <features>
    <_>
      <rects>
        <_>
          2 2 10 10 -1.</_>
        <_>
          2 7 10 5 2.</_></rects></_></features></cascade>
</opencv_storage>
"#;

pub fn blind_detector() -> FaceLandmarkDetector {
    let cascade = || HaarCascade::from_xml(NEVER_FIRES).unwrap();
    FaceLandmarkDetector::from_cascades(cascade(), cascade(), cascade())
}

pub fn write_cascades(dir: &Path) {
    for file in [
        face_overlay::detector::FACE_CASCADE_FILE,
        face_overlay::detector::NOSE_CASCADE_FILE,
        face_overlay::detector::EYE_CASCADE_FILE,
    ] {
        std::fs::write(dir.join(file), NEVER_FIRES).unwrap();
    }
}

/// Writes `<dir>/moustaches/<name>.png` and `<dir>/glasses/<name>.png`.
pub fn write_assets(dir: &Path, name: &str) {
    for sub in ["moustaches", "glasses"] {
        std::fs::create_dir_all(dir.join(sub)).unwrap();
        RgbaImage::from_pixel(40, 10, Rgba([20, 20, 20, 255]))
            .save(dir.join(sub).join(format!("{name}.png")))
            .unwrap();
    }
}

pub struct Harness {
    pub state: AppState,
    pub transport: Arc<MockTransport>,
    pub fetcher: Arc<MockFetcher>,
    pub storage: Arc<MemoryStorage>,
}

/// Handler state over mock collaborators with overlay assets under `assets_dir`.
pub fn harness(assets_dir: &Path) -> Harness {
    let transport = Arc::new(MockTransport::default());
    let fetcher = Arc::new(MockFetcher::default());
    let storage = Arc::new(MemoryStorage::default());
    let assets = AssetLibrary::new(assets_dir);

    let renderer = PictureRenderer::new(
        Arc::new(blind_detector()),
        assets.clone(),
        fetcher.clone(),
        storage.clone(),
    );
    let conversations = Conversations::new(
        transport.clone(),
        Arc::new(HandledMessages::new()),
        Arc::new(SessionRegistry::new()),
        Arc::new(PictureStore::new(assets)),
    );

    Harness {
        state: AppState::new(Arc::new(conversations), Arc::new(renderer)),
        transport,
        fetcher,
        storage,
    }
}
