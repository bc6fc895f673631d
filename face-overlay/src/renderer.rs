//! End-to-end picture rendering: fetch, resize, detect, composite, encode, upload.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbImage};
use playground_core::{
    make_unique_id, AssetLibrary, MediaFetcher, ObjectStorage, OverlayRegion, PictureRecord,
};
use tracing::{info, instrument};

use crate::compositor::{apply_overlays, OverlayAsset};
use crate::detector::FaceLandmarkDetector;
use crate::error::RenderError;

/// Longest edge of a rendered picture unless configured otherwise.
pub const DEFAULT_MAX_DIMENSION: u32 = 640;

/// Renders picture records into uploaded, publicly reachable images.
pub struct PictureRenderer {
    detector: Arc<FaceLandmarkDetector>,
    assets: AssetLibrary,
    fetcher: Arc<dyn MediaFetcher>,
    storage: Arc<dyn ObjectStorage>,
    work_dir: PathBuf,
    max_dimension: u32,
}

impl PictureRenderer {
    pub fn new(
        detector: Arc<FaceLandmarkDetector>,
        assets: AssetLibrary,
        fetcher: Arc<dyn MediaFetcher>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            detector,
            assets,
            fetcher,
            storage,
            work_dir: std::env::temp_dir(),
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }

    /// Directory for temporary encode files.
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension.max(1);
        self
    }

    /// Renders `picture` with its selected overlays and returns the uploaded image's URL.
    ///
    /// Every call recomputes detection; nothing is cached between renders.
    #[instrument(skip(self, picture), fields(picture_code = %picture.code))]
    pub async fn render(&self, picture: &PictureRecord) -> Result<String, RenderError> {
        let media = self
            .fetcher
            .fetch(&picture.source_url)
            .await
            .map_err(RenderError::Fetch)?;
        let format = output_format(
            media.content_type.as_deref(),
            &picture.source_url,
            &media.bytes,
        );

        let detector = self.detector.clone();
        let assets = self.assets.clone();
        let overlays: Vec<(OverlayRegion, String)> = picture
            .selected_overlays()
            .into_iter()
            .map(|(region, name)| (region, name.to_string()))
            .collect();
        let work_dir = self.work_dir.clone();
        let max_dimension = self.max_dimension;
        let bytes = media.bytes;

        let encoded = tokio::task::spawn_blocking(move || {
            let image = compose_picture(&detector, &assets, &bytes, &overlays, max_dimension)?;
            encode(&image, format, &work_dir)
        })
        .await
        .map_err(|e| RenderError::Task(e.to_string()))??;

        let extension = format.extensions_str().first().copied().unwrap_or("png");
        let name = format!("{}.{extension}", make_unique_id());
        let url = self
            .storage
            .put(&name, encoded, format.to_mime_type())
            .await
            .map_err(RenderError::Upload)?;
        info!(picture_code = %picture.code, url = %url, "Rendered picture");
        Ok(url)
    }
}

/// Decodes `source`, fits it within `max_dimension`, and applies `overlays` in order.
///
/// Assets are read only for overlays whose anchor was detected; a selection that would be
/// skipped never fails the render.
pub fn compose_picture(
    detector: &FaceLandmarkDetector,
    assets: &AssetLibrary,
    source: &[u8],
    overlays: &[(OverlayRegion, String)],
    max_dimension: u32,
) -> Result<RgbImage, RenderError> {
    let decoded = image::load_from_memory(source).map_err(RenderError::Decode)?;
    let mut image = fit_within(decoded.to_rgb8(), max_dimension);

    let detection = detector.detect(&image);
    apply_overlays(
        &mut image,
        &detection,
        overlays,
        |region, name: &String| -> Result<OverlayAsset, RenderError> {
            let path = assets
                .path_for(region, name)
                .ok_or_else(|| RenderError::MissingAsset(name.clone()))?;
            OverlayAsset::load(&path).map_err(|source| RenderError::Asset { path, source })
        },
    )?;

    Ok(image)
}

/// Shrinks so the longer edge is at most `max_dimension`, keeping the aspect ratio.
pub fn fit_within(image: RgbImage, max_dimension: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    if width <= max_dimension && height <= max_dimension {
        return image;
    }
    let (new_w, new_h) = if height > width {
        let w = (u64::from(width) * u64::from(max_dimension) / u64::from(height)) as u32;
        (w.max(1), max_dimension)
    } else {
        let h = (u64::from(height) * u64::from(max_dimension) / u64::from(width)) as u32;
        (max_dimension, h.max(1))
    };
    imageops::resize(&image, new_w, new_h, FilterType::Triangle)
}

/// JPEG when the source was JPEG, PNG otherwise. The declared content type wins over the
/// URL extension, which wins over sniffing the bytes.
pub fn output_format(content_type: Option<&str>, url: &str, bytes: &[u8]) -> ImageFormat {
    let from_content_type = content_type
        .and_then(|ct| ct.split(';').next())
        .and_then(|mime| ImageFormat::from_mime_type(mime.trim()));
    let from_extension = || {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let file = path.rsplit('/').next().unwrap_or(path);
        file.rsplit_once('.')
            .and_then(|(_, ext)| ImageFormat::from_extension(ext))
    };
    let guessed = from_content_type
        .or_else(from_extension)
        .or_else(|| image::guess_format(bytes).ok());
    match guessed {
        Some(ImageFormat::Jpeg) => ImageFormat::Jpeg,
        _ => ImageFormat::Png,
    }
}

/// Encodes through a scoped temporary file, removed on every exit path.
fn encode(image: &RgbImage, format: ImageFormat, work_dir: &Path) -> Result<Vec<u8>, RenderError> {
    std::fs::create_dir_all(work_dir)?;
    let extension = format.extensions_str().first().copied().unwrap_or("png");
    let file = tempfile::Builder::new()
        .prefix("render-")
        .suffix(&format!(".{extension}"))
        .tempfile_in(work_dir)?;
    image
        .save_with_format(file.path(), format)
        .map_err(RenderError::Encode)?;
    Ok(std::fs::read(file.path())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn fit_within_keeps_small_images() {
        let image = RgbImage::new(320, 200);
        assert_eq!(fit_within(image, 640).dimensions(), (320, 200));
    }

    #[test]
    fn fit_within_scales_longer_edge() {
        assert_eq!(fit_within(RgbImage::new(1280, 960), 640).dimensions(), (640, 480));
        assert_eq!(fit_within(RgbImage::new(1000, 2000), 640).dimensions(), (320, 640));
        assert_eq!(fit_within(RgbImage::new(1000, 3), 640).dimensions(), (640, 1));
    }

    #[test]
    fn output_format_prefers_content_type() {
        assert_eq!(
            output_format(Some("image/jpeg"), "https://x/a.png", b""),
            ImageFormat::Jpeg
        );
        assert_eq!(
            output_format(Some("image/png; charset=binary"), "https://x/a.jpg", b""),
            ImageFormat::Png
        );
    }

    #[test]
    fn output_format_falls_back_to_extension_then_bytes() {
        assert_eq!(
            output_format(None, "https://x/photo.JPG?size=large", b""),
            ImageFormat::Jpeg
        );
        assert_eq!(
            output_format(Some("application/octet-stream"), "https://x/Media/ME1", &[0xFF, 0xD8, 0xFF, 0xE0]),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn other_formats_render_as_png() {
        assert_eq!(output_format(Some("image/gif"), "https://x/a.gif", b""), ImageFormat::Png);
        assert_eq!(output_format(None, "https://x/unknown", b"nope"), ImageFormat::Png);
    }

    #[test]
    fn encode_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let image = RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]));
        let bytes = encode(&image, ImageFormat::Png, dir.path()).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
