//! Branding assets: logo fetch, cache and decode.
//!
//! Failures here never abort generation; [`LogoLoader::load`] logs and returns
//! `None`, and the cover page is drawn without a logo.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;

/// Longest edge kept after decoding, in pixels.
const MAX_LOGO_EDGE: u32 = 600;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("logo request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("logo request returned status {0}")]
    Status(u16),
    #[error("logo could not be decoded: {0}")]
    Decode(#[from] image::ImageError),
}

/// Decoded logo as 8-bit RGB, alpha flattened onto white.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoImage {
    pub width_px: u32,
    pub height_px: u32,
    pub rgb: Vec<u8>,
}

impl LogoImage {
    pub fn decode(bytes: &[u8]) -> Result<Self, AssetError> {
        let mut img = image::load_from_memory(bytes)?;
        if img.width() > MAX_LOGO_EDGE || img.height() > MAX_LOGO_EDGE {
            img = img.thumbnail(MAX_LOGO_EDGE, MAX_LOGO_EDGE);
        }
        let rgba = img.to_rgba8();
        let (width_px, height_px) = rgba.dimensions();

        let mut rgb = Vec::with_capacity((width_px * height_px * 3) as usize);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            let alpha = a as u16;
            for channel in [r, g, b] {
                let blended = (channel as u16 * alpha + 255 * (255 - alpha)) / 255;
                rgb.push(blended as u8);
            }
        }

        Ok(Self {
            width_px,
            height_px,
            rgb,
        })
    }

    /// Size in points that fits inside the box while keeping the aspect ratio.
    pub fn fit_within(&self, max_width: f32, max_height: f32) -> (f32, f32) {
        if self.width_px == 0 || self.height_px == 0 {
            return (0.0, 0.0);
        }
        let (w, h) = (self.width_px as f32, self.height_px as f32);
        let scale = (max_width / w).min(max_height / h);
        (w * scale, h * scale)
    }
}

/// Fetches logo bytes over HTTP and keeps them in a short-lived cache.
#[derive(Clone)]
pub struct LogoLoader {
    client: reqwest::Client,
    cache: Cache<String, Arc<Vec<u8>>>,
}

impl LogoLoader {
    pub fn new(client: reqwest::Client) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(30 * 60))
            .max_capacity(16)
            .build();
        Self { client, cache }
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Arc<Vec<u8>>, AssetError> {
        if let Some(bytes) = self.cache.get(url).await {
            return Ok(bytes);
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::Status(status.as_u16()));
        }
        let bytes = Arc::new(response.bytes().await?.to_vec());
        self.cache.insert(url.to_string(), bytes.clone()).await;
        Ok(bytes)
    }

    /// Fetch and decode the logo, or `None` when unset or unusable.
    pub async fn load(&self, url: Option<&str>) -> Option<LogoImage> {
        let url = url.map(str::trim).filter(|u| !u.is_empty())?;

        let bytes = match self.fetch_bytes(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Logo fetch from {} failed, continuing without logo: {}", url, e);
                return None;
            }
        };

        match LogoImage::decode(&bytes) {
            Ok(logo) => Some(logo),
            Err(e) => {
                log::warn!("Logo from {} unusable, continuing without logo: {}", url, e);
                self.cache.invalidate(url).await;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, pixel: Rgba<u8>) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, pixel);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png_to_rgb() {
        let logo = LogoImage::decode(&png_bytes(4, 2, Rgba([10, 20, 30, 255]))).unwrap();
        assert_eq!((logo.width_px, logo.height_px), (4, 2));
        assert_eq!(logo.rgb.len(), 4 * 2 * 3);
        assert_eq!(&logo.rgb[..3], &[10, 20, 30]);
    }

    #[test]
    fn test_transparent_pixels_become_white() {
        let logo = LogoImage::decode(&png_bytes(1, 1, Rgba([0, 0, 0, 0]))).unwrap();
        assert_eq!(logo.rgb, vec![255, 255, 255]);
    }

    #[test]
    fn test_decode_garbage_is_error() {
        assert!(matches!(
            LogoImage::decode(b"definitely not an image"),
            Err(AssetError::Decode(_))
        ));
    }

    #[test]
    fn test_fit_within_keeps_aspect_ratio() {
        let logo = LogoImage {
            width_px: 400,
            height_px: 100,
            rgb: vec![],
        };
        assert_eq!(logo.fit_within(160.0, 80.0), (160.0, 40.0));
    }

    #[tokio::test]
    async fn test_load_without_url_is_none() {
        let loader = LogoLoader::new(reqwest::Client::new());
        assert!(loader.load(None).await.is_none());
        assert!(loader.load(Some("  ")).await.is_none());
    }

    #[tokio::test]
    async fn test_load_unreachable_url_degrades() {
        let loader = LogoLoader::new(reqwest::Client::new());
        assert!(loader.load(Some("http://127.0.0.1:9/logo.png")).await.is_none());
    }
}
