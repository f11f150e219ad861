//! Vision collaborator boundary: barcode/QR decoding and OCR.
//!
//! The actual computer vision work is performed entirely by external
//! libraries; this module only defines the capability interface the HTTP
//! handlers consume ([`VisionEngine`]) and the production binding
//! ([`NativeVisionEngine`]) over `rxing` (symbols) and Tesseract (text).
//!
//! The contract with both collaborators is deliberately thin: the stored
//! image is decoded and converted to grayscale before the call, and any
//! failure propagates unchanged as a generic error.

use crate::config::OcrConfig;
use crate::{Result, ScanHubError};
use async_trait::async_trait;
use std::path::Path;

pub mod barcode;
pub mod tesseract;

/// A single barcode/QR symbol detected in an image.
///
/// `symbology` is the symbol kind in zbar-style naming (`QRCODE`,
/// `EAN13`, `CODE128`, ...); `data` is the decoded text payload.
/// Zero or more symbols are produced per image, in no guaranteed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSymbol {
    pub symbology: String,
    pub data: String,
}

/// Capability interface for the external decode/OCR collaborator.
///
/// Implementations must be thread-safe (`Send + Sync`) so a single engine
/// can be shared across concurrent requests. The production implementation
/// is [`NativeVisionEngine`]; tests substitute deterministic fakes.
#[async_trait]
pub trait VisionEngine: Send + Sync {
    /// Detect and decode all barcode/QR symbols in an encoded image.
    ///
    /// An image containing no symbols yields an empty vector, not an error.
    async fn decode_symbols(&self, image_bytes: &[u8]) -> Result<Vec<DecodedSymbol>>;

    /// Extract text from an encoded image, whitespace-trimmed.
    async fn recognize_text(&self, image_bytes: &[u8]) -> Result<String>;

    /// Decode symbols from a staged file.
    ///
    /// Default implementation reads the file and delegates to
    /// [`decode_symbols`](Self::decode_symbols).
    async fn decode_symbols_file(&self, path: &Path) -> Result<Vec<DecodedSymbol>> {
        let bytes = tokio::fs::read(path).await?;
        self.decode_symbols(&bytes).await
    }

    /// Recognize text from a staged file.
    ///
    /// Default implementation reads the file and delegates to
    /// [`recognize_text`](Self::recognize_text).
    async fn recognize_text_file(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        self.recognize_text(&bytes).await
    }
}

/// Decode an uploaded image and convert it to 8-bit grayscale.
///
/// Both collaborators consume grayscale input.
fn load_grayscale(image_bytes: &[u8]) -> Result<image::GrayImage> {
    let img = image::load_from_memory(image_bytes)
        .map_err(|e| ScanHubError::image_processing_with_source(format!("Failed to decode image: {}", e), e))?;
    Ok(img.to_luma8())
}

/// Production vision engine bound to `rxing` and Tesseract.
///
/// Both libraries are CPU-bound and blocking; calls run on
/// `tokio::task::spawn_blocking` so request workers are not stalled.
pub struct NativeVisionEngine {
    ocr_config: OcrConfig,
}

impl NativeVisionEngine {
    pub fn new(ocr_config: OcrConfig) -> Self {
        Self { ocr_config }
    }
}

#[async_trait]
impl VisionEngine for NativeVisionEngine {
    async fn decode_symbols(&self, image_bytes: &[u8]) -> Result<Vec<DecodedSymbol>> {
        let bytes = image_bytes.to_vec();

        tokio::task::spawn_blocking(move || {
            let gray = load_grayscale(&bytes)?;
            barcode::decode_grayscale(&gray)
        })
        .await
        .map_err(|e| ScanHubError::Other(format!("Symbol decode task panicked: {}", e)))?
    }

    async fn recognize_text(&self, image_bytes: &[u8]) -> Result<String> {
        let bytes = image_bytes.to_vec();
        let config = self.ocr_config.clone();

        tokio::task::spawn_blocking(move || {
            let gray = load_grayscale(&bytes)?;
            tesseract::recognize_grayscale(&gray, &config)
        })
        .await
        .map_err(|e| ScanHubError::Other(format!("OCR task panicked: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, Luma};
    use std::io::Cursor;

    fn encode_png(img: GrayImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    struct StaticEngine {
        symbols: Vec<DecodedSymbol>,
        text: String,
    }

    #[async_trait]
    impl VisionEngine for StaticEngine {
        async fn decode_symbols(&self, _image_bytes: &[u8]) -> Result<Vec<DecodedSymbol>> {
            Ok(self.symbols.clone())
        }

        async fn recognize_text(&self, _image_bytes: &[u8]) -> Result<String> {
            Ok(self.text.clone())
        }
    }

    #[test]
    fn test_load_grayscale_valid_png() {
        let png = encode_png(GrayImage::from_pixel(4, 4, Luma([255u8])));
        let gray = load_grayscale(&png).unwrap();
        assert_eq!(gray.dimensions(), (4, 4));
    }

    #[test]
    fn test_load_grayscale_rejects_garbage() {
        let err = load_grayscale(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ScanHubError::ImageProcessing { .. }));
    }

    #[tokio::test]
    async fn test_native_engine_empty_image_has_no_symbols() {
        let engine = NativeVisionEngine::new(OcrConfig::default());
        let png = encode_png(GrayImage::from_pixel(64, 64, Luma([255u8])));

        let symbols = engine.decode_symbols(&png).await.unwrap();
        assert!(symbols.is_empty());
    }

    #[tokio::test]
    async fn test_native_engine_corrupt_image_fails() {
        let engine = NativeVisionEngine::new(OcrConfig::default());
        let result = engine.decode_symbols(b"corrupt").await;
        assert!(matches!(result, Err(ScanHubError::ImageProcessing { .. })));
    }

    #[tokio::test]
    async fn test_engine_file_defaults_read_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staged.png");
        std::fs::write(&path, b"anything").unwrap();

        let engine = StaticEngine {
            symbols: vec![DecodedSymbol {
                symbology: "QRCODE".to_string(),
                data: "HELLO".to_string(),
            }],
            text: "hi".to_string(),
        };

        let symbols = engine.decode_symbols_file(&path).await.unwrap();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].data, "HELLO");

        let text = engine.recognize_text_file(&path).await.unwrap();
        assert_eq!(text, "hi");
    }

    #[tokio::test]
    async fn test_engine_file_missing_is_io_error() {
        let engine = StaticEngine {
            symbols: vec![],
            text: String::new(),
        };
        let result = engine.decode_symbols_file(Path::new("/nonexistent/staged.png")).await;
        assert!(matches!(result, Err(ScanHubError::Io(_))));
    }
}
