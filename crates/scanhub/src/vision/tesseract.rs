//! Text recognition via Tesseract (`kreuzberg-tesseract` bindings).

use crate::config::OcrConfig;
use crate::{Result, ScanHubError};
use image::GrayImage;
use kreuzberg_tesseract::{TessPageSegMode, TesseractAPI};
use std::env;
use std::path::Path;

/// Resolve the tessdata directory: `TESSDATA_PREFIX` wins, then the
/// usual platform install locations.
fn resolve_tessdata_dir() -> String {
    let fallback_paths = [
        "/opt/homebrew/share/tessdata",
        "/opt/homebrew/opt/tesseract/share/tessdata",
        "/usr/local/opt/tesseract/share/tessdata",
        "/usr/share/tesseract-ocr/5/tessdata",
        "/usr/share/tesseract-ocr/4/tessdata",
        "/usr/share/tessdata",
        "/usr/local/share/tessdata",
        r#"C:\Program Files\Tesseract-OCR\tessdata"#,
        r#"C:\ProgramData\Tesseract-OCR\tessdata"#,
    ];

    env::var("TESSDATA_PREFIX")
        .ok()
        .or_else(|| {
            fallback_paths
                .iter()
                .find(|p| Path::new(p).exists())
                .map(|p| (*p).to_string())
        })
        .unwrap_or_default()
}

/// Run Tesseract over a grayscale image and return the trimmed text.
///
/// A blank image produces an empty string, not an error.
pub fn recognize_grayscale(gray: &GrayImage, config: &OcrConfig) -> Result<String> {
    // Validate language before init; the bindings can crash on an empty
    // language or a missing traineddata file instead of returning an error.
    if config.language.trim().is_empty() {
        return Err(ScanHubError::ocr(
            "Language cannot be empty. Please specify a valid language code (e.g., 'eng')",
        ));
    }

    let tessdata_path = resolve_tessdata_dir();
    if !tessdata_path.is_empty() {
        for lang in config.language.split('+') {
            let lang = lang.trim();
            if lang.is_empty() {
                continue;
            }
            let traineddata_path = Path::new(&tessdata_path).join(format!("{}.traineddata", lang));
            if !traineddata_path.exists() {
                return Err(ScanHubError::ocr(format!(
                    "Language '{}' not found. Traineddata file does not exist: {}",
                    lang,
                    traineddata_path.display()
                )));
            }
        }
    }

    let api = TesseractAPI::new()
        .map_err(|e| ScanHubError::ocr_with_source("Failed to create Tesseract API", e))?;
    api.init(&tessdata_path, &config.language).map_err(|e| {
        ScanHubError::ocr_with_source(
            format!("Failed to initialize Tesseract for language '{}'", config.language),
            e,
        )
    })?;

    api.set_page_seg_mode(TessPageSegMode::from_int(config.psm as i32))
        .map_err(|e| ScanHubError::ocr_with_source(format!("Failed to set PSM mode {}", config.psm), e))?;

    let (width, height) = gray.dimensions();
    api.set_image(gray.as_raw(), width as i32, height as i32, 1, width as i32)
        .map_err(|e| ScanHubError::ocr_with_source("Failed to set image for OCR", e))?;

    let text = api
        .get_utf8_text()
        .map_err(|e| ScanHubError::ocr_with_source("Text recognition failed", e))?;

    Ok(text.trim().to_string())
}
