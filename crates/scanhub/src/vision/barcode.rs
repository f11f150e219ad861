//! Barcode/QR symbol decoding via `rxing`.
//!
//! `rxing` is a pure-Rust port of the ZXing multi-format reader. Symbol
//! detection runs over the grayscale luma plane; the reported symbology
//! names follow zbar conventions (`QRCODE`, `EAN13`, ...) so clients see
//! the same `type` strings regardless of the decoding library in use.

use super::DecodedSymbol;
use crate::{Result, ScanHubError};
use image::GrayImage;
use rxing::{BarcodeFormat, Exceptions};

/// Detect and decode every barcode/QR symbol in a grayscale image.
///
/// "Nothing found" is a normal outcome and yields an empty vector; only
/// genuine reader failures surface as errors.
pub fn decode_grayscale(gray: &GrayImage) -> Result<Vec<DecodedSymbol>> {
    let (width, height) = gray.dimensions();

    match rxing::helpers::detect_multiple_in_luma(gray.as_raw().clone(), width, height) {
        Ok(results) => Ok(results
            .iter()
            .map(|result| DecodedSymbol {
                symbology: symbology_name(result.getBarcodeFormat()),
                data: result.getText().to_string(),
            })
            .collect()),
        Err(Exceptions::NotFoundException(_)) => Ok(Vec::new()),
        Err(e) => Err(ScanHubError::decode_with_source(
            format!("Symbol detection failed: {}", e),
            e,
        )),
    }
}

/// zbar-style name for a decoded symbol's format.
pub fn symbology_name(format: &BarcodeFormat) -> String {
    match format {
        BarcodeFormat::QR_CODE | BarcodeFormat::MICRO_QR_CODE => "QRCODE".to_string(),
        BarcodeFormat::EAN_13 => "EAN13".to_string(),
        BarcodeFormat::EAN_8 => "EAN8".to_string(),
        BarcodeFormat::UPC_A => "UPCA".to_string(),
        BarcodeFormat::UPC_E => "UPCE".to_string(),
        BarcodeFormat::CODE_128 => "CODE128".to_string(),
        BarcodeFormat::CODE_93 => "CODE93".to_string(),
        BarcodeFormat::CODE_39 => "CODE39".to_string(),
        BarcodeFormat::CODABAR => "CODABAR".to_string(),
        BarcodeFormat::ITF => "I25".to_string(),
        BarcodeFormat::DATA_MATRIX => "DATAMATRIX".to_string(),
        BarcodeFormat::PDF_417 => "PDF417".to_string(),
        BarcodeFormat::AZTEC => "AZTEC".to_string(),
        BarcodeFormat::RSS_14 => "DATABAR".to_string(),
        BarcodeFormat::RSS_EXPANDED => "DATABAR_EXP".to_string(),
        other => format!("{:?}", other).replace('_', ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use rxing::{MultiFormatWriter, Writer};

    /// Render a symbol to a grayscale image, black modules on white.
    ///
    /// The writer emits exactly the requested dimensions (quiet zone included).
    fn render_symbol(contents: &str, format: BarcodeFormat, size: u32) -> GrayImage {
        let matrix = MultiFormatWriter
            .encode(contents, &format, size as i32, size as i32)
            .expect("failed to encode test symbol");

        let mut img = GrayImage::from_pixel(size, size, Luma([255u8]));
        for y in 0..size {
            for x in 0..size {
                if matrix.get(x, y) {
                    img.put_pixel(x, y, Luma([0u8]));
                }
            }
        }
        img
    }

    #[test]
    fn test_decode_qr_code() {
        let img = render_symbol("HELLO", BarcodeFormat::QR_CODE, 200);
        let symbols = decode_grayscale(&img).unwrap();

        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].symbology, "QRCODE");
        assert_eq!(symbols[0].data, "HELLO");
    }

    #[test]
    fn test_decode_blank_image_is_empty() {
        let img = GrayImage::from_pixel(100, 100, Luma([255u8]));
        let symbols = decode_grayscale(&img).unwrap();
        assert!(symbols.is_empty());
    }

    #[test]
    fn test_symbology_names_follow_zbar_conventions() {
        assert_eq!(symbology_name(&BarcodeFormat::QR_CODE), "QRCODE");
        assert_eq!(symbology_name(&BarcodeFormat::EAN_13), "EAN13");
        assert_eq!(symbology_name(&BarcodeFormat::CODE_128), "CODE128");
        assert_eq!(symbology_name(&BarcodeFormat::ITF), "I25");
        assert_eq!(symbology_name(&BarcodeFormat::PDF_417), "PDF417");
        assert_eq!(symbology_name(&BarcodeFormat::DATA_MATRIX), "DATAMATRIX");
    }
}
