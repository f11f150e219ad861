//! API request and response types.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::vision::{DecodedSymbol, VisionEngine};

/// API server state.
///
/// Holds the immutable service configuration resolved at startup and the
/// shared vision engine. Cloned per request by axum.
#[derive(Clone)]
pub struct ApiState {
    /// Service configuration (upload dir, size cap, OCR options)
    pub config: Arc<ServiceConfig>,
    /// Decode/OCR collaborator
    pub engine: Arc<dyn VisionEngine>,
}

/// One decoded symbol as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolEntry {
    /// Symbology name (e.g., "QRCODE", "EAN13")
    #[serde(rename = "type")]
    pub symbology: String,
    /// Decoded text payload
    pub data: String,
}

impl From<DecodedSymbol> for SymbolEntry {
    fn from(symbol: DecodedSymbol) -> Self {
        Self {
            symbology: symbol.symbology,
            data: symbol.data,
        }
    }
}

/// Response body for `POST /api/scan/image`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanImageResponse {
    /// All symbols detected in the uploaded image (possibly empty)
    pub results: Vec<SymbolEntry>,
}

impl From<Vec<DecodedSymbol>> for ScanImageResponse {
    fn from(symbols: Vec<DecodedSymbol>) -> Self {
        Self {
            results: symbols.into_iter().map(SymbolEntry::from).collect(),
        }
    }
}

/// Response body for `POST /api/ocr`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResponse {
    /// Extracted text, whitespace-trimmed (empty for a blank image)
    pub text: String,
}

/// Acknowledgement body for `POST /api/scan/result`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResultAck {
    pub status: String,
    pub message: String,
    /// The client-supplied scan result, echoed unchanged
    pub data: serde_json::Value,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// Service version
    pub version: String,
}

/// Error response.
///
/// Every failure the service reports uses this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason
    pub error: String,
}
