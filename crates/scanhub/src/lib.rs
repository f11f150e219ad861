//! scanhub - Barcode/QR and OCR image scan service
//!
//! A minimal HTTP backend that accepts image uploads and delegates the
//! actual computer vision work to external libraries: `rxing` for
//! barcode/QR symbol decoding and Tesseract for text recognition. Uploads
//! are staged on disk for the duration of one request and removed on
//! every exit path.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use scanhub::{api::serve, config::ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> scanhub::Result<()> {
//!     let config = ServiceConfig::load(None)?;
//!     serve("127.0.0.1", 8000, config).await
//! }
//! ```
//!
//! # Architecture
//!
//! - **`api`**: Axum router, handlers, error-to-JSON mapping
//! - **`staging`**: upload gatekeeping, sanitization, scoped temp files
//! - **`vision`**: the external decode/OCR collaborator boundary
//! - **`config`**: immutable service configuration resolved at startup

#![deny(unsafe_code)]

pub mod api;
pub mod config;
pub mod error;
pub mod staging;
pub mod vision;

pub use config::{OcrConfig, ServiceConfig};
pub use error::{Result, ScanHubError};
pub use vision::{DecodedSymbol, NativeVisionEngine, VisionEngine};
