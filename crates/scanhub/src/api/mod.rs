//! REST API server for scanhub image scanning.
//!
//! Axum-based HTTP surface with three scan endpoints sharing one
//! upload-validation helper, plus a landing page and a health probe.
//!
//! # Endpoints
//!
//! - `GET /` - Landing page
//! - `GET /health` - Health check
//! - `POST /api/scan/result` - Accept and echo a client-submitted scan result
//! - `POST /api/scan/image` - Decode barcode/QR symbols in an uploaded image
//! - `POST /api/ocr` - Extract text from an uploaded image
//!
//! # Examples
//!
//! ## Starting the server
//!
//! ```no_run
//! use scanhub::{api::serve, config::ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> scanhub::Result<()> {
//!     serve("127.0.0.1", 8000, ServiceConfig::default()).await?;
//!     Ok(())
//! }
//! ```
//!
//! # cURL Examples
//!
//! ```bash
//! # Scan an image for barcodes/QR codes
//! curl -F "file=@ticket.png" http://localhost:8000/api/scan/image
//!
//! # OCR an image
//! curl -F "file=@receipt.jpg" http://localhost:8000/api/ocr
//!
//! # Post a scan result
//! curl -H 'Content-Type: application/json' \
//!      -d '{"result": "HELLO"}' \
//!      http://localhost:8000/api/scan/result
//! ```

mod error;
mod handlers;
mod server;
mod types;

pub use error::ApiError;
pub use server::{create_router, serve};
pub use types::{ApiState, ErrorResponse, HealthResponse, OcrResponse, ScanImageResponse, ScanResultAck, SymbolEntry};
