pub mod client;
pub mod handler;
pub mod models;

// Re-exports for external use (main.rs, OpenAPI, etc.)
pub use client::RecognitionClient;
pub use handler::{UPLOAD_PATH, create_relay_router, upload_face};
pub use models::{PassthroughPolicy, UploadedFile};
