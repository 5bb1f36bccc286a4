use std::path::Path;

use base64::Engine;
use log::{info, warn};
use thiserror::Error;

// UI copy advertises "JPG, PNG, GIF up to 10MB". Advisory only: oversized or
// oddly formatted files are logged and ingested anyway.
const ADVISORY_MAX_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read artwork file {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Reads a user-selected file into a base64 `data:` URL, sniffing the mime
/// type from the file's magic bytes. The only failure mode is an unreadable
/// file, surfaced as an explicit error so the flow stays on the upload step.
pub async fn read_artwork_data_url(path: impl AsRef<Path>) -> Result<String, IngestError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| IngestError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;

    if bytes.len() as u64 > ADVISORY_MAX_BYTES {
        warn!(
            "⚠️ Artwork file {} is {} bytes, above the advertised 10MB limit; ingesting anyway",
            path.display(),
            bytes.len()
        );
    }

    let mime = match image::guess_format(&bytes) {
        Ok(format) => format.to_mime_type(),
        Err(_) => {
            warn!(
                "⚠️ Could not sniff an image format for {}; using a generic mime type",
                path.display()
            );
            "application/octet-stream"
        }
    };

    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
    info!(
        "🖼️ Ingested {} ({} bytes, {})",
        path.display(),
        bytes.len(),
        mime
    );

    Ok(format!("data:{};base64,{}", mime, encoded))
}
