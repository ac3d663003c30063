//! Logo upload handling: size limits and `data:` URL encoding

use crate::error::{Error, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::path::{Path, PathBuf};

/// Default upload limit (5 MiB)
pub const MAX_LOGO_BYTES: u64 = 5 * 1024 * 1024;

/// Encode image bytes as a `data:<mime>;base64,` URL.
///
/// The MIME type is sniffed from the content; unknown formats fall back to
/// `application/octet-stream` and are left for the renderer to reject.
pub fn encode_data_url(bytes: &[u8]) -> String {
    let mime = image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream");
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Decode the payload of a base64 `data:` URL.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| Error::InvalidLogo("Logo must be a data: URL".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::InvalidLogo("Malformed data: URL".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(Error::InvalidLogo(
            "Only base64 data: URLs are supported".to_string(),
        ));
    }
    Ok(STANDARD.decode(payload.trim())?)
}

/// Read a logo file from disk, rejecting files above `limit` bytes before
/// reading them.
pub async fn read_logo_file(path: &Path, limit: u64) -> Result<Vec<u8>> {
    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > limit {
        return Err(Error::LogoTooLarge {
            size: metadata.len(),
            limit,
        });
    }
    Ok(tokio::fs::read(path).await?)
}

/// Remembers the last file chosen for upload, like a browser file input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePicker {
    value: Option<PathBuf>,
}

impl FilePicker {
    /// Currently selected file, if any
    pub fn value(&self) -> Option<&Path> {
        self.value.as_deref()
    }

    /// Record a selection
    pub fn select(&mut self, path: impl Into<PathBuf>) {
        self.value = Some(path.into());
    }

    /// Forget the selection
    pub fn clear(&mut self) {
        self.value = None;
    }
}
