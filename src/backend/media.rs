use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{Result, SmartHealthError};

/// Binary content attached inline to a prompt.
///
/// The payload is stored already base64-encoded so a file is encoded once
/// and can be attached to any number of requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// Declared media type, e.g. `application/pdf` or `image/png`
    pub mime_type: String,
    /// Base64 (standard alphabet, padded) payload
    pub data: String,
}

impl MediaFile {
    /// Encode raw bytes as an inline media attachment.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: BASE64.encode(bytes),
        }
    }

    /// Wrap an already-encoded payload.
    pub fn from_base64(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Render as a `data:` URL, suitable for an inline image preview.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Check that every attachment can actually be sent.
pub(crate) fn check_media(media: &[MediaFile], provider_name: &str) -> Result<()> {
    for file in media {
        if file.data.is_empty() {
            return Err(SmartHealthError::api_error(
                provider_name,
                "MediaFile inline data cannot be empty",
            ));
        }
        if file.mime_type.is_empty() {
            return Err(SmartHealthError::api_error(
                provider_name,
                "MediaFile mime_type cannot be empty",
            ));
        }
    }
    Ok(())
}
