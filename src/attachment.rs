//! Inline attachment encoding.
//!
//! Task payloads carry their sample data embedded as `data:` URIs so the
//! receiving server never has to fetch anything to resolve them. Attachments
//! are meant for small inline datasets, not general file transport.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// Practical ceiling for inline attachment content. Callers should reject
/// larger inputs before encoding.
pub const MAX_INLINE_BYTES: usize = 1024 * 1024;

/// A named attachment whose content is embedded as a base64 data URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    /// Self-contained `data:<media type>;base64,<payload>` reference.
    pub url: String,
}

impl Attachment {
    /// Embed `bytes` as a data URI with the declared media type.
    pub fn inline(name: impl Into<String>, media_type: &str, bytes: &[u8]) -> Self {
        Self {
            name: name.into(),
            url: format!("data:{};base64,{}", media_type, STANDARD.encode(bytes)),
        }
    }

    /// Decode this attachment's content back to the original bytes.
    pub fn decode(&self) -> Result<Vec<u8>, AttachmentError> {
        decode_data_uri(&self.url)
    }
}

/// Errors decoding an inline data URI.
#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    #[error("not a data URI")]
    NotDataUri,
    #[error("data URI is not base64-encoded")]
    NotBase64Encoded,
    #[error("invalid base64 payload: {0}")]
    InvalidPayload(#[from] base64::DecodeError),
}

/// Decode a `data:<media>;base64,<payload>` URI to its original bytes.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, AttachmentError> {
    let rest = uri.strip_prefix("data:").ok_or(AttachmentError::NotDataUri)?;
    let (meta, payload) = rest.split_once(',').ok_or(AttachmentError::NotDataUri)?;
    if !meta.ends_with(";base64") {
        return Err(AttachmentError::NotBase64Encoded);
    }
    Ok(STANDARD.decode(payload)?)
}
