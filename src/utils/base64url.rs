//! Base64URL encoding/decoding per RFC 4648
//!
//! Thin wrapper around the `base64` crate with size limit validation.

use crate::error::{Error, Result};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

/// Encode bytes to an unpadded Base64URL string
pub(crate) fn encode_bytes(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decode Base64URL string to bytes with maximum size limit
pub(crate) fn decode_bytes(input: &str, max_size: usize) -> Result<Vec<u8>> {
    // Reject oversized input before allocating: 4 chars carry 3 bytes
    if input.len() / 4 * 3 > max_size {
        return Err(Error::FormatInvalidBase64(format!(
            "Encoded size exceeds limit: {} bytes (max decoded: {})",
            input.len(),
            max_size
        )));
    }

    let result = URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| Error::FormatInvalidBase64(format!("Base64URL decode failed: {e}")))?;

    if result.len() > max_size {
        return Err(Error::FormatInvalidBase64(format!(
            "Decoded size exceeds limit: {} bytes (max: {})",
            result.len(),
            max_size
        )));
    }

    Ok(result)
}
