//! Binary detection and text decoding.
//!
//! Overlay content is always text with `\n` line breaks, so decoding also
//! folds `\r\n` into `\n`.

use memchr::{memchr, memmem};

use crate::error::IoError;

/// Quick binary detection - checks first 8KB for NULL bytes.
#[must_use]
pub fn is_binary(buffer: &[u8]) -> bool {
    let check_len = std::cmp::min(buffer.len(), 8192);
    memchr(0, &buffer[..check_len]).is_some()
}

/// Decode bytes to a `\n`-normalized `String`.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD.
///
/// # Errors
/// Returns `IoError::BinaryFile` when binary content is detected.
pub fn decode_text(buffer: Vec<u8>) -> Result<String, IoError> {
    if is_binary(&buffer) {
        return Err(IoError::BinaryFile);
    }

    let text = match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    };
    Ok(normalize_line_endings(text))
}

/// Fold every `\r\n` into `\n`.
#[must_use]
pub fn normalize_line_endings(text: String) -> String {
    if memmem::find(text.as_bytes(), b"\r\n").is_none() {
        return text;
    }
    text.replace("\r\n", "\n")
}
