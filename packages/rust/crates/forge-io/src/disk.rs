//! Synchronous disk reads backing the overlay.

use std::fs as std_fs;
use std::io::Read;
use std::path::Path;

use crate::detect::decode_text;
use crate::error::IoError;

/// Read text from a file with size and binary checks.
///
/// # Arguments
/// * `path` - Path to the file
/// * `max_bytes` - Maximum file size in bytes
///
/// # Returns
/// Decoded, `\n`-normalized text content or an error.
///
/// # Example
///
/// ```rust,ignore
/// use forge_io::read_text_safe;
///
/// let content = read_text_safe("src/index.js", 10_000_000)?;
/// ```
pub fn read_text_safe<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<String, IoError> {
    let path = path.as_ref();

    let metadata = std_fs::metadata(path)
        .map_err(|_| IoError::NotFound(path.to_string_lossy().to_string()))?;

    if !metadata.is_file() {
        return Err(IoError::NotFound(path.to_string_lossy().to_string()));
    }

    if metadata.len() > max_bytes {
        return Err(IoError::TooLarge(metadata.len(), max_bytes));
    }

    let mut file = std_fs::File::open(path)?;
    let mut buffer = Vec::with_capacity(usize::try_from(metadata.len()).unwrap_or(0));
    file.read_to_end(&mut buffer)?;

    decode_text(buffer)
}

/// Create the parent directory of `path` if it is missing.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std_fs::create_dir_all(parent)?;
    }
    Ok(())
}
