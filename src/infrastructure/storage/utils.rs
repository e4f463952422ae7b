use super::StorageError;

/// Longest file name accepted by the poster store
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Reject names that would escape the poster directory or cannot be stored flat
pub fn validate_filename(filename: &str) -> Result<(), StorageError> {
    let invalid = filename.is_empty()
        || filename.len() > MAX_FILENAME_LENGTH
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\', '\0']);

    if invalid {
        return Err(StorageError::InvalidFilename { filename: filename.to_string() });
    }

    Ok(())
}

/// Validate file size against maximum allowed
pub fn validate_file_size(size: u64, max_size: u64) -> Result<(), String> {
    if size > max_size {
        return Err(format!("File size {size} bytes exceeds maximum allowed size of {max_size} bytes"));
    }
    Ok(())
}

/// MIME type served for a poster, derived from its extension
pub fn content_type_for(filename: &str) -> &'static str {
    let extension = filename.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
