//! Source file type detection.
//!
//! Only the formats the text extraction service accepts are recognised:
//! JPEG, PNG, WEBP and PDF. Detection reads the magic bytes first and falls
//! back to the file extension.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Accepted source media types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    /// JPEG image
    Jpeg,
    /// PNG image
    Png,
    /// WEBP image
    Webp,
    /// PDF document
    Pdf,
}

impl MediaType {
    /// All accepted types.
    pub const ALL: [MediaType; 4] = [
        MediaType::Jpeg,
        MediaType::Png,
        MediaType::Webp,
        MediaType::Pdf,
    ];

    /// MIME type string.
    pub fn mime_type(self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Webp => "image/webp",
            MediaType::Pdf => "application/pdf",
        }
    }

    /// Canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            MediaType::Jpeg => "jpg",
            MediaType::Png => "png",
            MediaType::Webp => "webp",
            MediaType::Pdf => "pdf",
        }
    }

    /// Check if this is an image type.
    pub fn is_image(self) -> bool {
        !matches!(self, MediaType::Pdf)
    }

    /// Look up a type by MIME string.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.trim().to_ascii_lowercase();
        let mime = if mime == "image/jpg" { "image/jpeg" } else { mime.as_str() };
        Self::ALL.into_iter().find(|t| t.mime_type() == mime)
    }

    /// Look up a type by file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(MediaType::Jpeg),
            "png" => Some(MediaType::Png),
            "webp" => Some(MediaType::Webp),
            "pdf" => Some(MediaType::Pdf),
            _ => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Detect the media type from the leading bytes of a file.
///
/// # Returns
/// * `Ok(MediaType)` if the data starts with a recognised signature
/// * `Err(Error::UnsupportedMediaType)` otherwise
pub fn detect_media_type_from_bytes(data: &[u8]) -> Result<MediaType> {
    if data.starts_with(PDF_MAGIC) {
        Ok(MediaType::Pdf)
    } else if data.starts_with(PNG_MAGIC) {
        Ok(MediaType::Png)
    } else if data.starts_with(JPEG_MAGIC) {
        Ok(MediaType::Jpeg)
    } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        Ok(MediaType::Webp)
    } else {
        Err(Error::UnsupportedMediaType(describe_header(data)))
    }
}

/// Detect the media type of a file from its content, then its extension.
///
/// # Example
/// ```no_run
/// use kreport::detect::detect_media_type_from_path;
///
/// let media = detect_media_type_from_path("memo.png").unwrap();
/// println!("{}", media.mime_type());
/// ```
pub fn detect_media_type_from_path<P: AsRef<Path>>(path: P) -> Result<MediaType> {
    let path = path.as_ref();
    let mut header = Vec::with_capacity(16);
    File::open(path)?.take(16).read_to_end(&mut header)?;
    detect_media_type(&header, path.extension().and_then(|e| e.to_str()))
}

/// Detect from content, falling back to the extension when no signature matches.
pub fn detect_media_type(data: &[u8], extension: Option<&str>) -> Result<MediaType> {
    detect_media_type_from_bytes(data).or_else(|err| {
        extension
            .and_then(MediaType::from_extension)
            .ok_or(err)
    })
}

/// Check if a file is an accepted source type.
pub fn is_supported<P: AsRef<Path>>(path: P) -> bool {
    detect_media_type_from_path(path).is_ok()
}

fn describe_header(data: &[u8]) -> String {
    if data.is_empty() {
        return "empty file".to_string();
    }
    data.iter()
        .take(8)
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_signatures() {
        assert_eq!(detect_media_type_from_bytes(b"%PDF-1.7\n").unwrap(), MediaType::Pdf);
        assert_eq!(
            detect_media_type_from_bytes(b"\x89PNG\r\n\x1a\n\0\0").unwrap(),
            MediaType::Png
        );
        assert_eq!(
            detect_media_type_from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap(),
            MediaType::Jpeg
        );
        assert_eq!(
            detect_media_type_from_bytes(b"RIFF\x10\0\0\0WEBPVP8 ").unwrap(),
            MediaType::Webp
        );
    }

    #[test]
    fn test_detect_unsupported() {
        let result = detect_media_type_from_bytes(b"GIF89a");
        assert!(matches!(result, Err(Error::UnsupportedMediaType(_))));
        assert!(matches!(
            detect_media_type_from_bytes(b""),
            Err(Error::UnsupportedMediaType(ref s)) if s == "empty file"
        ));
    }

    #[test]
    fn test_extension_fallback() {
        assert_eq!(detect_media_type(b"????", Some("JPEG")).unwrap(), MediaType::Jpeg);
        assert!(detect_media_type(b"????", Some("gif")).is_err());
        assert!(detect_media_type(b"????", None).is_err());
    }

    #[test]
    fn test_from_mime() {
        assert_eq!(MediaType::from_mime("image/jpg"), Some(MediaType::Jpeg));
        assert_eq!(MediaType::from_mime("Application/PDF"), Some(MediaType::Pdf));
        assert_eq!(MediaType::from_mime("image/gif"), None);
        assert!(MediaType::Png.is_image());
        assert!(!MediaType::Pdf.is_image());
    }

    #[test]
    fn test_detect_from_path() {
        let mut file = tempfile::Builder::new().suffix(".bin").tempfile().unwrap();
        file.write_all(b"%PDF-1.4\n%...").unwrap();
        assert_eq!(detect_media_type_from_path(file.path()).unwrap(), MediaType::Pdf);
        assert!(is_supported(file.path()));
    }
}
