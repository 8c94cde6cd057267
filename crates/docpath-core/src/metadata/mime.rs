//! Static extension → MIME type registry.

use std::path::Path;

use super::extension;

/// Fallback type when the extension is missing or unknown.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Lowercase extension (without the dot) → canonical MIME type.
const MIME_TABLE: &[(&str, &str)] = &[
    // Images
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
    ("avif", "image/avif"),
    ("bmp", "image/bmp"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    // Video
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("3gp", "video/3gpp"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    // Audio
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("aac", "audio/aac"),
    ("wav", "audio/x-wav"),
    ("ogg", "audio/ogg"),
    ("oga", "audio/ogg"),
    ("opus", "audio/ogg"),
    ("flac", "audio/flac"),
    ("amr", "audio/amr"),
    // Documents
    ("pdf", "application/pdf"),
    ("txt", "text/plain"),
    ("log", "text/plain"),
    ("md", "text/markdown"),
    ("csv", "text/csv"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("xml", "text/xml"),
    ("json", "application/json"),
    ("rtf", "application/rtf"),
    ("doc", "application/msword"),
    ("docx", "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
    ("xls", "application/vnd.ms-excel"),
    ("xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    ("ppt", "application/vnd.ms-powerpoint"),
    ("pptx", "application/vnd.openxmlformats-officedocument.presentationml.presentation"),
    ("odt", "application/vnd.oasis.opendocument.text"),
    ("ods", "application/vnd.oasis.opendocument.spreadsheet"),
    ("odp", "application/vnd.oasis.opendocument.presentation"),
    // Archives and packages
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("tgz", "application/gzip"),
    ("tar", "application/x-tar"),
    ("7z", "application/x-7z-compressed"),
    ("rar", "application/vnd.rar"),
    ("apk", "application/vnd.android.package-archive"),
    // Certificates
    ("p12", "application/x-pkcs12"),
    ("pfx", "application/x-pkcs12"),
    ("pem", "application/x-pem-file"),
    ("crt", "application/x-x509-ca-cert"),
    ("cer", "application/pkix-cert"),
];

/// Looks up a MIME type for a bare extension (`"pdf"`, not `".pdf"`).
/// Matching is ASCII case-insensitive.
pub fn mime_from_extension(ext: &str) -> Option<&'static str> {
    MIME_TABLE
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
}

/// MIME type for a path or file name, based on the extension of its final
/// component. Falls back to [`OCTET_STREAM`].
pub fn mime_type(path: impl AsRef<Path>) -> &'static str {
    let name = path.as_ref().file_name().and_then(|n| n.to_str());
    match extension(name) {
        Some(ext) if !ext.is_empty() => mime_from_extension(&ext[1..]).unwrap_or(OCTET_STREAM),
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(mime_type("/sdcard/Download/report.pdf"), "application/pdf");
        assert_eq!(mime_type("IMG_0001.JPG"), "image/jpeg");
        assert_eq!(mime_type("archive.tar.gz"), "application/gzip");
        assert_eq!(mime_type("client.p12"), "application/x-pkcs12");
    }

    #[test]
    fn unknown_or_missing_extension_is_octet_stream() {
        assert_eq!(mime_type("data.qqq"), OCTET_STREAM);
        assert_eq!(mime_type("README"), OCTET_STREAM);
        assert_eq!(mime_type("trailing."), OCTET_STREAM);
        assert_eq!(mime_type(""), OCTET_STREAM);
    }

    #[test]
    fn extension_taken_from_final_component_only() {
        assert_eq!(mime_type("/data/v1.2/blob"), OCTET_STREAM);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(mime_from_extension("PnG"), Some("image/png"));
        assert_eq!(mime_from_extension(""), None);
    }

    #[test]
    fn table_keys_are_lowercase_and_unique() {
        for (i, (ext, _)) in MIME_TABLE.iter().enumerate() {
            assert_eq!(*ext, ext.to_ascii_lowercase());
            assert!(
                MIME_TABLE[i + 1..].iter().all(|(other, _)| other != ext),
                "duplicate extension {ext}"
            );
        }
    }
}
