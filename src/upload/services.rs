//! Upload validation: the file type is decided by content sniffing, never by
//! the client-supplied name or content type.

use time::OffsetDateTime;
use uuid::Uuid;

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Identify an accepted image format from its magic bytes, returning
/// `(mime, extension)`.
pub fn sniff_image(bytes: &[u8]) -> Option<(&'static str, &'static str)> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some(("image/jpeg", "jpg"));
    }
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some(("image/png", "png"));
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some(("image/gif", "gif"));
    }
    if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        return Some(("image/webp", "webp"));
    }
    None
}

/// Unique on-disk name, keyed by content-derived extension.
pub fn make_filename(ext: &str) -> String {
    format!(
        "product_{}_{}.{}",
        Uuid::new_v4().simple(),
        OffsetDateTime::now_utc().unix_timestamp(),
        ext
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_the_four_accepted_formats() {
        assert_eq!(
            sniff_image(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]),
            Some(("image/jpeg", "jpg"))
        );
        assert_eq!(
            sniff_image(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00]),
            Some(("image/png", "png"))
        );
        assert_eq!(sniff_image(b"GIF89a..."), Some(("image/gif", "gif")));
        let mut webp = b"RIFF".to_vec();
        webp.extend_from_slice(&[0, 0, 0, 0]);
        webp.extend_from_slice(b"WEBPVP8 ");
        assert_eq!(sniff_image(&webp), Some(("image/webp", "webp")));
    }

    #[test]
    fn rejects_everything_else() {
        assert_eq!(sniff_image(b"<?php echo 'hi'; ?>"), None);
        assert_eq!(sniff_image(b"%PDF-1.7"), None);
        assert_eq!(sniff_image(b""), None);
        assert_eq!(sniff_image(b"RIFFxxxxWAVE"), None);
    }

    #[test]
    fn filenames_are_unique_and_carry_the_extension() {
        let a = make_filename("png");
        let b = make_filename("png");
        assert!(a.starts_with("product_"));
        assert!(a.ends_with(".png"));
        assert_ne!(a, b);
    }
}
