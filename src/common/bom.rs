//! Byte Order Mark (BOM) utilities for XML entries read out of an archive.
//!
//! Course exporters mostly write UTF-8, but a few LMS exports prefix the
//! manifest with a UTF-8 or UTF-16 BOM. These helpers detect the mark and
//! decode the entry into a `Cow<str>` the XML reader can consume.

use std::borrow::Cow;

/// Supported BOM encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomKind {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl BomKind {
    /// Returns the byte representation of the BOM.
    #[inline]
    pub const fn as_bytes(&self) -> &'static [u8] {
        match self {
            BomKind::Utf8 => &UTF8_BOM,
            BomKind::Utf16Le => &UTF16_LE_BOM,
            BomKind::Utf16Be => &UTF16_BE_BOM,
        }
    }

    /// Returns the length in bytes of the BOM.
    #[inline]
    #[allow(clippy::len_without_is_empty)] // No need to check for empty BOMs
    pub const fn len(&self) -> usize {
        self.as_bytes().len()
    }
}

/// UTF-8 BOM bytes.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
/// UTF-16 little-endian BOM bytes.
pub const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
/// UTF-16 big-endian BOM bytes.
pub const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Detects a BOM at the start of `data`.
pub fn detect_bom(data: &[u8]) -> Option<BomKind> {
    if data.starts_with(&UTF8_BOM) {
        Some(BomKind::Utf8)
    } else if data.starts_with(&UTF16_LE_BOM) {
        Some(BomKind::Utf16Le)
    } else if data.starts_with(&UTF16_BE_BOM) {
        Some(BomKind::Utf16Be)
    } else {
        None
    }
}

/// Decodes an archive entry into text, honouring a leading BOM.
///
/// Entries without a BOM are treated as UTF-8; invalid sequences are
/// replaced rather than rejected so that a stray byte in a description does
/// not make the whole document unreadable.
pub fn decode_text(data: &[u8]) -> Cow<'_, str> {
    match detect_bom(data) {
        Some(BomKind::Utf8) => String::from_utf8_lossy(&data[UTF8_BOM.len()..]),
        Some(BomKind::Utf16Le) => {
            let (text, _) = encoding_rs::UTF_16LE.decode_without_bom_handling(&data[2..]);
            text
        },
        Some(BomKind::Utf16Be) => {
            let (text, _) = encoding_rs::UTF_16BE.decode_without_bom_handling(&data[2..]);
            text
        },
        None => String::from_utf8_lossy(data),
    }
}
