//! DAT controller image decoding
//!
//! This module contains the fixed-offset layout of the controller memory image
//! and the decoders that read it. All reads go through [`byte_at`], which
//! returns 0 past the end of the buffer, so truncated images decode to
//! zero-valued fields instead of failing.

pub mod filename;
pub mod format;
pub mod image;
pub mod layout;
pub mod manufacturer;
pub mod reader;

// Re-export decoder types
pub use filename::IntersectionLabel;
pub use format::{Confidence, DatFormat, FormatDetector, FormatInfo};
pub use image::{DatImage, FlashSchedule, LsuKind, LsuTypeRecord, ManufacturerInfo, Ring, RingStep, TimingPlanEntry};
pub use manufacturer::{Manufacturer, ManufacturerDetector};
pub use reader::DatReader;

/// Read one byte, zero-filled past the end of the buffer
pub(crate) fn byte_at(buf: &[u8], offset: usize) -> u8 {
    buf.get(offset).copied().unwrap_or(0)
}

/// Read `N` consecutive bytes, zero-filled past the end of the buffer
pub(crate) fn bytes_at<const N: usize>(buf: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = byte_at(buf, offset + i);
    }
    out
}

/// Read an ASCII run that ends at the first NUL or after `max_len` bytes
pub(crate) fn nul_terminated(buf: &[u8], offset: usize, max_len: usize) -> String {
    let raw: Vec<u8> = (offset..offset + max_len)
        .map(|i| byte_at(buf, i))
        .take_while(|&b| b != 0)
        .collect();
    String::from_utf8_lossy(&raw).into_owned()
}
