//! DAT container format detection
//!
//! Controller images come in a handful of vendor layouts that differ by size
//! and by a signature block near the end of the file:
//!
//! - **SUHDOL standard**: 0x39C0 bytes, `SUHDOL` at 0x391D
//! - **SUHDOL extended**: 0x39FE bytes, the signature block shifted by 0x38
//! - **Plain**: standard or extended size without a signature
//! - **Remote Data**: 한진이엔씨 exports starting with `Remote Data Ver x.y`
//! - **LCsim**: 61,472-byte simulator images
//!
//! SUHDOL images also carry a modification date and a service phone number
//! inside the signature block.

use super::layout::{self, SignatureBlock};
use super::{byte_at, bytes_at};
use byteorder::{BigEndian, ByteOrder};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Detected container format
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DatFormat {
    Suhdol,
    SuhdolExtended,
    /// Standard size without a vendor signature
    Plain,
    /// `SUHDOL` found at a non-standard position
    SuhdolNonstandard { signature_offset: usize },
    RemoteData { version: Option<String> },
    Lcsim,
    Unknown,
}

impl fmt::Display for DatFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatFormat::Suhdol => write!(f, "suhdol"),
            DatFormat::SuhdolExtended => write!(f, "suhdol_extended"),
            DatFormat::Plain => write!(f, "plain"),
            DatFormat::SuhdolNonstandard { .. } => write!(f, "suhdol_nonstandard"),
            DatFormat::RemoteData { version: Some(v) } => write!(f, "remote_data_v{}", v),
            DatFormat::RemoteData { version: None } => write!(f, "remote_data"),
            DatFormat::Lcsim => write!(f, "lcsim"),
            DatFormat::Unknown => write!(f, "unknown"),
        }
    }
}

/// How much the format verdict can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Result of format detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatInfo {
    pub format: DatFormat,
    pub confidence: Confidence,
    /// Modification date from the SUHDOL signature block
    pub date_modified: Option<NaiveDate>,
    /// Service phone number from the SUHDOL signature block
    pub phone: Option<String>,
    /// Advisory problems found while detecting
    pub warnings: Vec<String>,
}

impl FormatInfo {
    fn new(format: DatFormat, confidence: Confidence) -> Self {
        Self {
            format,
            confidence,
            date_modified: None,
            phone: None,
            warnings: Vec::new(),
        }
    }
}

/// Format detector
pub struct FormatDetector;

impl FormatDetector {
    /// Classify a raw buffer
    pub fn detect(buf: &[u8]) -> FormatInfo {
        if buf.starts_with(layout::REMOTE_DATA_HEADER) {
            let info = FormatInfo::new(
                DatFormat::RemoteData {
                    version: Self::remote_data_version(buf),
                },
                Confidence::High,
            );
            log::debug!("Detected remote-data export: {}", info.format);
            return info;
        }

        let info = match buf.len() {
            layout::FILE_SIZE => Self::detect_sized(buf, layout::STANDARD_SIGNATURE_BLOCK, DatFormat::Suhdol),
            layout::EXTENDED_FILE_SIZE => {
                Self::detect_sized(buf, layout::EXTENDED_SIGNATURE_BLOCK, DatFormat::SuhdolExtended)
            }
            layout::LCSIM_FILE_SIZE => FormatInfo::new(DatFormat::Lcsim, Confidence::Medium),
            size => match find(buf, layout::SUHDOL_SIGNATURE) {
                Some(position) => {
                    let mut info = FormatInfo::new(
                        DatFormat::SuhdolNonstandard {
                            signature_offset: position,
                        },
                        Confidence::Medium,
                    );
                    info.warnings.push(format!(
                        "Non-standard size ({}B) but SUHDOL signature found at 0x{:04X}",
                        size, position
                    ));
                    info
                }
                None => FormatInfo::new(DatFormat::Unknown, Confidence::Low),
            },
        };

        for warning in &info.warnings {
            log::warn!("{}", warning);
        }
        log::debug!("Detected DAT format: {} ({:?})", info.format, info.confidence);
        info
    }

    fn detect_sized(buf: &[u8], block: SignatureBlock, signed: DatFormat) -> FormatInfo {
        if !Self::has_signature(buf, block) {
            return FormatInfo::new(DatFormat::Plain, Confidence::Medium);
        }

        let mut info = FormatInfo::new(signed, Confidence::High);
        match Self::read_date(buf, block.date) {
            Ok(date) => info.date_modified = Some(date),
            Err(warning) => info.warnings.push(warning),
        }
        info.phone = Self::read_phone(buf, block.phone);
        info
    }

    /// True if `SUHDOL` sits at the block's signature offset
    pub fn has_signature(buf: &[u8], block: SignatureBlock) -> bool {
        let end = block.signature + layout::SUHDOL_SIGNATURE.len();
        buf.get(block.signature..end) == Some(layout::SUHDOL_SIGNATURE)
    }

    /// Big-endian year, month, day; accepted for years 2000..=2030
    fn read_date(buf: &[u8], offset: usize) -> std::result::Result<NaiveDate, String> {
        let year = BigEndian::read_u16(&bytes_at::<2>(buf, offset));
        let month = byte_at(buf, offset + 2);
        let day = byte_at(buf, offset + 3);

        if (2000..=2030).contains(&year) {
            if let Some(date) = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32) {
                return Ok(date);
            }
        }
        Err(format!("Date out of range: {}-{}-{}", year, month, day))
    }

    /// ASCII phone number: stops at NUL or non-ASCII, must start with a digit or '-'
    fn read_phone(buf: &[u8], offset: usize) -> Option<String> {
        let phone: String = (offset..offset + 20)
            .map(|i| byte_at(buf, i))
            .take_while(|&b| b != 0 && b.is_ascii())
            .map(char::from)
            .collect();
        let phone = phone.trim();

        match phone.chars().next() {
            Some(c) if c.is_ascii_digit() || c == '-' => Some(phone.to_string()),
            _ => None,
        }
    }

    /// Version from a `Remote Data Ver 3.5.2` header
    fn remote_data_version(buf: &[u8]) -> Option<String> {
        let header: String = buf
            .iter()
            .take(30)
            .filter(|&&b| b != 0 && b.is_ascii())
            .map(|&b| char::from(b))
            .collect();

        let rest = &header[header.find("Remote Data Ver")? + "Remote Data Ver".len()..];
        let version: String = rest
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        if version.is_empty() {
            None
        } else {
            Some(version)
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}
