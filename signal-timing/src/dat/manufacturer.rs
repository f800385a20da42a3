//! Manufacturer detection from the name region at 0x395A

use super::reader::DatReader;
use serde::{Serialize, Serializer};
use std::fmt;

/// Controller vendor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Manufacturer {
    /// 서돌전자
    Suhdol,
    /// 한진이엔씨 - leaves the name region blank
    Hanjin,
    /// LCsim simulator
    Lcsim,
    /// 삼화전기
    Samhwa,
    /// Any other non-blank name, trimmed
    Other(String),
}

impl Manufacturer {
    pub fn label(&self) -> &str {
        match self {
            Manufacturer::Suhdol => "서돌전자",
            Manufacturer::Hanjin => "한진이엔씨",
            Manufacturer::Lcsim => "LCsim",
            Manufacturer::Samhwa => "삼화전기",
            Manufacturer::Other(name) => name,
        }
    }
}

impl fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for Manufacturer {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Manufacturer detector
pub struct ManufacturerDetector;

impl ManufacturerDetector {
    /// Classify the vendor of a raw image
    pub fn detect(buf: &[u8]) -> Manufacturer {
        Self::classify_name(&DatReader::read_manufacturer_name(buf))
    }

    /// Classify a decoded name
    ///
    /// Rules, in order: SUHDOL (any case) or 서돌, blank, LCsim (any case),
    /// 삼화, otherwise the trimmed name. A blank region is a positive match for
    /// 한진이엔씨, whose controllers never fill it.
    pub fn classify_name(name: &str) -> Manufacturer {
        let lower = name.to_lowercase();

        if lower.contains("suhdol") || name.contains("서돌") {
            Manufacturer::Suhdol
        } else if name.trim().is_empty() {
            Manufacturer::Hanjin
        } else if lower.contains("lcsim") {
            Manufacturer::Lcsim
        } else if name.contains("삼화") {
            Manufacturer::Samhwa
        } else {
            Manufacturer::Other(name.trim().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dat::layout;

    fn image_with_name(name: &[u8]) -> Vec<u8> {
        let mut buf = vec![0u8; layout::FILE_SIZE];
        buf[layout::MFR_NAME..layout::MFR_NAME + name.len()].copy_from_slice(name);
        buf
    }

    #[test]
    fn test_suhdol_any_case() {
        assert_eq!(ManufacturerDetector::detect(&image_with_name(b"SUHDOL")), Manufacturer::Suhdol);
        assert_eq!(ManufacturerDetector::classify_name("Suhdol Elec"), Manufacturer::Suhdol);
        assert_eq!(ManufacturerDetector::classify_name("서돌전자"), Manufacturer::Suhdol);
    }

    #[test]
    fn test_blank_region_is_hanjin() {
        assert_eq!(ManufacturerDetector::detect(&vec![0u8; layout::FILE_SIZE]), Manufacturer::Hanjin);
        assert_eq!(ManufacturerDetector::detect(&image_with_name(b"   ")), Manufacturer::Hanjin);
        assert_eq!(ManufacturerDetector::detect(&[]), Manufacturer::Hanjin);
    }

    #[test]
    fn test_other_vendors() {
        assert_eq!(ManufacturerDetector::detect(&image_with_name(b"LCSIM v2")), Manufacturer::Lcsim);
        assert_eq!(ManufacturerDetector::classify_name("삼화전기"), Manufacturer::Samhwa);
        assert_eq!(
            ManufacturerDetector::detect(&image_with_name(b"  ACME  ")),
            Manufacturer::Other("ACME".to_string())
        );
    }

    #[test]
    fn test_detection_ignores_surrounding_bytes() {
        let mut buf = image_with_name(b"LCsim");
        let plain = ManufacturerDetector::detect(&buf);
        buf[layout::MFR_NAME - 1] = 0xFF;
        buf[layout::MFR_NAME + layout::MFR_NAME_LEN] = b'S';
        buf[layout::MFR_YEAR] = 0x07;
        assert_eq!(ManufacturerDetector::detect(&buf), plain);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Manufacturer::Hanjin.to_string(), "한진이엔씨");
        assert_eq!(serde_json::to_string(&Manufacturer::Samhwa).unwrap(), "\"삼화전기\"");
    }
}
