//! Core types for the signal timing library
//!
//! This module defines the error type shared by every engine and the small
//! vocabulary types (signal codes, movements) used throughout the decoder.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for library operations
pub type Result<T> = std::result::Result<T, SignalTimingError>;

/// Errors that can occur in the library
///
/// Decoding raw bytes never fails: truncated images decode to zero-valued
/// fields. Errors only come from optimizer preconditions, configuration and
/// file I/O.
#[derive(Debug, thiserror::Error)]
pub enum SignalTimingError {
    #[error("At least 2 intersections are required, got {0}")]
    TooFewIntersections(usize),

    #[error("Corridor cycle must be positive")]
    ZeroCycle,

    #[error("Intersection {index} runs a {found}s cycle but the corridor cycle is {expected}s")]
    CycleMismatch { index: usize, expected: u32, found: u32 },

    #[error("Travel speed must be a positive finite number, got {0}")]
    InvalidSpeed(f64),

    #[error("Intersection distances must be finite and non-decreasing (index {0})")]
    UnorderedDistances(usize),

    #[error("Invalid optimizer configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Signal code stored per head in a ring step
///
/// The meaning of `0x01` and `0x05` depends on the head type: on a vehicle
/// head `0x01` is the left-turn arrow, on a pedestrian head it is the walk
/// light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalCode {
    /// 0x00
    Red,
    /// 0x01 - left-turn green or pedestrian walk
    LeftOrWalk,
    /// 0x02 or 0x20
    Yellow,
    /// 0x05 - pedestrian clearance flash
    Flash,
    /// 0x10
    StraightGreen,
    /// 0x30
    RedFlash,
    /// 0x80
    Off,
    /// Any other byte
    Unknown(u8),
}

impl SignalCode {
    pub const RED: u8 = 0x00;
    pub const LEFT_OR_WALK: u8 = 0x01;
    pub const YELLOW: u8 = 0x02;
    pub const FLASH: u8 = 0x05;
    pub const STRAIGHT_GREEN: u8 = 0x10;
    pub const YELLOW_ALT: u8 = 0x20;
    pub const RED_FLASH: u8 = 0x30;
    pub const OFF: u8 = 0x80;

    /// Decode a raw step byte
    pub fn from_byte(code: u8) -> Self {
        match code {
            Self::RED => SignalCode::Red,
            Self::LEFT_OR_WALK => SignalCode::LeftOrWalk,
            Self::YELLOW | Self::YELLOW_ALT => SignalCode::Yellow,
            Self::FLASH => SignalCode::Flash,
            Self::STRAIGHT_GREEN => SignalCode::StraightGreen,
            Self::RED_FLASH => SignalCode::RedFlash,
            Self::OFF => SignalCode::Off,
            other => SignalCode::Unknown(other),
        }
    }

    /// Short label for ring tables, taking the head type into account
    pub fn short_label(&self, pedestrian_head: bool) -> String {
        match self {
            SignalCode::Red => "R".to_string(),
            SignalCode::LeftOrWalk if pedestrian_head => "PedG".to_string(),
            SignalCode::LeftOrWalk => "LG".to_string(),
            SignalCode::Yellow => "Y".to_string(),
            SignalCode::Flash if pedestrian_head => "PedF".to_string(),
            SignalCode::Flash => "GF".to_string(),
            SignalCode::StraightGreen => "G".to_string(),
            SignalCode::RedFlash => "RF".to_string(),
            SignalCode::Off => "--".to_string(),
            SignalCode::Unknown(code) => format!("0x{:02X}", code),
        }
    }
}

impl fmt::Display for SignalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_label(false))
    }
}

/// Movement served by a signal head during one phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    #[serde(rename = "직진")]
    Straight,
    #[serde(rename = "좌회전")]
    Left,
    #[serde(rename = "직좌")]
    StraightLeft,
    #[serde(rename = "보행")]
    Pedestrian,
}

impl Movement {
    /// Label used on Korean cycle tables
    pub fn label(&self) -> &'static str {
        match self {
            Movement::Straight => "직진",
            Movement::Left => "좌회전",
            Movement::StraightLeft => "직좌",
            Movement::Pedestrian => "보행",
        }
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
