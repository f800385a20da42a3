//! Structured representation of a decoded controller image
//!
//! These are plain value types: the reader builds them once and the analyzers
//! only borrow them.

use super::layout;
use crate::types::SignalCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One time-of-day entry of a day-plan (20 bytes on disk)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimingPlanEntry {
    pub hour: u8,
    pub minute: u8,
    /// Cycle length in seconds, 0 marks an unused slot
    pub cycle: u8,
    pub offset: u8,
    /// (primary, secondary) split bytes per phase slot
    pub splits: [(u8, u8); layout::SPLIT_PAIRS],
}

impl TimingPlanEntry {
    pub fn is_used(&self) -> bool {
        self.cycle != 0
    }

    /// Sum of all 16 split bytes
    pub fn raw_sum(&self) -> u32 {
        self.splits
            .iter()
            .map(|&(primary, secondary)| primary as u32 + secondary as u32)
            .sum()
    }

    /// Primary split value per phase slot
    pub fn primary_splits(&self) -> Vec<u8> {
        self.splits.iter().map(|&(primary, _)| primary).collect()
    }
}

/// One step of a signal ring (19 bytes on disk)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RingStep {
    /// Signal code per head: 0..8 primary heads, 8..16 extended heads
    pub lsu: [u8; layout::STEP_HEADS],
    pub min: u8,
    pub max: u8,
    /// Raw end-of-phase byte, 1 closes a phase
    pub eop: u8,
}

impl RingStep {
    pub fn ends_phase(&self) -> bool {
        self.eop == 1
    }

    pub fn is_empty(&self) -> bool {
        self.lsu.iter().all(|&c| c == 0) && self.min == 0 && self.max == 0 && self.eop == 0
    }

    /// Raw code for a head, 0 (red) for out-of-range heads
    pub fn code(&self, head: usize) -> u8 {
        self.lsu.get(head).copied().unwrap_or(0)
    }

    pub fn signal(&self, head: usize) -> SignalCode {
        SignalCode::from_byte(self.code(head))
    }
}

/// A ring of up to 32 steps
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ring {
    pub steps: Vec<RingStep>,
}

impl Ring {
    pub fn step(&self, index: usize) -> Option<&RingStep> {
        self.steps.get(index)
    }

    /// Index of the last step carrying any data
    pub fn last_non_empty_step(&self) -> Option<usize> {
        self.steps.iter().rposition(|step| !step.is_empty())
    }

    /// Number of steps with the end-of-phase flag set
    pub fn end_of_phase_count(&self) -> usize {
        self.steps.iter().filter(|step| step.ends_phase()).count()
    }

    /// True if any step drives heads 9..16
    pub fn uses_extended_heads(&self) -> bool {
        self.steps
            .iter()
            .any(|step| step.lsu[layout::LSU_COUNT..].iter().any(|&c| c != 0))
    }
}

/// Declared head type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LsuKind {
    /// 0x44
    Vehicle4,
    /// 0x33
    Vehicle3,
    /// 0x88
    Pedestrian,
    Unknown(u8),
}

impl LsuKind {
    pub const VEHICLE_4: u8 = 0x44;
    pub const VEHICLE_3: u8 = 0x33;
    pub const PEDESTRIAN: u8 = 0x88;

    pub fn from_byte(t1: u8) -> Self {
        match t1 {
            Self::VEHICLE_4 => LsuKind::Vehicle4,
            Self::VEHICLE_3 => LsuKind::Vehicle3,
            Self::PEDESTRIAN => LsuKind::Pedestrian,
            other => LsuKind::Unknown(other),
        }
    }

    pub fn label(&self) -> String {
        match self {
            LsuKind::Vehicle4 => "차량4색".to_string(),
            LsuKind::Vehicle3 => "차량3색".to_string(),
            LsuKind::Pedestrian => "보행2색".to_string(),
            LsuKind::Unknown(code) => format!("0x{:x}", code),
        }
    }
}

impl fmt::Display for LsuKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Raw head type record (2 bytes on disk)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LsuTypeRecord {
    pub t1: u8,
    /// Reserved
    pub t2: u8,
}

impl LsuTypeRecord {
    pub fn kind(&self) -> LsuKind {
        LsuKind::from_byte(self.t1)
    }

    pub fn is_pedestrian(&self) -> bool {
        self.t1 == LsuKind::PEDESTRIAN
    }
}

/// Flashing-operation hours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlashSchedule {
    pub start: u16,
    pub end: u16,
}

/// Manufacturer name and year as stored in the image
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManufacturerInfo {
    pub name: String,
    pub year: u16,
}

/// A fully decoded controller image
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatImage {
    /// Size of the source buffer in bytes
    pub size: usize,
    /// 10 day-plans of 8 entries each
    pub day_plans: Vec<Vec<TimingPlanEntry>>,
    pub ring_a: Ring,
    pub ring_b: Ring,
    pub lsu_active: Vec<bool>,
    pub lsu_types: Vec<LsuTypeRecord>,
    pub flash: FlashSchedule,
    pub manufacturer: ManufacturerInfo,
}

impl DatImage {
    /// True if the source buffer had the standard size
    pub fn has_expected_size(&self) -> bool {
        self.size == layout::FILE_SIZE
    }

    /// Declared type record of a head (0-based)
    pub fn lsu_type(&self, head: usize) -> Option<&LsuTypeRecord> {
        self.lsu_types.get(head)
    }

    /// Codes of a head at a step on ring A and ring B
    pub fn codes_at(&self, step: usize, head: usize) -> [u8; 2] {
        let a = self.ring_a.step(step).map_or(0, |s| s.code(head));
        let b = self.ring_b.step(step).map_or(0, |s| s.code(head));
        [a, b]
    }

    /// All used entries, with their (plan, entry) indices
    pub fn used_entries(&self) -> impl Iterator<Item = (usize, usize, &TimingPlanEntry)> + '_ {
        self.day_plans.iter().enumerate().flat_map(|(p, plan)| {
            plan.iter()
                .enumerate()
                .filter(|(_, entry)| entry.is_used())
                .map(move |(e, entry)| (p, e, entry))
        })
    }
}
