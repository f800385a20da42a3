//! Phase reconstruction from the ring step tables
//!
//! Ring A's end-of-phase flags cut the step sequence into phases. Within each
//! phase every primary head is classified by the codes it shows on either
//! ring:
//!
//! - `0x10` anywhere marks a straight movement
//! - `0x01` marks a left turn, or the walk light on a pedestrian head
//! - `0x05` marks pedestrian clearance (pedestrian heads only)
//!
//! Whether a head is pedestrian is decided in two stages: the declared type
//! byte (0x88), then a code pattern (`0x01` followed by `0x05` within the
//! phase). Some controllers store unreliable type bytes, so the pattern can
//! promote a head the type table calls a vehicle head.

use crate::dat::{layout, DatImage};
use crate::types::{Movement, SignalCode};
use serde::Serialize;
use std::collections::BTreeMap;

/// Yellow time reported when a phase's EOP step stores 0
pub const DEFAULT_YELLOW_S: u8 = 3;

/// Steps in a phase that carries pedestrian timing (wait, walk, clearance, EOP)
const PEDESTRIAN_PHASE_STEPS: usize = 4;

/// One reconstructed phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phase {
    /// 0-based position in the phase sequence
    pub index: usize,
    /// First step (inclusive)
    pub start_step: usize,
    /// Step carrying the EOP flag (inclusive)
    pub end_step: usize,
    /// Movement per head (1-based); heads without a movement are omitted
    pub lsus: BTreeMap<u8, Movement>,
    pub green: u8,
    pub ped_wait: u8,
    pub ped_green: u8,
    pub ped_flash: u8,
    /// Raw min of the EOP step
    pub yellow: u8,
}

impl Phase {
    pub fn step_count(&self) -> usize {
        self.end_step - self.start_step + 1
    }

    pub fn has_pedestrian_timing(&self) -> bool {
        self.step_count() == PEDESTRIAN_PHASE_STEPS
    }

    /// Yellow time with the 3 s default applied
    pub fn effective_yellow(&self) -> u8 {
        if self.yellow == 0 {
            DEFAULT_YELLOW_S
        } else {
            self.yellow
        }
    }

    pub fn movement(&self, head: u8) -> Option<Movement> {
        self.lsus.get(&head).copied()
    }
}

/// Per-head code observations within one phase
#[derive(Debug, Default, Clone, Copy)]
struct HeadObservation {
    straight: bool,
    left: bool,
    ped_green: bool,
    ped_flash: bool,
}

impl HeadObservation {
    fn movement(&self) -> Option<Movement> {
        if self.ped_green || self.ped_flash {
            Some(Movement::Pedestrian)
        } else if self.straight && self.left {
            Some(Movement::StraightLeft)
        } else if self.straight {
            Some(Movement::Straight)
        } else if self.left {
            Some(Movement::Left)
        } else {
            None
        }
    }
}

/// Phase analyzer
pub struct PhaseAnalyzer;

impl PhaseAnalyzer {
    /// Reconstruct all phases of an image
    ///
    /// A ring A without any EOP flag yields no phases.
    pub fn analyze(image: &DatImage) -> Vec<Phase> {
        let mut phases = Vec::new();
        let mut start = 0;

        for (step, ring_step) in image.ring_a.steps.iter().enumerate() {
            if !ring_step.ends_phase() {
                continue;
            }
            phases.push(Self::build_phase(image, phases.len(), start, step));
            start = step + 1;
        }

        log::debug!("Reconstructed {} phases from ring A", phases.len());
        phases
    }

    fn build_phase(image: &DatImage, index: usize, start: usize, end: usize) -> Phase {
        let lsus = (0..layout::LSU_COUNT)
            .filter_map(|head| {
                Self::classify_head(image, head, start, end).map(|movement| ((head + 1) as u8, movement))
            })
            .collect();

        let min_at = |step: usize| image.ring_a.step(step).map_or(0, |s| s.min);
        let step_count = end - start + 1;

        let mut phase = Phase {
            index,
            start_step: start,
            end_step: end,
            lsus,
            green: 0,
            ped_wait: 0,
            ped_green: 0,
            ped_flash: 0,
            yellow: min_at(end),
        };

        if step_count == PEDESTRIAN_PHASE_STEPS {
            phase.ped_wait = min_at(start);
            phase.ped_green = min_at(start + 1);
            phase.ped_flash = min_at(start + 2);
        } else if step_count > 1 && step_count < PEDESTRIAN_PHASE_STEPS {
            phase.green = image.ring_a.step(start).map_or(0, |s| s.max);
        }

        log::trace!(
            "Phase {}: steps {}-{}, {} heads, yellow {}",
            index + 1,
            start,
            end,
            phase.lsus.len(),
            phase.yellow
        );
        phase
    }

    /// Movement of one head (0-based) over steps `start..=end`
    pub fn classify_head(image: &DatImage, head: usize, start: usize, end: usize) -> Option<Movement> {
        let pedestrian = Self::is_pedestrian(image, head, start, end);
        let mut seen = HeadObservation::default();

        for step in start..=end {
            let codes = image.codes_at(step, head);
            if codes.contains(&SignalCode::STRAIGHT_GREEN) {
                seen.straight = true;
            }
            if codes.contains(&SignalCode::LEFT_OR_WALK) {
                if pedestrian {
                    seen.ped_green = true;
                } else {
                    seen.left = true;
                }
            }
            if pedestrian && codes.contains(&SignalCode::FLASH) {
                seen.ped_flash = true;
            }
        }

        seen.movement()
    }

    /// Declared-type check or pattern fallback
    pub fn is_pedestrian(image: &DatImage, head: usize, start: usize, end: usize) -> bool {
        Self::declared_pedestrian(image, head) || Self::pattern_pedestrian(image, head, start, end)
    }

    /// Stage one: the type table says 0x88
    pub fn declared_pedestrian(image: &DatImage, head: usize) -> bool {
        image.lsu_type(head).is_some_and(|t| t.is_pedestrian())
    }

    /// Stage two: a walk code followed by a clearance flash within the phase
    pub fn pattern_pedestrian(image: &DatImage, head: usize, start: usize, end: usize) -> bool {
        let mut saw_walk = false;
        for step in start..=end {
            let codes = image.codes_at(step, head);
            if codes.contains(&SignalCode::LEFT_OR_WALK) {
                saw_walk = true;
            }
            if saw_walk && codes.contains(&SignalCode::FLASH) {
                return true;
            }
        }
        false
    }
}
