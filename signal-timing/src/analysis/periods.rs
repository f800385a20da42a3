//! Time-of-day period extraction
//!
//! Flattens the 10 x 8 timing-plan entries into periods. Only the primary
//! byte of each split pair is reported as the phase split; the full 16-byte
//! sum is kept for validation, since two historical encodings exist:
//!
//! - **Dual-ring**: all 16 bytes sum to twice the cycle
//! - **Single-ring**: all 16 bytes sum to the cycle
//!
//! Both count as valid. When the entry is valid but the primary splits alone
//! do not add up to the cycle, the two readings disagree about the reported
//! splits and the period is flagged for manual review.

use crate::dat::{DatImage, TimingPlanEntry};
use chrono::NaiveTime;
use serde::Serialize;

/// Which encoding the split bytes follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitEncoding {
    DualRing,
    SingleRing,
    Invalid,
}

/// One time-of-day period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Period {
    /// Day-plan index (0..10)
    pub plan: usize,
    /// Entry index within the day-plan (0..8)
    pub entry: usize,
    pub hour: u8,
    pub minute: u8,
    /// "HH:MM"
    pub time: String,
    pub cycle: u8,
    pub offset: u8,
    /// Primary split per phase slot, all 8 slots including zeros
    pub splits: Vec<u8>,
    /// Sum of all 16 split bytes
    pub raw_sum: u32,
}

impl Period {
    pub fn from_entry(plan: usize, entry: usize, raw: &TimingPlanEntry) -> Self {
        Self {
            plan,
            entry,
            hour: raw.hour,
            minute: raw.minute,
            time: format!("{:02}:{:02}", raw.hour, raw.minute),
            cycle: raw.cycle,
            offset: raw.offset,
            splits: raw.primary_splits(),
            raw_sum: raw.raw_sum(),
        }
    }

    /// Start time, `None` when the stored hour or minute is out of range
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour as u32, self.minute as u32, 0)
    }

    pub fn non_zero_splits(&self) -> Vec<u8> {
        self.splits.iter().copied().filter(|&v| v > 0).collect()
    }

    pub fn primary_sum(&self) -> u32 {
        self.splits.iter().map(|&v| v as u32).sum()
    }

    pub fn split_encoding(&self) -> SplitEncoding {
        let cycle = self.cycle as u32;
        if self.raw_sum == cycle * 2 {
            SplitEncoding::DualRing
        } else if self.raw_sum == cycle {
            SplitEncoding::SingleRing
        } else {
            SplitEncoding::Invalid
        }
    }

    /// `raw_sum == cycle` or `raw_sum == cycle * 2`
    pub fn valid(&self) -> bool {
        self.split_encoding() != SplitEncoding::Invalid
    }

    /// Valid, but the reported primary splits do not sum to the cycle
    pub fn needs_review(&self) -> bool {
        self.valid() && self.primary_sum() != self.cycle as u32
    }

    /// Plan-table dedup key: cycle and non-zero splits
    pub fn level_key(&self) -> String {
        let splits: Vec<String> = self.non_zero_splits().iter().map(|v| v.to_string()).collect();
        format!("{}:{}", self.cycle, splits.join(","))
    }
}

/// Period extractor
pub struct PeriodExtractor;

impl PeriodExtractor {
    /// Extract every used entry (cycle != 0) in plan/entry order
    pub fn extract(image: &DatImage) -> Vec<Period> {
        let periods: Vec<Period> = image
            .used_entries()
            .map(|(plan, entry, raw)| Period::from_entry(plan, entry, raw))
            .collect();

        for period in &periods {
            if !period.valid() {
                log::warn!(
                    "Plan {} entry {} ({}): split sum {} matches neither cycle {} nor 2x cycle",
                    period.plan,
                    period.entry,
                    period.time,
                    period.raw_sum,
                    period.cycle
                );
            } else if period.needs_review() {
                log::warn!(
                    "Plan {} entry {} ({}): {:?} split sum valid but primary splits sum to {} (cycle {})",
                    period.plan,
                    period.entry,
                    period.time,
                    period.split_encoding(),
                    period.primary_sum(),
                    period.cycle
                );
            }
        }

        log::debug!("Extracted {} periods", periods.len());
        periods
    }
}
