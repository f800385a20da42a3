//! Plan-table deduplication
//!
//! Periods that share a cycle and the same non-zero split sequence collapse
//! into one numbered "level". The time-of-day schedule then refers to levels
//! instead of repeating split lists.

use super::periods::Period;
use serde::Serialize;
use std::collections::HashMap;

/// One distinct (cycle, splits) combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanLevel {
    /// 1-based level number, in first-seen order
    pub level: usize,
    pub cycle: u8,
    /// Offset of the first period seen with this level
    pub offset: u8,
    pub splits: Vec<u8>,
    pub valid: bool,
}

/// One row of the time-of-day schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeOfDayEntry {
    pub plan: usize,
    pub time: String,
    pub level: usize,
}

/// Deduplicated plan levels plus the schedule that uses them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanTable {
    pub levels: Vec<PlanLevel>,
    pub schedule: Vec<TimeOfDayEntry>,
}

impl PlanTable {
    pub fn build(periods: &[Period]) -> Self {
        let mut table = PlanTable::default();
        let mut by_key: HashMap<String, usize> = HashMap::new();

        for period in periods {
            let next_level = table.levels.len() + 1;
            let level = *by_key.entry(period.level_key()).or_insert_with(|| {
                table.levels.push(PlanLevel {
                    level: next_level,
                    cycle: period.cycle,
                    offset: period.offset,
                    splits: period.non_zero_splits(),
                    valid: period.valid(),
                });
                next_level
            });

            table.schedule.push(TimeOfDayEntry {
                plan: period.plan,
                time: period.time.clone(),
                level,
            });
        }

        log::debug!(
            "Plan table: {} levels from {} periods",
            table.levels.len(),
            periods.len()
        );
        table
    }

    pub fn level(&self, level: usize) -> Option<&PlanLevel> {
        level.checked_sub(1).and_then(|i| self.levels.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dat::TimingPlanEntry;

    fn period(plan: usize, hour: u8, cycle: u8, offset: u8, primaries: &[u8]) -> Period {
        let mut raw = TimingPlanEntry {
            hour,
            cycle,
            offset,
            ..Default::default()
        };
        for (slot, &v) in primaries.iter().enumerate() {
            raw.splits[slot] = (v, v);
        }
        Period::from_entry(plan, 0, &raw)
    }

    #[test]
    fn test_levels_dedup_by_cycle_and_splits() {
        let periods = vec![
            period(0, 0, 120, 5, &[60, 60]),
            period(0, 7, 160, 20, &[80, 50, 30]),
            period(0, 10, 120, 40, &[60, 0, 60]),
            period(1, 0, 160, 0, &[80, 50, 30]),
        ];
        let table = PlanTable::build(&periods);

        assert_eq!(table.levels.len(), 2);
        assert_eq!(table.levels[0].offset, 5);
        assert_eq!(table.levels[0].splits, vec![60, 60]);
        assert_eq!(table.levels[1].level, 2);
        assert!(table.levels[1].valid);

        let levels: Vec<usize> = table.schedule.iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![1, 2, 1, 2]);
        assert_eq!(table.schedule[1].time, "07:00");
    }

    #[test]
    fn test_same_splits_different_cycle_are_distinct() {
        let periods = vec![period(0, 0, 120, 0, &[60, 60]), period(0, 6, 121, 0, &[60, 60])];
        let table = PlanTable::build(&periods);
        assert_eq!(table.levels.len(), 2);
        assert!(!table.levels[1].valid);
        assert_eq!(table.level(2).map(|l| l.cycle), Some(121));
        assert!(table.level(0).is_none());
    }
}
