//! Cycle-table aggregates for reporting
//!
//! One column per reconstructed phase: the shortest and longest split seen at
//! that phase slot across all periods, the yellow time and the pedestrian
//! timings. The plan levels and time-of-day schedule ride along so a report
//! can be rendered from this one structure.

use super::periods::Period;
use super::phases::Phase;
use super::plan_table::PlanTable;
use serde::Serialize;

/// Timing column of one phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseColumn {
    /// 1-based phase number
    pub phase: usize,
    /// Smallest positive split at this slot, 0 when no period uses it
    pub min_split: u8,
    pub max_split: u8,
    pub yellow: u8,
    pub ped_wait: u8,
    pub ped_green: u8,
    pub ped_flash: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleTable {
    pub columns: Vec<PhaseColumn>,
    pub plans: PlanTable,
}

impl CycleTable {
    pub fn build(phases: &[Phase], periods: &[Period]) -> Self {
        let columns = phases
            .iter()
            .enumerate()
            .map(|(slot, phase)| {
                let at_slot = || periods.iter().filter_map(move |p| p.splits.get(slot).copied());
                PhaseColumn {
                    phase: slot + 1,
                    min_split: at_slot().filter(|&v| v > 0).min().unwrap_or(0),
                    max_split: at_slot().max().unwrap_or(0),
                    yellow: phase.effective_yellow(),
                    ped_wait: phase.ped_wait,
                    ped_green: phase.ped_green,
                    ped_flash: phase.ped_flash,
                }
            })
            .collect();

        CycleTable {
            columns,
            plans: PlanTable::build(periods),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dat::TimingPlanEntry;
    use std::collections::BTreeMap;

    fn phase(index: usize, yellow: u8, ped: (u8, u8, u8)) -> Phase {
        Phase {
            index,
            start_step: index * 4,
            end_step: index * 4 + 3,
            lsus: BTreeMap::new(),
            green: 0,
            ped_wait: ped.0,
            ped_green: ped.1,
            ped_flash: ped.2,
            yellow,
        }
    }

    fn period(cycle: u8, primaries: &[u8]) -> Period {
        let mut raw = TimingPlanEntry {
            cycle,
            ..Default::default()
        };
        for (slot, &v) in primaries.iter().enumerate() {
            raw.splits[slot] = (v, v);
        }
        Period::from_entry(0, 0, &raw)
    }

    #[test]
    fn test_columns_aggregate_across_periods() {
        let phases = vec![phase(0, 4, (0, 0, 0)), phase(1, 0, (1, 15, 10))];
        let periods = vec![period(120, &[70, 50]), period(140, &[90, 0]), period(100, &[60, 40])];

        let table = CycleTable::build(&phases, &periods);
        assert_eq!(table.columns.len(), 2);

        let first = &table.columns[0];
        assert_eq!((first.min_split, first.max_split), (60, 90));
        assert_eq!(first.yellow, 4);

        let second = &table.columns[1];
        assert_eq!((second.min_split, second.max_split), (40, 50));
        assert_eq!(second.yellow, 3);
        assert_eq!((second.ped_wait, second.ped_green, second.ped_flash), (1, 15, 10));

        assert_eq!(table.plans.levels.len(), 3);
    }

    #[test]
    fn test_unused_slot_reports_zero() {
        let phases = vec![phase(0, 3, (0, 0, 0))];
        let table = CycleTable::build(&phases, &[]);
        assert_eq!(table.columns[0].min_split, 0);
        assert_eq!(table.columns[0].max_split, 0);
        assert!(table.plans.levels.is_empty());
    }
}
