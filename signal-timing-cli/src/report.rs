//! Plain-text reports
//!
//! Each report is a small wrapper implementing `Display`, so it can go to
//! stdout or into a file through the same `write!`.

use signal_timing::dat::{layout, DatImage, Ring};
use signal_timing::{signal_state, DatSummary, Intersection, OptimizationResult};
use std::fmt;
use std::path::Path;

const RULE: &str = "───────────────────────────────────────────────";

/// Full report of one decoded DAT file
pub struct SummaryReport<'a>(pub &'a DatSummary);

impl fmt::Display for SummaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;

        writeln!(f, "═══════════════════════════════════════════════")?;
        writeln!(f, "  {}", s.filename)?;
        writeln!(f, "═══════════════════════════════════════════════")?;
        match (s.intersection_number, &s.intersection_name) {
            (Some(number), Some(name)) => writeln!(f, "  Intersection: #{} {}", number, name)?,
            (None, Some(name)) => writeln!(f, "  Intersection: {}", name)?,
            _ => {}
        }
        writeln!(
            f,
            "  Size:         {} bytes{}",
            s.size,
            if s.expected_size { "" } else { " (non-standard)" }
        )?;
        writeln!(f, "  Format:       {} ({:?})", s.format.format, s.format.confidence)?;
        if let Some(date) = s.format.date_modified {
            writeln!(f, "  Modified:     {}", date)?;
        }
        if let Some(phone) = &s.format.phone {
            writeln!(f, "  Service:      {}", phone)?;
        }
        writeln!(f, "  Manufacturer: {} (name {:?}, year {})", s.manufacturer, s.manufacturer_name, s.year)?;
        writeln!(f, "  Flash:        {:02}h - {:02}h", s.flash.start, s.flash.end)?;
        for warning in &s.format.warnings {
            writeln!(f, "  ⚠️  {}", warning)?;
        }

        writeln!(f, "\nSignal heads")?;
        writeln!(f, "{}", RULE)?;
        for (i, (kind, active)) in s.lsu_types.iter().zip(&s.lsu_active).enumerate() {
            writeln!(f, "  LSU{}  {:<8} {}", i + 1, kind, if *active { "active" } else { "-" })?;
        }

        write_ring(f, "Ring A", &s.image.ring_a, &s.image)?;
        write_ring(f, "Ring B", &s.image.ring_b, &s.image)?;

        writeln!(f, "\nPhases ({})", s.phase_count)?;
        writeln!(f, "{}", RULE)?;
        for phase in &s.phases {
            let heads: Vec<String> = phase.lsus.iter().map(|(head, m)| format!("{}:{}", head, m)).collect();
            writeln!(
                f,
                "  {}  steps {:>2}-{:<2}  {}",
                phase.index + 1,
                phase.start_step,
                phase.end_step,
                heads.join(" ")
            )?;
            if phase.has_pedestrian_timing() {
                writeln!(
                    f,
                    "     ped wait {}s, walk {}s, clear {}s, yellow {}s",
                    phase.ped_wait,
                    phase.ped_green,
                    phase.ped_flash,
                    phase.effective_yellow()
                )?;
            } else {
                writeln!(f, "     green {}s, yellow {}s", phase.green, phase.effective_yellow())?;
            }
        }

        writeln!(f, "\nPeriods ({})", s.periods.len())?;
        writeln!(f, "{}", RULE)?;
        for (i, p) in s.periods.iter().enumerate() {
            let splits: Vec<String> = p.non_zero_splits().iter().map(|v| v.to_string()).collect();
            let flag = if !p.valid() {
                "  INVALID"
            } else if s.review.contains(&i) {
                "  REVIEW"
            } else {
                ""
            };
            writeln!(
                f,
                "  plan {:>2}  {}  cycle {:>3}  offset {:>3}  splits {}{}",
                p.plan + 1,
                p.time,
                p.cycle,
                p.offset,
                splits.join("/"),
                flag
            )?;
        }

        let table = &s.cycle_table;
        writeln!(f, "\nPlan levels ({})", table.plans.levels.len())?;
        writeln!(f, "{}", RULE)?;
        for level in &table.plans.levels {
            let splits: Vec<String> = level.splits.iter().map(|v| v.to_string()).collect();
            writeln!(
                f,
                "  L{:<2} cycle {:>3}  offset {:>3}  {}{}",
                level.level,
                level.cycle,
                level.offset,
                splits.join("/"),
                if level.valid { "" } else { "  INVALID" }
            )?;
        }
        for entry in &table.plans.schedule {
            writeln!(f, "  plan {:>2}  {} -> L{}", entry.plan + 1, entry.time, entry.level)?;
        }

        writeln!(f, "\nCycle table")?;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "  phase  min  max  yellow  ped(wait/walk/clear)")?;
        for c in &table.columns {
            writeln!(
                f,
                "  {:>5}  {:>3}  {:>3}  {:>6}  {}/{}/{}",
                c.phase, c.min_split, c.max_split, c.yellow, c.ped_wait, c.ped_green, c.ped_flash
            )?;
        }
        Ok(())
    }
}

fn write_ring(f: &mut fmt::Formatter<'_>, name: &str, ring: &Ring, image: &DatImage) -> fmt::Result {
    writeln!(f, "\n{}", name)?;
    writeln!(f, "{}", RULE)?;

    let Some(last) = ring.last_non_empty_step() else {
        return writeln!(f, "  (empty)");
    };
    let heads = if ring.uses_extended_heads() {
        layout::STEP_HEADS
    } else {
        layout::LSU_COUNT
    };

    write!(f, "  step")?;
    for head in 0..heads {
        write!(f, " {:>4}", format!("L{}", head + 1))?;
    }
    writeln!(f, "  min  max  eop")?;

    for (index, step) in ring.steps.iter().take(last + 1).enumerate() {
        write!(f, "  {:>4}", index)?;
        for head in 0..heads {
            let pedestrian = image.lsu_type(head).is_some_and(|t| t.is_pedestrian());
            write!(f, " {:>4}", step.signal(head).short_label(pedestrian))?;
        }
        writeln!(
            f,
            "  {:>3}  {:>3}  {}",
            step.min,
            step.max,
            if step.ends_phase() { "*" } else { "" }
        )?;
    }
    Ok(())
}

/// One line of a directory scan
pub struct ScanRow<'a> {
    pub path: &'a Path,
    pub outcome: &'a Result<DatSummary, String>,
}

impl fmt::Display for ScanRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Ok(s) => write!(
                f,
                "{:<40} {:<16} {:<12} {:<18} {:>2} phases {:>2} plans",
                self.path.display(),
                s.intersection_name.as_deref().unwrap_or("-"),
                s.manufacturer.label(),
                s.format.format.to_string(),
                s.phase_count,
                s.plan_count()
            ),
            Err(e) => write!(f, "{:<40} ERROR: {}", self.path.display(), e),
        }
    }
}

/// Scenario groups of an optimization run
pub struct OptimizationReport<'a> {
    pub result: &'a OptimizationResult,
    pub corridor: &'a [Intersection],
}

impl fmt::Display for OptimizationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.corridor.iter().map(|i| i.name.as_str()).collect();
        let current: Vec<String> = self.corridor.iter().map(|i| i.offset.to_string()).collect();

        writeln!(
            f,
            "Corridor: {} ({} s cycle, {} km/h, {} candidates)",
            names.join(" → "),
            self.result.cycle,
            self.result.speed_kmh,
            self.result.candidates_evaluated
        )?;
        writeln!(f, "Current offsets: [{}]", current.join(", "))?;

        for scenario in &self.result.scenarios {
            writeln!(f, "\n{}", scenario.label)?;
            writeln!(f, "{}", RULE)?;
            for item in &scenario.items {
                let offsets: Vec<String> = item.offsets.iter().map(|o| o.to_string()).collect();
                writeln!(
                    f,
                    "  #{}  [{}]  fwd {:.1}s  rev {:.1}s  total {:.1}s",
                    item.rank,
                    offsets.join(", "),
                    item.fwd_score,
                    item.rev_score,
                    item.total_score
                )?;
            }
        }
        Ok(())
    }
}

/// Light of every intersection at one instant
pub struct SignalReport<'a> {
    pub corridor: &'a [Intersection],
    pub time_s: f64,
    pub yellow_s: f64,
}

impl fmt::Display for SignalReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "t = {:.1}s", self.time_s)?;
        for inter in self.corridor {
            let state = signal_state(self.time_s, inter, self.yellow_s);
            writeln!(
                f,
                "  {:<12} {:<6} {:>5.1}s left",
                inter.name, state.light, state.remaining_s
            )?;
        }
        Ok(())
    }
}
