//! Green-wave offset optimization
//!
//! Given a corridor of intersections sharing one cycle and a travel speed,
//! the optimizer generates candidate offset assignments, scores each one by
//! forward and reverse bandwidth, and ranks the pool three ways:
//!
//! - **Forward**: forward bandwidth first, total as tie-break
//! - **Reverse**: reverse bandwidth first, total as tie-break
//! - **Balanced**: total first, the weaker direction as tie-break
//!
//! Each ranking drops repeated offset tuples before keeping the top entries.

pub mod candidates;
pub mod scoring;
pub mod signal;

pub use candidates::{CandidateGenerator, CandidateSource, RawCandidate};
pub use scoring::{score_forward, score_reverse};
pub use signal::{signal_state, Light, SignalState, DEFAULT_YELLOW_S};

use crate::config::OptimizerConfig;
use crate::types::{Result, SignalTimingError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

/// One signalized intersection along the corridor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    pub id: u32,
    pub name: String,
    /// Cycle length in seconds
    pub cycle: u32,
    /// Start of the main green within the cycle
    pub offset: u32,
    /// Main green in seconds
    pub green: f64,
    /// Meters from the first intersection
    pub distance: f64,
}

impl Intersection {
    pub fn new(id: u32, name: impl Into<String>, cycle: u32, offset: u32, green: f64, distance: f64) -> Self {
        Self {
            id,
            name: name.into(),
            cycle,
            offset,
            green,
            distance,
        }
    }
}

/// A scored candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OffsetCandidate {
    pub offsets: Vec<u32>,
    pub source: CandidateSource,
    pub fwd_score: f64,
    pub rev_score: f64,
    pub total_score: f64,
}

impl OffsetCandidate {
    fn weaker(&self) -> f64 {
        self.fwd_score.min(self.rev_score)
    }
}

/// Ranking criterion of a scenario group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    Forward,
    Reverse,
    Balanced,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [ScenarioKind::Forward, ScenarioKind::Reverse, ScenarioKind::Balanced];

    pub fn label(&self) -> &'static str {
        match self {
            ScenarioKind::Forward => "정방향 최적",
            ScenarioKind::Reverse => "역방향 최적",
            ScenarioKind::Balanced => "양방향 균형",
        }
    }

    /// Best-first ordering of two candidates under this criterion
    pub fn compare(&self, a: &OffsetCandidate, b: &OffsetCandidate) -> Ordering {
        match self {
            ScenarioKind::Forward => b
                .fwd_score
                .total_cmp(&a.fwd_score)
                .then_with(|| b.total_score.total_cmp(&a.total_score)),
            ScenarioKind::Reverse => b
                .rev_score
                .total_cmp(&a.rev_score)
                .then_with(|| b.total_score.total_cmp(&a.total_score)),
            ScenarioKind::Balanced => b
                .total_score
                .total_cmp(&a.total_score)
                .then_with(|| b.weaker().total_cmp(&a.weaker())),
        }
    }

    /// The score this ranking sorts on first
    pub fn key(&self, candidate: &RankedCandidate) -> f64 {
        match self {
            ScenarioKind::Forward => candidate.fwd_score,
            ScenarioKind::Reverse => candidate.rev_score,
            ScenarioKind::Balanced => candidate.total_score,
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One entry of a scenario group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    /// 1-based
    pub rank: usize,
    pub offsets: Vec<u32>,
    pub fwd_score: f64,
    pub rev_score: f64,
    pub total_score: f64,
}

impl RankedCandidate {
    /// Copy of the corridor with this candidate's offsets applied
    pub fn apply_to(&self, corridor: &[Intersection]) -> Vec<Intersection> {
        corridor
            .iter()
            .zip(&self.offsets)
            .map(|(inter, &offset)| Intersection {
                offset,
                ..inter.clone()
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    pub kind: ScenarioKind,
    pub label: String,
    pub items: Vec<RankedCandidate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    pub speed_kmh: f64,
    pub cycle: u32,
    /// Forward, reverse and balanced, in that order
    pub scenarios: Vec<Scenario>,
    pub candidates_evaluated: usize,
}

impl OptimizationResult {
    pub fn scenario(&self, kind: ScenarioKind) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.kind == kind)
    }
}

/// Offset optimizer
#[derive(Debug, Clone, Default)]
pub struct OffsetOptimizer {
    config: OptimizerConfig,
}

impl OffsetOptimizer {
    /// Optimizer with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Optimizer with a custom configuration, validated up front
    pub fn with_config(config: OptimizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Search offsets for `corridor` at `speed_kmh`
    ///
    /// # Errors
    /// Fewer than 2 intersections, a zero cycle, intersections with
    /// different cycles, a speed that is not a positive finite number, or
    /// distances that are not finite and non-decreasing.
    ///
    /// # Example
    /// ```
    /// use signal_timing::{Intersection, OffsetOptimizer, ScenarioKind};
    ///
    /// let corridor = vec![
    ///     Intersection::new(1, "A", 100, 0, 60.0, 0.0),
    ///     Intersection::new(2, "B", 100, 0, 60.0, 300.0),
    /// ];
    /// let result = OffsetOptimizer::new().optimize(&corridor, 36.0).unwrap();
    /// let best = &result.scenario(ScenarioKind::Forward).unwrap().items[0];
    /// assert_eq!(best.fwd_score, 60.0);
    /// ```
    pub fn optimize(&self, corridor: &[Intersection], speed_kmh: f64) -> Result<OptimizationResult> {
        Self::check_corridor(corridor, speed_kmh)?;
        self.config.validate()?;

        let cycle = corridor[0].cycle;
        let speed_mps = speed_kmh * 1000.0 / 3600.0;
        log::info!(
            "Optimizing {} intersections, cycle {}s, {} km/h",
            corridor.len(),
            cycle,
            speed_kmh
        );

        let generator = CandidateGenerator::new(corridor, speed_mps, &self.config.blend_weights);
        log::debug!("Generating {} candidates", generator.total());
        let mut raw: Vec<RawCandidate> = Vec::with_capacity(generator.total());
        raw.extend(generator);
        let scored = self.score_all(corridor, raw, speed_mps);
        log::debug!("Scored {} candidates", scored.len());

        let scenarios = ScenarioKind::ALL
            .iter()
            .map(|&kind| Scenario {
                kind,
                label: kind.label().to_string(),
                items: rank(&scored, kind, self.config.top_n),
            })
            .collect();

        Ok(OptimizationResult {
            speed_kmh,
            cycle,
            scenarios,
            candidates_evaluated: scored.len(),
        })
    }

    fn score_all(&self, corridor: &[Intersection], raw: Vec<RawCandidate>, speed_mps: f64) -> Vec<OffsetCandidate> {
        let resolution = self.config.resolution_s;
        let score = |c: RawCandidate| {
            let fwd = scoring::score_forward_with(corridor, &c.offsets, speed_mps, resolution);
            let rev = scoring::score_reverse_with(corridor, &c.offsets, speed_mps, resolution);
            OffsetCandidate {
                offsets: c.offsets,
                source: c.source,
                fwd_score: fwd,
                rev_score: rev,
                total_score: fwd + rev,
            }
        };

        // Both paths keep generation order, so rankings do not depend on the pool
        if self.config.parallel {
            raw.into_par_iter().map(score).collect()
        } else {
            raw.into_iter().map(score).collect()
        }
    }

    fn check_corridor(corridor: &[Intersection], speed_kmh: f64) -> Result<()> {
        if corridor.len() < 2 {
            return Err(SignalTimingError::TooFewIntersections(corridor.len()));
        }
        if !(speed_kmh.is_finite() && speed_kmh > 0.0) {
            return Err(SignalTimingError::InvalidSpeed(speed_kmh));
        }

        let cycle = corridor[0].cycle;
        if cycle == 0 {
            return Err(SignalTimingError::ZeroCycle);
        }
        if let Some((index, inter)) = corridor.iter().enumerate().find(|(_, i)| i.cycle != cycle) {
            return Err(SignalTimingError::CycleMismatch {
                index,
                expected: cycle,
                found: inter.cycle,
            });
        }

        let mut previous = f64::NEG_INFINITY;
        for (index, inter) in corridor.iter().enumerate() {
            if !inter.distance.is_finite() || inter.distance < previous {
                return Err(SignalTimingError::UnorderedDistances(index));
            }
            previous = inter.distance;
        }
        Ok(())
    }
}

/// Stable sort under `kind`, drop repeated offset tuples, keep `top_n`
fn rank(scored: &[OffsetCandidate], kind: ScenarioKind, top_n: usize) -> Vec<RankedCandidate> {
    let mut order: Vec<&OffsetCandidate> = scored.iter().collect();
    order.sort_by(|a, b| kind.compare(a, b));

    let mut seen: HashSet<&[u32]> = HashSet::new();
    let mut items = Vec::with_capacity(top_n);
    for candidate in order {
        if items.len() == top_n {
            break;
        }
        if !seen.insert(candidate.offsets.as_slice()) {
            continue;
        }
        items.push(RankedCandidate {
            rank: items.len() + 1,
            offsets: candidate.offsets.clone(),
            fwd_score: candidate.fwd_score,
            rev_score: candidate.rev_score,
            total_score: candidate.total_score,
        });
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Vec<Intersection> {
        vec![
            Intersection::new(1, "수청4R", 160, 145, 120.0, 0.0),
            Intersection::new(2, "대천중", 160, 40, 80.0, 214.0),
            Intersection::new(3, "한내초", 160, 130, 131.0, 417.0),
            Intersection::new(4, "흑포", 160, 0, 70.0, 692.0),
        ]
    }

    fn candidate(offsets: Vec<u32>, fwd: f64, rev: f64) -> OffsetCandidate {
        OffsetCandidate {
            offsets,
            source: CandidateSource::Forward,
            fwd_score: fwd,
            rev_score: rev,
            total_score: fwd + rev,
        }
    }

    #[test]
    fn test_rank_dedups_before_truncating() {
        let scored = vec![
            candidate(vec![0, 10], 50.0, 10.0),
            candidate(vec![0, 10], 50.0, 10.0),
            candidate(vec![5, 15], 50.0, 20.0),
            candidate(vec![1, 11], 40.0, 40.0),
            candidate(vec![2, 12], 30.0, 45.0),
        ];

        let fwd = rank(&scored, ScenarioKind::Forward, 3);
        let offsets: Vec<Vec<u32>> = fwd.iter().map(|c| c.offsets.clone()).collect();
        assert_eq!(offsets, vec![vec![5, 15], vec![0, 10], vec![1, 11]]);
        assert_eq!(fwd[2].rank, 3);

        let bal = rank(&scored, ScenarioKind::Balanced, 2);
        assert_eq!(bal[0].offsets, vec![1, 11]);
        assert_eq!(bal[1].offsets, vec![2, 12]);
    }

    #[test]
    fn test_balanced_tie_breaks_on_weaker_direction() {
        let scored = vec![candidate(vec![0, 0], 60.0, 20.0), candidate(vec![1, 1], 40.0, 40.0)];
        let bal = rank(&scored, ScenarioKind::Balanced, 3);
        assert_eq!(bal[0].offsets, vec![1, 1]);
    }

    #[test]
    fn test_optimize_corridor() {
        let corridor = corridor();
        let result = OffsetOptimizer::new().optimize(&corridor, 40.0).unwrap();

        assert_eq!(result.scenarios.len(), 3);
        assert_eq!(result.candidates_evaluated, 160 * 5);
        for scenario in &result.scenarios {
            assert!(!scenario.items.is_empty() && scenario.items.len() <= 3);
            for pair in scenario.items.windows(2) {
                assert!(scenario.kind.key(&pair[0]) >= scenario.kind.key(&pair[1]));
                assert_ne!(pair[0].offsets, pair[1].offsets);
            }
            for item in &scenario.items {
                assert_eq!(item.offsets.len(), 4);
                assert!(item.offsets.iter().all(|&o| o < 160));
            }
        }
        assert_eq!(result.scenario(ScenarioKind::Balanced).unwrap().label, "양방향 균형");
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let corridor = corridor();
        let parallel = OffsetOptimizer::new().optimize(&corridor, 50.0).unwrap();
        let sequential = OffsetOptimizer::with_config(OptimizerConfig::new().with_parallel(false))
            .unwrap()
            .optimize(&corridor, 50.0)
            .unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_precondition_errors() {
        let corridor = corridor();
        let optimizer = OffsetOptimizer::new();

        assert!(matches!(
            optimizer.optimize(&corridor[..1], 40.0),
            Err(SignalTimingError::TooFewIntersections(1))
        ));
        assert!(matches!(optimizer.optimize(&corridor, 0.0), Err(SignalTimingError::InvalidSpeed(_))));
        assert!(matches!(
            optimizer.optimize(&corridor, f64::INFINITY),
            Err(SignalTimingError::InvalidSpeed(_))
        ));

        let mut zero = corridor.clone();
        for inter in &mut zero {
            inter.cycle = 0;
        }
        assert!(matches!(optimizer.optimize(&zero, 40.0), Err(SignalTimingError::ZeroCycle)));

        let mut mixed = corridor.clone();
        mixed[2].cycle = 120;
        assert!(matches!(
            optimizer.optimize(&mixed, 40.0),
            Err(SignalTimingError::CycleMismatch { index: 2, expected: 160, found: 120 })
        ));

        let mut unordered = corridor.clone();
        unordered[3].distance = 100.0;
        assert!(matches!(
            optimizer.optimize(&unordered, 40.0),
            Err(SignalTimingError::UnorderedDistances(3))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(OffsetOptimizer::with_config(OptimizerConfig::new().with_top_n(0)).is_err());
    }

    #[test]
    fn test_apply_to() {
        let corridor = corridor();
        let ranked = RankedCandidate {
            rank: 1,
            offsets: vec![1, 2, 3, 4],
            fwd_score: 0.0,
            rev_score: 0.0,
            total_score: 0.0,
        };
        let applied = ranked.apply_to(&corridor);
        assert_eq!(applied[3].offset, 4);
        assert_eq!(applied[3].name, "흑포");
        assert_eq!(applied[0].green, 120.0);
    }
}
