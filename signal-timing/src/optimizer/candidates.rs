//! Candidate offset generation
//!
//! For every integer base time in `[0, cycle)` the generator emits the offsets
//! of a pure forward wave, a pure reverse wave and one blend per configured
//! weight. With the default three weights that is five candidates per base.

use super::scoring::max_distance;
use super::Intersection;
use serde::Serialize;

/// How a candidate was derived
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "weight")]
pub enum CandidateSource {
    Forward,
    Reverse,
    Blend(f64),
}

/// Offsets for one base time, before scoring
#[derive(Debug, Clone, PartialEq)]
pub struct RawCandidate {
    pub base: u32,
    pub source: CandidateSource,
    pub offsets: Vec<u32>,
}

/// Lazy sequence of candidates over `base = 0..cycle`
pub struct CandidateGenerator<'a> {
    corridor: &'a [Intersection],
    weights: &'a [f64],
    speed_mps: f64,
    cycle: u32,
    max_distance: f64,
    base: u32,
    pending: Vec<RawCandidate>,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(corridor: &'a [Intersection], speed_mps: f64, weights: &'a [f64]) -> Self {
        Self {
            corridor,
            weights,
            speed_mps,
            cycle: corridor.first().map_or(0, |i| i.cycle),
            max_distance: max_distance(corridor),
            base: 0,
            pending: Vec::new(),
        }
    }

    /// Number of candidates the generator will yield in total
    pub fn total(&self) -> usize {
        self.cycle as usize * (2 + self.weights.len())
    }

    fn fill(&mut self) {
        let base = self.base as f64;
        let forward: Vec<u32> = self
            .corridor
            .iter()
            .map(|i| wrap_round(base + i.distance / self.speed_mps, self.cycle))
            .collect();
        let reverse: Vec<u32> = self
            .corridor
            .iter()
            .map(|i| wrap_round(base + (self.max_distance - i.distance) / self.speed_mps, self.cycle))
            .collect();

        // Pushed in reverse so pop() yields forward, reverse, then blends in weight order
        for &w in self.weights.iter().rev() {
            self.pending.push(RawCandidate {
                base: self.base,
                source: CandidateSource::Blend(w),
                offsets: blend(&forward, &reverse, w, self.cycle),
            });
        }
        self.pending.push(RawCandidate {
            base: self.base,
            source: CandidateSource::Reverse,
            offsets: reverse,
        });
        self.pending.push(RawCandidate {
            base: self.base,
            source: CandidateSource::Forward,
            offsets: forward,
        });
    }
}

impl Iterator for CandidateGenerator<'_> {
    type Item = RawCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pending.is_empty() {
            if self.base >= self.cycle {
                return None;
            }
            self.fill();
            self.base += 1;
        }
        self.pending.pop()
    }
}

/// `round(value mod cycle)`, wrapped again so the result stays below `cycle`
pub fn wrap_round(value: f64, cycle: u32) -> u32 {
    if cycle == 0 {
        return 0;
    }
    let rounded = value.rem_euclid(cycle as f64).round() as u32;
    rounded % cycle
}

/// Move each forward offset toward its reverse counterpart by `weight` of the
/// forward-to-reverse gap, measured forward around the cycle
pub fn blend(forward: &[u32], reverse: &[u32], weight: f64, cycle: u32) -> Vec<u32> {
    forward
        .iter()
        .zip(reverse)
        .map(|(&f, &r)| {
            let gap = (r as f64 - f as f64).rem_euclid(cycle as f64);
            wrap_round(f as f64 + gap * weight, cycle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Vec<Intersection> {
        vec![
            Intersection::new(1, "A", 100, 0, 50.0, 0.0),
            Intersection::new(2, "B", 100, 0, 50.0, 100.0),
            Intersection::new(3, "C", 100, 0, 50.0, 250.0),
        ]
    }

    #[test]
    fn test_wrap_round_stays_in_cycle() {
        assert_eq!(wrap_round(159.6, 160), 0);
        assert_eq!(wrap_round(-0.4, 160), 0);
        assert_eq!(wrap_round(-1.0, 160), 159);
        assert_eq!(wrap_round(172.0, 160), 12);
        assert_eq!(wrap_round(5.0, 0), 0);
    }

    #[test]
    fn test_blend_wraps_through_zero() {
        // Gap from 90 forward to 10 is 20
        assert_eq!(blend(&[90], &[10], 0.5, 100), vec![0]);
        assert_eq!(blend(&[90], &[10], 0.25, 100), vec![95]);
        assert_eq!(blend(&[10], &[30], 0.75, 100), vec![25]);
    }

    #[test]
    fn test_first_base_candidates() {
        let corridor = corridor();
        let weights = [0.25, 0.5, 0.75];
        let first: Vec<RawCandidate> = CandidateGenerator::new(&corridor, 10.0, &weights).take(5).collect();

        assert_eq!(first[0].source, CandidateSource::Forward);
        assert_eq!(first[0].offsets, vec![0, 10, 25]);
        assert_eq!(first[1].source, CandidateSource::Reverse);
        assert_eq!(first[1].offsets, vec![25, 15, 0]);
        assert_eq!(first[2].source, CandidateSource::Blend(0.25));
        assert!(first.iter().all(|c| c.base == 0));
    }

    #[test]
    fn test_reverse_offsets_with_negative_distances() {
        // Same spacing as the 0/100/250 corridor, measured from a point past the end
        let corridor = vec![
            Intersection::new(1, "A", 100, 0, 50.0, -300.0),
            Intersection::new(2, "B", 100, 0, 50.0, -200.0),
            Intersection::new(3, "C", 100, 0, 50.0, -50.0),
        ];
        let weights = [0.5];
        let first: Vec<RawCandidate> = CandidateGenerator::new(&corridor, 10.0, &weights).take(2).collect();

        assert_eq!(first[1].source, CandidateSource::Reverse);
        assert_eq!(first[1].offsets, vec![25, 15, 0]);
    }

    #[test]
    fn test_generator_yields_five_per_base() {
        let corridor = corridor();
        let weights = [0.25, 0.5, 0.75];
        let generator = CandidateGenerator::new(&corridor, 10.0, &weights);
        assert_eq!(generator.total(), 500);

        let all: Vec<RawCandidate> = generator.collect();
        assert_eq!(all.len(), 500);
        assert_eq!(all[499].base, 99);
        assert!(all.iter().flat_map(|c| c.offsets.iter()).all(|&o| o < 100));
    }
}
