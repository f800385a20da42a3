//! Bandwidth scoring
//!
//! A departure time `t0` in `[0, cycle)` succeeds when a vehicle leaving at
//! `t0` meets green at every intersection it passes. The bandwidth is the
//! number of successful departures times the sweep step, rounded to 0.1 s.
//! Arrivals exactly at the end of green count as a miss.

use super::Intersection;

/// Sweep step used when no configuration is supplied
pub const DEFAULT_RESOLUTION_S: f64 = 0.5;

/// Forward bandwidth at the default 0.5 s resolution
pub fn score_forward(corridor: &[Intersection], offsets: &[u32], speed_mps: f64) -> f64 {
    score_forward_with(corridor, offsets, speed_mps, DEFAULT_RESOLUTION_S)
}

/// Reverse bandwidth at the default 0.5 s resolution
pub fn score_reverse(corridor: &[Intersection], offsets: &[u32], speed_mps: f64) -> f64 {
    score_reverse_with(corridor, offsets, speed_mps, DEFAULT_RESOLUTION_S)
}

/// Forward bandwidth: intersections in order, travel time `distance / v`
pub fn score_forward_with(corridor: &[Intersection], offsets: &[u32], speed_mps: f64, resolution_s: f64) -> f64 {
    sweep(corridor, resolution_s, |t0| {
        corridor
            .iter()
            .zip(offsets)
            .all(|(inter, &offset)| in_green(inter, offset, t0 + inter.distance / speed_mps))
    })
}

/// Reverse bandwidth: intersections last to first, travel time
/// `(max_distance - distance) / v`
pub fn score_reverse_with(corridor: &[Intersection], offsets: &[u32], speed_mps: f64, resolution_s: f64) -> f64 {
    let max_distance = max_distance(corridor);
    sweep(corridor, resolution_s, |t0| {
        corridor
            .iter()
            .zip(offsets)
            .rev()
            .all(|(inter, &offset)| in_green(inter, offset, t0 + (max_distance - inter.distance) / speed_mps))
    })
}

/// Largest distance along the corridor, negative infinity when empty
pub(crate) fn max_distance(corridor: &[Intersection]) -> f64 {
    corridor.iter().map(|i| i.distance).fold(f64::NEG_INFINITY, f64::max)
}

fn in_green(inter: &Intersection, offset: u32, arrival: f64) -> bool {
    let cycle = inter.cycle as f64;
    (arrival - offset as f64).rem_euclid(cycle) < inter.green
}

fn sweep<F>(corridor: &[Intersection], resolution_s: f64, passes: F) -> f64
where
    F: Fn(f64) -> bool,
{
    let Some(cycle) = corridor.first().map(|i| i.cycle as f64) else {
        return 0.0;
    };
    if cycle <= 0.0 || resolution_s <= 0.0 {
        return 0.0;
    }

    let steps = (cycle / resolution_s).ceil() as usize;
    let hits = (0..steps).filter(|&k| passes(k as f64 * resolution_s)).count();
    round_tenth(hits as f64 * resolution_s)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
