//! Signal state of one intersection at a point in time

use super::Intersection;
use serde::Serialize;
use std::fmt;

/// Yellow interval following the main green
pub const DEFAULT_YELLOW_S: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Light {
    Green,
    Yellow,
    Red,
}

impl fmt::Display for Light {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Light::Green => "green",
            Light::Yellow => "yellow",
            Light::Red => "red",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalState {
    pub light: Light,
    /// Seconds until the light changes
    pub remaining_s: f64,
}

/// Light shown at `time_s` on the main road
///
/// The cycle starts with green at `offset`, followed by `yellow_s` of yellow
/// and red for the rest of the cycle. Both directions of the main road share
/// the same signal, so this serves forward and reverse traffic alike. A zero
/// cycle reports red with nothing remaining.
pub fn signal_state(time_s: f64, intersection: &Intersection, yellow_s: f64) -> SignalState {
    if intersection.cycle == 0 {
        return SignalState {
            light: Light::Red,
            remaining_s: 0.0,
        };
    }

    let cycle = intersection.cycle as f64;
    let green = intersection.green;
    let t = (time_s - intersection.offset as f64).rem_euclid(cycle);

    if t < green {
        SignalState {
            light: Light::Green,
            remaining_s: green - t,
        }
    } else if t < green + yellow_s {
        SignalState {
            light: Light::Yellow,
            remaining_s: green + yellow_s - t,
        }
    } else {
        SignalState {
            light: Light::Red,
            remaining_s: cycle - t,
        }
    }
}
