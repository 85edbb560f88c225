//! Reward reconciliation and trajectory metrics
//!
//! Pairs each delivered reward with the positioned reward sharing its lure
//! location, then derives the delivery latency and the tortuosity of the
//! path the subject ran between the two events. Events that never find a
//! partner are dropped from the metrics, not reported as anomalies.

use crate::trial::Trial;
use crate::types::{seconds_between, PositionSample, RewardEvent};
use serde::Serialize;

/// One matched positioned/delivered reward pair with its derived metrics
#[derive(Debug, Clone, Serialize)]
pub struct RewardDelivery {
    /// The originating positioned event (Automatic or Manual)
    pub positioned: RewardEvent,
    /// The matching delivery
    pub delivered: RewardEvent,
    /// Delivery timestamp minus positioning timestamp, in seconds
    pub latency_secs: f64,
    /// Path tortuosity between the two events; `None` for degenerate
    /// segments (fewer than two samples or no net displacement)
    pub tortuosity: Option<f64>,
}

/// Match every delivered reward to a prior positioned reward at the same
/// lure location
///
/// Each positioned event is consumed by at most one delivery; when several
/// unconsumed candidates share the location, the earliest wins. Deliveries
/// with no candidate are skipped.
pub fn pair_deliveries(trial: &Trial, tolerance: f64) -> Vec<RewardDelivery> {
    let positioned: Vec<&RewardEvent> = trial.positioned_rewards().collect();
    let mut consumed = vec![false; positioned.len()];
    let mut deliveries = Vec::new();

    for delivered in trial.rewards().iter().filter(|r| r.kind.is_delivered()) {
        let candidate = positioned.iter().enumerate().find(|(i, p)| {
            !consumed[*i]
                && p.timestamp <= delivered.timestamp
                && p.matches_location(delivered, tolerance)
        });

        match candidate {
            Some((i, p)) => {
                consumed[i] = true;
                let segment = trial.samples_in_span(p.timestamp, delivered.timestamp);
                deliveries.push(RewardDelivery {
                    positioned: (*p).clone(),
                    delivered: delivered.clone(),
                    latency_secs: seconds_between(p.timestamp, delivered.timestamp),
                    tortuosity: segment_tortuosity(segment),
                });
            }
            None => {
                log::debug!(
                    "Delivered reward at ({}, {}) has no matching positioned reward",
                    delivered.x,
                    delivered.z
                );
            }
        }
    }

    let unmatched = consumed.iter().filter(|c| !**c).count();
    if unmatched > 0 {
        log::debug!("{} positioned rewards were never delivered", unmatched);
    }

    deliveries
}

/// Tortuosity of a trajectory segment: cumulative path length over
/// straight-line displacement
///
/// Coordinates are shifted into the non-negative quadrant before the
/// distances are taken. At least 1.0 for any segment with net displacement.
pub fn segment_tortuosity(samples: &[PositionSample]) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }

    let min_x = samples.iter().map(|s| s.x).fold(f64::INFINITY, f64::min);
    let min_z = samples.iter().map(|s| s.z).fold(f64::INFINITY, f64::min);
    let points: Vec<(f64, f64)> = samples.iter().map(|s| (s.x - min_x, s.z - min_z)).collect();

    let path_length: f64 = points.windows(2).map(|w| distance(w[0], w[1])).sum();
    let displacement = distance(points[0], points[points.len() - 1]);
    if displacement <= f64::EPSILON {
        return None;
    }

    Some(path_length / displacement)
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = b.0 - a.0;
    let dz = b.1 - a.1;
    (dx * dx + dz * dz).sqrt()
}
