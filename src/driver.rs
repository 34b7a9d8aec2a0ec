//! The annealing driver: the propose/evaluate/accept/commit loop from
//! spec.md §4, grounded on `areapath_t::optimize()` in the original.
use tracing::{debug, info, span, Level};

use crate::config::constant::{RECOMPUTE_PERIOD, TN};
use crate::deadline::DeadlineHandle;
use crate::domain::CostMatrix;
use crate::rng::Rng;
use crate::tour::TourState;

/// `ln(2^32 - 1)`, the additive constant the reshaped Metropolis rule
/// needs so the comparison never calls `exp()`.
const LN_U32_MAX: f64 = 22.180_709_777_919_91;

pub struct DriverConfig {
    pub seed: u64,
    pub t_last: f64,
    pub worker_count: usize,
}

/// Runs one worker's annealing loop to the deadline and returns the best
/// tour (by cost) it found, alongside that cost.
pub fn anneal_one(
    mut tour: TourState,
    matrix: &CostMatrix,
    t_last: f64,
    seed: u64,
    deadline: &DeadlineHandle,
) -> (TourState, u32) {
    let _span = span!(Level::DEBUG, "anneal", seed).entered();

    let mut rng = Rng::seeded(seed);
    let mut current_cost = tour.cost(matrix) as i64;
    let mut best_cost = current_cost;
    let mut best_snapshot = clone_day_to_area(&tour);

    let p_max = matrix.max_observed_price().max(1) as f64;
    let mut temperature = recompute_temperature(t_last, 0);
    let mut iter: u64 = 0;

    loop {
        if iter % RECOMPUTE_PERIOD == 0 {
            temperature = recompute_temperature(t_last, iter);
        }
        if deadline.expired() {
            break;
        }

        let draw = rng.draw();
        let candidate = tour.best_move(matrix, draw);

        if accept(candidate.delta, temperature, p_max, draw.accept_raw32) {
            tour.commit(candidate);
            current_cost += candidate.delta as i64;

            if current_cost < best_cost {
                best_cost = current_cost;
                best_snapshot = clone_day_to_area(&tour);
            }
        }

        iter += 1;
    }

    debug!(iterations = iter, best_cost, "worker finished");

    (restore(tour, best_snapshot), best_cost as u32)
}

/// `T = exp(ln(T_last) * (iter / Tn)^0.3)`, recomputed every
/// [`RECOMPUTE_PERIOD`] iterations. At `iter == 0` this is `exp(0) == 1.0`
/// — the schedule starts hot and decays toward `t_last`, never the other
/// way around.
fn recompute_temperature(t_last: f64, iter: u64) -> f64 {
    let ratio = (iter as f64 / TN).powf(0.3);
    (t_last.ln() * ratio).exp()
}

/// The reshaped Metropolis rule from spec.md §4.6: accepts unconditionally
/// improving moves, and otherwise accepts iff
/// `ln(rnd) <= -delta/(T*p_max) + ln(2^32-1)`, with `rnd` drawn uniformly
/// from `[0, 2^32)` (a draw of exactly 0 always accepts, since `ln(0) =
/// -inf`).
fn accept(delta: i32, temperature: f64, p_max: f64, rnd: u32) -> bool {
    if delta <= 0 {
        return true;
    }
    if rnd == 0 {
        return true;
    }
    let lhs = (rnd as f64).ln();
    let rhs = -(delta as f64) / (temperature * p_max) + LN_U32_MAX;
    lhs <= rhs
}

fn clone_day_to_area(tour: &TourState) -> Vec<u16> {
    tour.day_to_area().to_vec()
}

/// Rebuilds a `TourState`'s day/area permutation from a saved snapshot.
/// Used to roll a worker back to its best-seen tour once the deadline
/// fires, since we only keep the one running `TourState` in memory.
fn restore(mut tour: TourState, snapshot: Vec<u16>) -> TourState {
    tour.restore_day_to_area(snapshot);
    tour
}

/// Runs `config.worker_count` independent annealing workers to the
/// deadline (via `rayon::scope`, mirroring spec.md §4.8's "optional
/// independent-worker fan-out") and returns the best of their results.
pub fn run_workers(
    build_tour: impl Fn(u64) -> TourState + Sync,
    matrix: &CostMatrix,
    config: &DriverConfig,
    deadline: &DeadlineHandle,
) -> (TourState, u32) {
    let _span = span!(Level::INFO, "run_workers", workers = config.worker_count).entered();

    let mut results: Vec<Option<(TourState, u32)>> = (0..config.worker_count).map(|_| None).collect();

    rayon::scope(|scope| {
        for (idx, slot) in results.iter_mut().enumerate() {
            let seed = config.seed.wrapping_add(idx as u64);
            let tour = build_tour(seed);
            scope.spawn(move |_| {
                *slot = Some(anneal_one(tour, matrix, config.t_last, seed, deadline));
            });
        }
    });

    let best = results
        .into_iter()
        .flatten()
        .min_by_key(|(_, cost)| *cost)
        .expect("at least one worker must run");

    info!(best_cost = best.1, "annealing complete");
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_delta_always_accepts() {
        assert!(accept(0, 0.001, 100.0, 12345));
        assert!(accept(-5, 0.001, 100.0, 0));
    }

    #[test]
    fn zero_draw_always_accepts() {
        assert!(accept(1000, 0.0001, 1.0, 0));
    }

    #[test]
    fn high_temperature_accepts_more_than_low_temperature() {
        let delta = 50;
        let p_max = 100.0;
        let rnd = u32::MAX / 2;
        let hot = accept(delta, 1.0, p_max, rnd);
        let cold = accept(delta, 0.0001, p_max, rnd);
        assert!(hot);
        assert!(!cold);
    }

    #[test]
    fn temperature_starts_hot_at_iteration_zero() {
        assert_eq!(recompute_temperature(0.005, 0), 1.0);
    }

    #[test]
    fn temperature_decreases_as_iterations_grow() {
        let t1 = recompute_temperature(0.005, 512);
        let t2 = recompute_temperature(0.005, 512 * 1000);
        assert!(t2 < t1);
    }
}
