use crate::core::assembly::grid::GridPlanner;
use crate::core::models::window::Window;
use itertools::{Itertools, iproduct};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

/// The windows one assembly pass will run, and the offset pairs they were tiled from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropPlan {
    pub window_size: usize,
    /// Distinct `(start_i, start_j)` pairs; the first `coverage_pairs` come from the
    /// coverage offset set, the rest were drawn from the fallback pool.
    pub offset_pairs: Vec<(usize, usize)>,
    pub coverage_pairs: usize,
    pub windows: Vec<Window>,
}

impl CropPlan {
    #[inline]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// Candidate starts for offset pairs: the coverage offsets plus every start in
/// `[0, min(S/2, L))`.
fn offset_pool(coverage: &[usize], domain_length: usize, window_size: usize) -> Vec<usize> {
    let fallback_end = (window_size / 2).min(domain_length);
    coverage
        .iter()
        .copied()
        .chain(0..fallback_end)
        .sorted_unstable()
        .dedup()
        .collect()
}

/// Upper bound on the number of distinct offset pairs [`plan_crops`] can return.
pub fn max_offset_pairs(domain_length: usize, window_size: usize) -> usize {
    let planner = GridPlanner::new(window_size);
    let coverage = planner.coverage_offsets(domain_length);
    offset_pool(coverage, domain_length, window_size).len().pow(2)
}

/// Row-major tiling from one offset pair: `i` then `j`, each stepping by the window
/// size while below the domain length.
pub fn tile(
    start: (usize, usize),
    domain_length: usize,
    window_size: usize,
) -> impl Iterator<Item = Window> {
    iproduct!(
        (start.0..domain_length).step_by(window_size),
        (start.1..domain_length).step_by(window_size)
    )
    .map(move |(i, j)| Window::new(i, j, window_size))
}

/// Chooses up to `target_pair_count` distinct offset pairs and tiles them into windows.
///
/// Pairs drawn from the coverage offsets come first; when they fall short of the target
/// the remainder is sampled without replacement from the fallback pool. The pair count
/// is capped at [`max_offset_pairs`], so a target larger than the pool yields every
/// available pair rather than looping.
#[instrument(level = "debug", skip(rng))]
pub fn plan_crops(
    domain_length: usize,
    window_size: usize,
    target_pair_count: usize,
    rng: &mut impl Rng,
) -> CropPlan {
    let planner = GridPlanner::new(window_size);
    let coverage = planner.coverage_offsets(domain_length);

    let mut offset_pairs: Vec<(usize, usize)> =
        iproduct!(coverage.iter().copied(), coverage.iter().copied()).collect();
    offset_pairs.shuffle(rng);
    offset_pairs.truncate(target_pair_count);
    let coverage_pairs = offset_pairs.len();

    let wanted = target_pair_count - coverage_pairs;
    if wanted > 0 {
        let chosen: HashSet<(usize, usize)> = offset_pairs.iter().copied().collect();
        let pool = offset_pool(coverage, domain_length, window_size);
        let mut remaining: Vec<(usize, usize)> =
            iproduct!(pool.iter().copied(), pool.iter().copied())
                .filter(|pair| !chosen.contains(pair))
                .collect();

        if remaining.len() < wanted {
            warn!(
                requested = target_pair_count,
                available = coverage_pairs + remaining.len(),
                "Fewer distinct offset pairs exist than requested; using all of them."
            );
        }
        let take = wanted.min(remaining.len());
        let (picked, _) = remaining.partial_shuffle(rng, take);
        offset_pairs.extend_from_slice(picked);
    }

    let windows: Vec<Window> = offset_pairs
        .iter()
        .flat_map(|&pair| tile(pair, domain_length, window_size))
        .collect();

    debug!(
        coverage_pairs,
        offset_pairs = offset_pairs.len(),
        windows = windows.len(),
        "Crop plan ready."
    );

    CropPlan {
        window_size,
        offset_pairs,
        coverage_pairs,
        windows,
    }
}
