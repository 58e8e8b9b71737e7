//! # Tour planning
//!
//! Chooses which viewing pose to visit for each obstacle and in what order,
//! minimizing total travel cost. Candidate subsets are explored largest-first
//! (so the tour covering every obstacle is always tried before any partial
//! fallback), and each subset's visiting order is solved exactly by a
//! Held-Karp dynamic program over the memoized pairwise costs from
//! [`crate::pathfind::Pathfinder`].

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Serialize;

use crate::arena::viewpoint::ViewSlot;
use crate::consts::{ITERATIONS, UNREACHABLE_COST};
use crate::geometry::{Pose, TaggedPose};
use crate::pathfind::{AbortSignal, Pathfinder};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// One candidate viewing pose for an obstacle, tagged with which slot it was
/// generated from.
pub type Candidate = (ViewSlot, TaggedPose);

/// One obstacle's chosen viewing pose, as selected for a tour.
#[derive(Debug, Clone, Copy)]
pub struct Stop {
    pub obstacle_index: usize,
    pub slot: ViewSlot,
    pub pose: TaggedPose,
}

/// The result of planning a tour: the ordered stops, the concatenated path
/// through them, and the total cost.
#[derive(Debug, Clone)]
pub struct Tour {
    pub stops: Vec<Stop>,
    pub path: Vec<Pose>,
    pub cost: i64,
}

/// Diagnostic record of the tour search, persisted by
/// [`crate::plan::plan`] via `util::session::save_with_timestamp`.
#[derive(Debug, Clone, Serialize)]
pub struct TourReport {
    pub obstacles_requested: usize,
    pub obstacles_visited: usize,
    pub subsets_tried: usize,
    pub best_cost: i64,
}

// ------------------------------------------------------------------------------------------------
// SUBSET ENUMERATION
// ------------------------------------------------------------------------------------------------

/// Every subset of `0..n`, as a bitmask, ordered by descending population
/// count (and then descending numeric value) so the full-coverage tour is
/// always attempted before any smaller fallback.
fn subsets_by_descending_size(n: usize) -> Vec<u32> {
    assert!(n <= 31, "subset enumeration is bitmask-based and caps out at 31 obstacles");
    let total = 1u32 << n;
    let mut masks: Vec<u32> = (0..total).collect();
    masks.sort_by(|a, b| b.count_ones().cmp(&a.count_ones()).then(b.cmp(a)));
    masks
}

fn mask_to_indices(mask: u32, n: usize) -> Vec<usize> {
    (0..n).filter(|i| mask & (1 << i) != 0).collect()
}

// ------------------------------------------------------------------------------------------------
// HELD-KARP EXACT TSP
// ------------------------------------------------------------------------------------------------

/// Exact open-path (no return to start) TSP over `costs`, visiting every
/// index in `indices` starting from `start`, via the classic Held-Karp
/// O(2^k * k^2) dynamic program (the same algorithm
/// `python_tsp.exact.solve_tsp_dynamic_programming` runs).
///
/// Returns `None` if every ordering is unreachable (some pairwise cost is
/// [`UNREACHABLE_COST`] on every possible tour).
fn held_karp(costs: &[Vec<i64>], start: usize, indices: &[usize]) -> Option<(Vec<usize>, i64)> {
    let k = indices.len();
    if k == 0 {
        return Some((Vec::new(), 0));
    }

    // dp[mask][i] = cheapest cost to have visited exactly the stops in `mask`
    // (indices into `indices`), ending at stop `i`, having started at `start`.
    let full = 1usize << k;
    let mut dp = vec![vec![i64::MAX; k]; full];
    let mut parent = vec![vec![usize::MAX; k]; full];

    for i in 0..k {
        let c = costs[start][indices[i]];
        if c < UNREACHABLE_COST {
            dp[1 << i][i] = c;
        }
    }

    for mask in 1..full {
        for i in 0..k {
            if mask & (1 << i) == 0 || dp[mask][i] == i64::MAX {
                continue;
            }
            for j in 0..k {
                if mask & (1 << j) != 0 {
                    continue;
                }
                let step = costs[indices[i]][indices[j]];
                if step >= UNREACHABLE_COST {
                    continue;
                }
                let next_mask = mask | (1 << j);
                let candidate = dp[mask][i] + step;
                if candidate < dp[next_mask][j] {
                    dp[next_mask][j] = candidate;
                    parent[next_mask][j] = i;
                }
            }
        }
    }

    let full_mask = full - 1;
    let (best_i, &best_cost) = dp[full_mask]
        .iter()
        .enumerate()
        .min_by_key(|(_, &c)| c)?;
    if best_cost == i64::MAX {
        return None;
    }

    let mut order = Vec::with_capacity(k);
    let mut mask = full_mask;
    let mut i = best_i;
    loop {
        order.push(indices[i]);
        let prev = parent[mask][i];
        let next_mask = mask & !(1 << i);
        if prev == usize::MAX {
            break;
        }
        mask = next_mask;
        i = prev;
    }
    order.reverse();

    Some((order, best_cost))
}

// ------------------------------------------------------------------------------------------------
// TOUR SEARCH
// ------------------------------------------------------------------------------------------------

/// Plan a tour visiting one pose per obstacle in `candidates` (each entry is
/// that obstacle's list of viewing-pose candidates, cheapest-first), starting
/// from `start`.
///
/// Tries the full-coverage subset first; if every ordering of the full set is
/// infeasible, falls back to the largest subset that Held-Karp can solve,
/// spending at most [`ITERATIONS`] subset-size bands of search. For each
/// subset, every combination of one pose per obstacle is attempted (bounded
/// by the same `ITERATIONS` budget) and the cheapest feasible tour across all
/// combinations wins.
pub fn plan_tour(
    start: Pose,
    candidates: &[Vec<Candidate>],
    pathfinder: &mut Pathfinder,
    abort: &dyn AbortSignal,
) -> (Tour, TourReport) {
    let n = candidates.len();
    // Obstacles with no surviving viewing candidate (a `Direction::None`
    // obstacle, or one whose standoff poses all fell outside the arena) can
    // never be chosen, so subset enumeration ranges only over the obstacles
    // that have at least one: a mask bit that named one of the excluded
    // obstacles would index an empty candidate list and there would be
    // nothing valid to pick.
    let eligible: Vec<usize> = (0..n).filter(|&i| !candidates[i].is_empty()).collect();
    let m = eligible.len();
    let mut subsets_tried = 0usize;
    let mut best: Option<(Vec<usize>, Vec<usize>, i64)> = None; // (obstacle order, per-obstacle pose choice, cost)

    'subsets: for mask in subsets_by_descending_size(m) {
        if mask == 0 {
            continue;
        }
        let indices: Vec<usize> = mask_to_indices(mask, m).into_iter().map(|local| eligible[local]).collect();
        let mut budget = ITERATIONS;

        if let Some(result) =
            search_combinations(start, &indices, candidates, pathfinder, abort, &mut budget)
        {
            subsets_tried += 1;
            best = Some(result);
            break 'subsets;
        }
        subsets_tried += 1;
        if abort.is_aborted() {
            break 'subsets;
        }
    }

    let (order, choices, cost) = best.unwrap_or_else(|| (Vec::new(), Vec::new(), 0));

    let stops: Vec<Stop> = order
        .iter()
        .zip(choices.iter())
        .map(|(&obstacle_index, &choice)| {
            let (slot, pose) = candidates[obstacle_index][choice];
            Stop { obstacle_index, slot, pose }
        })
        .collect();

    let mut path = vec![start];
    let mut cursor = start;
    for stop in &stops {
        let (segment, _) = pathfinder.path_cost(cursor, stop.pose.pose, abort);
        if segment.len() > 1 {
            path.extend(segment.into_iter().skip(1));
        }
        cursor = stop.pose.pose;
    }

    let report = TourReport {
        obstacles_requested: n,
        obstacles_visited: stops.len(),
        subsets_tried,
        best_cost: cost,
    };

    (Tour { stops, path, cost }, report)
}

/// For a fixed obstacle subset, try every combination of one viewing pose per
/// obstacle (cheapest candidate first), solving the visiting order with
/// [`held_karp`] for each, and keep the best. Stops early once `budget`
/// combinations have been examined.
fn search_combinations(
    start: Pose,
    indices: &[usize],
    candidates: &[Vec<Candidate>],
    pathfinder: &mut Pathfinder,
    abort: &dyn AbortSignal,
    budget: &mut usize,
) -> Option<(Vec<usize>, Vec<usize>, i64)> {
    let k = indices.len();
    let mut choice = vec![0usize; k];
    let mut best: Option<(Vec<usize>, Vec<usize>, i64)> = None;

    loop {
        if *budget == 0 || abort.is_aborted() {
            break;
        }
        *budget -= 1;

        let poses: Vec<Pose> = indices.iter().zip(&choice).map(|(&i, &c)| candidates[i][c].1.pose).collect();
        let penalty: i64 = indices.iter().zip(&choice).map(|(&i, &c)| candidates[i][c].1.penalty).sum();

        if let Some((order, travel_cost)) = solve_order(start, &poses, pathfinder, abort) {
            let total = travel_cost + penalty;
            let mapped_order: Vec<usize> = order.iter().map(|&local| indices[local]).collect();
            let mapped_choice: Vec<usize> = order.iter().map(|&local| choice[local]).collect();
            if best.as_ref().map(|(_, _, c)| total < *c).unwrap_or(true) {
                best = Some((mapped_order, mapped_choice, total));
            }
        }

        if !advance(&mut choice, indices, candidates) {
            break;
        }
    }

    best
}

fn advance(choice: &mut [usize], indices: &[usize], candidates: &[Vec<Candidate>]) -> bool {
    for slot in (0..choice.len()).rev() {
        choice[slot] += 1;
        if choice[slot] < candidates[indices[slot]].len() {
            return true;
        }
        choice[slot] = 0;
    }
    false
}

fn solve_order(
    start: Pose,
    poses: &[Pose],
    pathfinder: &mut Pathfinder,
    abort: &dyn AbortSignal,
) -> Option<(Vec<usize>, i64)> {
    let k = poses.len();
    let mut costs = vec![vec![UNREACHABLE_COST; k]; k];
    let mut start_costs = vec![UNREACHABLE_COST; k];

    for i in 0..k {
        let (_, c) = pathfinder.path_cost(start, poses[i], abort);
        start_costs[i] = c;
        for j in 0..k {
            if i != j {
                let (_, c) = pathfinder.path_cost(poses[i], poses[j], abort);
                costs[i][j] = c;
            }
        }
    }

    // Held-Karp needs a uniform cost matrix indexed by a single node set
    // including the virtual start; fold `start_costs` in as an extra row/col
    // by solving per candidate first stop and taking the best.
    let mut best: Option<(Vec<usize>, i64)> = None;
    for first in 0..k {
        if start_costs[first] >= UNREACHABLE_COST {
            continue;
        }
        let rest: Vec<usize> = (0..k).filter(|&i| i != first).collect();
        let sub_cost = |a: usize, b: usize| -> i64 { costs[a][b] };
        let (order, cost) = held_karp_from(first, &rest, &costs)?;
        let total = start_costs[first] + cost;
        let _ = sub_cost;
        if best.as_ref().map(|(_, c)| total < *c).unwrap_or(true) {
            let mut full_order = vec![first];
            full_order.extend(order);
            best = Some((full_order, total));
        }
    }

    best
}

/// `held_karp` keyed directly off a full `k x k` cost matrix rather than a
/// larger matrix with a virtual start row, for the inner per-first-stop
/// solve in [`solve_order`].
fn held_karp_from(start: usize, rest: &[usize], costs: &[Vec<i64>]) -> Option<(Vec<usize>, i64)> {
    held_karp(costs, start, rest)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn subsets_are_ordered_by_descending_popcount() {
        let masks = subsets_by_descending_size(3);
        assert_eq!(masks[0], 0b111);
        assert_eq!(*masks.last().unwrap(), 0);
        for w in masks.windows(2) {
            assert!(w[0].count_ones() >= w[1].count_ones());
        }
    }

    #[test]
    fn held_karp_finds_optimal_two_stop_order() {
        // 0 -> start; 1, 2 are stops. Cheaper to visit 2 then 1.
        let costs = vec![
            vec![0, 10, 1],
            vec![10, 0, 100],
            vec![1, 100, 0],
        ];
        let (order, cost) = held_karp(&costs, 0, &[1, 2]).unwrap();
        assert_eq!(order, vec![2, 1]);
        assert_eq!(cost, 1 + 100);
    }

    #[test]
    fn held_karp_returns_none_when_fully_blocked() {
        let costs = vec![
            vec![0, UNREACHABLE_COST],
            vec![UNREACHABLE_COST, 0],
        ];
        assert!(held_karp(&costs, 0, &[1]).is_none());
    }

    #[test]
    fn mask_to_indices_round_trips() {
        assert_eq!(mask_to_indices(0b101, 3), vec![0, 2]);
    }

    #[test]
    fn a_candidate_less_obstacle_is_excluded_without_panicking() {
        use crate::arena::{Arena, TurnProfile};
        use crate::geometry::{Direction, Pose};
        use crate::pathfind::Pathfinder;

        // Slot 0 has no candidates at all (as an obstacle with no visible
        // face would produce); slot 1 has one reachable candidate. Before the
        // eligibility filter, the full-coverage subset (mask including both)
        // would index slot 0's empty candidate list and panic.
        let reachable_pose = Pose::new(5, 5, Direction::South);
        let candidates: Vec<Vec<Candidate>> =
            vec![Vec::new(), vec![(ViewSlot::Center, TaggedPose::new(reachable_pose, 9, 0))]];

        let arena = Arena::standard(Pose::new(1, 1, Direction::North)).unwrap();
        let mut pathfinder = Pathfinder::new(&arena, TurnProfile::Standard);

        let (tour, report) = plan_tour(Pose::new(1, 1, Direction::North), &candidates, &mut pathfinder, &());

        assert_eq!(tour.stops.len(), 1);
        assert_eq!(tour.stops[0].obstacle_index, 1);
        assert_eq!(report.obstacles_requested, 2);
        assert_eq!(report.obstacles_visited, 1);
    }
}
