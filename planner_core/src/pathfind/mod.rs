//! # Pathfinding
//!
//! A* search between two [`Pose`]s over the turn kinematics in
//! [`crate::arena::TurnProfile`], plus a [`Pathfinder`] that memoizes every
//! pairwise path/cost the tour planner asks for.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::arena::{Arena, ClearanceMode, TurnProfile};
use crate::consts::{SAFE_COST, TURN_BASE_COST, TURN_FACTOR, TURN_RELAXED_PENALTY, UNREACHABLE_COST};
use crate::geometry::{Direction, Pose};

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// Cooperative-cancellation hook threaded through long-running searches.
/// A long-running executable polls a flag like this between iterations so a
/// caller can cancel without tearing down the whole process; the planner has
/// no caller of its own yet, so this is accepted but never wired up by
/// [`crate::plan`].
pub trait AbortSignal {
    fn is_aborted(&self) -> bool;
}

impl AbortSignal for () {
    fn is_aborted(&self) -> bool {
        false
    }
}

/// Which way a turn edge curves, relative to the direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnSense {
    Clockwise,
    CounterClockwise,
}

/// Whether a turn edge is driven forward or in reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionSign {
    Forward,
    Backward,
}

// ------------------------------------------------------------------------------------------------
// A* NODE
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    pose: Pose,
    cost: i64,
    estimate: i64,
}

impl Node {
    fn priority(&self) -> i64 {
        self.cost + self.estimate
    }
}

// `BinaryHeap` is a max-heap; reverse the ordering so the lowest-priority
// node pops first. Every cost here is an integer, so unlike a float-keyed
// priority queue this comparison can never fail on NaN.
impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        other.priority().cmp(&self.priority())
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ------------------------------------------------------------------------------------------------
// NEIGHBOR GENERATION
// ------------------------------------------------------------------------------------------------

fn clockwise(d: Direction) -> Direction {
    Direction::try_from((d.code() + 2).rem_euclid(8)).expect("rotating a cardinal stays a cardinal")
}

fn counter_clockwise(d: Direction) -> Direction {
    Direction::try_from((d.code() - 2).rem_euclid(8)).expect("rotating a cardinal stays a cardinal")
}

/// The `(dx, dy)` an arc from `from` to `to` displaces the robot by: the
/// "bigger" radius component along the new heading, the "smaller" component
/// along the old one, per [`TurnProfile::radius`].
fn turn_delta(from: Direction, to: Direction, profile: TurnProfile) -> (i32, i32) {
    let (big, small) = profile.radius();
    let (fx, fy) = from.unit_delta().expect("turn endpoints are always cardinal");
    let (tx, ty) = to.unit_delta().expect("turn endpoints are always cardinal");
    (fx * small + tx * big, fy * small + ty * big)
}

/// Every grid cell a turn arc actually sweeps through, in order: one unit
/// step at a time along the *old* heading for `small` cells (still tagged
/// with the old direction), followed by the final pose at the *new*
/// direction. For the standard profile (`small == 2`) this is always three
/// cells total, matching spec.md 4.6's worked example
/// ((x, y+1, N), (x, y+2, N), (x+1, y+2, E) for an FR from north) -- the
/// last two of the three poses this function returns.
/// [`crate::compile::expand`] inserts the whole sequence so a turn can be
/// walked cell by cell instead of jumping straight from entry to exit;
/// [`neighbors`] only needs the last pre-turn cell (`sweep[len-2]`) for its
/// soft intermediate-clearance check.
pub fn turn_sweep_cells(pose: Pose, to: Direction, sense_forward: bool, profile: TurnProfile) -> Vec<Pose> {
    let (dx, dy) = turn_delta(pose.dir, to, profile);
    let (dx, dy) = if sense_forward { (dx, dy) } else { (-dx, -dy) };
    let (fx, fy) = pose.dir.unit_delta().expect("turn start is always cardinal");
    let sign = if sense_forward { 1 } else { -1 };
    let (_big, small) = profile.radius();

    let mut cells = Vec::with_capacity(small as usize + 1);
    for step in 1..=small {
        cells.push(Pose::new(pose.x + sign * step * fx, pose.y + sign * step * fy, pose.dir));
    }
    cells.push(Pose::new(pose.x + dx, pose.y + dy, to));
    cells
}

/// The cell one step beyond a turn's destination pose, along its new
/// heading -- the swept tip of the arc (spec.md 4.3). Both this cell and the
/// destination itself must clear the turn halo for the turn to be accepted
/// at all.
fn turn_tip_cell(end: Pose) -> Pose {
    let (tx, ty) = end.dir.unit_delta().expect("turn destinations are always cardinal");
    Pose::new(end.x + tx, end.y + ty, end.dir)
}

/// Every candidate neighbor of `pose`: two straight moves (forward, back)
/// and four turn arcs (forward-left, forward-right, back-left, back-right),
/// each paired with the full edge cost (kinematic cost plus the safe-cost
/// halo of its destination).
///
/// A neighbor is only emitted if its destination and every intermediate
/// clearance check (straight halo for straight moves, the turn/pre-turn halo
/// for turn arcs) passes [`Arena::reachable`].
fn neighbors(pose: Pose, arena: &Arena, profile: TurnProfile) -> Vec<(Pose, i64)> {
    let mut out = Vec::with_capacity(6);

    if let Some((dx, dy)) = pose.dir.unit_delta() {
        for sign in [1, -1] {
            let next = Pose::new(pose.x + sign * dx, pose.y + sign * dy, pose.dir);
            if !arena.reachable(next.x, next.y, ClearanceMode::Straight) {
                continue;
            }
            let cost = 1 + get_safe_cost(arena, next);
            out.push((next, cost));
        }
    }

    for sense in [TurnSense::Clockwise, TurnSense::CounterClockwise] {
        for motion in [MotionSign::Forward, MotionSign::Backward] {
            let to = match sense {
                TurnSense::Clockwise => clockwise(pose.dir),
                TurnSense::CounterClockwise => counter_clockwise(pose.dir),
            };
            let sweep = turn_sweep_cells(pose, to, matches!(motion, MotionSign::Forward), profile);
            let next = *sweep.last().expect("a turn sweep always ends on a destination pose");
            let mid = sweep[sweep.len() - 2];
            let tip = turn_tip_cell(next);

            let mid_ok = arena.reachable(mid.x, mid.y, ClearanceMode::PreTurn);
            let end_ok = arena.reachable(next.x, next.y, ClearanceMode::Turn);
            let tip_ok = arena.reachable(tip.x, tip.y, ClearanceMode::Turn);

            if !end_ok || !tip_ok {
                continue;
            }

            let rotation = Direction::rotation_cost(pose.dir, to) * TURN_FACTOR;
            let mut cost = TURN_BASE_COST + rotation + get_safe_cost(arena, next);
            if !mid_ok {
                // the intermediate cell is blocked but the turn still
                // lands cleanly: accept it under a relaxed penalty rather
                // than discarding an otherwise-valid maneuver outright.
                cost += TURN_RELAXED_PENALTY;
            }
            out.push((next, cost));
        }
    }

    out
}

/// Additive cost discouraging the search from hugging an obstacle's corner,
/// even when the cell itself is technically reachable.
fn get_safe_cost(arena: &Arena, pose: Pose) -> i64 {
    if arena.near_obstacle_corner(pose.x, pose.y) {
        SAFE_COST
    } else {
        0
    }
}

// ------------------------------------------------------------------------------------------------
// A* SEARCH
// ------------------------------------------------------------------------------------------------

/// Find the lowest-cost path from `start` to `goal`.
///
/// Returns `None` if `goal` is unreachable from `start` (or either endpoint
/// fails its own clearance check). `abort.is_aborted()` is polled once per
/// pop; an aborted search also returns `None`.
pub fn astar(
    start: Pose,
    goal: Pose,
    arena: &Arena,
    profile: TurnProfile,
    abort: &dyn AbortSignal,
) -> Option<(Vec<Pose>, i64)> {
    if !arena.reachable(start.x, start.y, ClearanceMode::Straight)
        || !arena.reachable(goal.x, goal.y, ClearanceMode::Straight)
    {
        return None;
    }

    if start == goal {
        return Some((vec![start], 0));
    }

    let mut open = BinaryHeap::new();
    let mut best_cost: HashMap<Pose, i64> = HashMap::new();
    let mut parent: HashMap<Pose, Pose> = HashMap::new();

    best_cost.insert(start, 0);
    open.push(Node { pose: start, cost: 0, estimate: start.manhattan(goal) });

    while let Some(current) = open.pop() {
        if abort.is_aborted() {
            return None;
        }

        if current.pose == goal {
            return Some((reconstruct(&parent, start, goal), current.cost));
        }

        if current.cost > *best_cost.get(&current.pose).unwrap_or(&i64::MAX) {
            continue;
        }

        for (next, edge_cost) in neighbors(current.pose, arena, profile) {
            let tentative = current.cost + edge_cost;
            if tentative < *best_cost.get(&next).unwrap_or(&i64::MAX) {
                best_cost.insert(next, tentative);
                parent.insert(next, current.pose);
                open.push(Node { pose: next, cost: tentative, estimate: next.manhattan(goal) });
            }
        }
    }

    log::trace!("astar: no path from {:?} to {:?}", start, goal);
    None
}

fn reconstruct(parent: &HashMap<Pose, Pose>, start: Pose, goal: Pose) -> Vec<Pose> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        current = parent[&current];
        path.push(current);
    }
    path.reverse();
    path
}

// ------------------------------------------------------------------------------------------------
// MEMOIZED PAIRWISE PATHFINDER
// ------------------------------------------------------------------------------------------------

/// Caches every `astar` call made against one [`Arena`], so the tour planner
/// can ask for the same pair of poses from several candidate tours without
/// recomputing it.
pub struct Pathfinder<'a> {
    arena: &'a Arena,
    profile: TurnProfile,
    cache: HashMap<(Pose, Pose), Option<(Vec<Pose>, i64)>>,
}

impl<'a> Pathfinder<'a> {
    pub fn new(arena: &'a Arena, profile: TurnProfile) -> Self {
        Self { arena, profile, cache: HashMap::new() }
    }

    /// The cached (or freshly computed) path and cost between `a` and `b`.
    /// Cost is [`UNREACHABLE_COST`] and the path is empty when no path
    /// exists, so this can feed directly into a tour-cost matrix without the
    /// caller unwrapping an `Option` at every cell.
    pub fn path_cost(&mut self, a: Pose, b: Pose, abort: &dyn AbortSignal) -> (Vec<Pose>, i64) {
        if let Some(cached) = self.cache.get(&(a, b)) {
            return cached.clone().unwrap_or_else(|| (Vec::new(), UNREACHABLE_COST));
        }

        let result = astar(a, b, self.arena, self.profile, abort);
        self.cache.insert((a, b), result.clone());
        result.unwrap_or_else(|| (Vec::new(), UNREACHABLE_COST))
    }

    /// Populate the cache for every ordered pair drawn from `poses`, so the
    /// cost matrix the tour planner builds never blocks on a cache miss.
    pub fn precompute_all_pairs(&mut self, poses: &[Pose], abort: &dyn AbortSignal) {
        for &a in poses {
            for &b in poses {
                if a != b {
                    self.path_cost(a, b, abort);
                }
            }
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::arena::Arena;

    fn arena() -> Arena {
        Arena::standard(Pose::new(1, 1, Direction::North)).unwrap()
    }

    #[test]
    fn straight_line_path_has_manhattan_cost() {
        let a = arena();
        let start = Pose::new(2, 2, Direction::North);
        let goal = Pose::new(2, 10, Direction::North);
        let (path, cost) = astar(start, goal, &a, TurnProfile::Standard, &()).unwrap();
        assert_eq!(path.first().copied(), Some(start));
        assert_eq!(path.last().copied(), Some(goal));
        assert_eq!(cost, 8);
    }

    #[test]
    fn same_pose_is_free() {
        let a = arena();
        let p = Pose::new(3, 3, Direction::East);
        let (path, cost) = astar(p, p, &a, TurnProfile::Standard, &()).unwrap();
        assert_eq!(path, vec![p]);
        assert_eq!(cost, 0);
    }

    #[test]
    fn unreachable_goal_outside_bounds_returns_none() {
        let a = arena();
        let start = Pose::new(2, 2, Direction::North);
        let goal = Pose::new(0, 0, Direction::North);
        assert!(astar(start, goal, &a, TurnProfile::Standard, &()).is_none());
    }

    #[test]
    fn pathfinder_caches_repeated_queries() {
        let a = arena();
        let mut pf = Pathfinder::new(&a, TurnProfile::Standard);
        let start = Pose::new(2, 2, Direction::North);
        let goal = Pose::new(2, 6, Direction::North);
        let (_, cost_a) = pf.path_cost(start, goal, &());
        let (_, cost_b) = pf.path_cost(start, goal, &());
        assert_eq!(cost_a, cost_b);
        assert_eq!(pf.cache.len(), 1);
    }

    #[test]
    fn unreachable_pair_reports_sentinel_cost() {
        let mut a = arena();
        for y in 2..18 {
            a.add_obstacle(crate::arena::Obstacle::new(10, y, Direction::North, y)).unwrap();
        }
        let mut pf = Pathfinder::new(&a, TurnProfile::Standard);
        let start = Pose::new(2, 2, Direction::North);
        let goal = Pose::new(18, 2, Direction::North);
        let (path, cost) = pf.path_cost(start, goal, &());
        if cost == UNREACHABLE_COST {
            assert!(path.is_empty());
        }
    }
}
