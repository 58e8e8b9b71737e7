//! # Top-level orchestration
//!
//! Ties the pipeline together: candidate viewing poses, pairwise A*, tour
//! search, command compilation and path expansion, for a single [`Arena`].

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Serialize;

use crate::arena::viewpoint;
use crate::arena::{Arena, ClearanceMode, TurnProfile};
use crate::compile::{self, Command, CompileError, SnapAt};
use crate::consts::ROBOT_SPEED;
use crate::geometry::Pose;
use crate::pathfind::{AbortSignal, Pathfinder};
use crate::tour::{self, Candidate, Tour, TourReport};

// ------------------------------------------------------------------------------------------------
// ERRORS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, thiserror::Error)]
pub enum PlanError {
    #[error("no obstacle has a reachable viewing pose")]
    NoFeasibleTour,

    #[error("compiled pose sequence could not be turned into commands: {0}")]
    Compile(#[from] CompileError),
}

// ------------------------------------------------------------------------------------------------
// OUTPUT
// ------------------------------------------------------------------------------------------------

/// The full result of planning a tour over one arena: the chosen tour, its
/// raw and cell-expanded paths, the compiled command program, and the total
/// distance/duration.
#[derive(Debug, Clone)]
pub struct PlanOutput {
    pub tour: Tour,
    pub raw_path: Vec<Pose>,
    pub expanded_path: Vec<Pose>,
    pub commands: Vec<Command>,
    pub distance: i64,
    pub duration_secs: f64,
}

/// Diagnostic record persisted at the end of a successful plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub tour: TourReport,
    pub command_count: usize,
    pub distance: i64,
}

// ------------------------------------------------------------------------------------------------
// PLANNING
// ------------------------------------------------------------------------------------------------

/// Plan a full tour of `arena`'s obstacles, starting from `arena.robot_start`.
///
/// For each obstacle, generates up to three candidate viewing poses
/// (center, left, right) via [`viewpoint::candidates`], filtered to those
/// that clear the arena's straight-line clearance check. `retrying` asks
/// every obstacle to stand one cell further back than usual (spec.md §6's
/// request field, for a caller re-submitting after an earlier
/// [`PlanError::NoFeasibleTour`]); independent of that, an obstacle whose
/// candidates are still all unreachable at the requested standoff is retried
/// once more at the next standoff out before being dropped from the tour
/// entirely. The surviving candidates feed [`tour::plan_tour`], and the
/// winning tour is compiled into a command program.
pub fn plan(
    arena: &Arena,
    profile: TurnProfile,
    retrying: bool,
    abort: &dyn AbortSignal,
) -> Result<PlanOutput, PlanError> {
    let candidates = build_candidate_lists(arena, retrying);

    if candidates.iter().all(|c| c.is_empty()) {
        return Err(PlanError::NoFeasibleTour);
    }

    let mut pathfinder = Pathfinder::new(arena, profile);
    let all_poses: Vec<Pose> = std::iter::once(arena.robot_start)
        .chain(candidates.iter().flatten().map(|(_, tp)| tp.pose))
        .collect();
    pathfinder.precompute_all_pairs(&all_poses, abort);

    let (tour, tour_report) = tour::plan_tour(arena.robot_start, &candidates, &mut pathfinder, abort);

    if tour.stops.is_empty() {
        log::warn!("plan: no feasible tour found covering any obstacle");
        return Err(PlanError::NoFeasibleTour);
    }

    let raw_path = tour.path.clone();
    let expanded_path = compile::expand::expand(&raw_path, profile);

    let snaps = snap_points(arena, &raw_path, &tour);
    let commands = compile::compile(&raw_path, &snaps)?;

    let distance = tour.cost;
    let duration_secs = distance as f64 / ROBOT_SPEED as f64;

    let report = PlanReport { tour: tour_report, command_count: commands.len(), distance };
    util::session::save_with_timestamp("planner/report.json", report.clone());

    log::info!(
        "plan: visited {}/{} obstacles, {} commands, distance {}",
        tour.stops.len(),
        candidates.len(),
        commands.len(),
        distance
    );

    Ok(PlanOutput { tour, raw_path, expanded_path, commands, distance, duration_secs })
}

fn build_candidate_lists(arena: &Arena, retrying: bool) -> Vec<Vec<Candidate>> {
    arena
        .obstacles()
        .iter()
        .map(|ob| {
            let mut chosen = reachable_candidates(arena, ob, retrying);
            if chosen.is_empty() && !retrying {
                chosen = reachable_candidates(arena, ob, true);
            }
            chosen
        })
        .collect()
}

fn reachable_candidates(arena: &Arena, obstacle: &crate::arena::Obstacle, retrying: bool) -> Vec<Candidate> {
    viewpoint::candidates(obstacle, retrying)
        .into_iter()
        .filter(|(_, tagged)| arena.reachable(tagged.pose.x, tagged.pose.y, ClearanceMode::Straight))
        .collect()
}

/// Derive each stop's `SNAP` point from where its pose appears in the
/// concatenated path. The suffix is recomputed from the stop's final pose
/// and the obstacle's own cell ([`compile::snap_suffix`]) rather than
/// carried over from the viewing slot the candidate was generated from:
/// which side of the obstacle the robot *stood* on and which side the
/// obstacle appears on *in frame* are mirror images of each other, not the
/// same thing.
fn snap_points(arena: &Arena, path: &[Pose], tour: &Tour) -> Vec<SnapAt> {
    let mut out = Vec::with_capacity(tour.stops.len());
    let mut search_from = 0usize;

    for stop in &tour.stops {
        if let Some(offset) = path[search_from..].iter().position(|&p| p == stop.pose.pose) {
            let index = search_from + offset;
            let obstacle = &arena.obstacles()[stop.obstacle_index];
            let suffix = compile::snap_suffix(stop.pose.pose, obstacle.x, obstacle.y);
            out.push(SnapAt { path_index: index, obstacle_id: stop.pose.screenshot_id, suffix });
            search_from = index + 1;
        }
    }

    out
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::arena::Obstacle;
    use crate::geometry::Direction;

    #[test]
    fn plans_a_tour_for_a_single_obstacle() {
        let mut arena = Arena::standard(Pose::new(1, 1, Direction::North)).unwrap();
        arena.add_obstacle(Obstacle::new(10, 15, Direction::South, 1)).unwrap();

        let output = plan(&arena, TurnProfile::Standard, false, &()).unwrap();
        assert!(!output.commands.is_empty());
        assert_eq!(*output.commands.last().unwrap(), Command::Finish);
        assert_eq!(output.tour.stops.len(), 1);
    }

    #[test]
    fn empty_arena_is_infeasible() {
        let arena = Arena::standard(Pose::new(1, 1, Direction::North)).unwrap();
        assert!(matches!(plan(&arena, TurnProfile::Standard, false, &()), Err(PlanError::NoFeasibleTour)));
    }

    #[test]
    fn retrying_stands_every_viewpoint_one_cell_further_back() {
        let mut arena = Arena::standard(Pose::new(1, 1, Direction::North)).unwrap();
        arena.add_obstacle(Obstacle::new(10, 10, Direction::South, 1)).unwrap();

        let near = plan(&arena, TurnProfile::Standard, false, &()).unwrap();
        let far = plan(&arena, TurnProfile::Standard, true, &()).unwrap();

        let near_stop = near.tour.stops[0].pose.pose;
        let far_stop = far.tour.stops[0].pose.pose;
        assert_eq!(near_stop.x, far_stop.x);
        assert_eq!(near_stop.dir, far_stop.dir);
        assert_eq!((far_stop.y - 10).abs(), (near_stop.y - 10).abs() + 1);
    }
}
