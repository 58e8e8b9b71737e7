//! # Intermediate-path expansion
//!
//! A* emits one pose per maneuver (a straight step, or a turn that jumps
//! straight from entry to exit). Between a turn's entry and exit there are
//! grid cells the arc actually sweeps through; this module inserts them so
//! downstream consumers (diagnostics, simulators) can walk the path cell by
//! cell instead of maneuver by maneuver.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use crate::arena::TurnProfile;
use crate::geometry::Pose;
use crate::pathfind::turn_sweep_cells;

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Expand a compiled A* path, inserting every cell each turn arc sweeps
/// through between its entry and exit pose.
///
/// Straight steps (same direction, adjacent cell) are passed through
/// unchanged. Each turn step is expanded into the full sequence
/// [`turn_sweep_cells`] computes: one unit step at a time along the old
/// heading, then the exit pose -- three cells in total for the standard
/// turn profile, matching the physical footprint of a 90 degree arc.
pub fn expand(path: &[Pose], profile: TurnProfile) -> Vec<Pose> {
    if path.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(path.len());
    out.push(path[0]);

    for window in path.windows(2) {
        let (a, b) = (window[0], window[1]);

        if a.dir == b.dir {
            out.push(b);
            continue;
        }

        let forward = {
            let (ux, uy) = b.dir.unit_delta().unwrap_or((0, 0));
            let dx = b.x - a.x;
            let dy = b.y - a.y;
            dx * ux + dy * uy >= 0
        };

        out.extend(turn_sweep_cells(a, b.dir, forward, profile));
    }

    out
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::Direction;

    #[test]
    fn straight_path_is_unchanged() {
        let path = vec![
            Pose::new(1, 1, Direction::North),
            Pose::new(1, 2, Direction::North),
            Pose::new(1, 3, Direction::North),
        ];
        let expanded = expand(&path, TurnProfile::Standard);
        assert_eq!(expanded, path);
    }

    #[test]
    fn turn_inserts_three_swept_cells() {
        // spec.md 4.6: an FR from north inserts (x, y+1, N), (x, y+2, N),
        // (x+1, y+2, E) -- two unit steps along the old heading, then the
        // turn's exit pose.
        let path = vec![Pose::new(5, 5, Direction::North), Pose::new(7, 7, Direction::East)];
        let expanded = expand(&path, TurnProfile::Standard);
        assert_eq!(expanded.len(), 4);
        assert_eq!(expanded[0], path[0]);
        assert_eq!(expanded[1], Pose::new(5, 6, Direction::North));
        assert_eq!(expanded[2], Pose::new(5, 7, Direction::North));
        assert_eq!(expanded[3], path[1]);
    }

    #[test]
    fn empty_path_expands_to_empty() {
        assert!(expand(&[], TurnProfile::Standard).is_empty());
    }
}
