//! # Plan request
//!
//! The wire-facing request envelope: arena dimensions, the robot's start
//! pose, and the obstacle set, all as plain serializable data -- no
//! `planner_core` domain type appears directly on the wire, so the envelope
//! can be validated (and rejected with a clear error) before any domain
//! object is constructed.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use planner_core::{Arena, Direction, Obstacle, Pose, TurnProfile};

use crate::error::PlanIfError;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// One obstacle, as received on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireObstacle {
    pub x: i32,
    pub y: i32,
    /// Direction code: 0 (N), 2 (E), 4 (S), 6 (W).
    pub d: i32,
    pub id: i32,
}

/// The robot's starting pose, as received on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePose {
    pub x: i32,
    pub y: i32,
    pub d: i32,
}

/// A full plan request: arena size, robot start, and every obstacle to
/// visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub width: i32,
    pub height: i32,
    pub robot_start: WirePose,
    pub obstacles: Vec<WireObstacle>,
    /// `true` requests the wide (3, 1) turn radius instead of the standard
    /// (2, 2) one. Defaults to `false` when absent from the wire payload.
    #[serde(default)]
    pub wide_turns: bool,
    /// `true` asks every obstacle's viewing candidates to stand one cell
    /// further back than usual (spec.md §6), for a caller re-submitting the
    /// same obstacle set after an earlier response came back as
    /// [`planner_core::PlanError::NoFeasibleTour`]. Threaded straight through
    /// to [`planner_core::plan`] rather than folded into [`Self::into_arena`],
    /// since it governs viewpoint selection, not the arena itself.
    #[serde(default)]
    pub retrying: bool,
}

// ------------------------------------------------------------------------------------------------
// CONVERSION
// ------------------------------------------------------------------------------------------------

impl PlanRequest {
    /// Validate this request and build the domain [`Arena`] it describes.
    ///
    /// Rejects a request whose robot start pose or any obstacle fails to
    /// parse or fit the arena, rather than silently dropping the offending
    /// entry -- a malformed request is a client bug, not a planning outcome.
    pub fn into_arena(self) -> Result<(Arena, TurnProfile), PlanIfError> {
        let dir = Direction::try_from(self.robot_start.d)
            .map_err(|e| PlanIfError::InvalidRequest(format!("robot start direction: {e}")))?;
        if dir == Direction::None {
            return Err(PlanIfError::InvalidRequest(
                "robot start direction must be a cardinal direction, not NONE".to_string(),
            ));
        }
        let start = Pose::new(self.robot_start.x, self.robot_start.y, dir);

        let mut arena = Arena::new(self.width, self.height, start)
            .map_err(|e| PlanIfError::InvalidRequest(e.to_string()))?;

        for ob in &self.obstacles {
            let dir = Direction::try_from(ob.d)
                .map_err(|e| PlanIfError::InvalidRequest(format!("obstacle {}: {e}", ob.id)))?;
            arena
                .add_obstacle(Obstacle::new(ob.x, ob.y, dir, ob.id))
                .map_err(|e| PlanIfError::InvalidRequest(e.to_string()))?;
        }

        let profile = if self.wide_turns { TurnProfile::Wide } else { TurnProfile::Standard };

        Ok((arena, profile))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn request() -> PlanRequest {
        PlanRequest {
            width: 20,
            height: 20,
            robot_start: WirePose { x: 1, y: 1, d: 0 },
            obstacles: vec![WireObstacle { x: 10, y: 10, d: 4, id: 1 }],
            wide_turns: false,
            retrying: false,
        }
    }

    #[test]
    fn valid_request_builds_an_arena() {
        let (arena, profile) = request().into_arena().unwrap();
        assert_eq!(arena.obstacles().len(), 1);
        assert_eq!(profile, TurnProfile::Standard);
    }

    #[test]
    fn invalid_direction_code_is_rejected() {
        let mut req = request();
        req.obstacles[0].d = 3;
        assert!(matches!(req.into_arena(), Err(PlanIfError::InvalidRequest(_))));
    }

    #[test]
    fn robot_direction_none_is_rejected() {
        let mut req = request();
        req.robot_start.d = 8;
        assert!(matches!(req.into_arena(), Err(PlanIfError::InvalidRequest(_))));
    }

    #[test]
    fn out_of_bounds_robot_start_is_rejected() {
        let mut req = request();
        req.robot_start = WirePose { x: 0, y: 0, d: 0 };
        assert!(matches!(req.into_arena(), Err(PlanIfError::InvalidRequest(_))));
    }

    #[test]
    fn wide_turns_flag_selects_wide_profile() {
        let mut req = request();
        req.wide_turns = true;
        let (_, profile) = req.into_arena().unwrap();
        assert_eq!(profile, TurnProfile::Wide);
    }
}
