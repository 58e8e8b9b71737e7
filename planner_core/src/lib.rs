//! # planner_core
//!
//! The obstacle-tour path planner: given an [`arena::Arena`] of directional
//! obstacles, finds a viewing pose for each one, orders the visits to
//! minimize travel, and compiles the result into a [`compile::Command`]
//! program the robot can execute.
//!
//! Pipeline, in data-flow order:
//!
//! 1. [`arena`] -- the grid, its obstacles, and clearance checks.
//! 2. [`arena::viewpoint`] -- candidate viewing poses per obstacle.
//! 3. [`pathfind`] -- A* between any two poses, memoized pairwise.
//! 4. [`tour`] -- which viewing pose and visiting order, exactly, via
//!    Held-Karp.
//! 5. [`compile`] and [`compile::expand`] -- pose sequence to command
//!    program, and cell-by-cell path expansion for diagnostics.
//!
//! [`plan::plan`] drives the whole pipeline.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod arena;
pub mod compile;
pub mod consts;
pub mod geometry;
pub mod pathfind;
pub mod plan;
pub mod tour;

// ------------------------------------------------------------------------------------------------
// RE-EXPORTS
// ------------------------------------------------------------------------------------------------

pub use arena::{Arena, ArenaError, ClearanceMode, Obstacle, TurnProfile};
pub use compile::{Command, CompileError, SnapSuffix};
pub use geometry::{Direction, GeometryError, Pose, TaggedPose};
pub use pathfind::AbortSignal;
pub use plan::{plan, PlanError, PlanOutput, PlanReport};
pub use tour::{Stop, Tour, TourReport};
