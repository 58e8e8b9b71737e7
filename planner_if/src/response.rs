//! # Plan response
//!
//! The wire-facing response envelope: the compiled command program as
//! strings, and the raw pose-by-pose path annotated with the `s` field
//! (`-1` no action, `1` snap here).
//!
//! `s = 0` ("at waypoint", reserved) is never emitted by this
//! implementation: the source's `GridCell.get_dict()` returns the raw
//! screenshot id (`-1` or an obstacle id) rather than a tri-state flag, and
//! nothing downstream of it ever produces the waypoint-only value. It is
//! kept in the wire schema for forward compatibility with a client that
//! wants to distinguish "passed through" from "snap taken".

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use planner_core::PlanOutput;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// One step of the response path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireStep {
    pub x: i32,
    pub y: i32,
    pub d: i32,
    /// `-1`: no action here. `0`: reserved, unused. `1`: snap here.
    pub s: i32,
}

/// A full plan response: the command program, the annotated path, and the
/// total distance/duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub commands: Vec<String>,
    pub path: Vec<WireStep>,
    pub distance: i64,
    pub duration_secs: f64,
}

// ------------------------------------------------------------------------------------------------
// CONVERSION
// ------------------------------------------------------------------------------------------------

impl PlanResponse {
    pub fn from_output(output: &PlanOutput) -> Self {
        let snapped: std::collections::HashSet<(i32, i32, i32)> = output
            .tour
            .stops
            .iter()
            .map(|stop| (stop.pose.pose.x, stop.pose.pose.y, stop.pose.pose.dir.code()))
            .collect();

        let path = output
            .raw_path
            .iter()
            .map(|pose| {
                let key = (pose.x, pose.y, pose.dir.code());
                let s = if snapped.contains(&key) { 1 } else { -1 };
                WireStep { x: pose.x, y: pose.y, d: pose.dir.code(), s }
            })
            .collect();

        let commands = output.commands.iter().map(|c| c.to_string()).collect();

        PlanResponse { commands, path, distance: output.distance, duration_secs: output.duration_secs }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
