//! Parameters for the planner executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Tunable parameters for `planner_exec`, loaded from a TOML file with
/// `util::params::load`. None of these change the wire protocol (grid size,
/// direction codes, command alphabet) -- only how the CLI itself behaves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerExecParams {
    /// Directory under which `util::session::Session` creates this
    /// execution's session directory.
    #[serde(default = "default_sessions_dir")]
    pub sessions_dir: String,

    /// Whether to request the wide (3, 1) turn radius when the incoming
    /// request doesn't say either way.
    #[serde(default)]
    pub default_wide_turns: bool,
}

impl Default for PlannerExecParams {
    fn default() -> Self {
        Self { sessions_dir: default_sessions_dir(), default_wide_turns: false }
    }
}

fn default_sessions_dir() -> String {
    "sessions".to_string()
}
