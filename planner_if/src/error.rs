//! # Wire-facing errors

use planner_core::{CompileError, PlanError};

/// Errors the interface layer can return, covering both malformed requests
/// and planning failures surfaced from `planner_core`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlanIfError {
    #[error("invalid plan request: {0}")]
    InvalidRequest(String),

    #[error("no feasible plan exists for this arena")]
    InfeasiblePlan,

    #[error("invalid turn in compiled path: {0}")]
    InvalidTurn(#[from] CompileError),
}

impl From<PlanError> for PlanIfError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::NoFeasibleTour => PlanIfError::InfeasiblePlan,
            PlanError::Compile(e) => PlanIfError::InvalidTurn(e),
        }
    }
}
