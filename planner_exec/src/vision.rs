//! # Vision subsystem seam
//!
//! spec.md treats the vision/image-classification subsystem as an external
//! collaborator: a black-box service that takes a snapshot image and
//! returns an integer class id for the symbol it saw. The planner core
//! never calls it -- it only emits `SNAP` commands naming which obstacle to
//! photograph. This trait documents the seam a real deployment would plug
//! a vision client into; `planner_exec` only ships the no-op mock below, to
//! keep the CLI runnable without a camera or a classifier service attached.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// ERRORS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("vision service unavailable: {0}")]
    Unavailable(String),
}

// ------------------------------------------------------------------------------------------------
// TRAIT
// ------------------------------------------------------------------------------------------------

/// Classifies a single snapshot image, returning the symbol's integer class
/// id. A real implementation calls out to the vision service over whatever
/// transport it speaks; this crate never does.
pub trait SnapshotClassifier {
    fn classify(&self, obstacle_id: i32) -> Result<i32, ClassifyError>;
}

/// Stands in for a real vision client. Always reports "unavailable" --
/// there is no frame to classify, since `planner_exec` never opens a
/// camera. Exercises the seam (so callers can be written against the
/// trait) without pretending to do real image classification.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockClassifier;

impl SnapshotClassifier for MockClassifier {
    fn classify(&self, obstacle_id: i32) -> Result<i32, ClassifyError> {
        Err(ClassifyError::Unavailable(format!(
            "no vision service configured to classify snapshot of obstacle {obstacle_id}"
        )))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mock_classifier_always_reports_unavailable() {
        assert!(MockClassifier.classify(1).is_err());
    }
}
