//! # planner_if
//!
//! The wire-facing request/response envelope around `planner_core`: plain
//! serializable types, validated and converted into domain types
//! (`Arena`, `TurnProfile`) before any planning happens. No
//! `planner_core` domain type is ever serialized directly -- the envelope
//! exists precisely so a malformed request can be rejected before a domain
//! object is constructed.
//!
//! This crate is the seam an HTTP/RPC entry layer would sit behind; it does
//! not itself open a socket or bind a port (spec.md's §1 explicitly scopes
//! that layer out as an external collaborator).

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod error;
pub mod request;
pub mod response;

// ------------------------------------------------------------------------------------------------
// RE-EXPORTS
// ------------------------------------------------------------------------------------------------

pub use error::PlanIfError;
pub use request::PlanRequest;
pub use response::PlanResponse;
