//! # Planner Executable
//!
//! Stands in for the HTTP/RPC entry layer spec.md declares out of scope: a
//! CLI that reads a [`planner_if::request::PlanRequest`] as JSON (from a
//! file or stdin), runs it through `planner_core::plan`, and writes the
//! resulting [`planner_if::response::PlanResponse`] as JSON (to a file or
//! stdout). It does not open a socket or bind a port -- wiring these wire
//! types behind an actual server is the (out-of-scope) entry layer's job.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;
mod vision;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::io::{Read, Write};
use std::path::PathBuf;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use structopt::StructOpt;

use planner_core::{PlanError, TurnProfile};
use planner_if::error::PlanIfError;
use planner_if::request::PlanRequest;
use planner_if::response::PlanResponse;
use util::logger::{logger_init, LevelFilter};
use util::session::Session;

use crate::params::PlannerExecParams;
use crate::vision::{MockClassifier, SnapshotClassifier};

// ------------------------------------------------------------------------------------------------
// CLI
// ------------------------------------------------------------------------------------------------

/// Plan an obstacle-tour path for a single request and print the result.
#[derive(Debug, StructOpt)]
#[structopt(name = "planner_exec")]
struct Opt {
    /// Path to a JSON-encoded `PlanRequest`. Reads stdin if omitted.
    #[structopt(short, long, parse(from_os_str))]
    input: Option<PathBuf>,

    /// Path to write the JSON-encoded `PlanResponse` to. Writes stdout if
    /// omitted.
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Path to a TOML parameters file overriding `PlannerExecParams`'s
    /// defaults.
    #[structopt(short, long, parse(from_os_str))]
    params: Option<PathBuf>,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;
    let opt = Opt::from_args();

    // ---- LOAD PARAMETERS ----

    let params = match &opt.params {
        Some(path) => util::params::load(path.to_str().unwrap_or_default())
            .wrap_err("Failed to load planner_exec parameters")?,
        None => PlannerExecParams::default(),
    };

    // ---- EARLY INITIALISATION ----

    let session = Session::new("planner_exec", &params.sessions_dir).wrap_err("Failed to create the session")?;
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    log::info!("Planner Executable");
    log::info!("Session directory: {:?}", session.session_root);

    // ---- READ REQUEST ----

    let raw_request = read_request(opt.input.as_deref()).wrap_err("Failed to read plan request")?;
    let request: PlanRequest =
        serde_json::from_str(&raw_request).map_err(|e| PlanIfError::InvalidRequest(e.to_string()))?;

    log::info!(
        "Parsed request: {} obstacle(s), retrying = {}",
        request.obstacles.len(),
        request.retrying
    );

    // ---- BUILD ARENA & PLAN ----

    let retrying = request.retrying;
    let (arena, mut profile) = request.into_arena()?;
    if profile == TurnProfile::Standard && params.default_wide_turns {
        profile = TurnProfile::Wide;
    }

    let response = match planner_core::plan(&arena, profile, retrying, &()) {
        Ok(output) => {
            log::info!(
                "Planned tour: {} obstacle(s) visited, distance {}, {} command(s)",
                output.tour.stops.len(),
                output.distance,
                output.commands.len()
            );
            announce_snapshots(&output, &MockClassifier);
            PlanResponse::from_output(&output)
        }
        Err(PlanError::NoFeasibleTour) => {
            log::warn!("No feasible tour covers any requested obstacle; returning an empty plan");
            PlanResponse {
                commands: Vec::new(),
                path: Vec::new(),
                distance: planner_core::consts::UNREACHABLE_COST,
                duration_secs: 0.0,
            }
        }
        Err(e @ PlanError::Compile(_)) => return Err(PlanIfError::from(e).into()),
    };

    // ---- WRITE RESPONSE ----

    let encoded = serde_json::to_string_pretty(&response).wrap_err("Failed to encode plan response")?;
    write_response(opt.output.as_deref(), &encoded).wrap_err("Failed to write plan response")?;

    Ok(())
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn read_request(path: Option<&std::path::Path>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn write_response(path: Option<&std::path::Path>, encoded: &str) -> std::io::Result<()> {
    match path {
        Some(path) => std::fs::write(path, encoded),
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(encoded.as_bytes())?;
            handle.write_all(b"\n")
        }
    }
}

/// Logs, via the `SnapshotClassifier` seam, what a real vision service would
/// have been asked to classify for every `SNAP` this plan emits. Never
/// fails the plan: the classifier is a documented seam, not a dependency.
fn announce_snapshots(output: &planner_core::PlanOutput, classifier: &dyn SnapshotClassifier) {
    for command in &output.commands {
        if let planner_core::Command::Snap(obstacle_id, suffix) = command {
            match classifier.classify(*obstacle_id) {
                Ok(class_id) => log::info!("obstacle {obstacle_id} classified as {class_id} (suffix {suffix})"),
                Err(e) => log::debug!("obstacle {obstacle_id} (suffix {suffix}) not classified: {e}"),
            }
        }
    }
}
