//! # Command compiler
//!
//! Turns a pose sequence into the robot's command alphabet: straight runs
//! (`FW`/`BW`, run-length compressed), the four turn commands
//! (`FR`/`FL`/`BR`/`BL`), `SNAP` (with a `_L`/`_C`/`_R` suffix naming which
//! viewing slot was used) and a terminal `FIN`.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod expand;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;

use crate::geometry::{Direction, Pose};

// ------------------------------------------------------------------------------------------------
// CONSTS
// ------------------------------------------------------------------------------------------------

/// Maximum run length a single `FW`/`BW` command encodes, in cells.
/// `Command::Forward`/`Backward` store a cell count; the wire alphabet
/// encodes it as `nn = cells * 10`, with `nn` in `{10, 20, ..., 90}`, so the
/// largest single command is `MAX_RUN` cells -> `FW90`. Longer straight runs
/// are split into several commands of at most this many cells each.
pub const MAX_RUN: u32 = 9;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Which viewing slot a `SNAP` was taken from, encoded as the command
/// suffix: `_L` (left), `_C` (center), `_R` (right).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapSuffix {
    Left,
    Center,
    Right,
}

impl fmt::Display for SnapSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SnapSuffix::Left => "_L",
            SnapSuffix::Center => "_C",
            SnapSuffix::Right => "_R",
        };
        write!(f, "{s}")
    }
}

/// Derive a `SNAP`'s `_L`/`_C`/`_R` suffix from where `obstacle` actually
/// sits relative to `robot`'s facing. This is computed from the final robot
/// pose and the obstacle's own cell, independent of
/// which candidate viewing pose (center/left/right standoff) the robot
/// stopped at -- standing to the left of an obstacle puts it on the
/// robot's right in frame, not its left, so the two must not be conflated.
pub fn snap_suffix(robot: Pose, obstacle_x: i32, obstacle_y: i32) -> SnapSuffix {
    let (fx, fy) = robot.dir.unit_delta().unwrap_or((0, 0));
    let dx = obstacle_x - robot.x;
    let dy = obstacle_y - robot.y;
    // right-hand vector: a clockwise quarter turn of the facing vector.
    let lateral = dx * fy - dy * fx;
    match lateral.cmp(&0) {
        std::cmp::Ordering::Greater => SnapSuffix::Right,
        std::cmp::Ordering::Less => SnapSuffix::Left,
        std::cmp::Ordering::Equal => SnapSuffix::Center,
    }
}

/// One command in the robot's output alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Forward(u32),
    Backward(u32),
    ForwardRight,
    ForwardLeft,
    BackwardRight,
    BackwardLeft,
    Snap(i32, SnapSuffix),
    Finish,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Forward(n) => write!(f, "FW{:02}", n * 10),
            Command::Backward(n) => write!(f, "BW{:02}", n * 10),
            Command::ForwardRight => write!(f, "FR00"),
            Command::ForwardLeft => write!(f, "FL00"),
            Command::BackwardRight => write!(f, "BR00"),
            Command::BackwardLeft => write!(f, "BL00"),
            Command::Snap(id, suffix) => write!(f, "SNAP{id}{suffix}"),
            Command::Finish => write!(f, "FIN"),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TRANSITION CLASSIFICATION
// ------------------------------------------------------------------------------------------------

/// The eight ways consecutive poses in a path can relate to each other:
/// holding direction while stepping forward or back, or one of the four
/// turn arcs. Anything else (e.g. a direction change with no matching
/// displacement) is not a valid A* edge and is treated as a compiler error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    StraightForward,
    StraightBackward,
    ForwardRight,
    ForwardLeft,
    BackwardRight,
    BackwardLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("pose at index {0} does not follow from the previous pose by any known maneuver")]
    UnclassifiableTransition(usize),
}

/// Classify the step from `a` to `b` into one of the eight recognised
/// transitions, per spec.md 9's turn-classification table: same direction
/// means a straight step (sign given by which way the displacement points),
/// a direction change of +/- 2 (a 90 degree turn) means one of the four turn
/// commands, disambiguated by whether the dominant displacement component
/// lies along the old heading (a forward turn) or the new one (a backward
/// turn).
fn classify(a: Pose, b: Pose) -> Option<Transition> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;

    if a.dir == b.dir {
        let (ux, uy) = a.dir.unit_delta()?;
        if dx == ux && dy == uy {
            return Some(Transition::StraightForward);
        }
        if dx == -ux && dy == -uy {
            return Some(Transition::StraightBackward);
        }
        return None;
    }

    let is_right = b.dir == Direction::try_from((a.dir.code() + 2).rem_euclid(8)).ok()?;
    let is_left = b.dir == Direction::try_from((a.dir.code() - 2).rem_euclid(8)).ok()?;
    if !is_right && !is_left {
        return None;
    }

    // A forward turn's net displacement points predominantly along the
    // *new* heading; a backward turn's points predominantly along the old
    // one's opposite. We only need the sign of the dot product with the new
    // heading to tell them apart. Driving a given (from, to) turn in reverse
    // doesn't just flip forward/backward, it also flips which side the arc
    // reads as: an N->E turn is FR00 driven forward but BL00 driven backward
    // (spec.md 4.5's table), since reversing the arc mirrors which lateral
    // command names it.
    let (nx, ny) = b.dir.unit_delta()?;
    let forward_component = dx * nx + dy * ny;

    match (is_right, forward_component >= 0) {
        (true, true) => Some(Transition::ForwardRight),
        (true, false) => Some(Transition::BackwardLeft),
        (false, true) => Some(Transition::ForwardLeft),
        (false, false) => Some(Transition::BackwardRight),
    }
}

// ------------------------------------------------------------------------------------------------
// COMPILATION
// ------------------------------------------------------------------------------------------------

/// A stop to `SNAP` at, keyed by its position in `path` (the index of the
/// pose the robot is at when it should photograph).
#[derive(Debug, Clone, Copy)]
pub struct SnapAt {
    pub path_index: usize,
    pub obstacle_id: i32,
    pub suffix: SnapSuffix,
}

/// Compile a pose sequence (plus the `SNAP` points along it) into a command
/// list, ending in `FIN`.
///
/// Straight runs are compressed into as few `FW`/`BW` commands as possible,
/// capped at [`MAX_RUN`] cells each so no single command overflows the
/// two-digit run-length field.
pub fn compile(path: &[Pose], snaps: &[SnapAt]) -> Result<Vec<Command>, CompileError> {
    let mut commands = Vec::new();
    let mut run: Option<Transition> = None;
    let mut run_len: u32 = 0;

    let flush = |commands: &mut Vec<Command>, run: Transition, mut len: u32| {
        let (make_forward, make_backward): (fn(u32) -> Command, fn(u32) -> Command) =
            (Command::Forward, Command::Backward);
        let ctor = match run {
            Transition::StraightForward => make_forward,
            Transition::StraightBackward => make_backward,
            _ => unreachable!("flush is only ever called for straight runs"),
        };
        while len > MAX_RUN {
            commands.push(ctor(MAX_RUN));
            len -= MAX_RUN;
        }
        if len > 0 {
            commands.push(ctor(len));
        }
    };

    for i in 1..path.len() {
        let transition = classify(path[i - 1], path[i]).ok_or(CompileError::UnclassifiableTransition(i))?;

        match transition {
            Transition::StraightForward | Transition::StraightBackward => {
                if run == Some(transition) {
                    run_len += 1;
                } else {
                    if let Some(prev) = run {
                        flush(&mut commands, prev, run_len);
                    }
                    run = Some(transition);
                    run_len = 1;
                }
            }
            turn => {
                if let Some(prev) = run {
                    flush(&mut commands, prev, run_len);
                    run = None;
                    run_len = 0;
                }
                commands.push(match turn {
                    Transition::ForwardRight => Command::ForwardRight,
                    Transition::ForwardLeft => Command::ForwardLeft,
                    Transition::BackwardRight => Command::BackwardRight,
                    Transition::BackwardLeft => Command::BackwardLeft,
                    Transition::StraightForward | Transition::StraightBackward => unreachable!(),
                });
            }
        }

        if let Some(snap) = snaps.iter().find(|s| s.path_index == i) {
            if let Some(prev) = run {
                flush(&mut commands, prev, run_len);
                run = None;
                run_len = 0;
            }
            commands.push(Command::Snap(snap.obstacle_id, snap.suffix));
        }
    }

    if let Some(prev) = run {
        flush(&mut commands, prev, run_len);
    }

    commands.push(Command::Finish);
    Ok(commands)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn straight_run_compresses_and_caps() {
        let mut path = vec![Pose::new(1, 1, Direction::North)];
        for i in 2..=95 {
            path.push(Pose::new(1, i, Direction::North));
        }
        let commands = compile(&path, &[]).unwrap();
        // 94 cells total: nine runs of the 9-cell cap (FW90) plus a 4-cell
        // remainder (FW40).
        for command in &commands[0..9] {
            assert_eq!(*command, Command::Forward(MAX_RUN));
        }
        assert_eq!(commands[9], Command::Forward(4));
        assert_eq!(commands[9].to_string(), "FW40");
        assert_eq!(*commands.last().unwrap(), Command::Finish);
    }

    #[test]
    fn direction_reversal_emits_backward() {
        let path = vec![
            Pose::new(5, 5, Direction::North),
            Pose::new(5, 4, Direction::North),
        ];
        let commands = compile(&path, &[]).unwrap();
        assert_eq!(commands[0], Command::Backward(1));
    }

    #[test]
    fn n_to_e_and_e_to_n_turns_match_the_forward_backward_table() {
        // spec.md 4.5's table: N->E is FR00 driven forward (y up) but BL00
        // driven backward (y down); E->N is FL00 forward, BR00 backward.
        // Displacements use the standard (2, 2) turn radius's arc endpoints.
        let n_to_e_forward =
            vec![Pose::new(5, 5, Direction::North), Pose::new(7, 7, Direction::East)];
        assert_eq!(compile(&n_to_e_forward, &[]).unwrap()[0], Command::ForwardRight);

        let n_to_e_backward =
            vec![Pose::new(5, 5, Direction::North), Pose::new(3, 3, Direction::East)];
        assert_eq!(compile(&n_to_e_backward, &[]).unwrap()[0], Command::BackwardLeft);

        let e_to_n_forward =
            vec![Pose::new(5, 5, Direction::East), Pose::new(7, 7, Direction::North)];
        assert_eq!(compile(&e_to_n_forward, &[]).unwrap()[0], Command::ForwardLeft);

        let e_to_n_backward =
            vec![Pose::new(5, 5, Direction::East), Pose::new(3, 3, Direction::North)];
        assert_eq!(compile(&e_to_n_backward, &[]).unwrap()[0], Command::BackwardRight);
    }

    #[test]
    fn snap_suffix_is_centre_when_obstacle_is_dead_ahead() {
        let robot = Pose::new(5, 1, Direction::North);
        assert_eq!(snap_suffix(robot, 5, 10), SnapSuffix::Center);
    }

    #[test]
    fn snap_suffix_flips_with_facing() {
        // obstacle due east of the robot: on the right when facing north,
        // on the left when facing south.
        let facing_north = Pose::new(5, 5, Direction::North);
        assert_eq!(snap_suffix(facing_north, 8, 5), SnapSuffix::Right);

        let facing_south = Pose::new(5, 5, Direction::South);
        assert_eq!(snap_suffix(facing_south, 8, 5), SnapSuffix::Left);
    }

    #[test]
    fn standing_left_of_an_obstacle_snaps_it_on_the_right() {
        // a robot standing one cell to its own left of dead-centre (while
        // still facing the obstacle) sees the obstacle shifted to its right.
        let center = Pose::new(5, 1, Direction::North);
        let left_standoff = Pose::new(4, 1, Direction::North);
        assert_eq!(snap_suffix(center, 5, 10), SnapSuffix::Center);
        assert_eq!(snap_suffix(left_standoff, 5, 10), SnapSuffix::Right);
    }

    #[test]
    fn snap_interrupts_a_straight_run() {
        let path = vec![
            Pose::new(5, 5, Direction::North),
            Pose::new(5, 6, Direction::North),
            Pose::new(5, 7, Direction::North),
        ];
        let snaps = vec![SnapAt { path_index: 1, obstacle_id: 3, suffix: SnapSuffix::Center }];
        let commands = compile(&path, &snaps).unwrap();
        assert_eq!(commands[0], Command::Forward(1));
        assert_eq!(commands[1], Command::Snap(3, SnapSuffix::Center));
        assert_eq!(commands[2], Command::Forward(1));
    }

    #[test]
    fn command_display_matches_alphabet() {
        assert_eq!(Command::Forward(7).to_string(), "FW70");
        assert_eq!(Command::Forward(1).to_string(), "FW10");
        assert_eq!(Command::ForwardRight.to_string(), "FR00");
        assert_eq!(Command::Snap(4, SnapSuffix::Left).to_string(), "SNAP4_L");
        assert_eq!(Command::Finish.to_string(), "FIN");
    }
}
