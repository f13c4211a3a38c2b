//! Text command surface
//!
//! Commands arrive as a single line, get parsed into the tagged [`Command`]
//! value, and are executed by the [`Interpreter`](interp::Interpreter) with
//! an exhaustive match, so a new verb that is parsed but not handled is a
//! compile-time error.

mod interp;
mod parse;

pub use interp::Interpreter;
pub use parse::{normalize, parse};

use shared::{GeometryKind, TerrainParams};

use crate::state::TextureCategory;

/// Addressing of a transform/delete verb
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Selected,
    Name(String),
}

/// Addressing of the select verb
#[derive(Debug, Clone, PartialEq)]
pub enum SelectTarget {
    All,
    None,
    Kind(GeometryKind),
    Name(String),
}

/// Scale arity: one uniform factor or three per-axis factors
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleArg {
    Uniform(f32),
    PerAxis([f32; 3]),
}

impl ScaleArg {
    pub fn factors(self) -> [f32; 3] {
        match self {
            ScaleArg::Uniform(f) => [f, f, f],
            ScaleArg::PerAxis(f) => f,
        }
    }
}

/// Rotate arity: one value spins the Y axis, three cover X, Y, Z (degrees)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotateArg {
    Yaw(f32),
    PerAxis([f32; 3]),
}

impl RotateArg {
    /// Per-axis rotation delta in radians
    pub fn radians(self) -> [f32; 3] {
        match self {
            RotateArg::Yaw(deg) => [0.0, deg.to_radians(), 0.0],
            RotateArg::PerAxis(deg) => [
                deg[0].to_radians(),
                deg[1].to_radians(),
                deg[2].to_radians(),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMode {
    /// `to x y z` replaces the position
    Absolute,
    /// `by x y z` (or bare coordinates) adds to the position
    Relative,
}

/// Texture index step of the `change texture` verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureStep {
    Next,
    Prev,
    Index(u32),
}

/// A parsed command, ready for validation and execution
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateShape {
        kind: GeometryKind,
        color: Option<String>,
        position: Option<[f32; 3]>,
    },
    CreateTerrain {
        params: TerrainParams,
        position: Option<[f32; 3]>,
    },
    CreateModel {
        term: String,
        position: Option<[f32; 3]>,
    },
    Clone {
        position: Option<[f32; 3]>,
    },
    Select(SelectTarget),
    Delete(Target),
    Scale {
        target: Target,
        arg: ScaleArg,
    },
    Rotate {
        target: Target,
        arg: RotateArg,
    },
    Move {
        target: Target,
        mode: MoveMode,
        values: [f32; 3],
    },
    ChangeTexture {
        category: TextureCategory,
        step: TextureStep,
    },
    Clear,
    Reset,
}

/// Why a command was rejected. Converted to a human-readable status at the
/// dispatch boundary; a rejected command never mutates the stores.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// Malformed token shape or count
    Syntax(String),
    /// Unrecognized verb
    UnknownCommand(String),
    /// Named object absent
    TargetNotFound(String),
    /// Target is "selected" but nothing (suitable) is selected
    NoSelection(String),
    /// Wrong numeric arity or out-of-range value
    InvalidArgument(String),
    /// Translation or catalog call failed
    ExternalService(String),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Syntax(msg) => write!(f, "{msg}"),
            CommandError::UnknownCommand(verb) => write!(f, "Unknown command: {verb}"),
            CommandError::TargetNotFound(name) => write!(f, "Object not found: {name}"),
            CommandError::NoSelection(msg) => write!(f, "{msg}"),
            CommandError::InvalidArgument(msg) => write!(f, "{msg}"),
            CommandError::ExternalService(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CommandError {}
