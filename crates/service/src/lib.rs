//! Solver service: the external scramble/solve collaborator and the glue that
//! drives the rig from its answers.
//!
//! # Invariants
//! - A failed service call never touches the cube.
//! - Solutions are returned for display only; nothing here applies them.
//! - The HTTP client is blocking from the caller's point of view; the async
//!   runtime stays inside [`HttpSolverService`].

mod client;
mod config;
mod error;
mod orchestrate;
mod protocol;

pub use client::{HttpSolverService, SolverService};
pub use config::ServiceConfig;
pub use error::ServiceError;
pub use orchestrate::{OrchestrateError, Scramble, request_solution, run_scramble};
pub use protocol::{
    SCRAMBLE_PREFIX, ScrambleResponse, SolveRequest, SolveResponse, extract_scramble_line,
};
