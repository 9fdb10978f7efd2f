use crate::error::ServiceError;
use cubespace_kernel::FaceletState;
use serde::{Deserialize, Serialize};

/// Marker of the line carrying the moves in scramble output.
pub const SCRAMBLE_PREFIX: &str = "Scramble sequence used:";

/// Body of `GET /scramble`. `scramble` is free-form console text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrambleResponse {
    #[serde(default)]
    pub scramble: Option<String>,
}

/// Body of `POST /solve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRequest {
    pub cube_state: FaceletState,
}

/// Answer of `POST /solve`: either a solution or an error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResponse {
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SolveResponse {
    pub fn into_result(self) -> Result<String, ServiceError> {
        match (self.solution, self.error) {
            (Some(solution), _) if !solution.is_empty() => Ok(solution),
            (_, Some(error)) => Err(ServiceError::Rejected(error)),
            _ => Err(ServiceError::Malformed(
                "solve response has neither solution nor error".to_string(),
            )),
        }
    }
}

/// The move text after [`SCRAMBLE_PREFIX`] on the first line that starts
/// with it.
pub fn extract_scramble_line(text: &str) -> Option<&str> {
    text.lines()
        .find_map(|line| line.strip_prefix(SCRAMBLE_PREFIX))
        .map(str::trim)
}
