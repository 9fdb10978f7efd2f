/// Failures talking to the solver service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service answered HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("service reported an error: {0}")]
    Rejected(String),
    #[error("no line starting with {prefix:?} in scramble output")]
    MissingScramble { prefix: &'static str },
    #[error("could not start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
