use thiserror::Error;

/// Errors raised while assembling an [`OptimalControlProblem`](crate::OptimalControlProblem).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    #[error("Term already registered: {0}")]
    DuplicateTerm(String),

    #[error("Term not found: {0}")]
    UnknownTerm(String),
}
