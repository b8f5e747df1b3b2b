use thiserror::Error;

use crate::algorithms::solver::SolveError;
use crate::problems::grid::GridParseError;
use crate::source::SourceUnavailable;

/// Every way loading or solving a maze can fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Source(#[from] SourceUnavailable),
    #[error(transparent)]
    Parse(#[from] GridParseError),
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error("I/O error: {0}")]
    IO(#[from] std::io::Error),
}
