//! Error taxonomy for the mining algorithms.

use thiserror::Error;

/// Errors reported by the mining algorithms.
///
/// Mining is pure computation over in-memory data, so there is nothing
/// transient here: a failure is either an infeasible configuration or a
/// table the algorithms cannot work with, and both are reported before any
/// real work starts.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or infeasible parameters.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The transaction table cannot be processed.
    #[error("bad transaction data: {0}")]
    Data(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
