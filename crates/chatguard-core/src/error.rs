//! Filter construction errors.

use thiserror::Error;

/// Errors from building filters with caller-supplied pattern tables.
///
/// The built-in default tables are compiled infallibly; only swapped-in
/// per-locale or per-tenant tables can fail here.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A supplied pattern failed to compile.
    #[error("invalid filter pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A supplied pattern table was empty.
    #[error("empty pattern table: {0}")]
    EmptyTable(&'static str),
}
