//! The facade's public error type. Internal storage/query error variants
//! are wrapped rather than leaked verbatim, matching the layering of the
//! crates underneath.

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Opening or operating on the RocksDB-backed store failed.
    Storage(graphdb_storage::Error),
    /// The query layer failed for a reason other than an unparsable query
    /// (which never surfaces here — see [`crate::Database::execute_cypher`]).
    Query(graphdb_query::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Storage(e) => write!(f, "storage error: {e}"),
            Error::Query(e) => write!(f, "query error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Storage(e) => Some(e),
            Error::Query(e) => Some(e),
        }
    }
}

impl From<graphdb_storage::Error> for Error {
    fn from(e: graphdb_storage::Error) -> Self {
        Error::Storage(e)
    }
}

impl From<graphdb_query::Error> for Error {
    fn from(e: graphdb_query::Error) -> Self {
        Error::Query(e)
    }
}
