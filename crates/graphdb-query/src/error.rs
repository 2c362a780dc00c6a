//! Error and result types for the query crate.

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The lexer or parser could not make sense of the query text. Per §4.5
    /// and §7, this is never propagated as a panic — `execute_cypher`
    /// catches it and returns an empty result.
    Parse(String),
    Storage(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(msg) => write!(f, "unparsable query: {msg}"),
            Error::Storage(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<graphdb_storage::Error> for Error {
    fn from(e: graphdb_storage::Error) -> Self {
        Error::Storage(e.to_string())
    }
}
