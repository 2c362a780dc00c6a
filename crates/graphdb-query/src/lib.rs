//! The restricted Cypher dialect: lexer, parser, path matcher and executor.

mod ast;
mod error;
mod executor;
mod lexer;
mod matcher;
mod parser;

pub use ast::{
    DeleteItem, Direction, Filter, NodePattern, PathPattern, Query, QueryKind,
    RelationshipPattern, ReturnItem, VARLEN_CEILING,
};
pub use error::{Error, Result};
pub use executor::execute;
pub use matcher::{match_pattern, MatchedPath};
pub use parser::parse;

pub use graphdb_api::{EdgeRef, NodeRef, QueryResult, Row};
