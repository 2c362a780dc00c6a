use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("storage engine error: {0}")]
    Engine(#[from] rocksdb::Error),

    #[error("invalid field: {0}")]
    InvalidField(#[from] graphdb_api::InvalidFieldError),

    #[error("malformed key in storage for operation {context}")]
    MalformedKey { context: &'static str },
}
