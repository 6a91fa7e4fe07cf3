use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("batch has already been executed; build a fresh batch to retry")]
    BatchAlreadyExecuted,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
