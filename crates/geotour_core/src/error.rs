use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("point set is empty")]
    EmptyPointSet,
    #[error("cannot split {points} points into {clusters} clusters (need 1 <= clusters < points)")]
    ClusterCount { clusters: usize, points: usize },
    #[error("start index {index} is out of range for {len} points")]
    StartIndex { index: usize, len: usize },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

pub(crate) fn ensure_non_empty<T>(items: &[T]) -> Result<()> {
    if items.is_empty() {
        return Err(Error::EmptyPointSet);
    }
    Ok(())
}

pub(crate) fn ensure_index(index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(Error::StartIndex { index, len });
    }
    Ok(())
}
