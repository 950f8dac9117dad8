use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SamplerError {
    #[error("cannot draw from an empty distribution")]
    EmptyDistribution,
}

pub type Result<T> = std::result::Result<T, SamplerError>;
