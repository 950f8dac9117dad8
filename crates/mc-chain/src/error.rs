use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("sampler error: {0}")]
    Sampler(#[from] mc_sampler::SamplerError),
}

impl ChainError {
    /// Returns true if the failing draw hit a sampler with nothing recorded.
    pub fn is_empty_distribution(&self) -> bool {
        matches!(self, ChainError::Sampler(mc_sampler::SamplerError::EmptyDistribution))
    }
}

pub type Result<T> = std::result::Result<T, ChainError>;
