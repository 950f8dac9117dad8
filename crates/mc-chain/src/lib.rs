//! `mc-chain` - First-order word Markov chain.
//!
//! Feed tokens one at a time with [`Chain::train`], then ask for a likely
//! successor of any token with [`Chain::predict`]. Unseen tokens fall back
//! to the overall token frequencies.

pub mod chain;
pub mod config;
pub mod error;

pub use chain::Chain;
pub use config::ChainConfig;
pub use error::{ChainError, Result};
pub use mc_sampler::{DrawSource, SamplerError, ScriptedSource, WeightedSampler};
