//! `mc-sampler` - Count-weighted token sampling for markov-chain.
//!
//! This crate provides:
//! - A `WeightedSampler` that records token occurrences and draws one token
//!   with probability proportional to its count
//! - A `DrawSource` trait so the random source can be injected (any `rand::Rng`
//!   works, `ScriptedSource` replays fixed values for tests)

pub mod error;
pub mod source;
pub mod weighted;

pub use error::{Result, SamplerError};
pub use source::{DrawSource, ScriptedSource};
pub use weighted::WeightedSampler;
