use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use mc_sampler::{DrawSource, WeightedSampler};
use rand::rngs::StdRng;

use crate::config::ChainConfig;
use crate::error::Result;

/// First-order Markov chain over tokens.
///
/// Every trained token owns a sampler over the tokens observed directly
/// after it. A separate global sampler counts every trained token and
/// answers queries for tokens with no recorded successors.
pub struct Chain<T, R = StdRng> {
    samplers: HashMap<T, WeightedSampler<T>>,
    global: WeightedSampler<T>,
    /// Key of the sampler the next trained token is recorded into.
    current: Option<T>,
    source: R,
}

impl<T: Eq + Hash + Clone> Chain<T, StdRng> {
    /// Create an untrained chain whose random source is seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_config(&ChainConfig::default())
    }

    /// Create an untrained chain with the random source described by `config`.
    pub fn with_config(config: &ChainConfig) -> Self {
        Self::with_source(config.rng())
    }
}

impl<T: Eq + Hash + Clone> Default for Chain<T, StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash + Clone, R: DrawSource> Chain<T, R> {
    /// Create an untrained chain that draws from `source`.
    pub fn with_source(source: R) -> Self {
        Self {
            samplers: HashMap::new(),
            global: WeightedSampler::new(),
            current: None,
            source,
        }
    }

    /// Feed the next token of the training sequence.
    ///
    /// 1. Counts `token` in the global sampler.
    /// 2. Records `token` as a successor of the previously trained token.
    /// 3. Makes `token`'s sampler current, creating it on first sight.
    pub fn train(&mut self, token: T) {
        self.global.record(token.clone());

        if let Some(sampler) = self.current.as_ref().and_then(|prev| self.samplers.get_mut(prev)) {
            sampler.record(token.clone());
        }

        if !self.samplers.contains_key(&token) {
            log::debug!("new token, {} distinct so far", self.samplers.len() + 1);
            self.samplers.insert(token.clone(), WeightedSampler::new());
        }
        self.current = Some(token);
    }

    /// Feed every token of `tokens` in order.
    pub fn train_all<I: IntoIterator<Item = T>>(&mut self, tokens: I) {
        for token in tokens {
            self.train(token);
        }
    }

    /// Draw a successor of `token`.
    ///
    /// Tokens without recorded successors (never trained, or only seen as
    /// the final token) are answered from the global token frequencies.
    /// Fails with an empty-distribution error only if the chain is untrained.
    pub fn predict<Q>(&mut self, token: &Q) -> Result<&T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let sampler = match self.samplers.get_mut(token) {
            Some(sampler) if !sampler.is_empty() => sampler,
            _ => {
                log::debug!("no successors recorded, drawing from global frequencies");
                &mut self.global
            }
        };
        Ok(sampler.draw(&mut self.source)?)
    }

    /// Returns true once at least one token has been trained.
    pub fn is_trained(&self) -> bool {
        !self.global.is_empty()
    }

    /// Number of distinct tokens trained.
    pub fn len(&self) -> usize {
        self.samplers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samplers.is_empty()
    }

    /// Returns true if `token` has been trained.
    pub fn contains<Q>(&self, token: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.samplers.contains_key(token)
    }

    /// Successor distribution of `token`, if it has been trained.
    pub fn sampler<Q>(&self, token: &Q) -> Option<&WeightedSampler<T>>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.samplers.get(token)
    }

    /// Frequencies of every trained token, regardless of predecessor.
    pub fn global(&self) -> &WeightedSampler<T> {
        &self.global
    }

    /// The random source draws are taken from.
    pub fn source(&self) -> &R {
        &self.source
    }
}
