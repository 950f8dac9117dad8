use rand::rngs::StdRng;
use rand::SeedableRng;

/// Construction options for a [`Chain`](crate::Chain).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainConfig {
    /// Seed for the random source. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl ChainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed seed so repeated runs draw the same values.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the random source described by this config.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_default_has_no_seed() {
        assert_eq!(ChainConfig::new().seed, None);
    }

    #[test]
    fn test_seeded_rng_repeats() {
        let config = ChainConfig::new().with_seed(99);
        let mut first = config.rng();
        let mut second = config.rng();
        let a: Vec<u64> = (0..8).map(|_| first.gen()).collect();
        let b: Vec<u64> = (0..8).map(|_| second.gen()).collect();
        assert_eq!(a, b);
    }
}
