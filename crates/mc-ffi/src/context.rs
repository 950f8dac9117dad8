use mc_chain::{Chain, ChainConfig};

/// Opaque context handle that owns a word chain.
pub struct MCContext {
    pub chain: Chain<String>,
}

impl MCContext {
    pub fn new(config: &ChainConfig) -> Self {
        Self {
            chain: Chain::with_config(config),
        }
    }
}
