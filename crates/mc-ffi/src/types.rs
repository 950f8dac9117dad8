/// Status codes returned by all FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MCStatus {
    Ok = 0,
    ErrorInvalidArgument = 1,
    ErrorEmptyDistribution = 2,
    ErrorInternal = 3,
}

/// Parameters controlling chain construction.
#[repr(C)]
#[derive(Debug, Clone, Default)]
pub struct MCChainParams {
    /// When false, the random source is seeded from OS entropy and `seed` is ignored.
    pub use_seed: bool,
    pub seed: u64,
}

impl From<&MCChainParams> for mc_chain::ChainConfig {
    fn from(params: &MCChainParams) -> Self {
        let config = mc_chain::ChainConfig::new();
        if params.use_seed {
            config.with_seed(params.seed)
        } else {
            config
        }
    }
}

/// Parameters controlling text generation.
#[repr(C)]
#[derive(Debug, Clone)]
pub struct MCGenerateParams {
    /// Number of words to generate after the start word.
    pub max_tokens: u32,
}

impl Default for MCGenerateParams {
    fn default() -> Self {
        Self { max_tokens: 32 }
    }
}

/// Callback for streaming word output.
/// Returns true to continue generation, false to stop.
pub type MCStreamCallback = Option<
    extern "C" fn(
        token: *const std::os::raw::c_char,
        user_data: *mut std::os::raw::c_void,
    ) -> bool,
>;
