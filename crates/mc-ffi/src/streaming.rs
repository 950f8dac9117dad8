use std::ffi::CString;

use mc_chain::Chain;

use crate::types::MCStreamCallback;

/// Generator loop over a trained chain: every predicted word becomes the
/// next query, until `max_tokens` words have been produced.
pub struct Generation<'a> {
    chain: &'a mut Chain<String>,
    current: String,
    remaining: u32,
}

impl<'a> Generation<'a> {
    pub fn new(chain: &'a mut Chain<String>, start: &str, max_tokens: u32) -> Self {
        Self {
            chain,
            current: start.to_string(),
            remaining: max_tokens,
        }
    }
}

impl Iterator for Generation<'_> {
    type Item = mc_chain::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        match self.chain.predict(self.current.as_str()) {
            Ok(next) => {
                self.current = next.clone();
                Some(Ok(self.current.clone()))
            }
            Err(e) => {
                // Nothing after a failed draw can succeed either.
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }
}

/// Invoke a streaming callback with a generated word.
///
/// Returns `true` if generation should continue, `false` to stop.
/// If there is no callback, returns `true` (continue).
pub fn invoke_callback(
    callback: MCStreamCallback,
    user_data: *mut std::os::raw::c_void,
    word: &str,
) -> bool {
    match callback {
        Some(cb) => match CString::new(word) {
            Ok(c_str) => cb(c_str.as_ptr(), user_data),
            Err(_) => true, // skip words with interior NULs
        },
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_chain::ChainConfig;

    #[test]
    fn test_generation_feeds_back() {
        let mut chain: Chain<String> = Chain::with_config(&ChainConfig::new().with_seed(3));
        chain.train_all("a b c a b c".split_whitespace().map(String::from));

        let words: Vec<String> = Generation::new(&mut chain, "a", 4)
            .collect::<mc_chain::Result<_>>()
            .unwrap();
        assert_eq!(words, vec!["b", "c", "a", "b"]);
    }

    #[test]
    fn test_generation_stops_after_error() {
        let mut chain: Chain<String> = Chain::new();
        let mut generation = Generation::new(&mut chain, "a", 5);
        assert!(generation.next().unwrap().unwrap_err().is_empty_distribution());
        assert!(generation.next().is_none());
    }

    #[test]
    fn test_no_callback_continues() {
        assert!(invoke_callback(None, std::ptr::null_mut(), "word"));
    }
}
