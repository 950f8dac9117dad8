use rand::Rng;

/// A source of uniformly distributed draw values.
///
/// The sampler never reaches for a process-wide generator; every draw goes
/// through a source owned by the caller.
pub trait DrawSource {
    /// Returns a value in `[0, bound)`. `bound` is always greater than zero.
    fn draw_below(&mut self, bound: u64) -> u64;
}

impl<R: Rng + ?Sized> DrawSource for R {
    fn draw_below(&mut self, bound: u64) -> u64 {
        self.gen_range(0..bound)
    }
}

/// Deterministic source that replays a fixed list of values.
///
/// Each value is reduced modulo the requested bound, and the list wraps
/// around once exhausted. Every requested bound is recorded so callers can
/// check whether (and how often) the source was consulted.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    values: Vec<u64>,
    cursor: usize,
    requests: Vec<u64>,
}

impl ScriptedSource {
    /// Create a source that replays `values` in order.
    pub fn new(values: Vec<u64>) -> Self {
        Self {
            values,
            cursor: 0,
            requests: Vec::new(),
        }
    }

    /// Bounds passed to `draw_below`, oldest first.
    pub fn requests(&self) -> &[u64] {
        &self.requests
    }

    /// Number of times the source has been consulted.
    pub fn calls(&self) -> usize {
        self.requests.len()
    }
}

impl DrawSource for ScriptedSource {
    fn draw_below(&mut self, bound: u64) -> u64 {
        self.requests.push(bound);
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value % bound
    }
}
