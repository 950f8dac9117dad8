use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{Result, SamplerError};
use crate::source::DrawSource;

/// Resolved view of the counts used for sampling.
///
/// `Fresh` holds a snapshot taken in a single pass over the counts:
/// `cumulative[i]` is the sum of the counts of `tokens[..i]`, so token `i`
/// owns the draw values `[cumulative[i], cumulative[i] + count(tokens[i]))`.
#[derive(Debug, Clone)]
enum Buckets<T> {
    Stale,
    Fresh { tokens: Vec<T>, cumulative: Vec<u64> },
}

/// Multiset of tokens that draws one token with probability proportional
/// to the number of times it was recorded.
///
/// Recording is O(1) amortized and only invalidates the bucket snapshot; the
/// snapshot is rebuilt lazily (O(k) over k distinct tokens) on the next draw
/// that needs it. Draws against a fresh snapshot are O(log k).
#[derive(Debug, Clone)]
pub struct WeightedSampler<T> {
    counts: HashMap<T, u64>,
    total: u64,
    buckets: Buckets<T>,
}

impl<T> WeightedSampler<T> {
    /// Create an empty sampler.
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            total: 0,
            buckets: Buckets::Stale,
        }
    }

    /// Total number of recorded occurrences across all tokens.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct tokens recorded.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Iterate over `(token, count)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, u64)> {
        self.counts.iter().map(|(token, &count)| (token, count))
    }
}

impl<T: Eq + Hash + Clone> WeightedSampler<T> {
    /// Record one occurrence of `token`.
    pub fn record(&mut self, token: T) {
        *self.counts.entry(token).or_insert(0) += 1;
        self.total += 1;
        self.buckets = Buckets::Stale;
    }

    /// Number of times `token` has been recorded.
    pub fn count<Q>(&self, token: &Q) -> u64
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Empirical probability of drawing `token`, or 0.0 for an empty sampler.
    pub fn probability<Q>(&self, token: &Q) -> f64
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.total == 0 {
            return 0.0;
        }
        self.count(token) as f64 / self.total as f64
    }

    /// Draw one token with probability `count(token) / total`.
    ///
    /// A sampler holding a single distinct token returns it without
    /// consulting `source`.
    pub fn draw<S: DrawSource + ?Sized>(&mut self, source: &mut S) -> Result<&T> {
        if self.total == 0 {
            return Err(SamplerError::EmptyDistribution);
        }
        if self.counts.len() == 1 {
            return self.counts.keys().next().ok_or(SamplerError::EmptyDistribution);
        }

        self.refresh();
        let p = source.draw_below(self.total);
        self.lookup(p).ok_or(SamplerError::EmptyDistribution)
    }

    /// Map a draw value to the token whose bucket contains it.
    ///
    /// Returns `None` if `p` is outside `[0, total)`.
    pub fn resolve(&mut self, p: u64) -> Option<&T> {
        if p >= self.total {
            return None;
        }
        self.refresh();
        self.lookup(p)
    }

    fn refresh(&mut self) {
        if let Buckets::Fresh { .. } = self.buckets {
            return;
        }

        let mut tokens = Vec::with_capacity(self.counts.len());
        let mut cumulative = Vec::with_capacity(self.counts.len());
        let mut running = 0u64;
        for (token, &count) in &self.counts {
            tokens.push(token.clone());
            cumulative.push(running);
            running += count;
        }
        debug_assert_eq!(running, self.total);

        log::trace!("rebuilt cumulative frequencies over {} tokens", tokens.len());
        self.buckets = Buckets::Fresh { tokens, cumulative };
    }

    fn lookup(&self, p: u64) -> Option<&T> {
        match &self.buckets {
            Buckets::Fresh { tokens, cumulative } => {
                if p >= self.total {
                    return None;
                }
                // First bucket starting past p, minus one. cumulative[0] == 0,
                // so the partition point is at least 1 for every valid p.
                let idx = cumulative.partition_point(|&start| start <= p);
                idx.checked_sub(1).and_then(|i| tokens.get(i))
            }
            Buckets::Stale => None,
        }
    }
}

impl<T> Default for WeightedSampler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash + Clone> Extend<T> for WeightedSampler<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for token in iter {
            self.record(token);
        }
    }
}

impl<T: Eq + Hash + Clone> FromIterator<T> for WeightedSampler<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut sampler = Self::new();
        sampler.extend(iter);
        sampler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ScriptedSource;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sampler_with(counts: &[(&'static str, u64)]) -> WeightedSampler<&'static str> {
        let mut s = WeightedSampler::new();
        for &(token, n) in counts {
            for _ in 0..n {
                s.record(token);
            }
        }
        s
    }

    fn snapshot(s: &WeightedSampler<&'static str>) -> (Vec<&'static str>, Vec<u64>) {
        match &s.buckets {
            Buckets::Fresh { tokens, cumulative } => (tokens.clone(), cumulative.clone()),
            Buckets::Stale => panic!("expected a fresh snapshot"),
        }
    }

    /// Check every p in [0, total) against the interval definition of the
    /// current snapshot.
    fn assert_buckets_exact(counts: &[(&'static str, u64)]) {
        let mut s = sampler_with(counts);
        let total = s.total();
        assert!(s.resolve(0).is_some());
        let (tokens, cumulative) = snapshot(&s);

        assert_eq!(cumulative[0], 0);
        for i in 1..tokens.len() {
            assert_eq!(cumulative[i], cumulative[i - 1] + s.count(tokens[i - 1]));
        }

        let mut hits: HashMap<&str, u64> = HashMap::new();
        for p in 0..total {
            let expected = (0..tokens.len())
                .find(|&i| cumulative[i] <= p && p < cumulative[i] + s.count(tokens[i]))
                .map(|i| tokens[i])
                .unwrap();
            let got = *s.resolve(p).unwrap();
            assert_eq!(got, expected, "p = {p}, snapshot = {tokens:?} {cumulative:?}");
            *hits.entry(got).or_insert(0) += 1;
        }
        for &(token, n) in counts {
            assert_eq!(hits.get(token).copied().unwrap_or(0), n, "bucket width of {token}");
        }
        assert!(s.resolve(total).is_none());
    }

    #[test]
    fn test_record_counts_and_total() {
        let s = sampler_with(&[("a", 3), ("b", 1)]);
        assert_eq!(s.count("a"), 3);
        assert_eq!(s.count("b"), 1);
        assert_eq!(s.count("c"), 0);
        assert_eq!(s.total(), 4);
        assert_eq!(s.len(), 2);
        assert_eq!(s.iter().map(|(_, n)| n).sum::<u64>(), s.total());
    }

    #[test]
    fn test_empty_draw_fails() {
        let mut s: WeightedSampler<String> = WeightedSampler::new();
        let mut src = ScriptedSource::new(vec![0]);
        assert!(s.is_empty());
        assert_eq!(s.draw(&mut src), Err(SamplerError::EmptyDistribution));
        assert_eq!(src.calls(), 0);
        assert_eq!(s.probability("x"), 0.0);
    }

    #[test]
    fn test_single_token_skips_source() {
        let mut s = sampler_with(&[("only", 5)]);
        let mut src = ScriptedSource::new(vec![3]);
        for _ in 0..10 {
            assert_eq!(*s.draw(&mut src).unwrap(), "only");
        }
        assert_eq!(src.calls(), 0);
        assert!(matches!(s.buckets, Buckets::Stale));
    }

    #[test]
    fn test_buckets_width_one() {
        assert_buckets_exact(&[("a", 1), ("b", 1), ("c", 1)]);
    }

    #[test]
    fn test_buckets_unequal_neighbours() {
        assert_buckets_exact(&[("a", 7), ("b", 5), ("c", 11)]);
        assert_buckets_exact(&[("a", 1), ("b", 4), ("c", 1), ("d", 2), ("e", 1)]);
        assert_buckets_exact(&[("a", 2), ("b", 1)]);
        assert_buckets_exact(&[("a", 1), ("b", 9)]);
    }

    #[test]
    fn test_buckets_many_tokens() {
        let names = [
            "t0", "t1", "t2", "t3", "t4", "t5", "t6", "t7", "t8", "t9", "t10", "t11",
        ];
        let counts: Vec<(&'static str, u64)> = names
            .iter()
            .enumerate()
            .map(|(i, &n)| (n, (i as u64 % 4) + 1))
            .collect();
        assert_buckets_exact(&counts);
    }

    #[test]
    fn test_draw_uses_scripted_value() {
        let mut s = sampler_with(&[("a", 2), ("b", 3)]);
        assert!(s.resolve(0).is_some());
        let (tokens, cumulative) = snapshot(&s);

        // Start of the second bucket must land in it, not in the first.
        let mut src = ScriptedSource::new(vec![cumulative[1], cumulative[1] - 1]);
        assert_eq!(*s.draw(&mut src).unwrap(), tokens[1]);
        assert_eq!(*s.draw(&mut src).unwrap(), tokens[0]);
        assert_eq!(src.requests(), &[5, 5]);
    }

    #[test]
    fn test_record_marks_stale() {
        let mut s = sampler_with(&[("a", 1), ("b", 1)]);
        let mut src = ScriptedSource::new(vec![0]);
        s.draw(&mut src).unwrap();
        assert!(matches!(s.buckets, Buckets::Fresh { .. }));
        s.record("c");
        assert!(matches!(s.buckets, Buckets::Stale));
        s.draw(&mut src).unwrap();
        let (tokens, cumulative) = snapshot(&s);
        assert_eq!(tokens.len(), 3);
        assert_eq!(cumulative.len(), 3);
    }

    #[test]
    fn test_no_rebuild_while_fresh() {
        let mut s = sampler_with(&[("a", 2), ("b", 1), ("c", 4)]);
        let mut src = ScriptedSource::new(vec![4, 4]);
        let first = *s.draw(&mut src).unwrap();
        let ptr = match &s.buckets {
            Buckets::Fresh { cumulative, .. } => cumulative.as_ptr(),
            Buckets::Stale => panic!("expected a fresh snapshot"),
        };
        let second = *s.draw(&mut src).unwrap();
        let ptr_after = match &s.buckets {
            Buckets::Fresh { cumulative, .. } => cumulative.as_ptr(),
            Buckets::Stale => panic!("expected a fresh snapshot"),
        };
        assert_eq!(ptr, ptr_after);
        assert_eq!(first, second);
    }

    #[test]
    fn test_order_independent_counts() {
        let forward: WeightedSampler<&str> = ["x", "y", "x", "z", "x", "y"].into_iter().collect();
        let backward: WeightedSampler<&str> = ["y", "x", "z", "x", "y", "x"].into_iter().collect();
        for token in ["x", "y", "z", "w"] {
            assert_eq!(forward.count(token), backward.count(token));
            assert_abs_diff_eq!(forward.probability(token), backward.probability(token));
        }
        assert_eq!(forward.total(), backward.total());
    }

    #[test]
    fn test_draw_frequencies_converge() {
        let mut s = sampler_with(&[("a", 1), ("b", 3)]);
        let mut rng = StdRng::seed_from_u64(42);
        let n = 20_000;
        let mut b = 0;
        for _ in 0..n {
            if *s.draw(&mut rng).unwrap() == "b" {
                b += 1;
            }
        }
        assert_abs_diff_eq!(b as f64 / n as f64, 0.75, epsilon = 0.02);
        assert_abs_diff_eq!(s.probability("b"), 0.75);
    }

    #[test]
    fn test_owned_tokens_borrowed_lookup() {
        let mut s: WeightedSampler<String> = WeightedSampler::new();
        s.extend(["alpha".to_string(), "beta".to_string(), "alpha".to_string()]);
        assert_eq!(s.count("alpha"), 2);
        assert_eq!(s.resolve(3), None);
        assert!(s.resolve(2).is_some());
    }
}
