//! Sequence input: random generation, shuffling and free-text parsing.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sortvis_kernels::Value;

use crate::config::VisConfig;

/// Source of random sequences.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    rng: StdRng,
    min_len: usize,
    max_len: usize,
    min_value: Value,
    max_value: Value,
}

impl SequenceSource {
    /// Create a source using the generator ranges in `config`.
    pub fn new(config: &VisConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            min_len: config.min_len,
            max_len: config.max_len,
            min_value: config.min_value,
            max_value: config.max_value,
        }
    }

    /// A sequence with length in `min_len..max_len` and values in
    /// `min_value..max_value`.
    pub fn generate(&mut self) -> Vec<Value> {
        let len = self.rng.gen_range(self.min_len..self.max_len);
        (0..len)
            .map(|_| self.rng.gen_range(self.min_value..self.max_value))
            .collect()
    }

    /// Shuffle `sequence` in place.
    pub fn shuffle(&mut self, sequence: &mut [Value]) {
        sequence.shuffle(&mut self.rng);
    }
}

/// Parse a comma-separated list of integers.
///
/// Tokens are trimmed and read as leading integers, so `"12abc"` yields 12;
/// tokens without a leading integer are dropped. Returns `None`, meaning
/// "keep the current sequence", for blank input, input with no usable
/// tokens, or more than `max_len` values.
pub fn parse_custom(text: &str, max_len: usize) -> Option<Vec<Value>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let values: Vec<Value> = text.split(',').filter_map(leading_integer).collect();
    if values.is_empty() || values.len() > max_len {
        return None;
    }
    Some(values)
}

/// The optionally signed run of digits at the start of `token`.
fn leading_integer(token: &str) -> Option<Value> {
    let token = token.trim();
    let digits_start = usize::from(token.starts_with(['+', '-']));
    let digits_len = token[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    token[..digits_start + digits_len].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> SequenceSource {
        SequenceSource::new(&VisConfig {
            seed: Some(seed),
            ..VisConfig::default()
        })
    }

    #[test]
    fn generated_sequences_respect_ranges() {
        let mut source = seeded(1);
        for _ in 0..50 {
            let seq = source.generate();
            assert!((10..350).contains(&seq.len()));
            assert!(seq.iter().all(|v| (10..300).contains(v)));
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        assert_eq!(seeded(42).generate(), seeded(42).generate());
    }

    #[test]
    fn shuffle_keeps_elements() {
        let mut source = seeded(3);
        let mut seq: Vec<Value> = (0..40).collect();
        source.shuffle(&mut seq);

        let mut sorted = seq.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn parse_drops_invalid_tokens() {
        assert_eq!(parse_custom("5, 3, x, 8,1", 350), Some(vec![5, 3, 8, 1]));
        assert_eq!(parse_custom(" -4,+2 , 12abc", 350), Some(vec![-4, 2, 12]));
        assert_eq!(parse_custom("1.9, 2", 350), Some(vec![1, 2]));
    }

    #[test]
    fn parse_rejects_silently() {
        assert_eq!(parse_custom("", 350), None);
        assert_eq!(parse_custom("   ", 350), None);
        assert_eq!(parse_custom("a, b, -", 350), None);
        assert_eq!(parse_custom("1,2,3", 2), None);
    }

    #[test]
    fn parse_rejects_overflowing_token() {
        assert_eq!(parse_custom("99999999999999999999999, 4", 350), Some(vec![4]));
    }
}
