//! Insertion sort.

use crate::event::{Trace, Tracer};
use crate::{Error, Kernel, Result, Value};

/// Insertion sort by rightward shifting.
///
/// Every shift is preceded by a compare of the two slots involved. The key
/// is always written back into its resting slot, even when it did not move.
/// After each outer step the whole prefix `0..=i` is finalized again.
#[derive(Debug, Clone, Copy, Default)]
pub struct Insertion;

impl Kernel for Insertion {
    fn trace(&self, input: &[Value]) -> Result<Trace> {
        if input.is_empty() {
            return Err(Error::empty("insertion sort"));
        }

        let mut t = Tracer::new(input);
        let n = t.len();

        for i in 1..n {
            let key = t.get(i);
            // `hole` is the slot the key would land in right now (j + 1).
            let mut hole = i;
            while hole > 0 && t.get(hole - 1) > key {
                t.compare(hole - 1, hole);
                let shifted = t.get(hole - 1);
                t.assign(hole, shifted);
                hole -= 1;
            }
            t.assign(hole, key);
            t.finalize_range(0..i + 1);
        }

        Ok(t.finish())
    }
}
