//! Bubble sort.

use crate::event::{Trace, Tracer};
use crate::{Error, Kernel, Result, Value};

/// Adjacent-exchange sort. Each outer pass bubbles the largest remaining
/// element to the end of the unsorted prefix and finalizes that slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bubble;

impl Kernel for Bubble {
    fn trace(&self, input: &[Value]) -> Result<Trace> {
        if input.is_empty() {
            return Err(Error::empty("bubble sort"));
        }

        let mut t = Tracer::new(input);
        let n = t.len();

        for i in 0..n - 1 {
            for j in 0..n - i - 1 {
                t.compare(j, j + 1);
                if t.get(j) > t.get(j + 1) {
                    t.swap(j, j + 1);
                }
            }
            t.finalize(n - 1 - i);
        }
        t.finalize(0);

        Ok(t.finish())
    }
}
