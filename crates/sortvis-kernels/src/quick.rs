//! Quicksort with Lomuto partitioning.

use crate::event::{Trace, Tracer};
use crate::{Error, Kernel, Result, Value};

/// Quicksort using the last element of each range as pivot.
///
/// After partitioning, the pivot's resting index is finalized and the
/// left then right sub-ranges are sorted. Single-element ranges reached by
/// the recursion are finalized directly so every index ends up finalized.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quick;

impl Kernel for Quick {
    fn trace(&self, input: &[Value]) -> Result<Trace> {
        if input.is_empty() {
            return Err(Error::empty("quick sort"));
        }

        let mut t = Tracer::new(input);
        let last = t.len() - 1;
        sort_range(&mut t, 0, last);
        Ok(t.finish())
    }
}

fn sort_range(t: &mut Tracer, low: usize, high: usize) {
    if low < high {
        let pivot = partition(t, low, high);
        if pivot > low {
            sort_range(t, low, pivot - 1);
        }
        sort_range(t, pivot + 1, high);
    } else if low == high {
        t.finalize(low);
    }
}

/// Partition `[low, high]` around `array[high]` and return the pivot's index.
fn partition(t: &mut Tracer, low: usize, high: usize) -> usize {
    let pivot = t.get(high);
    // Next slot for an element smaller than the pivot (Lomuto's `i + 1`).
    let mut store = low;

    for j in low..high {
        t.compare(j, high);
        if t.get(j) < pivot {
            if store != j {
                t.swap(store, j);
            }
            store += 1;
        }
    }

    if store != high {
        t.swap(store, high);
    }
    t.finalize(store);
    store
}
