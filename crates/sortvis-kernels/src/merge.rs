//! Top-down merge sort.

use crate::event::{Trace, Tracer};
use crate::{Error, Kernel, Result, Value};

/// Recursive merge sort with a stable merge.
///
/// Ranges are inclusive `[left, right]` and split at `(left + right) / 2`.
/// Every output write is an `Assign`; while both runs still hold elements
/// the write is preceded by a compare of the two candidates' home slots.
#[derive(Debug, Clone, Copy, Default)]
pub struct Merge;

impl Kernel for Merge {
    fn trace(&self, input: &[Value]) -> Result<Trace> {
        if input.is_empty() {
            return Err(Error::empty("merge sort"));
        }

        let mut t = Tracer::new(input);
        let last = t.len() - 1;
        sort_range(&mut t, 0, last);
        Ok(t.finish())
    }
}

fn sort_range(t: &mut Tracer, left: usize, right: usize) {
    if left < right {
        let mid = (left + right) / 2;
        sort_range(t, left, mid);
        sort_range(t, mid + 1, right);
        merge(t, left, mid, right);
    }
}

fn merge(t: &mut Tracer, left: usize, mid: usize, right: usize) {
    let lhs = t.slice(left..mid + 1);
    let rhs = t.slice(mid + 1..right + 1);

    let (mut i, mut j, mut k) = (0, 0, left);

    while i < lhs.len() && j < rhs.len() {
        t.compare(left + i, mid + 1 + j);
        if lhs[i] <= rhs[j] {
            t.assign(k, lhs[i]);
            i += 1;
        } else {
            t.assign(k, rhs[j]);
            j += 1;
        }
        k += 1;
    }

    for &value in lhs[i..].iter().chain(&rhs[j..]) {
        t.assign(k, value);
        k += 1;
    }

    t.finalize_range(left..right + 1);
}
