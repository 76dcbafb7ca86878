//! Selection sort.

use crate::event::{Trace, Tracer};
use crate::{Error, Kernel, Result, Value};

/// Selection sort. The inner scan compares each candidate against the
/// element at the *current* minimum index, which moves as smaller values
/// are found.
#[derive(Debug, Clone, Copy, Default)]
pub struct Selection;

impl Kernel for Selection {
    fn trace(&self, input: &[Value]) -> Result<Trace> {
        if input.is_empty() {
            return Err(Error::empty("selection sort"));
        }

        let mut t = Tracer::new(input);
        let n = t.len();

        for i in 0..n - 1 {
            let mut min_index = i;
            for j in i + 1..n {
                t.compare(min_index, j);
                if t.get(j) < t.get(min_index) {
                    min_index = j;
                }
            }
            if min_index != i {
                t.swap(i, min_index);
            }
            t.finalize(i);
        }
        t.finalize(n - 1);

        Ok(t.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Event;

    #[test]
    fn compares_against_moving_minimum() {
        let trace = Selection.trace(&[3, 2, 1]).unwrap();
        let compares: Vec<_> = trace
            .iter()
            .filter(|e| e.is_compare())
            .copied()
            .collect();

        assert_eq!(
            compares,
            vec![
                Event::Compare { i: 0, j: 1 },
                Event::Compare { i: 1, j: 2 },
                Event::Compare { i: 1, j: 2 },
            ]
        );
    }

    #[test]
    fn swaps_only_when_minimum_moved() {
        let trace = Selection.trace(&[1, 3, 2]).unwrap();
        assert_eq!(trace.summary().mutations, 1);
        assert_eq!(trace.replay(&[1, 3, 2]), vec![1, 2, 3]);
    }

    #[test]
    fn comparison_count_is_triangular() {
        let input: Vec<_> = (0..10).rev().collect();
        let trace = Selection.trace(&input).unwrap();
        assert_eq!(trace.summary().comparisons, 45);
    }
}
