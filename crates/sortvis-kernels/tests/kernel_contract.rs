//! Property tests for the kernel contract.

use proptest::prelude::*;
use sortvis_kernels::{AlgorithmKind, Event, Value};

fn sequences() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(-50i64..300, 0..64)
}

fn kinds() -> impl Strategy<Value = AlgorithmKind> {
    prop::sample::select(AlgorithmKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn replay_sorts_input(input in sequences(), kind in kinds()) {
        let trace = kind.trace(&input).unwrap();
        let mut expected = input.clone();
        expected.sort_unstable();
        prop_assert_eq!(trace.replay(&input), expected);
    }

    #[test]
    fn traces_are_deterministic(input in sequences(), kind in kinds()) {
        prop_assert_eq!(kind.trace(&input).unwrap(), kind.trace(&input).unwrap());
    }

    #[test]
    fn indices_stay_in_bounds(input in sequences(), kind in kinds()) {
        let n = input.len();
        for event in kind.trace(&input).unwrap().iter() {
            match *event {
                Event::Compare { i, j } | Event::Swap { i, j } => {
                    prop_assert!(i < n && j < n);
                }
                Event::Assign { index, .. } | Event::Finalize { index } => {
                    prop_assert!(index < n);
                }
                Event::FinalizeRange { start, end } => {
                    prop_assert!(start <= end && end <= n);
                }
            }
        }
    }

    #[test]
    fn summary_matches_event_classes(input in sequences(), kind in kinds()) {
        let trace = kind.trace(&input).unwrap();
        let summary = trace.summary();
        let compares = trace.iter().filter(|e| e.is_compare()).count() as u64;
        let mutations = trace.iter().filter(|e| e.is_mutation()).count() as u64;
        prop_assert_eq!(summary.comparisons, compares);
        prop_assert_eq!(summary.mutations, mutations);
        prop_assert_eq!(summary.total, trace.len() as u64);
    }

    #[test]
    fn every_index_is_finalized(input in sequences(), kind in kinds()) {
        let trace = kind.trace(&input).unwrap();
        let mut done = vec![false; input.len()];
        for range in trace.iter().filter_map(Event::finalized) {
            for index in range {
                done[index] = true;
            }
        }
        prop_assert!(done.into_iter().all(|d| d));
    }

    #[test]
    fn finalized_slots_are_never_written_again(
        input in sequences(),
        kind in prop::sample::select(vec![
            AlgorithmKind::Bubble,
            AlgorithmKind::Selection,
            AlgorithmKind::Quick,
        ]),
    ) {
        let trace = kind.trace(&input).unwrap();
        let mut finalized = vec![0u32; input.len()];
        for event in trace.iter() {
            match *event {
                Event::Swap { i, j } => {
                    prop_assert_eq!(finalized[i], 0);
                    prop_assert_eq!(finalized[j], 0);
                }
                Event::Assign { index, .. } => prop_assert_eq!(finalized[index], 0),
                _ => {}
            }
            if let Some(range) = event.finalized() {
                for index in range {
                    finalized[index] += 1;
                }
            }
        }
        prop_assert!(finalized.into_iter().all(|count| count <= 1));
    }

    #[test]
    fn refinalizing_does_not_change_outcome(input in sequences(), kind in kinds()) {
        let trace = kind.trace(&input).unwrap();
        let mut sequence = input.clone();
        for event in trace.iter() {
            event.apply(&mut sequence);
            if event.finalized().is_some() {
                event.apply(&mut sequence);
            }
        }
        prop_assert_eq!(sequence, trace.replay(&input));
    }
}

#[test]
fn bubble_comparisons_are_quadratic_regardless_of_order() {
    let input: Vec<Value> = (0..20).collect();
    let trace = AlgorithmKind::Bubble.trace(&input).unwrap();
    assert_eq!(trace.summary().comparisons, 190);
}

#[test]
fn merge_sorts_duplicates() {
    let input = [2, 1, 2, 1, 2];
    let trace = AlgorithmKind::Merge.trace(&input).unwrap();
    assert_eq!(trace.replay(&input), vec![1, 1, 2, 2, 2]);
}
