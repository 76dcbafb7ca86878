//! Kernel contract and algorithm selection.

use std::fmt;
use std::str::FromStr;

use crate::event::Trace;
use crate::{Bubble, Error, Insertion, Merge, Quick, Result, Selection, Value};

/// An instrumented sorting procedure.
///
/// Given an input of length `n`, a kernel returns a finite trace such that
/// replaying its mutations against a copy of the input yields the input in
/// ascending order. Traces are deterministic: the same input always yields
/// the same events.
pub trait Kernel {
    /// Produce the event trace for `input`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `input` is empty.
    fn trace(&self, input: &[Value]) -> Result<Trace>;
}

/// The five supported algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum AlgorithmKind {
    #[default]
    Bubble,
    Selection,
    Insertion,
    Merge,
    Quick,
}

impl AlgorithmKind {
    /// Every algorithm, in menu order.
    pub const ALL: [AlgorithmKind; 5] = [
        AlgorithmKind::Bubble,
        AlgorithmKind::Selection,
        AlgorithmKind::Insertion,
        AlgorithmKind::Merge,
        AlgorithmKind::Quick,
    ];

    /// Short identifier, e.g. `"bubble"`.
    pub const fn id(&self) -> &'static str {
        match self {
            AlgorithmKind::Bubble => "bubble",
            AlgorithmKind::Selection => "selection",
            AlgorithmKind::Insertion => "insertion",
            AlgorithmKind::Merge => "merge",
            AlgorithmKind::Quick => "quick",
        }
    }

    /// Display name, e.g. `"Bubble Sort"`.
    pub const fn name(&self) -> &'static str {
        match self {
            AlgorithmKind::Bubble => "Bubble Sort",
            AlgorithmKind::Selection => "Selection Sort",
            AlgorithmKind::Insertion => "Insertion Sort",
            AlgorithmKind::Merge => "Merge Sort",
            AlgorithmKind::Quick => "Quick Sort",
        }
    }

    /// The kernel implementing this algorithm.
    pub fn kernel(&self) -> &'static dyn Kernel {
        match self {
            AlgorithmKind::Bubble => &Bubble,
            AlgorithmKind::Selection => &Selection,
            AlgorithmKind::Insertion => &Insertion,
            AlgorithmKind::Merge => &Merge,
            AlgorithmKind::Quick => &Quick,
        }
    }

    /// Trace `input` with this algorithm.
    ///
    /// Inputs of length 0 or 1 are already sorted and produce a single
    /// `FinalizeRange` covering the whole input.
    ///
    /// # Errors
    ///
    /// Propagates kernel errors; none occur for inputs handled here.
    pub fn trace(&self, input: &[Value]) -> Result<Trace> {
        if input.len() <= 1 {
            return Ok(Trace::trivial(input.len()));
        }
        self.kernel().trace(input)
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        AlgorithmKind::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(needle))
            .ok_or_else(|| Error::UnknownAlgorithm(needle.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Event;

    #[test]
    fn short_inputs_are_trivially_sorted() {
        for kind in AlgorithmKind::ALL {
            let empty = kind.trace(&[]).unwrap();
            assert_eq!(empty.events(), &[Event::FinalizeRange { start: 0, end: 0 }]);

            let single = kind.trace(&[7]).unwrap();
            assert_eq!(single.events(), &[Event::FinalizeRange { start: 0, end: 1 }]);
            assert_eq!(single.replay(&[7]), vec![7]);
        }
    }

    #[test]
    fn kernels_reject_empty_input_directly() {
        for kind in AlgorithmKind::ALL {
            assert!(matches!(
                kind.kernel().trace(&[]),
                Err(Error::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn parse_ids() {
        assert_eq!("quick".parse::<AlgorithmKind>().unwrap(), AlgorithmKind::Quick);
        assert_eq!(" Merge ".parse::<AlgorithmKind>().unwrap(), AlgorithmKind::Merge);
        assert!(matches!(
            "bogo".parse::<AlgorithmKind>(),
            Err(Error::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(AlgorithmKind::Insertion.to_string(), "Insertion Sort");
    }
}
