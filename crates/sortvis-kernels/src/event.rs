//! Trace events emitted by the instrumented kernels.
//!
//! A kernel never reports progress through side effects. It records every
//! comparison, every write and every "this slot is done" decision as an
//! [`Event`], in the order the algorithm performs them. The resulting
//! [`Trace`] can be replayed against a copy of the input to reproduce the
//! sorted output, which is exactly what the playback controller does one
//! event at a time.

use std::ops::Range;

use crate::Value;

/// One observable step of a sorting algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum Event {
    /// Elements at `i` and `j` were compared. No mutation.
    Compare { i: usize, j: usize },

    /// Elements at `i` and `j` were exchanged.
    Swap { i: usize, j: usize },

    /// Position `index` was overwritten with `value`.
    Assign { index: usize, value: Value },

    /// `index` holds its final value.
    Finalize { index: usize },

    /// Every index in `start..end` holds its final value.
    FinalizeRange { start: usize, end: usize },
}

impl Event {
    /// Whether this event writes to the sequence.
    #[inline]
    pub const fn is_mutation(&self) -> bool {
        matches!(self, Event::Swap { .. } | Event::Assign { .. })
    }

    /// Whether this event is a comparison.
    #[inline]
    pub const fn is_compare(&self) -> bool {
        matches!(self, Event::Compare { .. })
    }

    /// The index range this event finalizes, if any.
    pub fn finalized(&self) -> Option<Range<usize>> {
        match *self {
            Event::Finalize { index } => Some(index..index + 1),
            Event::FinalizeRange { start, end } => Some(start..end),
            _ => None,
        }
    }

    /// Apply this event to `sequence`.
    ///
    /// Compare and finalize events leave the sequence untouched.
    ///
    /// # Panics
    ///
    /// Panics if a mutation refers to an index outside `sequence`. Traces
    /// produced by this crate only reference indices of their own input.
    pub fn apply(&self, sequence: &mut [Value]) {
        match *self {
            Event::Swap { i, j } => sequence.swap(i, j),
            Event::Assign { index, value } => sequence[index] = value,
            Event::Compare { .. } | Event::Finalize { .. } | Event::FinalizeRange { .. } => {}
        }
    }
}

/// Counts of each event class in a trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceSummary {
    pub comparisons: u64,
    pub mutations: u64,
    pub finalizations: u64,
    pub total: u64,
}

/// The complete, ordered event trace of one kernel run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    events: Vec<Event>,
}

impl Trace {
    /// Trace of a sequence that is already sorted by length alone.
    pub(crate) fn trivial(len: usize) -> Self {
        Self {
            events: vec![Event::FinalizeRange { start: 0, end: len }],
        }
    }

    /// All events in emission order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the trace holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate over events in emission order.
    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Replay every event against a copy of `input`.
    pub fn replay(&self, input: &[Value]) -> Vec<Value> {
        let mut sequence = input.to_vec();
        for event in &self.events {
            event.apply(&mut sequence);
        }
        sequence
    }

    /// Tally the trace.
    pub fn summary(&self) -> TraceSummary {
        self.events
            .iter()
            .fold(TraceSummary::default(), |mut acc, event| {
                match event {
                    Event::Compare { .. } => acc.comparisons += 1,
                    Event::Swap { .. } | Event::Assign { .. } => acc.mutations += 1,
                    Event::Finalize { .. } | Event::FinalizeRange { .. } => acc.finalizations += 1,
                }
                acc.total += 1;
                acc
            })
    }
}

impl IntoIterator for Trace {
    type Item = Event;
    type IntoIter = std::vec::IntoIter<Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Working copy plus event log used by the kernels while they sort.
///
/// Kernels read values through [`Tracer::get`] and mutate only through the
/// recording methods, so the log and the working copy never diverge.
pub(crate) struct Tracer {
    data: Vec<Value>,
    events: Vec<Event>,
}

impl Tracer {
    pub(crate) fn new(input: &[Value]) -> Self {
        Self {
            data: input.to_vec(),
            events: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> Value {
        self.data[index]
    }

    pub(crate) fn slice(&self, range: Range<usize>) -> Vec<Value> {
        self.data[range].to_vec()
    }

    pub(crate) fn compare(&mut self, i: usize, j: usize) {
        self.events.push(Event::Compare { i, j });
    }

    pub(crate) fn swap(&mut self, i: usize, j: usize) {
        self.data.swap(i, j);
        self.events.push(Event::Swap { i, j });
    }

    pub(crate) fn assign(&mut self, index: usize, value: Value) {
        self.data[index] = value;
        self.events.push(Event::Assign { index, value });
    }

    pub(crate) fn finalize(&mut self, index: usize) {
        self.events.push(Event::Finalize { index });
    }

    pub(crate) fn finalize_range(&mut self, range: Range<usize>) {
        self.events.push(Event::FinalizeRange {
            start: range.start,
            end: range.end,
        });
    }

    pub(crate) fn finish(self) -> Trace {
        Trace {
            events: self.events,
        }
    }
}
