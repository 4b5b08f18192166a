#![forbid(unsafe_code)]

use super::StepProducer;
use crate::step::{Role, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Begin,
    Scan,
    Judge,
    PlacePivot,
    SealPivot,
}

/// Quicksort with the Lomuto partition scheme and a last-element pivot.
///
/// Elements strictly less than the pivot move to the front of the range;
/// the pivot is then swapped into the boundary and both sides (pivot
/// excluded) are sorted, left first. Swaps of a position with itself are
/// not emitted.
#[derive(Debug, Clone)]
pub struct QuickSort {
    ranges: Vec<(usize, usize)>,
    low: usize,
    high: usize,
    pivot: u32,
    store: usize,
    j: usize,
    phase: Phase,
}

impl QuickSort {
    #[must_use]
    pub fn new(len: usize) -> Self {
        let mut ranges = Vec::new();
        if len >= 2 {
            ranges.push((0, len - 1));
        }
        Self {
            ranges,
            low: 0,
            high: 0,
            pivot: 0,
            store: 0,
            j: 0,
            phase: Phase::Begin,
        }
    }
}

impl StepProducer for QuickSort {
    fn next_step(&mut self, array: &[u32]) -> Step {
        loop {
            match self.phase {
                Phase::Begin => {
                    let Some((low, high)) = self.ranges.pop() else {
                        return Step::Done;
                    };
                    if low == high {
                        return Step::mark(low, Role::Sorted);
                    }
                    self.low = low;
                    self.high = high;
                    self.pivot = array[high];
                    self.store = low;
                    self.j = low;
                    self.phase = Phase::Scan;
                    return Step::mark(high, Role::Pivot);
                }
                Phase::Scan => {
                    if self.j >= self.high {
                        self.phase = Phase::PlacePivot;
                    } else {
                        self.phase = Phase::Judge;
                        return Step::Compare(self.j, self.high);
                    }
                }
                Phase::Judge => {
                    let j = self.j;
                    self.j += 1;
                    self.phase = Phase::Scan;
                    if array[j] < self.pivot {
                        let store = self.store;
                        self.store += 1;
                        if store != j {
                            return Step::Swap(store, j);
                        }
                    }
                }
                Phase::PlacePivot => {
                    self.phase = Phase::SealPivot;
                    if self.store != self.high {
                        return Step::Swap(self.store, self.high);
                    }
                }
                Phase::SealPivot => {
                    let boundary = self.store;
                    // Right side pushed first so the left side runs first.
                    if boundary < self.high {
                        self.ranges.push((boundary + 1, self.high));
                    }
                    if boundary > self.low {
                        self.ranges.push((self.low, boundary - 1));
                    }
                    self.phase = Phase::Begin;
                    return Step::mark(boundary, Role::Sorted);
                }
            }
        }
    }
}
