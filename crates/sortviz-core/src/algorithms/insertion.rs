#![forbid(unsafe_code)]

use super::StepProducer;
use crate::step::{Role, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Begin,
    Probe,
    Judge,
    Place,
    Seal,
    Finished,
}

/// Shift larger elements one slot right with `Overwrite`, then drop the key
/// into the hole.
///
/// Only strictly larger elements are shifted, so keys never pass an equal
/// value. When nothing shifts the key is already in place and no write is
/// emitted for it.
///
/// Later keys can still shift any slot of the prefix, so positions are only
/// marked sorted once the last key has been placed.
#[derive(Debug, Clone)]
pub struct InsertionSort {
    len: usize,
    i: usize,
    hole: usize,
    key: u32,
    phase: Phase,
}

impl InsertionSort {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len,
            i: 1,
            hole: 0,
            key: 0,
            phase: if len < 2 {
                Phase::Finished
            } else {
                Phase::Begin
            },
        }
    }
}

impl StepProducer for InsertionSort {
    fn next_step(&mut self, array: &[u32]) -> Step {
        loop {
            match self.phase {
                Phase::Begin => {
                    self.key = array[self.i];
                    self.hole = self.i;
                    self.phase = Phase::Probe;
                    return Step::mark(self.i, Role::Active);
                }
                Phase::Probe => {
                    if self.hole == 0 {
                        self.phase = Phase::Place;
                    } else {
                        self.phase = Phase::Judge;
                        return Step::Compare(self.hole - 1, self.hole);
                    }
                }
                Phase::Judge => {
                    let left = array[self.hole - 1];
                    if left > self.key {
                        let dst = self.hole;
                        self.hole -= 1;
                        self.phase = Phase::Probe;
                        return Step::Overwrite(dst, left);
                    }
                    self.phase = Phase::Place;
                }
                Phase::Place => {
                    self.phase = Phase::Seal;
                    if self.hole != self.i {
                        return Step::Overwrite(self.hole, self.key);
                    }
                }
                Phase::Seal => {
                    self.i += 1;
                    if self.i >= self.len {
                        self.phase = Phase::Finished;
                        return Step::mark_span(0, self.len - 1, Role::Sorted);
                    }
                    self.phase = Phase::Begin;
                }
                Phase::Finished => return Step::Done,
            }
        }
    }
}
