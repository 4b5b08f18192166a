#![forbid(unsafe_code)]

use super::StepProducer;
use crate::step::{Role, Step};

/// Pending unit of work on the explicit recursion stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Sort { left: usize, right: usize },
    Merge { left: usize, mid: usize, right: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Mark,
    Compare,
    Take,
    Write,
}

/// Merge of `left..=mid` with `mid+1..=right` in progress.
#[derive(Debug, Clone)]
struct ActiveMerge {
    left: usize,
    mid: usize,
    right: usize,
    i: usize,
    j: usize,
    k: usize,
    merged: Vec<u32>,
    phase: Phase,
}

impl ActiveMerge {
    fn new(left: usize, mid: usize, right: usize) -> Self {
        Self {
            left,
            mid,
            right,
            i: left,
            j: mid + 1,
            k: left,
            merged: Vec::with_capacity(right - left + 1),
            phase: Phase::Mark,
        }
    }

    /// Next step of this merge, or `None` once the run is written back.
    fn next_step(&mut self, array: &[u32]) -> Option<Step> {
        loop {
            match self.phase {
                Phase::Mark => {
                    self.phase = Phase::Compare;
                    return Some(Step::mark_span(self.left, self.right, Role::Active));
                }
                Phase::Compare => {
                    if self.i <= self.mid && self.j <= self.right {
                        self.phase = Phase::Take;
                        return Some(Step::Compare(self.i, self.j));
                    }
                    // One run is exhausted; the other is copied as-is.
                    self.merged.extend_from_slice(&array[self.i..=self.mid]);
                    self.merged.extend_from_slice(&array[self.j..=self.right]);
                    self.i = self.mid + 1;
                    self.j = self.right + 1;
                    self.phase = Phase::Write;
                }
                Phase::Take => {
                    // `<=` keeps equal elements in left-run order.
                    if array[self.i] <= array[self.j] {
                        self.merged.push(array[self.i]);
                        self.i += 1;
                    } else {
                        self.merged.push(array[self.j]);
                        self.j += 1;
                    }
                    self.phase = Phase::Compare;
                }
                Phase::Write => {
                    if self.k > self.right {
                        return None;
                    }
                    let k = self.k;
                    self.k += 1;
                    return Some(Step::Overwrite(k, self.merged[k - self.left]));
                }
            }
        }
    }
}

/// Top-down merge sort, split at `floor((left + right) / 2)`.
///
/// Merged values are buffered and written back with `Overwrite`, one
/// position per step, as the textbook version copies its temp array.
#[derive(Debug, Clone)]
pub struct MergeSort {
    stack: Vec<Task>,
    active: Option<ActiveMerge>,
}

impl MergeSort {
    #[must_use]
    pub fn new(len: usize) -> Self {
        let mut stack = Vec::new();
        if len >= 2 {
            stack.push(Task::Sort {
                left: 0,
                right: len - 1,
            });
        }
        Self {
            stack,
            active: None,
        }
    }
}

impl StepProducer for MergeSort {
    fn next_step(&mut self, array: &[u32]) -> Step {
        loop {
            if let Some(active) = self.active.as_mut() {
                if let Some(step) = active.next_step(array) {
                    return step;
                }
                self.active = None;
            }

            match self.stack.pop() {
                None => return Step::Done,
                Some(Task::Sort { left, right }) => {
                    if left >= right {
                        continue;
                    }
                    let mid = left + (right - left) / 2;
                    // Pushed in reverse: left half, then right half, then merge.
                    self.stack.push(Task::Merge { left, mid, right });
                    self.stack.push(Task::Sort {
                        left: mid + 1,
                        right,
                    });
                    self.stack.push(Task::Sort { left, right: mid });
                }
                Some(Task::Merge { left, mid, right }) => {
                    self.active = Some(ActiveMerge::new(left, mid, right));
                }
            }
        }
    }
}
