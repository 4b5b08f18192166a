#![forbid(unsafe_code)]

use super::StepProducer;
use crate::step::{Role, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Build,
    Extract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Build,
    Extract,
    SealExtracted,
    SiftBegin,
    SiftLeft,
    JudgeLeft,
    SiftRight,
    JudgeRight,
    SiftSwap,
    Finished,
}

/// Heapsort over a max-heap.
///
/// The heap is built bottom-up by sifting down every internal node from
/// `floor(n/2) - 1` to the root. The root is then swapped with the last
/// heap position, the boundary shrinks, and the root is sifted down again.
/// A child replaces the current largest only when strictly greater, so ties
/// favour the parent and then the left child.
#[derive(Debug, Clone)]
pub struct HeapSort {
    len: usize,
    /// Internal nodes still to heapify during the build stage.
    unbuilt: usize,
    /// Exclusive end of the heap during extraction.
    end: usize,
    /// Heap size the active sift-down is bounded by.
    size: usize,
    node: usize,
    largest: usize,
    stage: Stage,
    phase: Phase,
}

impl HeapSort {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len,
            unbuilt: len / 2,
            end: len,
            size: len,
            node: 0,
            largest: 0,
            stage: Stage::Build,
            phase: if len < 2 {
                Phase::Finished
            } else {
                Phase::Build
            },
        }
    }

    fn begin_sift(&mut self, node: usize, size: usize) {
        self.node = node;
        self.size = size;
        self.phase = Phase::SiftBegin;
    }
}

impl StepProducer for HeapSort {
    fn next_step(&mut self, array: &[u32]) -> Step {
        loop {
            match self.phase {
                Phase::Build => {
                    if self.unbuilt > 0 {
                        self.unbuilt -= 1;
                        self.begin_sift(self.unbuilt, self.len);
                    } else {
                        self.stage = Stage::Extract;
                        self.phase = Phase::Extract;
                    }
                }
                Phase::Extract => {
                    if self.end > 1 {
                        self.end -= 1;
                        self.phase = Phase::SealExtracted;
                        return Step::Swap(0, self.end);
                    }
                    self.phase = Phase::Finished;
                    return Step::mark(0, Role::Sorted);
                }
                Phase::SealExtracted => {
                    let settled = self.end;
                    self.begin_sift(0, self.end);
                    return Step::mark(settled, Role::Sorted);
                }
                Phase::SiftBegin => {
                    self.largest = self.node;
                    self.phase = Phase::SiftLeft;
                    return Step::mark(self.node, Role::Active);
                }
                Phase::SiftLeft => {
                    let left = 2 * self.node + 1;
                    if left < self.size {
                        self.phase = Phase::JudgeLeft;
                        return Step::Compare(self.largest, left);
                    }
                    self.phase = Phase::SiftSwap;
                }
                Phase::JudgeLeft => {
                    let left = 2 * self.node + 1;
                    if array[left] > array[self.largest] {
                        self.largest = left;
                    }
                    self.phase = Phase::SiftRight;
                }
                Phase::SiftRight => {
                    let right = 2 * self.node + 2;
                    if right < self.size {
                        self.phase = Phase::JudgeRight;
                        return Step::Compare(self.largest, right);
                    }
                    self.phase = Phase::SiftSwap;
                }
                Phase::JudgeRight => {
                    let right = 2 * self.node + 2;
                    if array[right] > array[self.largest] {
                        self.largest = right;
                    }
                    self.phase = Phase::SiftSwap;
                }
                Phase::SiftSwap => {
                    if self.largest != self.node {
                        let parent = self.node;
                        self.node = self.largest;
                        self.phase = Phase::SiftBegin;
                        return Step::Swap(parent, self.largest);
                    }
                    self.phase = match self.stage {
                        Stage::Build => Phase::Build,
                        Stage::Extract => Phase::Extract,
                    };
                }
                Phase::Finished => return Step::Done,
            }
        }
    }
}
