#![forbid(unsafe_code)]

use super::StepProducer;
use crate::step::{Role, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Begin,
    Scan,
    Judge,
    Place,
    Seal,
    Finished,
}

/// Scan the unsorted suffix for its minimum, then swap it into place.
///
/// A new minimum must be strictly smaller, so the first of several equal
/// minima wins. At most one swap per pass.
#[derive(Debug, Clone)]
pub struct SelectionSort {
    len: usize,
    i: usize,
    j: usize,
    min: usize,
    phase: Phase,
}

impl SelectionSort {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len,
            i: 0,
            j: 0,
            min: 0,
            phase: if len < 2 {
                Phase::Finished
            } else {
                Phase::Begin
            },
        }
    }
}

impl StepProducer for SelectionSort {
    fn next_step(&mut self, array: &[u32]) -> Step {
        loop {
            match self.phase {
                Phase::Begin => {
                    self.min = self.i;
                    self.j = self.i + 1;
                    self.phase = Phase::Scan;
                    return Step::mark(self.i, Role::Active);
                }
                Phase::Scan => {
                    if self.j >= self.len {
                        self.phase = Phase::Place;
                    } else {
                        self.phase = Phase::Judge;
                        return Step::Compare(self.min, self.j);
                    }
                }
                Phase::Judge => {
                    let j = self.j;
                    self.j += 1;
                    self.phase = Phase::Scan;
                    if array[j] < array[self.min] {
                        self.min = j;
                        return Step::mark(j, Role::Candidate);
                    }
                }
                Phase::Place => {
                    self.phase = Phase::Seal;
                    if self.min != self.i {
                        return Step::Swap(self.i, self.min);
                    }
                }
                Phase::Seal => {
                    let settled = self.i;
                    self.i += 1;
                    self.phase = if self.i >= self.len {
                        Phase::Finished
                    } else {
                        Phase::Begin
                    };
                    return Step::mark(settled, Role::Sorted);
                }
                Phase::Finished => return Step::Done,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::algorithm::Algorithm;
    use crate::step::{Role, Step};

    #[test]
    fn one_swap_per_pass_at_most() {
        let input = [5, 3, 4, 1, 2];
        let (array, steps) = run(Algorithm::Selection, &input);
        assert_eq!(array, [1, 2, 3, 4, 5]);
        assert!(swap_count(&steps) <= input.len() - 1);
    }

    #[test]
    fn first_minimum_wins_on_ties() {
        // Minimum 1 appears at indices 1 and 3; the first must be chosen.
        let (_, steps) = run(Algorithm::Selection, &[4, 1, 6, 1]);
        let first_swap = steps.iter().find(|s| matches!(s, Step::Swap(..)));
        assert_eq!(first_swap, Some(&Step::Swap(0, 1)));
        let candidates: Vec<_> = steps
            .iter()
            .take_while(|s| !matches!(s, Step::Swap(..)))
            .filter(|s| matches!(s, Step::Highlight(_, Role::Candidate)))
            .collect();
        assert_eq!(candidates, [&Step::mark(1, Role::Candidate)]);
    }

    #[test]
    fn all_equal_input_never_swaps() {
        let (_, steps) = run(Algorithm::Selection, &[3, 3, 3, 3, 3]);
        assert_eq!(swap_count(&steps), 0);
    }

    #[test]
    fn pass_begins_with_active_mark() {
        let (_, steps) = run(Algorithm::Selection, &[2, 1]);
        assert_eq!(
            steps,
            vec![
                Step::mark(0, Role::Active),
                Step::Compare(0, 1),
                Step::mark(1, Role::Candidate),
                Step::Swap(0, 1),
                Step::mark(0, Role::Sorted),
                Step::mark(1, Role::Active),
                Step::mark(1, Role::Sorted),
                Step::Done,
            ]
        );
    }

    #[test]
    fn duplicates_are_sorted() {
        let input = [8, 3, 8, 1, 3, 9, 1];
        let (array, _) = run(Algorithm::Selection, &input);
        assert_eq!(array, sorted(&input));
    }
}
