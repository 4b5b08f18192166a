#![forbid(unsafe_code)]

use super::StepProducer;
use crate::step::{Role, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Compare,
    Exchange,
    SealPass,
    SealFirst,
    Finished,
}

/// Adjacent compare-and-swap over a shrinking unsorted prefix.
///
/// Equal neighbours are never swapped, so the sort is stable. After pass
/// `p` the last `p + 1` positions are marked sorted.
#[derive(Debug, Clone)]
pub struct BubbleSort {
    len: usize,
    pass: usize,
    j: usize,
    phase: Phase,
}

impl BubbleSort {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len,
            pass: 0,
            j: 0,
            phase: if len < 2 {
                Phase::Finished
            } else {
                Phase::Compare
            },
        }
    }
}

impl StepProducer for BubbleSort {
    fn next_step(&mut self, array: &[u32]) -> Step {
        loop {
            match self.phase {
                Phase::Compare => {
                    if self.pass >= self.len - 1 {
                        self.phase = Phase::SealFirst;
                    } else if self.j >= self.len - self.pass - 1 {
                        self.phase = Phase::SealPass;
                    } else {
                        self.phase = Phase::Exchange;
                        return Step::Compare(self.j, self.j + 1);
                    }
                }
                Phase::Exchange => {
                    let j = self.j;
                    self.j += 1;
                    self.phase = Phase::Compare;
                    if array[j] > array[j + 1] {
                        return Step::Swap(j, j + 1);
                    }
                }
                Phase::SealPass => {
                    let settled = self.len - self.pass - 1;
                    self.pass += 1;
                    self.j = 0;
                    self.phase = Phase::Compare;
                    return Step::mark(settled, Role::Sorted);
                }
                Phase::SealFirst => {
                    self.phase = Phase::Finished;
                    return Step::mark(0, Role::Sorted);
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

    fn inversions(input: &[u32]) -> usize {
        (0..input.len())
            .flat_map(|i| (i + 1..input.len()).map(move |j| (i, j)))
            .filter(|&(i, j)| input[i] > input[j])
            .count()
    }

    #[test]
    fn reference_input_swaps_once_per_inversion() {
        let input = [5, 3, 4, 1, 2];
        let (array, steps) = run(Algorithm::Bubble, &input);
        assert_eq!(array, [1, 2, 3, 4, 5]);
        assert_eq!(inversions(&input), 8);
        assert_eq!(swap_count(&steps), 8);
    }

    #[test]
    fn first_steps_compare_then_swap() {
        let (_, steps) = run(Algorithm::Bubble, &[2, 1, 3]);
        assert_eq!(
            &steps[..4],
            &[
                Step::Compare(0, 1),
                Step::Swap(0, 1),
                Step::Compare(1, 2),
                Step::mark(2, Role::Sorted),
            ]
        );
    }

    #[test]
    fn equal_neighbours_are_never_swapped() {
        let (_, steps) = run(Algorithm::Bubble, &[4, 4, 4, 4]);
        assert_eq!(swap_count(&steps), 0);
    }

    #[test]
    fn sorted_input_needs_no_swaps() {
        let input: Vec<u32> = (20..60).collect();
        let (array, steps) = run(Algorithm::Bubble, &input);
        assert_eq!(array, input);
        assert_eq!(swap_count(&steps), 0);
    }

    #[test]
    fn every_position_gets_sealed() {
        let (_, steps) = run(Algorithm::Bubble, &[3, 1, 2, 5, 4]);
        let mut sealed: Vec<usize> = steps
            .iter()
            .filter_map(|s| match s {
                Step::Highlight(idx, Role::Sorted) => Some(idx[0]),
                _ => None,
            })
            .collect();
        sealed.sort_unstable();
        assert_eq!(sealed, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn swap_count_matches_inversions_for_mixed_input() {
        let input = [9, 2, 7, 2, 5, 1, 8, 8, 3];
        let (array, steps) = run(Algorithm::Bubble, &input);
        assert_eq!(array, sorted(&input));
        assert_eq!(swap_count(&steps), inversions(&input));
    }
}
