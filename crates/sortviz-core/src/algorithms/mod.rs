#![forbid(unsafe_code)]

//! Step producers for the six supported algorithms.
//!
//! Each producer is an explicit state machine. Recursion (merge, quick) and
//! sift-down loops (heap) are unrolled into work stacks so that a producer
//! can be suspended after every emitted step.
//!
//! # Laziness
//!
//! [`StepProducer::next_step`] receives the *live* canonical array each
//! time. Every data-dependent decision (swap or not, new minimum, where the
//! key lands) is taken when the step that depends on it is produced, after
//! all earlier steps have been applied. A producer never caches array
//! values beyond the single working value the textbook algorithm keeps in a
//! register (insertion key, quick pivot, merge buffer).
//!
//! # Termination
//!
//! Producers emit [`Step::Done`] exactly once at the end and keep returning
//! it if polled again. Arrays of length 0 or 1 produce `Done` immediately.

mod bubble;
mod heap;
mod insertion;
mod merge;
mod quick;
mod selection;

pub use bubble::BubbleSort;
pub use heap::HeapSort;
pub use insertion::InsertionSort;
pub use merge::MergeSort;
pub use quick::QuickSort;
pub use selection::SelectionSort;

use crate::algorithm::Algorithm;
use crate::error::EngineFailure;
use crate::step::Step;

/// Lazy, finite, non-restartable sequence of [`Step`]s.
pub trait StepProducer: Send {
    /// Compute the next step against the current array contents.
    ///
    /// `array` must be the array every previously returned step has been
    /// applied to, in order.
    fn next_step(&mut self, array: &[u32]) -> Step;
}

/// Run `algorithm` to completion on `array` without delays, returning every
/// step in production order (including the final `Done`).
///
/// # Errors
///
/// Propagates [`EngineFailure`] from step application.
pub fn replay(algorithm: Algorithm, array: &mut [u32]) -> Result<Vec<Step>, EngineFailure> {
    let mut producer = algorithm.producer(array.len());
    let mut steps = Vec::new();
    loop {
        let step = producer.next_step(array);
        step.apply(array)?;
        let done = step == Step::Done;
        steps.push(step);
        if done {
            return Ok(steps);
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Sort `input` with `algorithm`, returning the final array and steps.
    pub(crate) fn run(algorithm: Algorithm, input: &[u32]) -> (Vec<u32>, Vec<Step>) {
        let mut array = input.to_vec();
        let steps = replay(algorithm, &mut array).expect("replay failed");
        (array, steps)
    }

    /// Number of `Swap` steps, including ones between equal values.
    pub(crate) fn swap_count(steps: &[Step]) -> usize {
        steps
            .iter()
            .filter(|s| matches!(s, Step::Swap(..)))
            .count()
    }

    pub(crate) fn sorted(input: &[u32]) -> Vec<u32> {
        let mut expected = input.to_vec();
        expected.sort_unstable();
        expected
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn trivial_arrays_yield_only_done() {
        for algorithm in Algorithm::ALL {
            for input in [&[][..], &[7][..]] {
                let (array, steps) = run(algorithm, input);
                assert_eq!(steps, vec![Step::Done], "{algorithm} on {input:?}");
                assert_eq!(array, input);
            }
        }
    }

    #[test]
    fn every_algorithm_sorts_the_reference_input() {
        let input = [5, 3, 4, 1, 2];
        for algorithm in Algorithm::ALL {
            let (array, steps) = run(algorithm, &input);
            assert_eq!(array, [1, 2, 3, 4, 5], "{algorithm}");
            assert_eq!(steps.last(), Some(&Step::Done));
        }
    }

    #[test]
    fn done_is_sticky() {
        for algorithm in Algorithm::ALL {
            let mut array = vec![2, 1];
            let mut producer = algorithm.producer(array.len());
            loop {
                let step = producer.next_step(&array);
                step.apply(&mut array).unwrap();
                if step == Step::Done {
                    break;
                }
            }
            assert_eq!(producer.next_step(&array), Step::Done);
        }
    }

    #[test]
    fn all_equal_arrays_terminate_sorted() {
        let input = [9u32; 12];
        for algorithm in Algorithm::ALL {
            let (array, _) = run(algorithm, &input);
            assert_eq!(array, input);
        }
    }

    #[test]
    fn reverse_sorted_input() {
        let input: Vec<u32> = (1..=25).rev().collect();
        for algorithm in Algorithm::ALL {
            let (array, _) = run(algorithm, &input);
            assert_eq!(array, sorted(&input), "{algorithm}");
        }
    }
}
