//! Property-based invariant tests for the step producers.
//!
//! For any input array and any algorithm:
//!
//! 1. Replaying every step leaves the array sorted ascending.
//! 2. The final array is a permutation of the input.
//! 3. Every index named by a step is in bounds.
//! 4. `Done` is emitted exactly once, last, and keeps being returned.
//! 5. Swap-only algorithms preserve the multiset after every single step.
//! 6. Bubble sort performs exactly one swap per inversion.
//! 7. Already-sorted input is never mutated by bubble or insertion sort.

use proptest::prelude::*;
use sortviz_core::{Algorithm, Step, StepProducer, replay};

// ── Helpers ─────────────────────────────────────────────────────────────

fn algorithm_strategy() -> impl Strategy<Value = Algorithm> {
    prop::sample::select(Algorithm::ALL.to_vec())
}

/// Small value domain so duplicates are common.
fn array_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..40, 0..48)
}

fn sorted(values: &[u32]) -> Vec<u32> {
    let mut out = values.to_vec();
    out.sort_unstable();
    out
}

fn inversions(values: &[u32]) -> usize {
    let mut count = 0;
    for i in 0..values.len() {
        for j in i + 1..values.len() {
            if values[i] > values[j] {
                count += 1;
            }
        }
    }
    count
}

// ═════════════════════════════════════════════════════════════════════════
// 1–3. Sortedness, permutation, bounds
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn replay_sorts_and_permutes(algorithm in algorithm_strategy(), input in array_strategy()) {
        let mut array = input.clone();
        let steps = replay(algorithm, &mut array);
        prop_assert!(steps.is_ok(), "{algorithm} rejected a step: {:?}", steps);
        prop_assert_eq!(&array, &sorted(&input), "{} failed on {:?}", algorithm, input);
    }

    #[test]
    fn step_indices_are_in_bounds(algorithm in algorithm_strategy(), input in array_strategy()) {
        let mut array = input.clone();
        let steps = replay(algorithm, &mut array).unwrap();
        for step in &steps {
            for index in step.indices() {
                prop_assert!(index < input.len(), "{algorithm}: {step:?} out of bounds");
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Termination
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn done_is_last_and_sticky(algorithm in algorithm_strategy(), input in array_strategy()) {
        let mut array = input.clone();
        let steps = replay(algorithm, &mut array).unwrap();
        let done_count = steps.iter().filter(|s| **s == Step::Done).count();
        prop_assert_eq!(done_count, 1);
        prop_assert_eq!(steps.last(), Some(&Step::Done));

        // Re-poll a producer that already finished.
        let mut array = input.clone();
        let mut producer = algorithm.producer(array.len());
        for step in &steps {
            let produced = producer.next_step(&array);
            prop_assert_eq!(&produced, step);
            produced.apply(&mut array).unwrap();
        }
        prop_assert_eq!(producer.next_step(&array), Step::Done);
        prop_assert_eq!(producer.next_step(&array), Step::Done);
    }

    #[test]
    fn trivial_inputs_finish_immediately(algorithm in algorithm_strategy(), value in any::<u32>()) {
        for input in [vec![], vec![value]] {
            let mut array = input.clone();
            let steps = replay(algorithm, &mut array).unwrap();
            prop_assert!(!steps.iter().any(Step::is_mutation));
            prop_assert_eq!(array, input);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Swap-only algorithms keep the multiset at every step
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn swap_algorithms_preserve_multiset_stepwise(
        algorithm in prop::sample::select(vec![
            Algorithm::Bubble,
            Algorithm::Selection,
            Algorithm::Quick,
            Algorithm::Heap,
        ]),
        input in array_strategy(),
    ) {
        let expected = sorted(&input);
        let mut array = input.clone();
        let mut producer = algorithm.producer(array.len());
        loop {
            let step = producer.next_step(&array);
            prop_assert!(!matches!(step, Step::Overwrite(..)), "{algorithm} emitted {step:?}");
            step.apply(&mut array).unwrap();
            prop_assert_eq!(sorted(&array), expected.clone());
            if step == Step::Done {
                break;
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6–7. Algorithm-specific counts
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn bubble_swaps_equal_inversions(input in array_strategy()) {
        let mut array = input.clone();
        let steps = replay(Algorithm::Bubble, &mut array).unwrap();
        let swaps = steps.iter().filter(|s| matches!(s, Step::Swap(..))).count();
        prop_assert_eq!(swaps, inversions(&input));
    }

    #[test]
    fn sorted_input_is_left_alone(
        algorithm in prop::sample::select(vec![Algorithm::Bubble, Algorithm::Insertion]),
        input in array_strategy(),
    ) {
        let input = sorted(&input);
        let mut array = input.clone();
        let steps = replay(algorithm, &mut array).unwrap();
        prop_assert!(!steps.iter().any(Step::is_mutation), "{algorithm} mutated sorted input");
    }
}
