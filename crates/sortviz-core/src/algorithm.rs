#![forbid(unsafe_code)]

//! The closed set of supported algorithms and their catalog entries.

use std::fmt;
use std::str::FromStr;

use crate::algorithms::{
    BubbleSort, HeapSort, InsertionSort, MergeSort, QuickSort, SelectionSort, StepProducer,
};
use crate::error::ConfigError;

/// A sorting algorithm the engine can animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Algorithm {
    #[default]
    Bubble,
    Selection,
    Insertion,
    Merge,
    Quick,
    Heap,
}

/// Descriptive catalog entry shown next to the bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmInfo {
    pub name: &'static str,
    pub best: &'static str,
    pub average: &'static str,
    pub worst: &'static str,
    pub space: &'static str,
    pub definition: &'static str,
}

const BUBBLE: AlgorithmInfo = AlgorithmInfo {
    name: "Bubble Sort",
    best: "O(n)",
    average: "O(n²)",
    worst: "O(n²)",
    space: "O(1)",
    definition: "Repeatedly compares adjacent elements and swaps them when they are out of order until the array is sorted.",
};

const SELECTION: AlgorithmInfo = AlgorithmInfo {
    name: "Selection Sort",
    best: "O(n²)",
    average: "O(n²)",
    worst: "O(n²)",
    space: "O(1)",
    definition: "Finds the smallest element of the unsorted part and moves it into place, one position per pass.",
};

const INSERTION: AlgorithmInfo = AlgorithmInfo {
    name: "Insertion Sort",
    best: "O(n)",
    average: "O(n²)",
    worst: "O(n²)",
    space: "O(1)",
    definition: "Grows a sorted prefix by shifting larger elements right and inserting each new element into its slot.",
};

const MERGE: AlgorithmInfo = AlgorithmInfo {
    name: "Merge Sort",
    best: "O(n log n)",
    average: "O(n log n)",
    worst: "O(n log n)",
    space: "O(n)",
    definition: "Splits the array into halves, sorts each half recursively, then merges the sorted halves.",
};

const QUICK: AlgorithmInfo = AlgorithmInfo {
    name: "Quick Sort",
    best: "O(n log n)",
    average: "O(n log n)",
    worst: "O(n²)",
    space: "O(log n)",
    definition: "Picks a pivot, partitions smaller elements before it and the rest after it, then sorts both partitions.",
};

const HEAP: AlgorithmInfo = AlgorithmInfo {
    name: "Heap Sort",
    best: "O(n log n)",
    average: "O(n log n)",
    worst: "O(n log n)",
    space: "O(1)",
    definition: "Builds a max-heap and repeatedly moves the maximum to the end of the shrinking heap.",
};

impl Algorithm {
    /// All variants in menu order.
    pub const ALL: [Self; 6] = [
        Self::Bubble,
        Self::Selection,
        Self::Insertion,
        Self::Merge,
        Self::Quick,
        Self::Heap,
    ];

    /// Stable lowercase key used in configuration.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Bubble => "bubble",
            Self::Selection => "selection",
            Self::Insertion => "insertion",
            Self::Merge => "merge",
            Self::Quick => "quick",
            Self::Heap => "heap",
        }
    }

    /// Catalog entry.
    #[must_use]
    pub const fn info(self) -> &'static AlgorithmInfo {
        match self {
            Self::Bubble => &BUBBLE,
            Self::Selection => &SELECTION,
            Self::Insertion => &INSERTION,
            Self::Merge => &MERGE,
            Self::Quick => &QUICK,
            Self::Heap => &HEAP,
        }
    }

    /// Fresh step producer for an array of length `len`.
    ///
    /// The producer holds no copy of the values; it reads the live array
    /// passed to [`StepProducer::next_step`] each time.
    #[must_use]
    pub fn producer(self, len: usize) -> Box<dyn StepProducer> {
        match self {
            Self::Bubble => Box::new(BubbleSort::new(len)),
            Self::Selection => Box::new(SelectionSort::new(len)),
            Self::Insertion => Box::new(InsertionSort::new(len)),
            Self::Merge => Box::new(MergeSort::new(len)),
            Self::Quick => Box::new(QuickSort::new(len)),
            Self::Heap => Box::new(HeapSort::new(len)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.key() == key)
            .ok_or(ConfigError::UnknownAlgorithm(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_from_str() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.key().parse::<Algorithm>(), Ok(algorithm));
        }
    }

    #[test]
    fn parsing_ignores_case_and_whitespace() {
        assert_eq!(" Heap ".parse::<Algorithm>(), Ok(Algorithm::Heap));
        assert_eq!("QUICK".parse::<Algorithm>(), Ok(Algorithm::Quick));
    }

    #[test]
    fn unknown_key_is_a_config_error() {
        assert_eq!(
            "bogo".parse::<Algorithm>(),
            Err(ConfigError::UnknownAlgorithm("bogo".into()))
        );
    }

    #[test]
    fn catalog_entries_are_distinct() {
        let names: Vec<_> = Algorithm::ALL.iter().map(|a| a.info().name).collect();
        assert_eq!(
            names,
            [
                "Bubble Sort",
                "Selection Sort",
                "Insertion Sort",
                "Merge Sort",
                "Quick Sort",
                "Heap Sort"
            ]
        );
        assert_eq!(Algorithm::Quick.info().worst, "O(n²)");
        assert_eq!(Algorithm::Merge.info().space, "O(n)");
    }

    #[test]
    fn display_uses_key() {
        assert_eq!(Algorithm::Selection.to_string(), "selection");
    }
}
