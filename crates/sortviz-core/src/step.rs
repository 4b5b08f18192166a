#![forbid(unsafe_code)]

//! The step protocol shared by every algorithm.
//!
//! A [`Step`] describes one observable engine action. Producers only
//! *describe* mutations; the controller is the single place that applies
//! them to the canonical array via [`Step::apply`].
//!
//! `Compare` and `Highlight` never touch the array. `Swap` and `Overwrite`
//! are validated before any write, so a rejected step leaves the array
//! exactly as it was.

use smallvec::SmallVec;

use crate::error::EngineFailure;

/// Index list carried by [`Step::Highlight`]. Most highlights name one or
/// two positions, so they stay inline.
pub type Indices = SmallVec<[usize; 4]>;

/// Semantic role attached to highlighted positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Role {
    /// Current best candidate (e.g. running minimum).
    Candidate,
    /// Partition pivot.
    Pivot,
    /// Position holds its final value.
    Sorted,
    /// Position being worked on.
    Active,
}

/// One atomic engine action.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Step {
    /// Two positions are being compared.
    Compare(usize, usize),
    /// Mark positions with a role.
    Highlight(Indices, Role),
    /// Exchange two positions.
    Swap(usize, usize),
    /// Write a value into one position.
    Overwrite(usize, u32),
    /// No further steps follow.
    Done,
}

impl Step {
    /// Highlight a single position.
    #[must_use]
    pub fn mark(index: usize, role: Role) -> Self {
        let mut indices = Indices::new();
        indices.push(index);
        Self::Highlight(indices, role)
    }

    /// Highlight a contiguous span `start..=end`.
    #[must_use]
    pub fn mark_span(start: usize, end: usize, role: Role) -> Self {
        Self::Highlight((start..=end).collect(), role)
    }

    /// Whether applying this step can change the array.
    #[inline]
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(self, Self::Swap(..) | Self::Overwrite(..))
    }

    /// Positions this step refers to, in order.
    #[must_use]
    pub fn indices(&self) -> Indices {
        match self {
            Self::Compare(i, j) | Self::Swap(i, j) => [*i, *j].into_iter().collect(),
            Self::Highlight(indices, _) => indices.clone(),
            Self::Overwrite(i, _) => [*i].into_iter().collect(),
            Self::Done => Indices::new(),
        }
    }

    /// Apply the step to `array`.
    ///
    /// Every referenced index is checked before anything is written. Returns
    /// whether the array actually changed.
    ///
    /// # Errors
    ///
    /// [`EngineFailure::IndexOutOfBounds`] if any index is past the end.
    pub fn apply(&self, array: &mut [u32]) -> Result<bool, EngineFailure> {
        let len = array.len();
        if self.indices().iter().any(|&i| i >= len) {
            return Err(EngineFailure::IndexOutOfBounds {
                step: self.clone(),
                len,
            });
        }

        match *self {
            Self::Swap(i, j) => {
                let changed = array[i] != array[j];
                array.swap(i, j);
                Ok(changed)
            }
            Self::Overwrite(i, value) => {
                let changed = array[i] != value;
                array[i] = value;
                Ok(changed)
            }
            Self::Compare(..) | Self::Highlight(..) | Self::Done => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_exchanges_values() {
        let mut array = [3, 1, 2];
        assert_eq!(Step::Swap(0, 1).apply(&mut array), Ok(true));
        assert_eq!(array, [1, 3, 2]);
    }

    #[test]
    fn swap_of_equal_values_reports_no_change() {
        let mut array = [4, 4];
        assert_eq!(Step::Swap(0, 1).apply(&mut array), Ok(false));
        assert_eq!(Step::Swap(1, 1).apply(&mut array), Ok(false));
        assert_eq!(array, [4, 4]);
    }

    #[test]
    fn overwrite_sets_value() {
        let mut array = [5, 6, 7];
        assert_eq!(Step::Overwrite(2, 1).apply(&mut array), Ok(true));
        assert_eq!(array, [5, 6, 1]);
        assert_eq!(Step::Overwrite(2, 1).apply(&mut array), Ok(false));
    }

    #[test]
    fn non_mutating_steps_leave_array_alone() {
        let mut array = [9, 8, 7];
        for step in [
            Step::Compare(0, 2),
            Step::mark_span(0, 2, Role::Sorted),
            Step::Done,
        ] {
            assert!(!step.is_mutation());
            assert_eq!(step.apply(&mut array), Ok(false));
        }
        assert_eq!(array, [9, 8, 7]);
    }

    #[test]
    fn out_of_bounds_swap_is_rejected_without_writing() {
        let mut array = [1, 2, 3];
        let err = Step::Swap(0, 3).apply(&mut array).unwrap_err();
        assert_eq!(
            err,
            EngineFailure::IndexOutOfBounds {
                step: Step::Swap(0, 3),
                len: 3
            }
        );
        assert_eq!(array, [1, 2, 3]);
    }

    #[test]
    fn out_of_bounds_highlight_is_rejected() {
        let mut array = [1];
        assert!(Step::mark(1, Role::Pivot).apply(&mut array).is_err());
    }

    #[test]
    fn indices_follow_step_shape() {
        assert_eq!(Step::Compare(2, 5).indices().as_slice(), &[2, 5]);
        assert_eq!(Step::Overwrite(4, 10).indices().as_slice(), &[4]);
        assert_eq!(
            Step::mark_span(1, 3, Role::Active).indices().as_slice(),
            &[1, 2, 3]
        );
        assert!(Step::Done.indices().is_empty());
    }
}
