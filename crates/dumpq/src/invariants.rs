//! Debug assertion macros for queue invariants.
//!
//! Only active in debug builds (`#[cfg(debug_assertions)]`), so there is
//! zero overhead in release builds.

/// Assert that the item count never exceeds capacity.
///
/// Used in: `Ring::push_unchecked` after advancing tail.
macro_rules! debug_assert_bounded_count {
    ($count:expr, $capacity:expr) => {
        debug_assert!(
            $count <= $capacity,
            "ring count {} exceeds capacity {}",
            $count,
            $capacity
        )
    };
}

/// Assert that a read targets an initialized slot.
///
/// A slot holds a live item exactly when its sequence is in `[head, tail)`.
///
/// Used in: `Ring::pop` before `assume_init_read`.
macro_rules! debug_assert_initialized_read {
    ($pos:expr, $head:expr, $tail:expr) => {
        debug_assert!(
            $pos >= $head && $pos < $tail,
            "reading slot at seq {} outside live range [{}, {})",
            $pos,
            $head,
            $tail
        )
    };
}

/// Assert that two rings being exchanged have the same capacity.
///
/// The exchange trades whole buffers, so a capacity mismatch would silently
/// resize the slot's queue for all later submissions.
///
/// Used in: `SubmitQueue::exchange` before the swap.
macro_rules! debug_assert_capacity_match {
    ($a:expr, $b:expr) => {
        debug_assert!(
            $a == $b,
            "exchanging rings of unequal capacity ({} vs {})",
            $a,
            $b
        )
    };
}

pub(crate) use debug_assert_bounded_count;
pub(crate) use debug_assert_capacity_match;
pub(crate) use debug_assert_initialized_read;
