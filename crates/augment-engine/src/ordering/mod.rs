//! Execution order of augmentors sharing a context type.
//!
//! Order is decided once, when the registry is built. An augmentor's declared
//! priority is its sort key; augmentors that declare none sort as
//! [`LOWEST_PRECEDENCE`]. Sorting is stable, so ties keep registration order.

use std::cmp::Ordering;

use crate::augmentor::AugmentorHandle;

/// Priority that runs before every other value.
pub const HIGHEST_PRECEDENCE: i32 = i32::MIN;

/// Priority that runs after every other value. Undeclared priorities use it.
pub const LOWEST_PRECEDENCE: i32 = i32::MAX;

/// Sort key of an augmentor.
#[must_use]
pub fn effective_priority(augmentor: &AugmentorHandle) -> i32 {
    augmentor.priority().unwrap_or(LOWEST_PRECEDENCE)
}

/// Total order over augmentors by effective priority.
#[must_use]
pub fn compare(left: &AugmentorHandle, right: &AugmentorHandle) -> Ordering {
    effective_priority(left).cmp(&effective_priority(right))
}

/// Stable in-place sort by [`compare`].
pub fn sort_by_priority(augmentors: &mut [AugmentorHandle]) {
    augmentors.sort_by(compare);
}
