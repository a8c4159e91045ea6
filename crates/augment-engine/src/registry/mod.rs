//! Type-indexed augmentor registry.
//!
//! The [`AugmentorRegistry`] files every augmentor under both context types it
//! declares and sorts each list by priority once, at construction. It offers
//! no way to add or remove entries afterwards.

use std::collections::HashMap;

use crate::augmentor::AugmentorHandle;
use crate::context::ContextType;
use crate::ordering::sort_by_priority;

/// Immutable index from context type to the augmentors interested in it.
///
/// # Example
///
/// ```
/// use augment_engine::{AugmentorRegistry, ContextType};
///
/// let registry = AugmentorRegistry::new();
/// assert!(registry.is_empty());
/// assert!(registry.augmentors_for(ContextType::of::<String>()).is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AugmentorRegistry {
    index: HashMap<ContextType, Vec<AugmentorHandle>>,
    registrations: usize,
}

impl AugmentorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes `augmentors` by their declared context types.
    ///
    /// Each augmentor is appended under its query-context type and under its
    /// update-context type, in input order. An augmentor whose two types
    /// coincide therefore appears twice under that type, as does an augmentor
    /// supplied twice.
    #[must_use]
    pub fn build<I>(augmentors: I) -> Self
    where
        I: IntoIterator<Item = AugmentorHandle>,
    {
        let mut index: HashMap<ContextType, Vec<AugmentorHandle>> = HashMap::new();
        let mut registrations = 0_usize;

        for augmentor in augmentors {
            let [query, update] = augmentor.context_types().keys();
            index.entry(query).or_default().push(augmentor.clone());
            index.entry(update).or_default().push(augmentor);
            registrations = registrations.saturating_add(1);
        }

        for entries in index.values_mut() {
            sort_by_priority(entries);
        }

        Self {
            index,
            registrations,
        }
    }

    /// Augmentors registered for `context_type`, in execution order.
    ///
    /// Returns an empty slice for unknown types.
    #[must_use]
    pub fn augmentors_for(&self, context_type: ContextType) -> &[AugmentorHandle] {
        self.index
            .get(&context_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns `true` when any augmentor declares `context_type`.
    #[must_use]
    pub fn contains(&self, context_type: ContextType) -> bool {
        self.index.contains_key(&context_type)
    }

    /// Context types with at least one augmentor, in no particular order.
    pub fn context_types(&self) -> impl Iterator<Item = ContextType> + '_ {
        self.index.keys().copied()
    }

    /// Number of augmentors supplied at construction.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.registrations
    }

    /// Returns `true` when no augmentors were supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.registrations == 0
    }
}
