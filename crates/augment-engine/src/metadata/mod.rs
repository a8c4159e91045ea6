//! Descriptors of the repository method and entity an operation targets.
//!
//! Both types are opaque to the engine: it stores the method descriptor once
//! and forwards it to every augmentor call, and forwards the per-call entity
//! descriptor to `supports` checks.

use std::collections::BTreeSet;
use std::fmt;

/// Describes the repository method an engine instance serves.
///
/// # Example
///
/// ```
/// use augment_engine::MethodMetadata;
///
/// let method = MethodMetadata::new("CustomerRepository", "find_by_email")
///     .with_annotation("SoftDelete");
/// assert!(method.has_annotation("SoftDelete"));
/// assert_eq!(method.to_string(), "CustomerRepository::find_by_email");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodMetadata {
    repository: String,
    method: String,
    annotations: BTreeSet<String>,
}

impl MethodMetadata {
    /// Creates a descriptor for `method` declared on `repository`.
    #[must_use]
    pub fn new(repository: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            method: method.into(),
            annotations: BTreeSet::new(),
        }
    }

    /// Placeholder handed to augmentors by engines built without metadata.
    #[must_use]
    pub const fn unspecified() -> Self {
        Self {
            repository: String::new(),
            method: String::new(),
            annotations: BTreeSet::new(),
        }
    }

    /// Adds a marker annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.insert(annotation.into());
        self
    }

    /// Adds several marker annotations.
    #[must_use]
    pub fn with_annotations<I, S>(mut self, annotations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.annotations
            .extend(annotations.into_iter().map(Into::into));
        self
    }

    /// Name of the declaring repository.
    #[must_use]
    pub const fn repository(&self) -> &str {
        self.repository.as_str()
    }

    /// Name of the method.
    #[must_use]
    pub const fn method(&self) -> &str {
        self.method.as_str()
    }

    /// Returns `true` when the method carries `annotation`.
    #[must_use]
    pub fn has_annotation(&self, annotation: &str) -> bool {
        self.annotations.contains(annotation)
    }

    /// Annotations in lexical order.
    pub fn annotations(&self) -> impl Iterator<Item = &str> {
        self.annotations.iter().map(String::as_str)
    }

    /// Returns `true` for the [`unspecified`](Self::unspecified) placeholder.
    #[must_use]
    pub fn is_unspecified(&self) -> bool {
        self.repository.is_empty() && self.method.is_empty()
    }
}

impl fmt::Display for MethodMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.repository, self.method)
    }
}

/// Describes the entity an operation reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMetadata {
    entity: String,
    collection: Option<String>,
}

impl EntityMetadata {
    /// Creates a descriptor for the named entity type.
    #[must_use]
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            collection: None,
        }
    }

    /// Records the table or collection the entity is stored in.
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Entity type name.
    #[must_use]
    pub const fn entity_name(&self) -> &str {
        self.entity.as_str()
    }

    /// Storage collection, when known.
    #[must_use]
    pub fn collection_name(&self) -> Option<&str> {
        self.collection.as_deref()
    }
}
