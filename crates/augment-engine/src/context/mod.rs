//! Context families and the type tags the registry is keyed by.
//!
//! A context describes an operation that is still being assembled: a query
//! about to be executed ([`QueryContext`]) or a write about to be applied
//! ([`UpdateContext`]). The engine never inspects a context beyond its
//! concrete type, which it reduces to a [`ContextType`] tag for lookups.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use strum::{Display, EnumString};

use crate::augmentor::Augmentor;

/// Execution mode of the operation a context describes.
///
/// # Example
///
/// ```
/// use augment_engine::QueryMode;
///
/// assert!(QueryMode::Save.is_write());
/// assert!(QueryMode::Find.is_in(&[QueryMode::Find, QueryMode::Count]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum QueryMode {
    /// Loads entities.
    Find,
    /// Counts matching entities.
    Count,
    /// Counts matching entities to compute page totals.
    CountForPaging,
    /// Checks whether any entity matches.
    Exists,
    /// Loads entities that are about to be deleted.
    ForDelete,
    /// Persists an entity.
    Save,
    /// Removes an entity.
    Delete,
}

impl QueryMode {
    /// Returns `true` for modes that change persistent state.
    #[must_use]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Save | Self::Delete)
    }

    /// Returns `true` when this mode is one of `modes`.
    #[must_use]
    pub fn is_in(self, modes: &[Self]) -> bool {
        modes.contains(&self)
    }
}

/// A read operation under construction.
///
/// Implementors are plain values; augmentors receive them by value and hand
/// back the (possibly replaced) value for the next augmentor in line.
pub trait QueryContext: Any + Send + fmt::Debug {
    /// Mode the query will be executed in.
    fn mode(&self) -> QueryMode;
}

/// A write operation under construction.
///
/// Unlike queries, an update may be vetoed by an augmentor, in which case no
/// context is left to execute.
pub trait UpdateContext: Any + Send + fmt::Debug {
    /// Mode the update will be executed in.
    fn mode(&self) -> QueryMode;
}

/// Type tag identifying a concrete context type.
///
/// Equality and hashing use the type identity only; the type name is carried
/// for diagnostics.
#[derive(Clone, Copy)]
pub struct ContextType {
    id: TypeId,
    name: &'static str,
}

impl ContextType {
    /// Returns the tag for `T`.
    #[must_use]
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Fully qualified name of the tagged type.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` when the tag identifies `T`.
    #[must_use]
    pub fn is<T: Any + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for ContextType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ContextType {}

impl Hash for ContextType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContextType").field(&self.name).finish()
    }
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The pair of context types an augmentor declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextTypes {
    query: ContextType,
    update: ContextType,
}

impl ContextTypes {
    /// Pairs a query-context tag with an update-context tag.
    #[must_use]
    pub const fn new(query: ContextType, update: ContextType) -> Self {
        Self { query, update }
    }

    /// Resolves the context types declared by augmentor type `A`.
    ///
    /// # Example
    ///
    /// ```
    /// use augment_engine::{
    ///     Augmentor, AugmentorFailure, ContextType, ContextTypes, EntityMetadata,
    ///     MethodMetadata, QueryContext, QueryMode, UpdateContext,
    /// };
    ///
    /// #[derive(Debug)]
    /// struct Find;
    /// impl QueryContext for Find {
    ///     fn mode(&self) -> QueryMode { QueryMode::Find }
    /// }
    ///
    /// #[derive(Debug)]
    /// struct Save;
    /// impl UpdateContext for Save {
    ///     fn mode(&self) -> QueryMode { QueryMode::Save }
    /// }
    ///
    /// struct Audit;
    /// impl Augmentor for Audit {
    ///     type Query = Find;
    ///     type Update = Save;
    ///
    ///     fn supports(
    ///         &self,
    ///         _method: &MethodMetadata,
    ///         _mode: QueryMode,
    ///         _entity: &EntityMetadata,
    ///     ) -> Result<bool, AugmentorFailure> {
    ///         Ok(true)
    ///     }
    /// }
    ///
    /// let types = ContextTypes::of::<Audit>();
    /// assert_eq!(types.query(), ContextType::of::<Find>());
    /// assert_eq!(types.update(), ContextType::of::<Save>());
    /// ```
    #[must_use]
    pub fn of<A: Augmentor>() -> Self {
        Self::new(
            ContextType::of::<A::Query>(),
            ContextType::of::<A::Update>(),
        )
    }

    /// Declared query-context type.
    #[must_use]
    pub const fn query(self) -> ContextType {
        self.query
    }

    /// Declared update-context type.
    #[must_use]
    pub const fn update(self) -> ContextType {
        self.update
    }

    /// Both registry keys, query side first.
    #[must_use]
    pub const fn keys(self) -> [ContextType; 2] {
        [self.query, self.update]
    }

    /// Returns `true` when both sides name the same type.
    #[must_use]
    pub fn is_uniform(self) -> bool {
        self.query == self.update
    }
}
