//! The augmentor contract and the type-erased handle the registry stores.
//!
//! Augmentors are written against concrete context types through the
//! [`Augmentor`] trait's associated types. Registration wraps each one in an
//! [`AugmentorHandle`], which erases those types so augmentors declaring
//! different contexts can share one registry, while remembering the declared
//! [`ContextTypes`] the registry is keyed by.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::context::{ContextType, ContextTypes, QueryContext, QueryMode, UpdateContext};
use crate::error::{AugmentError, AugmentorFailure};
use crate::metadata::{EntityMetadata, MethodMetadata};

/// A pluggable component that inspects and transforms query and update
/// contexts.
///
/// Only [`supports`](Self::supports) is mandatory. The transform methods
/// default to passing the context through, so an augmentor concerned with a
/// single path implements only that path.
///
/// Augmentors are shared across threads and must not rely on `&mut self`.
/// Any internal state is the implementor's to synchronise.
pub trait Augmentor: Send + Sync + 'static {
    /// Query context type this augmentor transforms.
    type Query: QueryContext;
    /// Update context type this augmentor transforms.
    type Update: UpdateContext;

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        type_name::<Self>()
    }

    /// Explicit position in the execution order; lower runs earlier.
    ///
    /// Augmentors without a priority run after all that declare one.
    fn priority(&self) -> Option<i32> {
        None
    }

    /// Reports whether the augmentor wants to take part in an operation.
    ///
    /// # Errors
    ///
    /// Returns an [`AugmentorFailure`] when the decision cannot be made.
    fn supports(
        &self,
        method: &MethodMetadata,
        mode: QueryMode,
        entity: &EntityMetadata,
    ) -> Result<bool, AugmentorFailure>;

    /// Transforms a query context.
    ///
    /// # Errors
    ///
    /// Returns an [`AugmentorFailure`] to abort the query.
    fn augment_query(
        &self,
        context: Self::Query,
        _method: &MethodMetadata,
    ) -> Result<Self::Query, AugmentorFailure> {
        Ok(context)
    }

    /// Transforms an update context.
    ///
    /// Returning `Ok(None)` vetoes the update: no later augmentor runs and
    /// the caller is left with nothing to execute.
    ///
    /// # Errors
    ///
    /// Returns an [`AugmentorFailure`] to abort the update.
    fn augment_update(
        &self,
        context: Self::Update,
        _method: &MethodMetadata,
    ) -> Result<Option<Self::Update>, AugmentorFailure> {
        Ok(Some(context))
    }
}

/// Object-safe view of an [`Augmentor`].
///
/// Contexts travel through an `Option<T>` slot behind `&mut dyn Any`; the
/// slot is downcast to the augmentor's declared type before the call.
trait ErasedAugmentor: Send + Sync {
    fn name(&self) -> &str;

    fn priority(&self) -> Option<i32>;

    fn supports(
        &self,
        method: &MethodMetadata,
        mode: QueryMode,
        entity: &EntityMetadata,
    ) -> Result<bool, AugmentorFailure>;

    fn augment_query(
        &self,
        slot: &mut dyn Any,
        received: ContextType,
        method: &MethodMetadata,
    ) -> Result<(), AugmentError>;

    fn augment_update(
        &self,
        slot: &mut dyn Any,
        received: ContextType,
        method: &MethodMetadata,
    ) -> Result<(), AugmentError>;
}

struct Erased<A>(Arc<A>);

impl<A: Augmentor> Erased<A> {
    fn mismatch(&self, received: ContextType) -> AugmentError {
        AugmentError::ContextMismatch {
            augmentor: self.0.name().to_owned(),
            received,
        }
    }
}

impl<A: Augmentor> ErasedAugmentor for Erased<A> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn priority(&self) -> Option<i32> {
        self.0.priority()
    }

    fn supports(
        &self,
        method: &MethodMetadata,
        mode: QueryMode,
        entity: &EntityMetadata,
    ) -> Result<bool, AugmentorFailure> {
        self.0.supports(method, mode, entity)
    }

    fn augment_query(
        &self,
        slot: &mut dyn Any,
        received: ContextType,
        method: &MethodMetadata,
    ) -> Result<(), AugmentError> {
        let typed = slot
            .downcast_mut::<Option<A::Query>>()
            .ok_or_else(|| self.mismatch(received))?;
        if let Some(context) = typed.take() {
            *typed = Some(self.0.augment_query(context, method)?);
        }
        Ok(())
    }

    fn augment_update(
        &self,
        slot: &mut dyn Any,
        received: ContextType,
        method: &MethodMetadata,
    ) -> Result<(), AugmentError> {
        let typed = slot
            .downcast_mut::<Option<A::Update>>()
            .ok_or_else(|| self.mismatch(received))?;
        if let Some(context) = typed.take() {
            *typed = self.0.augment_update(context, method)?;
        }
        Ok(())
    }
}

/// Registered, type-erased reference to an augmentor.
///
/// Cloning a handle is cheap and yields another reference to the same
/// augmentor instance.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use augment_engine::{
///     Augmentor, AugmentorFailure, AugmentorHandle, EntityMetadata, MethodMetadata,
///     QueryContext, QueryMode, UpdateContext,
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
/// struct SoftDelete;
/// impl Augmentor for SoftDelete {
///     type Query = Find;
///     type Update = Save;
///
///     fn name(&self) -> &str { "soft-delete" }
///     fn priority(&self) -> Option<i32> { Some(5) }
///     fn supports(
///         &self,
///         method: &MethodMetadata,
///         _mode: QueryMode,
///         _entity: &EntityMetadata,
///     ) -> Result<bool, AugmentorFailure> {
///         Ok(method.has_annotation("SoftDelete"))
///     }
/// }
///
/// let handle = AugmentorHandle::from_arc(Arc::new(SoftDelete));
/// assert_eq!(handle.name(), "soft-delete");
/// assert_eq!(handle.priority(), Some(5));
/// ```
#[derive(Clone)]
pub struct AugmentorHandle {
    inner: Arc<dyn ErasedAugmentor>,
    context_types: ContextTypes,
}

impl AugmentorHandle {
    /// Takes ownership of an augmentor and wraps it.
    #[must_use]
    pub fn new<A: Augmentor>(augmentor: A) -> Self {
        Self::from_arc(Arc::new(augmentor))
    }

    /// Wraps an augmentor that is also referenced elsewhere.
    #[must_use]
    pub fn from_arc<A: Augmentor>(augmentor: Arc<A>) -> Self {
        Self {
            inner: Arc::new(Erased(augmentor)),
            context_types: ContextTypes::of::<A>(),
        }
    }

    /// Name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Declared priority, if any.
    #[must_use]
    pub fn priority(&self) -> Option<i32> {
        self.inner.priority()
    }

    /// Context types the augmentor declares.
    #[must_use]
    pub const fn context_types(&self) -> ContextTypes {
        self.context_types
    }

    /// Returns `true` when both handles were cloned from the same
    /// registration.
    #[must_use]
    pub fn same_registration(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn supports(
        &self,
        method: &MethodMetadata,
        mode: QueryMode,
        entity: &EntityMetadata,
    ) -> Result<bool, AugmentError> {
        Ok(self.inner.supports(method, mode, entity)?)
    }

    pub(crate) fn augment_query<T: QueryContext>(
        &self,
        context: T,
        method: &MethodMetadata,
    ) -> Result<T, AugmentError> {
        let received = ContextType::of::<T>();
        let mut slot = Some(context);
        self.inner.augment_query(&mut slot, received, method)?;
        slot.ok_or_else(|| AugmentError::ContextMismatch {
            augmentor: self.name().to_owned(),
            received,
        })
    }

    pub(crate) fn augment_update<T: UpdateContext>(
        &self,
        context: T,
        method: &MethodMetadata,
    ) -> Result<Option<T>, AugmentError> {
        let mut slot = Some(context);
        self.inner
            .augment_update(&mut slot, ContextType::of::<T>(), method)?;
        Ok(slot)
    }
}

impl<A: Augmentor> From<Arc<A>> for AugmentorHandle {
    fn from(augmentor: Arc<A>) -> Self {
        Self::from_arc(augmentor)
    }
}

impl fmt::Debug for AugmentorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AugmentorHandle")
            .field("name", &self.name())
            .field("priority", &self.priority())
            .field("context_types", &self.context_types)
            .finish()
    }
}

#[cfg(test)]
mod tests;
