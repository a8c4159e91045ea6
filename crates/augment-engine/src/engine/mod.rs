//! Dispatch of contexts through registered augmentors.
//!
//! An [`AugmentationEngine`] is built once per repository method. Callers ask
//! [`AugmentationEngine::augmentation_needed`] before assembling a context,
//! then hand the context to [`AugmentationEngine::invoke_for_query`] or
//! [`AugmentationEngine::invoke_for_update`], which fold it through the
//! augmentors registered for its type in priority order.
//!
//! Engines are immutable and may be shared between threads.

use augment_config::EngineSettings;
use once_cell::sync::Lazy;
use tracing::{debug, trace};

use crate::augmentor::AugmentorHandle;
use crate::context::{ContextType, ContextTypes, QueryContext, QueryMode, UpdateContext};
use crate::error::AugmentError;
use crate::metadata::{EntityMetadata, MethodMetadata};
use crate::registry::AugmentorRegistry;

/// Tracing target for engine construction and dispatch.
///
/// Matches the module path, so a filter such as `augment_engine=trace`
/// selects these events.
pub const ENGINE_TARGET: &str = module_path!();

static UNSPECIFIED_METHOD: MethodMetadata = MethodMetadata::unspecified();

static NONE: Lazy<AugmentationEngine> = Lazy::new(|| {
    AugmentationEngine::from_parts(AugmentorRegistry::new(), None)
});

/// Ordered multiplexer over a fixed set of augmentors.
///
/// # Example
///
/// ```
/// use augment_engine::{
///     AugmentationEngine, Augmentor, AugmentorFailure, AugmentorHandle, EntityMetadata,
///     MethodMetadata, QueryContext, QueryMode, UpdateContext,
/// };
///
/// #[derive(Debug, Default)]
/// struct Find {
///     filters: Vec<String>,
/// }
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
/// struct NotDeleted;
/// impl Augmentor for NotDeleted {
///     type Query = Find;
///     type Update = Save;
///
///     fn supports(
///         &self,
///         _method: &MethodMetadata,
///         mode: QueryMode,
///         _entity: &EntityMetadata,
///     ) -> Result<bool, AugmentorFailure> {
///         Ok(!mode.is_write())
///     }
///
///     fn augment_query(
///         &self,
///         mut context: Find,
///         _method: &MethodMetadata,
///     ) -> Result<Find, AugmentorFailure> {
///         context.filters.push(String::from("deleted = false"));
///         Ok(context)
///     }
/// }
///
/// # fn main() -> Result<(), augment_engine::AugmentError> {
/// let engine = AugmentationEngine::new(
///     [AugmentorHandle::new(NotDeleted)],
///     MethodMetadata::new("Customers", "find_all"),
/// );
/// let context = engine.invoke_for_query(Find::default())?;
/// assert_eq!(context.filters, vec![String::from("deleted = false")]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AugmentationEngine {
    registry: AugmentorRegistry,
    method_metadata: Option<MethodMetadata>,
}

impl AugmentationEngine {
    /// Builds an engine serving the given method.
    #[must_use]
    pub fn new<I>(augmentors: I, method_metadata: MethodMetadata) -> Self
    where
        I: IntoIterator<Item = AugmentorHandle>,
    {
        Self::from_parts(AugmentorRegistry::build(augmentors), Some(method_metadata))
    }

    /// Builds an engine from possibly absent inputs.
    ///
    /// # Errors
    ///
    /// Returns [`AugmentError::InvalidArgument`] when `augmentors` is absent,
    /// or when `require_method_metadata` is set and `method_metadata` is
    /// absent.
    pub fn build<I>(
        augmentors: Option<I>,
        method_metadata: Option<MethodMetadata>,
        require_method_metadata: bool,
    ) -> Result<Self, AugmentError>
    where
        I: IntoIterator<Item = AugmentorHandle>,
    {
        let Some(collection) = augmentors else {
            return Err(AugmentError::invalid_argument(
                "augmentors",
                "augmentor collection must be supplied",
            ));
        };
        if require_method_metadata && method_metadata.is_none() {
            return Err(AugmentError::invalid_argument(
                "method_metadata",
                "method metadata must be supplied",
            ));
        }
        Ok(Self::from_parts(
            AugmentorRegistry::build(collection),
            method_metadata,
        ))
    }

    /// Starts a builder that requires method metadata by default.
    #[must_use]
    pub const fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Shared engine with no augmentors.
    ///
    /// Never needs augmentation and passes every context through unchanged.
    #[must_use]
    pub fn none() -> &'static Self {
        &NONE
    }

    fn from_parts(registry: AugmentorRegistry, method_metadata: Option<MethodMetadata>) -> Self {
        let engine = Self {
            registry,
            method_metadata,
        };
        debug!(
            target: ENGINE_TARGET,
            augmentors = engine.registry.len(),
            context_types = engine.registry.context_types().count(),
            method = %engine.method(),
            "built augmentation engine"
        );
        engine
    }

    /// The augmentor index.
    #[must_use]
    pub const fn registry(&self) -> &AugmentorRegistry {
        &self.registry
    }

    /// Method descriptor supplied at construction, if any.
    #[must_use]
    pub const fn method_metadata(&self) -> Option<&MethodMetadata> {
        self.method_metadata.as_ref()
    }

    fn method(&self) -> &MethodMetadata {
        self.method_metadata.as_ref().unwrap_or(&UNSPECIFIED_METHOD)
    }

    /// Reports whether any augmentor registered for `context_type` supports
    /// the operation. No context is transformed.
    ///
    /// # Errors
    ///
    /// Propagates the first failure raised by an augmentor's `supports`.
    pub fn augmentation_needed(
        &self,
        context_type: ContextType,
        mode: QueryMode,
        entity: &EntityMetadata,
    ) -> Result<bool, AugmentError> {
        let augmentors = self.registry.augmentors_for(context_type);
        if augmentors.is_empty() {
            return Ok(false);
        }

        let method = self.method();
        for augmentor in augmentors {
            if augmentor.supports(method, mode, entity)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Typed shorthand for [`augmentation_needed`](Self::augmentation_needed).
    ///
    /// # Errors
    ///
    /// Propagates the first failure raised by an augmentor's `supports`.
    pub fn augmentation_needed_for<T: 'static>(
        &self,
        mode: QueryMode,
        entity: &EntityMetadata,
    ) -> Result<bool, AugmentError> {
        self.augmentation_needed(ContextType::of::<T>(), mode, entity)
    }

    /// Folds a query context through every augmentor declaring its type.
    ///
    /// # Errors
    ///
    /// Propagates the first augmentor failure; later augmentors do not run.
    pub fn invoke_for_query<T: QueryContext>(&self, context: T) -> Result<T, AugmentError> {
        let context_type = ContextType::of::<T>();
        let method = self.method();
        let mut current = context;

        for augmentor in self.chain(context_type, ContextTypes::query) {
            trace!(
                target: ENGINE_TARGET,
                augmentor = augmentor.name(),
                context_type = %context_type,
                context = ?current,
                "invoking query augmentor"
            );
            current = augmentor.augment_query(current, method)?;
        }
        Ok(current)
    }

    /// Folds an update context through every augmentor declaring its type.
    ///
    /// Returns `Ok(None)` as soon as an augmentor vetoes the update; the
    /// remaining augmentors are skipped.
    ///
    /// # Errors
    ///
    /// Propagates the first augmentor failure; later augmentors do not run.
    pub fn invoke_for_update<T: UpdateContext>(
        &self,
        context: T,
    ) -> Result<Option<T>, AugmentError> {
        let context_type = ContextType::of::<T>();
        let method = self.method();
        let mut current = context;

        for augmentor in self.chain(context_type, ContextTypes::update) {
            trace!(
                target: ENGINE_TARGET,
                augmentor = augmentor.name(),
                context_type = %context_type,
                context = ?current,
                "invoking update augmentor"
            );
            match augmentor.augment_update(current, method)? {
                Some(next) => current = next,
                None => {
                    debug!(
                        target: ENGINE_TARGET,
                        augmentor = augmentor.name(),
                        context_type = %context_type,
                        "update vetoed"
                    );
                    return Ok(None);
                }
            }
        }
        Ok(Some(current))
    }

    /// Entries under `context_type` whose declared type on the dispatched
    /// side is `context_type` itself.
    fn chain(
        &self,
        context_type: ContextType,
        side: fn(ContextTypes) -> ContextType,
    ) -> impl Iterator<Item = &AugmentorHandle> {
        self.registry
            .augmentors_for(context_type)
            .iter()
            .filter(move |augmentor| side(augmentor.context_types()) == context_type)
    }
}

/// Step-wise construction of an [`AugmentationEngine`].
///
/// # Example
///
/// ```
/// use augment_engine::{AugmentationEngine, AugmentError, MethodMetadata};
///
/// let missing = AugmentationEngine::builder().build();
/// assert!(matches!(missing, Err(AugmentError::InvalidArgument { .. })));
///
/// let engine = AugmentationEngine::builder()
///     .augmentors(Vec::new())
///     .method_metadata(MethodMetadata::new("Orders", "find_all"))
///     .build()
///     .expect("engine builds");
/// assert!(engine.registry().is_empty());
/// ```
#[derive(Debug)]
pub struct EngineBuilder {
    augmentors: Option<Vec<AugmentorHandle>>,
    method_metadata: Option<MethodMetadata>,
    require_method_metadata: bool,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    /// Creates a builder with no augmentor collection and no metadata.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            augmentors: None,
            method_metadata: None,
            require_method_metadata: true,
        }
    }

    /// Supplies the augmentor collection, replacing any earlier one.
    #[must_use]
    pub fn augmentors<I>(mut self, augmentors: I) -> Self
    where
        I: IntoIterator<Item = AugmentorHandle>,
    {
        self.augmentors = Some(augmentors.into_iter().collect());
        self
    }

    /// Appends one augmentor to the collection, starting it if needed.
    #[must_use]
    pub fn augmentor(mut self, augmentor: AugmentorHandle) -> Self {
        self.augmentors.get_or_insert_with(Vec::new).push(augmentor);
        self
    }

    /// Supplies the method descriptor.
    #[must_use]
    pub fn method_metadata(mut self, method_metadata: MethodMetadata) -> Self {
        self.method_metadata = Some(method_metadata);
        self
    }

    /// Relaxes or enforces the method-metadata requirement.
    #[must_use]
    pub const fn require_method_metadata(mut self, require: bool) -> Self {
        self.require_method_metadata = require;
        self
    }

    /// Applies the construction-related parts of `settings`.
    #[must_use]
    pub const fn settings(self, settings: &EngineSettings) -> Self {
        self.require_method_metadata(settings.require_method_metadata())
    }

    /// Builds the engine.
    ///
    /// # Errors
    ///
    /// Returns [`AugmentError::InvalidArgument`] when no augmentor collection
    /// was supplied, or when metadata is required but was not supplied.
    pub fn build(self) -> Result<AugmentationEngine, AugmentError> {
        AugmentationEngine::build(
            self.augmentors,
            self.method_metadata,
            self.require_method_metadata,
        )
    }
}
