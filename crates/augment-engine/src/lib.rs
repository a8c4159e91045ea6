//! Ordered, type-indexed dispatch of query and update augmentors.
//!
//! Repository layers use this crate to let pluggable components rewrite the
//! operations they are about to execute. Each component, an [`Augmentor`],
//! declares the query-context and update-context types it works on. An
//! [`AugmentationEngine`] indexes a fixed set of augmentors by those types,
//! orders them by priority once, and then:
//!
//! - answers cheaply whether any augmentor cares about an operation
//!   ([`AugmentationEngine::augmentation_needed`]);
//! - folds a query context through the interested augmentors
//!   ([`AugmentationEngine::invoke_for_query`]);
//! - folds an update context through them, stopping as soon as one vetoes the
//!   write ([`AugmentationEngine::invoke_for_update`]).
//!
//! [`AugmentationEngine::none`] is a shared engine with no augmentors for
//! call sites that have nothing configured.
//!
//! # Example
//!
//! ```
//! use augment_engine::{
//!     AugmentationEngine, Augmentor, AugmentorFailure, AugmentorHandle, EntityMetadata,
//!     MethodMetadata, QueryContext, QueryMode, UpdateContext,
//! };
//!
//! #[derive(Debug)]
//! struct Find;
//! impl QueryContext for Find {
//!     fn mode(&self) -> QueryMode { QueryMode::Find }
//! }
//!
//! #[derive(Debug)]
//! struct Delete {
//!     id: u64,
//! }
//! impl UpdateContext for Delete {
//!     fn mode(&self) -> QueryMode { QueryMode::Delete }
//! }
//!
//! /// Turns hard deletes into soft deletes by swallowing them.
//! struct SoftDelete;
//! impl Augmentor for SoftDelete {
//!     type Query = Find;
//!     type Update = Delete;
//!
//!     fn supports(
//!         &self,
//!         _method: &MethodMetadata,
//!         mode: QueryMode,
//!         _entity: &EntityMetadata,
//!     ) -> Result<bool, AugmentorFailure> {
//!         Ok(mode == QueryMode::Delete)
//!     }
//!
//!     fn augment_update(
//!         &self,
//!         _context: Delete,
//!         _method: &MethodMetadata,
//!     ) -> Result<Option<Delete>, AugmentorFailure> {
//!         Ok(None)
//!     }
//! }
//!
//! # fn main() -> Result<(), augment_engine::AugmentError> {
//! let engine = AugmentationEngine::new(
//!     [AugmentorHandle::new(SoftDelete)],
//!     MethodMetadata::new("Customers", "delete_by_id"),
//! );
//! let entity = EntityMetadata::new("Customer");
//!
//! assert!(engine.augmentation_needed_for::<Delete>(QueryMode::Delete, &entity)?);
//! assert!(engine.invoke_for_update(Delete { id: 7 })?.is_none());
//! # Ok(())
//! # }
//! ```

pub mod augmentor;
pub mod context;
pub mod engine;
pub mod error;
pub mod metadata;
pub mod ordering;
pub mod registry;
pub mod telemetry;

#[cfg(test)]
mod tests;

pub use self::augmentor::{Augmentor, AugmentorHandle};
pub use self::context::{ContextType, ContextTypes, QueryContext, QueryMode, UpdateContext};
pub use self::engine::{AugmentationEngine, ENGINE_TARGET, EngineBuilder};
pub use self::error::{AugmentError, AugmentorFailure, BoxedSource};
pub use self::metadata::{EntityMetadata, MethodMetadata};
pub use self::ordering::{HIGHEST_PRECEDENCE, LOWEST_PRECEDENCE};
pub use self::registry::AugmentorRegistry;
