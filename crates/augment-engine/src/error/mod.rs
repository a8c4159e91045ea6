//! Errors raised while building or dispatching through an engine.
//!
//! [`AugmentError`] is what engine callers see. Failures raised by augmentor
//! code are carried as [`AugmentorFailure`] and pass through transparently, so
//! the caller observes exactly the message the augmentor produced.

use std::error::Error as StdError;

use thiserror::Error;

use crate::context::ContextType;

/// Boxed cause attached to an [`AugmentorFailure`].
pub type BoxedSource = Box<dyn StdError + Send + Sync + 'static>;

/// Errors surfaced by the augmentation engine.
#[derive(Debug, Error)]
pub enum AugmentError {
    /// A required argument was absent or unusable.
    #[error("invalid argument '{argument}': {message}")]
    InvalidArgument {
        /// Name of the offending argument.
        argument: &'static str,
        /// Human-readable description of the problem.
        message: String,
    },

    /// An augmentor failed; the remainder of the dispatch was abandoned.
    #[error(transparent)]
    Augmentor(#[from] AugmentorFailure),

    /// A type-erased augmentor was handed a context of a type it does not
    /// declare.
    #[error("augmentor '{augmentor}' cannot handle context type {received}")]
    ContextMismatch {
        /// Name of the augmentor.
        augmentor: String,
        /// Context type that was dispatched.
        received: ContextType,
    },
}

impl AugmentError {
    pub(crate) fn invalid_argument(argument: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            message: message.into(),
        }
    }

    /// Returns `true` for [`AugmentError::InvalidArgument`].
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

/// Failure reported by augmentor code.
///
/// # Example
///
/// ```
/// use augment_engine::AugmentorFailure;
///
/// let failure = AugmentorFailure::new("tenant-filter", "no tenant bound to request");
/// assert_eq!(failure.augmentor(), "tenant-filter");
/// assert!(failure.to_string().contains("no tenant bound"));
/// ```
#[derive(Debug, Error)]
#[error("augmentor '{augmentor}' failed: {message}")]
pub struct AugmentorFailure {
    augmentor: String,
    message: String,
    #[source]
    source: Option<BoxedSource>,
}

impl AugmentorFailure {
    /// Creates a failure attributed to the named augmentor.
    #[must_use]
    pub fn new(augmentor: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            augmentor: augmentor.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Attaches the underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<BoxedSource>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Name of the failing augmentor.
    #[must_use]
    pub const fn augmentor(&self) -> &str {
        self.augmentor.as_str()
    }

    /// Failure description.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }
}
