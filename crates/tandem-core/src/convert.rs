//! Conversion contract between master and target elements.
//!
//! Every element that crosses from one collection to the other goes through
//! exactly one of [`ItemConverter::convert`] (master to target) or
//! [`ItemConverter::convert_back`] (target to master).

use std::{fmt, marker::PhantomData};

use thiserror::Error;

/// A converter could not map an element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ConversionError {
    /// Why the element could not be converted.
    pub reason: String,
}

impl ConversionError {
    /// Create a conversion error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Bidirectional element mapping.
///
/// Implementations must be pure: no side effects, callable concurrently.
pub trait ItemConverter<M, T>: Send + Sync {
    /// Map a master element to its target representation.
    fn convert(&self, master: &M) -> Result<T, ConversionError>;

    /// Map a target element back to its master representation.
    fn convert_back(&self, target: &T) -> Result<M, ConversionError>;
}

/// Passes elements through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityConverter;

impl<T> ItemConverter<T, T> for IdentityConverter
where
    T: Clone,
{
    fn convert(&self, master: &T) -> Result<T, ConversionError> {
        Ok(master.clone())
    }

    fn convert_back(&self, target: &T) -> Result<T, ConversionError> {
        Ok(target.clone())
    }
}

/// Converter built from a pair of closures.
///
/// ```
/// use tandem_core::{ConversionError, FnConverter, ItemConverter};
///
/// let converter = FnConverter::new(
///     |n: &u32| Ok(n.to_string()),
///     |s: &String| s.parse::<u32>().map_err(|e| ConversionError::new(e.to_string())),
/// );
///
/// assert_eq!(converter.convert(&7).unwrap(), "7");
/// assert!(converter.convert_back(&"x".to_string()).is_err());
/// ```
pub struct FnConverter<M, T, F, B> {
    forward: F,
    backward: B,
    _elements: PhantomData<fn(M) -> T>,
}

impl<M, T, F, B> FnConverter<M, T, F, B>
where
    F: Fn(&M) -> Result<T, ConversionError> + Send + Sync,
    B: Fn(&T) -> Result<M, ConversionError> + Send + Sync,
{
    /// Create a converter from `forward` and `backward`.
    pub fn new(forward: F, backward: B) -> Self {
        Self { forward, backward, _elements: PhantomData }
    }
}

impl<M, T, F, B> ItemConverter<M, T> for FnConverter<M, T, F, B>
where
    F: Fn(&M) -> Result<T, ConversionError> + Send + Sync,
    B: Fn(&T) -> Result<M, ConversionError> + Send + Sync,
{
    fn convert(&self, master: &M) -> Result<T, ConversionError> {
        (self.forward)(master)
    }

    fn convert_back(&self, target: &T) -> Result<M, ConversionError> {
        (self.backward)(target)
    }
}

impl<M, T, F, B> fmt::Debug for FnConverter<M, T, F, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConverter").finish_non_exhaustive()
    }
}
