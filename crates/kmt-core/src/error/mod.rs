//! Type-erased errors with tracing functionalities.

use crate::SharedString;
use std::{error, fmt};

/// An error type backed by an allocation-optimized string.
#[derive(Debug)]
pub struct Error {
    /// Error message.
    message: SharedString,
    /// Error source.
    source: Option<Box<Error>>,
}

impl Error {
    /// Creates a new instance with the supplied message.
    #[inline]
    pub fn new(message: impl Into<SharedString>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new instance with the supplied message and the error source.
    #[inline]
    pub fn with_source(message: impl Into<SharedString>, source: impl Into<Error>) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source.into())),
        }
    }

    /// Returns a new instance with the supplied message and `self` as the error source.
    #[inline]
    pub fn wrap(self, message: impl Into<SharedString>) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(self)),
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    /// Returns the source.
    #[inline]
    pub fn source(&self) -> Option<&Error> {
        self.source.as_deref()
    }

    /// Returns the lowest level source of `self`.
    pub fn root_source(&self) -> Option<&Error> {
        let mut source = self.source();
        while let Some(err) = source.and_then(|err| err.source()) {
            source = Some(err);
        }
        source
    }
}

impl<E: error::Error + 'static> From<E> for Error {
    #[inline]
    fn from(err: E) -> Self {
        Self {
            message: err.to_string().into(),
            source: err.source().map(|err| Box::new(Self::new(err.to_string()))),
        }
    }
}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = &self.message;
        if let Some(source) = &self.source {
            write!(f, "{message}: {source}")
        } else {
            write!(f, "{message}")
        }
    }
}

/// Returns early with an [`Error`] and emits an `ERROR` event.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)+) => {{
        let message = format!($($arg)+);
        tracing::error!("{message}");
        return Err($crate::error::Error::new(message));
    }};
}

/// Constructs an [`Error`] and emits a `WARN` event.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {{
        let message = format!($($arg)+);
        tracing::warn!("{message}");
        $crate::error::Error::new(message)
    }};
}
