//! Error types for Perforator

use thiserror::Error;

/// Result type alias for Perforator core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Perforator core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested window cannot be fetched
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// A windowed fetch that stopped on a remote error
///
/// Carries every item collected before the failing page, in remote order.
#[derive(Debug)]
pub struct PartialFetch<T, E> {
    /// Items gathered from the pages fetched before the failure
    pub items: Vec<T>,
    /// The error returned by the remote for the failing page
    pub source: E,
}

impl<T, E> PartialFetch<T, E> {
    /// Split into the partial items and the triggering error
    pub fn into_parts(self) -> (Vec<T>, E) {
        (self.items, self.source)
    }
}

impl<T, E: std::fmt::Display> std::fmt::Display for PartialFetch<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "fetch stopped after {} item(s): {}",
            self.items.len(),
            self.source
        )
    }
}

impl<T, E> std::error::Error for PartialFetch<T, E>
where
    T: std::fmt::Debug,
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
