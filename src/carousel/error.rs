//! Error type for the few carousel operations that report failure.
//!
//! Runtime navigation never errors: out-of-range indices are normalized or
//! ignored. Errors only come from parsing an option bag and from the `try_`
//! variants of the structural item operations.

/// Errors reported by the carousel.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The option bag could not be parsed, e.g. a non-numeric breakpoint.
    #[error("invalid carousel options: {0}")]
    Options(#[from] serde_json::Error),

    /// A structural item operation referenced an index that does not exist.
    #[error("item index {index} out of range for {count} items")]
    ItemOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of real items at the time of the request.
        count: usize,
    },
}

/// Result alias for carousel operations.
pub type Result<T> = std::result::Result<T, Error>;
