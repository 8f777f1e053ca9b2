//! [`Persistence`]-related implementations.
//!
//! The persistence collaborator is an opaque remote service: the engine
//! only ever asks it to [`Select`] a scoped assignment map and to [`Save`]
//! a batch of edits. Validation, tenant isolation and referential
//! integrity live behind it.
//!
//! [`Save`]: common::operations::Save
//! [`Select`]: common::operations::Select

#[cfg(feature = "memory")]
pub mod memory;

use derive_more::Display;

#[cfg(feature = "memory")]
pub use self::memory::InMemory;

/// Persistence operation.
pub use common::Handler as Persistence;

/// [`Persistence`] error.
///
/// Always retryable: a failed operation leaves the local session state
/// untouched, so retrying is the recovery path.
#[derive(Clone, Debug, Display, derive_more::Error)]
pub enum Error {
    /// Collaborator could not be reached.
    #[display("persistence collaborator unavailable: {_0}")]
    Unavailable(#[error(not(source))] String),

    /// Collaborator rejected the payload.
    #[display("persistence collaborator rejected the payload: {_0}")]
    Rejected(#[error(not(source))] String),
}
