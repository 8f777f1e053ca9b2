//! Infrastructure layer.

pub mod persistence;

pub use self::persistence::Persistence;
#[cfg(feature = "memory")]
pub use self::persistence::InMemory;
