//! [`Handler`] abstractions.

use std::future::Future;

/// Executable handler.
///
/// This is the single seam every executable operation of the system goes
/// through: callers see only `Args` in and `Result<Ok, Err>` out, so the
/// same abstraction serves local state mutations and remote collaborator
/// calls alike.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
