//! [`Command`] for explicitly clearing a single grid cell.

use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::assignment,
    store::{self, CheckpointId},
    Service,
};

use super::Command;

/// [`Command`] for explicitly clearing a single grid cell.
///
/// The cell keeps existing with no professional assigned, which is
/// distinct from a cell that was never touched.
#[derive(Clone, Copy, Debug, From)]
pub struct ClearAssignment {
    /// Cell to clear.
    pub key: assignment::Key,
}

impl<P> Command<ClearAssignment> for Service<P> {
    type Ok = CheckpointId;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ClearAssignment,
    ) -> Result<Self::Ok, Self::Err> {
        let ClearAssignment { key } = cmd;

        let id = self
            .state_mut(|state| {
                state.store.clear(
                    key,
                    assignment::ModificationDateTime::now(),
                    self.config().user,
                )
            })
            .map_err(tracerr::from_and_wrap!(=> ExecutionError))?;

        log::debug!("cleared `{key}`");
        Ok(id)
    }
}

/// Error of [`ClearAssignment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Provided cell doesn't fit the session's [`store::Scope`].
    #[display("invalid cell: {_0}")]
    Validation(store::ValidationError),
}
