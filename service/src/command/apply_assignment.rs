//! [`Command`] for assigning a professional to a single grid cell.

use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        assignment::{self, Assignment},
        demand, professional,
    },
    store::{self, CheckpointId},
    Service,
};

use super::Command;

/// [`Command`] for assigning a [`professional::Id`] to a single grid cell.
#[derive(Clone, Copy, Debug)]
pub struct ApplyAssignment {
    /// Cell to assign.
    pub key: assignment::Key,

    /// [`professional::Id`] to assign.
    pub professional: professional::Id,

    /// [`demand::Id`] the assignment is produced from, if any.
    ///
    /// Manual edits carry none.
    pub source_demand: Option<demand::Id>,
}

impl<P> Command<ApplyAssignment> for Service<P> {
    type Ok = CheckpointId;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ApplyAssignment,
    ) -> Result<Self::Ok, Self::Err> {
        let ApplyAssignment {
            key,
            professional,
            source_demand,
        } = cmd;

        let assignment = Assignment {
            professional: Some(professional),
            source_demand,
            modified_at: assignment::ModificationDateTime::now(),
            modified_by: self.config().user,
        };
        let id = self
            .state_mut(|state| state.store.set(key, assignment))
            .map_err(tracerr::from_and_wrap!(=> ExecutionError))?;

        log::debug!("assigned `{professional}` to `{key}`");
        Ok(id)
    }
}

/// Error of [`ApplyAssignment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Provided cell doesn't fit the session's [`store::Scope`].
    #[display("invalid cell: {_0}")]
    Validation(store::ValidationError),
}
