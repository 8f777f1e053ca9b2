//! [`Command`] for editing many grid cells as one unit.

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

/// [`Command`] for editing many grid cells as one logical unit.
///
/// The whole batch records a single history checkpoint, so one undo
/// reverts it entirely. Entries assigning [`None`] clear their cells
/// explicitly.
#[derive(Clone, Debug)]
pub struct ApplyBatch {
    /// Cells to edit, with the [`professional::Id`]s to assign.
    pub entries: Vec<(assignment::Key, Option<professional::Id>)>,

    /// [`demand::Id`] the assigned entries are produced from, if any.
    pub source_demand: Option<demand::Id>,
}

impl<P> Command<ApplyBatch> for Service<P> {
    type Ok = Option<CheckpointId>;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: ApplyBatch) -> Result<Self::Ok, Self::Err> {
        let ApplyBatch {
            entries,
            source_demand,
        } = cmd;

        let modified_at = assignment::ModificationDateTime::now();
        let modified_by = self.config().user;
        let count = entries.len();
        let batch = entries
            .into_iter()
            .map(|(key, professional)| {
                (
                    key,
                    Assignment {
                        professional,
                        // Cleared cells drop their demand reference along
                        // with the professional.
                        source_demand: professional
                            .is_some()
                            .then_some(source_demand)
                            .flatten(),
                        modified_at,
                        modified_by,
                    },
                )
            })
            .collect::<assignment::Batch>();

        let id = self
            .state_mut(|state| state.store.set_many(batch))
            .map_err(tracerr::from_and_wrap!(=> ExecutionError))?;

        log::debug!("applied a batch of {count} cells");
        Ok(id)
    }
}

/// Error of [`ApplyBatch`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Some provided cells don't fit the session's [`store::Scope`].
    #[display("invalid cells: {_0}")]
    Validation(store::ValidationError),
}
