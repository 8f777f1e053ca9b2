//! [`Command`] for (re)loading the schedule from persistence.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::assignment,
    infra::{persistence, Persistence},
    store::{self, Scope},
    Service,
};

use super::Command;

/// [`Command`] for (re)loading the session's schedule from the persistence
/// collaborator.
///
/// Replaces the store wholesale: any local edits, history and dirty state
/// are discarded in favor of the persisted truth.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoadSchedule;

impl<P> Command<LoadSchedule> for Service<P>
where
    P: Persistence<
        Select<By<assignment::Map, Scope>>,
        Ok = assignment::Map,
        Err = Traced<persistence::Error>,
    >,
{
    type Ok = usize;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: LoadSchedule) -> Result<Self::Ok, Self::Err> {
        let scope = self.config().scope;

        let map = self
            .persistence()
            .execute(Select(By::new(scope)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;
        let loaded = map.len();

        self.state_mut(|state| state.store.reset(map))
            .map_err(tracerr::from_and_wrap!(=> ExecutionError))?;

        log::info!("loaded {loaded} assignments of `{}`", scope.patient);
        Ok(loaded)
    }
}

/// Error of [`LoadSchedule`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// `Persistence` operation failed.
    #[display("`Persistence` operation failed: {_0}")]
    Persistence(persistence::Error),

    /// Loaded rows don't fit the session's [`store::Scope`].
    #[display("loaded rows rejected: {_0}")]
    Validation(store::ValidationError),
}
