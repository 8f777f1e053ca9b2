//! [`Command`] for reverting the most recent mutation.

use std::convert::Infallible;

use tracing as log;

use crate::{store::Checkpoint, Service};

use super::Command;

/// [`Command`] for reverting the most recent history [`Checkpoint`].
///
/// A checkpoint covers one logical mutation: a single edit reverts one
/// cell, a batch reverts every cell it touched, as one unit either way.
#[derive(Clone, Copy, Debug, Default)]
pub struct Undo;

impl<P> Command<Undo> for Service<P> {
    type Ok = Option<Checkpoint>;
    type Err = Infallible;

    async fn execute(&self, _: Undo) -> Result<Self::Ok, Self::Err> {
        let popped = self.state_mut(|state| state.store.undo());
        match &popped {
            Some(checkpoint) => {
                log::debug!(
                    "reverted checkpoint {} of {} cells",
                    checkpoint.id,
                    checkpoint.diffs.len(),
                );
            }
            None => log::debug!("nothing to undo"),
        }
        Ok(popped)
    }
}
