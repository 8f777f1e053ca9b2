//! [`Query`] rendering the change log.

use std::convert::Infallible;

use crate::{read::changes, Service};

use super::Query;

/// Queries all the recorded [`changes::Entry`]s of the session, oldest
/// first.
///
/// Only covers mutations since the last load or successful save, as the
/// history is cleared on both boundaries.
#[derive(Clone, Copy, Debug, Default)]
pub struct All;

impl<P> Query<All> for Service<P> {
    type Ok = Vec<changes::Entry>;
    type Err = Infallible;

    async fn execute(&self, _: All) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .store()
            .history()
            .iter()
            .map(|checkpoint| changes::Entry {
                checkpoint: checkpoint.id,
                at: checkpoint.at,
                by: checkpoint.by,
                changes: checkpoint
                    .diffs
                    .iter()
                    .map(|diff| changes::Change {
                        key: diff.key,
                        from: diff
                            .previous
                            .as_ref()
                            .and_then(|a| a.professional),
                        to: diff.next.as_ref().and_then(|a| a.professional),
                    })
                    .collect(),
            })
            .collect())
    }
}
