//! Change log read model.
//!
//! The "who changed what when" view over the session's history.

use crate::{
    domain::{assignment, professional, user},
    store::{history::RecordingDateTime, CheckpointId},
};

/// One recorded change, covering every cell its mutation touched.
#[derive(Clone, Debug)]
pub struct Entry {
    /// [`CheckpointId`] of the mutation.
    pub checkpoint: CheckpointId,

    /// When the mutation was recorded.
    pub at: RecordingDateTime,

    /// [`user::Id`] who performed the mutation.
    pub by: user::Id,

    /// Per-cell [`Change`]s of the mutation, in application order.
    pub changes: Vec<Change>,
}

/// Change of a single cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Change {
    /// Cell the change applies to.
    pub key: assignment::Key,

    /// [`professional::Id`] assigned before the change, if any.
    pub from: Option<professional::Id>,

    /// [`professional::Id`] assigned after the change, if any.
    pub to: Option<professional::Id>,
}
