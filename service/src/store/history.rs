//! [`HistoryLog`] definitions.

use common::{unit, DateTimeOf};
use derive_more::{Display, From, Into};

#[cfg(doc)]
use common::DateTime;

use crate::domain::{
    assignment::{self, Assignment},
    user,
};

/// ID of a [`Checkpoint`], monotonically increasing within one log.
///
/// IDs keep increasing even after undos: a popped [`Checkpoint`]'s ID is
/// never reissued.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
)]
pub struct CheckpointId(u64);

/// [`DateTime`] when a [`Checkpoint`] was recorded.
pub type RecordingDateTime = DateTimeOf<(Checkpoint, unit::Recording)>;

/// Difference of a single [`assignment::Key`] produced by one mutation.
///
/// [`None`] on either side means the key was absent from the map at that
/// point, which is not the same as a cleared [`Assignment`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyDiff {
    /// Key the difference applies to.
    pub key: assignment::Key,

    /// [`Assignment`] held by the key before the mutation.
    pub previous: Option<Assignment>,

    /// [`Assignment`] held by the key after the mutation.
    pub next: Option<Assignment>,
}

/// One undoable unit of history.
///
/// A [`Checkpoint`] aggregates every [`KeyDiff`] of one logical mutation:
/// a single-cell edit records a one-diff [`Checkpoint`], a batch records
/// one [`Checkpoint`] covering the whole batch, so undoing pops the batch
/// as a unit.
#[derive(Clone, Debug)]
pub struct Checkpoint {
    /// ID of this [`Checkpoint`].
    pub id: CheckpointId,

    /// [`DateTime`] when this [`Checkpoint`] was recorded.
    pub at: RecordingDateTime,

    /// [`user::Id`] whose mutation this [`Checkpoint`] records.
    pub by: user::Id,

    /// [`KeyDiff`]s of this [`Checkpoint`], in application order.
    pub diffs: Vec<KeyDiff>,
}

/// Append-only sequence of [`Checkpoint`]s.
///
/// The log never touches the assignment map itself: undoing returns the
/// popped [`Checkpoint`] and the owner applies the reversal.
#[derive(Debug, Default)]
pub struct HistoryLog {
    /// ID to assign to the next recorded [`Checkpoint`].
    next_id: u64,

    /// Recorded [`Checkpoint`]s, oldest first.
    checkpoints: Vec<Checkpoint>,
}

impl HistoryLog {
    /// Creates a new empty [`HistoryLog`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new [`Checkpoint`] covering the provided [`KeyDiff`]s.
    pub fn record(
        &mut self,
        diffs: Vec<KeyDiff>,
        at: RecordingDateTime,
        by: user::Id,
    ) -> CheckpointId {
        let id = CheckpointId::from(self.next_id);
        self.next_id += 1;
        self.checkpoints.push(Checkpoint { id, at, by, diffs });
        id
    }

    /// Pops the most recent [`Checkpoint`], if any.
    pub fn undo_last(&mut self) -> Option<Checkpoint> {
        self.checkpoints.pop()
    }

    /// Removes every recorded [`Checkpoint`].
    ///
    /// Used after a successful persistence commit, as undo doesn't cross a
    /// save boundary.
    pub fn clear(&mut self) {
        self.checkpoints.clear();
    }

    /// Returns an [`Iterator`] over the recorded [`Checkpoint`]s, oldest
    /// first.
    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> + '_ {
        self.checkpoints.iter()
    }

    /// Indicates whether this [`HistoryLog`] holds no [`Checkpoint`]s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Returns the number of recorded [`Checkpoint`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }
}

#[cfg(test)]
mod spec {
    use crate::domain::user;

    use super::{HistoryLog, RecordingDateTime};

    fn record(log: &mut HistoryLog) -> super::CheckpointId {
        log.record(Vec::new(), RecordingDateTime::now(), user::Id::new())
    }

    #[test]
    fn ids_increase_monotonically() {
        let mut log = HistoryLog::new();
        let first = record(&mut log);
        let second = record(&mut log);
        assert!(second > first);

        // Undoing must not cause ID reuse.
        let popped = log.undo_last().unwrap();
        assert_eq!(popped.id, second);
        let third = record(&mut log);
        assert!(third > second);
    }

    #[test]
    fn undoes_in_lifo_order() {
        let mut log = HistoryLog::new();
        let first = record(&mut log);
        let second = record(&mut log);

        assert_eq!(log.undo_last().unwrap().id, second);
        assert_eq!(log.undo_last().unwrap().id, first);
        assert!(log.undo_last().is_none());
    }

    #[test]
    fn clear_empties_the_log() {
        let mut log = HistoryLog::new();
        _ = record(&mut log);
        _ = record(&mut log);
        assert_eq!(log.len(), 2);

        log.clear();
        assert!(log.is_empty());
        assert!(log.undo_last().is_none());
    }
}
