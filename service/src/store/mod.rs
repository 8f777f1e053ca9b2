//! [`AssignmentStore`] definitions.

pub mod history;

use std::{collections::HashSet, fmt};

use common::date;
use derive_more::{Display, Error};

use crate::domain::{
    assignment::{self, Assignment},
    patient,
    regime::Regime,
    user,
};

pub use self::history::{Checkpoint, CheckpointId, HistoryLog, KeyDiff};

/// Scope of one schedule grid session.
///
/// Every [`assignment::Key`] entering the store is validated against it,
/// so the map never holds cells of another patient, of an unknown slot, or
/// of a day outside the session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Scope {
    /// [`patient::Id`] whose schedule the session edits.
    pub patient: patient::Id,

    /// [`Regime`] the patient is cared under.
    pub regime: Regime,

    /// Visible [`date::Range`] of the session.
    pub range: date::Range,
}

impl Scope {
    /// Checks the provided [`assignment::Key`] against this [`Scope`].
    fn validate(&self, key: &assignment::Key) -> Result<(), Reason> {
        use Reason as R;

        if key.patient != self.patient {
            return Err(R::ForeignPatient);
        }
        if self.regime.slot(key.slot).is_none() {
            return Err(R::SlotOutOfRange);
        }
        if !self.range.contains(key.day) {
            return Err(R::OutsideRange);
        }
        Ok(())
    }
}

/// In-memory store of one patient's slot [`Assignment`]s.
///
/// Owns the [`assignment::Map`] exclusively: all mutations go through its
/// operations, each recording a [`Checkpoint`] into the owned
/// [`HistoryLog`] and marking the touched keys dirty for the next save.
/// No operation applies partially: a failing batch leaves the map intact.
#[derive(Debug)]
pub struct AssignmentStore {
    /// [`Scope`] of this store's session.
    scope: Scope,

    /// [`Assignment`]s of this store, by their [`assignment::Key`]s.
    map: assignment::Map,

    /// Keys mutated since the last successful save.
    dirty: HashSet<assignment::Key>,

    /// [`HistoryLog`] of this store's mutations.
    history: HistoryLog,
}

impl AssignmentStore {
    /// Creates a new empty [`AssignmentStore`] for the provided [`Scope`].
    #[must_use]
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            map: assignment::Map::new(),
            dirty: HashSet::new(),
            history: HistoryLog::new(),
        }
    }

    /// Returns the [`Scope`] of this store's session.
    #[must_use]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Returns the [`Assignment`] held by the provided key.
    ///
    /// [`None`] means the cell was never touched, which is distinct from a
    /// cell holding an explicitly cleared [`Assignment`].
    #[must_use]
    pub fn get(&self, key: &assignment::Key) -> Option<&Assignment> {
        self.map.get(key)
    }

    /// Returns an [`Iterator`] over all the held [`Assignment`]s.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (&assignment::Key, &Assignment)> + '_ {
        self.map.iter()
    }

    /// Returns the number of held [`Assignment`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Indicates whether this store holds no [`Assignment`]s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the [`HistoryLog`] of this store.
    #[must_use]
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Indicates whether any keys were mutated since the last successful
    /// save.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Sets the provided [`Assignment`], overwriting any held one.
    ///
    /// Records a one-diff [`Checkpoint`] carrying the prior value.
    ///
    /// # Errors
    ///
    /// If the key doesn't fit this store's [`Scope`]. Nothing is applied.
    pub fn set(
        &mut self,
        key: assignment::Key,
        assignment: Assignment,
    ) -> Result<CheckpointId, ValidationError> {
        self.scope.validate(&key).map_err(|reason| ValidationError {
            offenders: vec![(key, reason)],
        })?;

        let at = assignment.modified_at.coerce();
        let by = assignment.modified_by;
        let previous = self.map.insert(key, assignment.clone());
        _ = self.dirty.insert(key);
        Ok(self.history.record(
            vec![KeyDiff {
                key,
                previous,
                next: Some(assignment),
            }],
            at,
            by,
        ))
    }

    /// Explicitly clears the provided cell.
    ///
    /// The cell keeps existing in the map with no professional assigned,
    /// which is distinct from removing it.
    ///
    /// # Errors
    ///
    /// If the key doesn't fit this store's [`Scope`]. Nothing is applied.
    pub fn clear(
        &mut self,
        key: assignment::Key,
        modified_at: assignment::ModificationDateTime,
        modified_by: user::Id,
    ) -> Result<CheckpointId, ValidationError> {
        self.set(
            key,
            Assignment {
                professional: None,
                source_demand: None,
                modified_at,
                modified_by,
            },
        )
    }

    /// Applies the provided batch as one logical mutation.
    ///
    /// The whole batch is covered by a single [`Checkpoint`], so one undo
    /// reverts it as a unit. An empty batch records nothing and returns
    /// [`None`].
    ///
    /// # Errors
    ///
    /// If any key doesn't fit this store's [`Scope`]: the error lists all
    /// the offending keys and nothing is applied.
    pub fn set_many(
        &mut self,
        batch: assignment::Batch,
    ) -> Result<Option<CheckpointId>, ValidationError> {
        let mut offenders = batch
            .iter()
            .filter_map(|(key, _)| {
                self.scope.validate(key).err().map(|reason| (*key, reason))
            })
            .collect::<Vec<_>>();
        if !offenders.is_empty() {
            offenders.sort_unstable_by_key(|(key, _)| *key);
            return Err(ValidationError { offenders });
        }

        let Some((_, first)) = batch.first() else {
            return Ok(None);
        };
        let at = first.modified_at.coerce();
        let by = first.modified_by;

        let mut diffs = Vec::with_capacity(batch.len());
        for (key, assignment) in batch {
            let previous = self.map.insert(key, assignment.clone());
            _ = self.dirty.insert(key);
            diffs.push(KeyDiff {
                key,
                previous,
                next: Some(assignment),
            });
        }
        Ok(Some(self.history.record(diffs, at, by)))
    }

    /// Reverts the most recent [`Checkpoint`], if any.
    ///
    /// Every diff of the checkpoint is rolled back to its `previous` value
    /// (removing keys that were absent), and the touched keys are marked
    /// dirty so the reversal reaches the next save.
    pub fn undo(&mut self) -> Option<Checkpoint> {
        let checkpoint = self.history.undo_last()?;
        // Diffs unwind in reverse, so chained edits of the same key inside
        // one batch roll back to the oldest `previous`.
        for diff in checkpoint.diffs.iter().rev() {
            match &diff.previous {
                Some(previous) => {
                    _ = self.map.insert(diff.key, previous.clone());
                }
                None => {
                    _ = self.map.remove(&diff.key);
                }
            }
            _ = self.dirty.insert(diff.key);
        }
        Some(checkpoint)
    }

    /// Replaces the held [`assignment::Map`] wholesale.
    ///
    /// Used after a fetch from the persistence collaborator: history and
    /// dirty state are cleared, as the new map is the persisted truth.
    ///
    /// # Errors
    ///
    /// If any loaded key doesn't fit this store's [`Scope`]: the error
    /// lists all the offending keys and the held map stays untouched.
    pub fn reset(
        &mut self,
        map: assignment::Map,
    ) -> Result<(), ValidationError> {
        let mut offenders = map
            .keys()
            .filter_map(|key| {
                self.scope.validate(key).err().map(|reason| (*key, reason))
            })
            .collect::<Vec<_>>();
        if !offenders.is_empty() {
            offenders.sort_unstable_by_key(|(key, _)| *key);
            return Err(ValidationError { offenders });
        }

        self.map = map;
        self.dirty.clear();
        self.history.clear();
        Ok(())
    }

    /// Drains the dirty keys into an ordered [`assignment::Batch`] to be
    /// sent to the persistence collaborator.
    ///
    /// Dirty keys absent from the map are dropped silently: they were
    /// created and undone locally without ever being persisted, so there
    /// is nothing to send for them.
    pub fn snapshot_dirty(&mut self) -> assignment::Batch {
        let map = &self.map;
        let mut batch = self
            .dirty
            .drain()
            .filter_map(|key| map.get(&key).map(|a| (key, a.clone())))
            .collect::<assignment::Batch>();
        batch.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        batch
    }

    /// Re-marks the provided entries dirty after a failed save, so a retry
    /// picks them up again.
    pub fn restore_dirty(&mut self, batch: &assignment::Batch) {
        self.dirty.extend(batch.iter().map(|(key, _)| *key));
    }

    /// Marks a successful persistence commit.
    ///
    /// Clears the [`HistoryLog`]: undo doesn't cross a save boundary.
    pub fn commit_saved(&mut self) {
        self.history.clear();
    }
}

/// Error of validating [`assignment::Key`]s against a [`Scope`].
///
/// Raised before any mutation: a batch with offenders is rejected as a
/// whole.
#[derive(Clone, Debug, Error)]
pub struct ValidationError {
    /// Offending keys, with the [`Reason`]s of their rejection.
    #[error(not(source))]
    pub offenders: Vec<(assignment::Key, Reason)>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rejected keys: ")?;
        for (i, (key, reason)) in self.offenders.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "`{key}` ({reason})")?;
        }
        Ok(())
    }
}

/// Reason of an [`assignment::Key`] rejection.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Reason {
    /// Key belongs to another patient.
    #[display("belongs to another patient")]
    ForeignPatient,

    /// Slot index lies beyond the regime's table.
    #[display("slot index out of range for the regime")]
    SlotOutOfRange,

    /// Day lies outside the visible range.
    #[display("day outside the visible range")]
    OutsideRange,
}

#[cfg(test)]
mod spec {
    use common::date;

    use crate::domain::{
        assignment::{self, Assignment, ModificationDateTime},
        patient, professional,
        regime::Regime,
        user,
    };

    use super::{AssignmentStore, Reason, Scope};

    fn scope() -> Scope {
        Scope {
            patient: patient::Id::new(),
            regime: Regime::TwentyFourHour,
            range: date::Range::new(
                "2024-01-01".parse().unwrap(),
                "2024-01-07".parse().unwrap(),
            ),
        }
    }

    fn key(scope: &Scope, day: &str, slot: u8) -> assignment::Key {
        assignment::Key {
            patient: scope.patient,
            day: day.parse().unwrap(),
            slot: slot.into(),
        }
    }

    fn assigned(professional: professional::Id) -> Assignment {
        Assignment {
            professional: Some(professional),
            source_demand: None,
            modified_at: ModificationDateTime::now(),
            modified_by: user::Id::new(),
        }
    }

    fn contents(store: &AssignmentStore) -> assignment::Map {
        store.iter().map(|(k, a)| (*k, a.clone())).collect()
    }

    #[test]
    fn absent_differs_from_cleared() {
        let scope = scope();
        let mut store = AssignmentStore::new(scope);
        let k = key(&scope, "2024-01-02", 1);

        assert!(store.get(&k).is_none());

        _ = store
            .clear(k, ModificationDateTime::now(), user::Id::new())
            .unwrap();
        let held = store.get(&k).unwrap();
        assert!(held.professional.is_none());
        assert!(held.source_demand.is_none());
    }

    #[test]
    fn set_overwrites_and_records_prior_value() {
        let scope = scope();
        let mut store = AssignmentStore::new(scope);
        let k = key(&scope, "2024-01-02", 1);
        let first = assigned(professional::Id::new());
        let second = assigned(professional::Id::new());

        _ = store.set(k, first.clone()).unwrap();
        _ = store.set(k, second.clone()).unwrap();

        assert_eq!(store.get(&k), Some(&second));
        assert_eq!(store.history().len(), 2);
        let diffs = &store.history().iter().last().unwrap().diffs;
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].previous.as_ref(), Some(&first));
    }

    #[test]
    fn rejects_keys_outside_the_scope() {
        let scope = scope();
        let mut store = AssignmentStore::new(scope);

        let foreign = assignment::Key {
            patient: patient::Id::new(),
            ..key(&scope, "2024-01-02", 1)
        };
        let bad_slot = key(&scope, "2024-01-02", 4);
        let bad_day = key(&scope, "2024-02-01", 1);

        for (k, reason) in [
            (foreign, Reason::ForeignPatient),
            (bad_slot, Reason::SlotOutOfRange),
            (bad_day, Reason::OutsideRange),
        ] {
            let e = store.set(k, assigned(professional::Id::new()));
            assert_eq!(e.unwrap_err().offenders, vec![(k, reason)]);
        }
        assert!(store.is_empty());
        assert!(store.history().is_empty());
        assert!(!store.is_dirty());
    }

    #[test]
    fn set_many_applies_nothing_on_any_offender() {
        let scope = scope();
        let mut store = AssignmentStore::new(scope);
        let k1 = key(&scope, "2024-01-02", 1);
        _ = store.set(k1, assigned(professional::Id::new())).unwrap();
        let before = contents(&store);

        let batch = vec![
            (key(&scope, "2024-01-03", 0), assigned(professional::Id::new())),
            (key(&scope, "2024-01-03", 7), assigned(professional::Id::new())),
        ];
        let e = store.set_many(batch).unwrap_err();
        assert_eq!(
            e.offenders,
            vec![(key(&scope, "2024-01-03", 7), Reason::SlotOutOfRange)],
        );

        assert_eq!(contents(&store), before);
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn set_many_batch_undoes_as_one_unit() {
        let scope = scope();
        let mut store = AssignmentStore::new(scope);
        let k1 = key(&scope, "2024-01-02", 0);
        let k2 = key(&scope, "2024-01-02", 1);

        let id = store
            .set_many(vec![
                (k1, assigned(professional::Id::new())),
                (k2, assigned(professional::Id::new())),
            ])
            .unwrap()
            .unwrap();
        assert_eq!(store.history().len(), 1);

        let popped = store.undo().unwrap();
        assert_eq!(popped.id, id);
        assert!(store.get(&k1).is_none());
        assert!(store.get(&k2).is_none());
        assert!(store.history().is_empty());
    }

    #[test]
    fn set_many_of_empty_batch_records_nothing() {
        let mut store = AssignmentStore::new(scope());
        assert_eq!(store.set_many(Vec::new()).unwrap(), None);
        assert!(store.history().is_empty());
        assert!(!store.is_dirty());
    }

    #[test]
    fn undo_is_a_true_inverse() {
        let scope = scope();
        let mut store = AssignmentStore::new(scope);
        let k1 = key(&scope, "2024-01-02", 0);
        let k2 = key(&scope, "2024-01-03", 1);
        let before = contents(&store);

        _ = store.set(k1, assigned(professional::Id::new())).unwrap();
        _ = store.set(k2, assigned(professional::Id::new())).unwrap();
        _ = store.set(k1, assigned(professional::Id::new())).unwrap();
        _ = store
            .clear(k2, ModificationDateTime::now(), user::Id::new())
            .unwrap();

        for _ in 0..4 {
            _ = store.undo().unwrap();
        }
        assert_eq!(contents(&store), before);
        assert!(store.undo().is_none());
    }

    #[test]
    fn undo_unwinds_chained_edits_of_one_batch() {
        let scope = scope();
        let mut store = AssignmentStore::new(scope);
        let k = key(&scope, "2024-01-02", 0);
        let newer = assigned(professional::Id::new());

        _ = store
            .set_many(vec![
                (k, assigned(professional::Id::new())),
                (k, newer.clone()),
            ])
            .unwrap();
        assert_eq!(store.get(&k), Some(&newer));

        _ = store.undo().unwrap();
        assert!(store.get(&k).is_none());
    }

    #[test]
    fn snapshot_drains_dirty_keys_in_grid_order() {
        let scope = scope();
        let mut store = AssignmentStore::new(scope);
        let later = key(&scope, "2024-01-03", 0);
        let earlier = key(&scope, "2024-01-02", 1);

        _ = store.set(later, assigned(professional::Id::new())).unwrap();
        _ = store
            .set(earlier, assigned(professional::Id::new()))
            .unwrap();
        assert!(store.is_dirty());

        let batch = store.snapshot_dirty();
        assert_eq!(
            batch.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            [earlier, later],
        );
        assert!(!store.is_dirty());
    }

    #[test]
    fn snapshot_skips_keys_undone_back_to_absence() {
        let scope = scope();
        let mut store = AssignmentStore::new(scope);
        let k = key(&scope, "2024-01-02", 0);

        _ = store.set(k, assigned(professional::Id::new())).unwrap();
        _ = store.undo().unwrap();

        assert!(store.is_dirty());
        assert!(store.snapshot_dirty().is_empty());
        assert!(!store.is_dirty());
    }

    #[test]
    fn restore_dirty_remarks_snapshot_entries() {
        let scope = scope();
        let mut store = AssignmentStore::new(scope);
        let k = key(&scope, "2024-01-02", 0);
        _ = store.set(k, assigned(professional::Id::new())).unwrap();

        let batch = store.snapshot_dirty();
        assert!(!store.is_dirty());

        store.restore_dirty(&batch);
        assert!(store.is_dirty());
        assert_eq!(store.snapshot_dirty(), batch);
    }

    #[test]
    fn reset_replaces_map_and_clears_session_state() {
        let scope = scope();
        let mut store = AssignmentStore::new(scope);
        _ = store
            .set(key(&scope, "2024-01-02", 0), assigned(professional::Id::new()))
            .unwrap();

        let k = key(&scope, "2024-01-04", 1);
        let loaded = assigned(professional::Id::new());
        store
            .reset([(k, loaded.clone())].into_iter().collect())
            .unwrap();

        assert_eq!(contents(&store), [(k, loaded)].into_iter().collect());
        assert!(store.history().is_empty());
        assert!(!store.is_dirty());
    }

    #[test]
    fn reset_rejects_rows_outside_the_scope() {
        let scope = scope();
        let mut store = AssignmentStore::new(scope);
        let valid = key(&scope, "2024-01-02", 0);
        _ = store.set(valid, assigned(professional::Id::new())).unwrap();
        let before = contents(&store);

        let foreign = assignment::Key {
            patient: patient::Id::new(),
            ..key(&scope, "2024-01-02", 1)
        };
        let e = store
            .reset([(foreign, assigned(professional::Id::new()))].into())
            .unwrap_err();
        assert_eq!(e.offenders, vec![(foreign, Reason::ForeignPatient)]);
        assert_eq!(contents(&store), before);
    }

    #[test]
    fn renders_offenders_in_error_message() {
        let scope = scope();
        let mut store = AssignmentStore::new(scope);
        let bad = key(&scope, "2024-02-01", 0);
        let e = store
            .set(bad, assigned(professional::Id::new()))
            .unwrap_err();
        let rendered = e.to_string();
        assert!(rendered.contains(&bad.to_string()), "{rendered}");
        assert!(rendered.contains("outside the visible range"), "{rendered}");
    }
}
