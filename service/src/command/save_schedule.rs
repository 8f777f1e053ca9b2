//! [`Command`] flushing local edits to persistence.

use common::operations::Save;
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::assignment,
    infra::{persistence, Persistence},
    Service,
};

use super::Command;

/// [`Command`] flushing the session's dirty cells to the persistence
/// collaborator.
///
/// The payload is snapshotted at save start, so edits arriving while the
/// remote call is pending never leak into it: they trigger one follow-up
/// save once the pending call resolves. Only one save is ever in flight; a
/// request arriving while one is pending returns [`Outcome::Queued`] and
/// its work is picked up by the in-flight loop.
///
/// A failed save restores the snapshot into the dirty set and surfaces a
/// retryable error. Local edits are never rolled back.
#[derive(Clone, Copy, Debug, Default)]
pub struct SaveSchedule;

/// Outcome of a [`SaveSchedule`] [`Command`] execution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Nothing was dirty, so no remote call was made.
    Unchanged,

    /// A save was already in flight; this request was queued onto it.
    Queued,

    /// Dirty cells were flushed successfully, follow-ups included.
    Saved,
}

impl<P> Command<SaveSchedule> for Service<P>
where
    P: Persistence<
        Save<assignment::Batch>,
        Ok = (),
        Err = Traced<persistence::Error>,
    >,
{
    type Ok = Outcome;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: SaveSchedule) -> Result<Self::Ok, Self::Err> {
        let proceed = self.state_mut(|state| {
            if state.save.in_flight {
                state.save.queued = true;
                None
            } else if state.store.is_dirty() {
                state.save.in_flight = true;
                Some(true)
            } else {
                Some(false)
            }
        });
        match proceed {
            None => return Ok(Outcome::Queued),
            Some(false) => return Ok(Outcome::Unchanged),
            Some(true) => {}
        }

        loop {
            // Snapshot before awaiting: the in-flight payload must not see
            // edits applied while the remote call is pending.
            let batch = self.state_mut(|state| state.store.snapshot_dirty());
            if batch.is_empty() {
                // Everything dirty was undone back to untouched cells.
                break;
            }

            log::info!("saving {} assignments", batch.len());
            let result =
                self.persistence().execute(Save(batch.clone())).await;
            if let Err(e) = result {
                self.state_mut(|state| {
                    state.store.restore_dirty(&batch);
                    state.save.in_flight = false;
                    state.save.queued = false;
                });
                log::warn!("save failed, keeping local edits dirty: {e}");
                return Err(e)
                    .map_err(tracerr::map_from_and_wrap!(=> ExecutionError));
            }

            let follow_up = self.state_mut(|state| {
                // Undo doesn't cross a successful commit.
                state.store.commit_saved();
                state.save.queued = false;
                state.store.is_dirty()
            });
            if !follow_up {
                break;
            }
            log::debug!("edits arrived mid-save, following up");
        }

        self.state_mut(|state| {
            state.save.in_flight = false;
            state.save.queued = false;
        });
        Ok(Outcome::Saved)
    }
}

/// Error of [`SaveSchedule`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// `Persistence` operation failed.
    ///
    /// Retryable: the dirty cells stay dirty, so a later save picks them
    /// up again.
    #[display("`Persistence` operation failed: {_0}")]
    Persistence(persistence::Error),
}

#[cfg(test)]
mod spec {
    use common::date;

    use crate::{
        command::{ApplyAssignment, Undo},
        domain::{assignment, patient, professional, regime::Regime, user},
        infra::InMemory,
        store::Scope,
        task, Command as _, Config, Service,
    };

    use super::{Outcome, SaveSchedule};

    fn service(persistence: InMemory) -> Service<InMemory> {
        let (service, _bg) = Service::new(
            Config {
                user: user::Id::new(),
                scope: Scope {
                    patient: patient::Id::new(),
                    regime: Regime::Daytime,
                    range: date::Range::new(
                        "2024-01-01".parse().unwrap(),
                        "2024-01-07".parse().unwrap(),
                    ),
                },
                autosave: task::autosave::Config::default(),
            },
            persistence,
        );
        service
    }

    fn key(service: &Service<InMemory>, day: &str, slot: u8) -> assignment::Key {
        assignment::Key {
            patient: service.config().scope.patient,
            day: day.parse().unwrap(),
            slot: slot.into(),
        }
    }

    async fn assign(service: &Service<InMemory>, key: assignment::Key) {
        _ = service
            .execute(ApplyAssignment {
                key,
                professional: professional::Id::new(),
                source_demand: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn nothing_dirty_is_unchanged() {
        let service = service(InMemory::new());
        let outcome = service.execute(SaveSchedule).await.unwrap();
        assert_eq!(outcome, Outcome::Unchanged);
    }

    #[tokio::test]
    async fn flushes_dirty_cells_and_clears_history() {
        let persistence = InMemory::new();
        let service = service(persistence.clone());
        let k = key(&service, "2024-01-02", 0);
        assign(&service, k).await;

        let outcome = service.execute(SaveSchedule).await.unwrap();

        assert_eq!(outcome, Outcome::Saved);
        let patient = service.config().scope.patient;
        assert!(persistence.stored(patient).contains_key(&k));
        let store = service.store();
        assert!(!store.is_dirty());
        // Undo doesn't cross a save boundary.
        assert!(store.history().is_empty());
    }

    #[tokio::test]
    async fn failed_save_keeps_edits_and_allows_retry() {
        let persistence = InMemory::new();
        let service = service(persistence.clone());
        let k = key(&service, "2024-01-02", 0);
        assign(&service, k).await;

        persistence.fail_next_saves(1);
        let patient = service.config().scope.patient;

        assert!(service.execute(SaveSchedule).await.is_err());
        assert!(persistence.stored(patient).is_empty());
        {
            let store = service.store();
            // Local edits survive the failure and stay dirty.
            assert!(store.get(&k).is_some());
            assert!(store.is_dirty());
        }

        let outcome = service.execute(SaveSchedule).await.unwrap();
        assert_eq!(outcome, Outcome::Saved);
        assert!(persistence.stored(patient).contains_key(&k));
    }

    #[tokio::test]
    async fn overlapping_request_is_queued() {
        let persistence = InMemory::new();
        let service = service(persistence.clone());
        assign(&service, key(&service, "2024-01-02", 0)).await;

        let (first, second) = tokio::join!(
            service.execute(SaveSchedule),
            service.execute(SaveSchedule),
        );

        assert_eq!(first.unwrap(), Outcome::Saved);
        assert_eq!(second.unwrap(), Outcome::Queued);
    }

    #[tokio::test]
    async fn edit_arriving_mid_save_triggers_a_follow_up() {
        let persistence = InMemory::new();
        let service = service(persistence.clone());
        let early = key(&service, "2024-01-02", 0);
        let late = key(&service, "2024-01-03", 1);
        assign(&service, early).await;

        let (outcome, ()) = tokio::join!(
            service.execute(SaveSchedule),
            // The in-flight payload was snapshotted already, so this edit
            // lands in the follow-up save.
            assign(&service, late),
        );

        assert_eq!(outcome.unwrap(), Outcome::Saved);
        let patient = service.config().scope.patient;
        let stored = persistence.stored(patient);
        assert!(stored.contains_key(&early));
        assert!(stored.contains_key(&late));
        assert!(!service.store().is_dirty());
    }

    #[tokio::test]
    async fn dirty_cells_undone_to_absence_save_nothing() {
        let persistence = InMemory::new();
        let service = service(persistence.clone());
        let k = key(&service, "2024-01-02", 0);
        assign(&service, k).await;
        _ = service.execute(Undo).await.unwrap().unwrap();

        let outcome = service.execute(SaveSchedule).await.unwrap();

        assert_eq!(outcome, Outcome::Saved);
        let patient = service.config().scope.patient;
        assert!(persistence.stored(patient).is_empty());
    }
}
