//! In-memory [`Persistence`] collaborator.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use common::operations::{By, Save, Select};
use tracerr::Traced;

use crate::{
    domain::{assignment, patient},
    store::Scope,
};

use super::{Error, Persistence};

/// In-memory [`Persistence`] collaborator.
///
/// Backs tests and local wiring: keeps per-patient assignment maps behind
/// an [`Rc`], so clones share the same records. Upcoming saves can be made
/// to fail on demand, and every save yields once before applying, so
/// in-flight behavior is observable under a cooperative executor.
#[derive(Clone, Debug, Default)]
pub struct InMemory {
    /// Stored assignment maps, per patient.
    records: Rc<RefCell<HashMap<patient::Id, assignment::Map>>>,

    /// Number of upcoming save operations to fail.
    fail_saves: Rc<Cell<u32>>,
}

impl InMemory {
    /// Creates a new empty [`InMemory`] collaborator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the provided assignments as the stored records of the
    /// `patient`.
    pub fn seed(&self, patient: patient::Id, map: assignment::Map) {
        _ = self.records.borrow_mut().insert(patient, map);
    }

    /// Makes the next `count` save operations fail with
    /// [`Error::Unavailable`].
    pub fn fail_next_saves(&self, count: u32) {
        self.fail_saves.set(self.fail_saves.get() + count);
    }

    /// Returns the currently stored assignments of the `patient`.
    #[must_use]
    pub fn stored(&self, patient: patient::Id) -> assignment::Map {
        self.records
            .borrow()
            .get(&patient)
            .cloned()
            .unwrap_or_default()
    }
}

impl Persistence<Select<By<assignment::Map, Scope>>> for InMemory {
    type Ok = assignment::Map;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<assignment::Map, Scope>>,
    ) -> Result<Self::Ok, Self::Err> {
        let scope = by.into_inner();
        Ok(self
            .records
            .borrow()
            .get(&scope.patient)
            .map(|map| {
                map.iter()
                    .filter(|(key, _)| scope.range.contains(key.day))
                    .map(|(key, assignment)| (*key, assignment.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl Persistence<Save<assignment::Batch>> for InMemory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Save(batch): Save<assignment::Batch>,
    ) -> Result<Self::Ok, Self::Err> {
        // Suspend once, as a real remote call would.
        tokio::task::yield_now().await;

        let pending = self.fail_saves.get();
        if pending > 0 {
            self.fail_saves.set(pending - 1);
            return Err(tracerr::new!(Error::Unavailable(
                "simulated outage".into(),
            )));
        }

        let mut records = self.records.borrow_mut();
        for (key, assignment) in batch {
            _ = records
                .entry(key.patient)
                .or_default()
                .insert(key, assignment);
        }
        Ok(())
    }
}
