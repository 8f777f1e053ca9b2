//! [`Query`] rendering the schedule grid.

use std::convert::Infallible;

use common::date;
use derive_more::From;

use crate::{domain::assignment, read::grid, Service};

use super::Query;

/// Queries the [`grid::Grid`] view of the provided [`date::Range`].
///
/// The range is intersected with the session's visible range; days carry
/// one [`grid::Cell`] per slot of the session's regime, touched or not.
#[derive(Clone, Copy, Debug, From)]
pub struct OfRange(pub date::Range);

impl<P> Query<OfRange> for Service<P> {
    type Ok = grid::Grid;
    type Err = Infallible;

    async fn execute(
        &self,
        OfRange(range): OfRange,
    ) -> Result<Self::Ok, Self::Err> {
        let store = self.store();
        let scope = store.scope();

        let visible = date::Range::new(
            range.start.max(scope.range.start),
            range.end.min(scope.range.end),
        );
        let days = visible
            .iter()
            .map(|day| grid::Day {
                day,
                cells: scope
                    .regime
                    .slot_indices()
                    .map(|slot| grid::Cell {
                        slot,
                        label: scope
                            .regime
                            .slot(slot)
                            .map_or("", |s| s.label()),
                        assignment: store
                            .get(&assignment::Key {
                                patient: scope.patient,
                                day,
                                slot,
                            })
                            .cloned(),
                    })
                    .collect(),
            })
            .collect();

        Ok(grid::Grid { days })
    }
}

#[cfg(test)]
mod spec {
    use common::date;

    use crate::{
        command::ApplyAssignment,
        domain::{assignment, patient, professional, regime::Regime, user},
        infra::InMemory,
        store::Scope,
        task, Command as _, Config, Service,
    };

    use super::OfRange;

    fn service() -> Service<InMemory> {
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
            InMemory::new(),
        );
        service
    }

    #[tokio::test]
    async fn renders_every_slot_of_every_visible_day() {
        let service = service();
        let p = professional::Id::new();
        _ = service
            .execute(ApplyAssignment {
                key: assignment::Key {
                    patient: service.config().scope.patient,
                    day: "2024-01-02".parse().unwrap(),
                    slot: 1.into(),
                },
                professional: p,
                source_demand: None,
            })
            .await
            .unwrap();

        let grid = service
            .execute(OfRange(date::Range::new(
                "2024-01-01".parse().unwrap(),
                "2024-01-03".parse().unwrap(),
            )))
            .await
            .unwrap();

        assert_eq!(grid.days.len(), 3);
        assert!(grid.days.iter().all(|d| d.cells.len() == 2));
        assert_eq!(grid.days[0].cells[0].label, "morning");

        let touched = &grid.days[1].cells[1];
        assert_eq!(
            touched.assignment.as_ref().unwrap().professional,
            Some(p),
        );
        assert!(grid.days[0].cells[0].assignment.is_none());
    }

    #[tokio::test]
    async fn intersects_with_the_session_range() {
        let service = service();
        let grid = service
            .execute(OfRange(date::Range::new(
                "2024-01-06".parse().unwrap(),
                "2024-02-01".parse().unwrap(),
            )))
            .await
            .unwrap();
        // Session visibility ends at 2024-01-07.
        assert_eq!(grid.days.len(), 2);
    }
}
