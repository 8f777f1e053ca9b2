//! [`Command`] for applying an auto-fill pass.

use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    autofill,
    domain::assignment,
    store::{self, CheckpointId},
    Service,
};

use super::Command;

/// [`Command`] for planning and applying one auto-fill pass.
///
/// The plan is computed against the current store state and applied as one
/// batch, so a single undo reverts the whole pass. A pass matching no
/// eligible cells applies nothing and returns [`None`].
#[derive(Clone, Debug, From)]
pub struct AutoFill {
    /// [`autofill::Config`] of the pass.
    pub config: autofill::Config,
}

impl<P> Command<AutoFill> for Service<P> {
    type Ok = Option<CheckpointId>;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: AutoFill) -> Result<Self::Ok, Self::Err> {
        let AutoFill { config } = cmd;

        let modified_at = assignment::ModificationDateTime::now();
        let modified_by = self.config().user;

        let id = self
            .state_mut(|state| {
                let batch = autofill::plan(
                    &state.store,
                    &config,
                    modified_at,
                    modified_by,
                );
                if batch.is_empty() {
                    return Ok(None);
                }
                log::debug!(
                    "auto-filling {} cells with `{}`",
                    batch.len(),
                    config.professional,
                );
                state.store.set_many(batch)
            })
            .map_err(tracerr::from_and_wrap!(=> ExecutionError))?;

        Ok(id)
    }
}

/// Error of [`AutoFill`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Planned cells don't fit the session's [`store::Scope`], meaning the
    /// pass was configured for another regime or date range.
    #[display("invalid cells: {_0}")]
    Validation(store::ValidationError),
}

#[cfg(test)]
mod spec {
    use common::date;

    use crate::{
        autofill::{self, OverwritePolicy},
        command::Undo,
        domain::{patient, professional, regime::Regime, user},
        infra::InMemory,
        store::Scope,
        task, Command as _, Config, Service,
    };

    use super::AutoFill;

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

    fn config(service: &Service<InMemory>) -> autofill::Config {
        autofill::Config {
            professional: professional::Id::new(),
            source_demand: None,
            regime: service.config().scope.regime,
            range: date::Range::new(
                "2024-01-01".parse().unwrap(),
                "2024-01-02".parse().unwrap(),
            ),
            slots: [0, 1].map(Into::into).into(),
            policy: OverwritePolicy::SkipOccupied,
        }
    }

    #[tokio::test]
    async fn applies_the_pass_as_one_checkpoint() {
        let service = service();
        let cfg = config(&service);

        let id = service
            .execute(AutoFill {
                config: cfg.clone(),
            })
            .await
            .unwrap();
        assert!(id.is_some());
        {
            let store = service.store();
            assert_eq!(store.len(), 4);
            assert_eq!(store.history().len(), 1);
        }

        _ = service.execute(Undo).await.unwrap().unwrap();
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn pass_with_no_eligible_cells_is_a_noop() {
        let service = service();
        let mut cfg = config(&service);
        cfg.range = date::Range::new(
            "2024-01-02".parse().unwrap(),
            "2024-01-01".parse().unwrap(),
        );

        let id = service.execute(AutoFill { config: cfg }).await.unwrap();
        assert!(id.is_none());
        assert!(service.store().history().is_empty());
    }

    #[tokio::test]
    async fn pass_for_a_foreign_regime_is_rejected() {
        let service = service();
        let mut cfg = config(&service);
        // A wider regime plans slots the session's regime doesn't have.
        cfg.regime = Regime::TwentyFourHour;
        cfg.slots = [0, 1, 2, 3].map(Into::into).into();

        let result = service.execute(AutoFill { config: cfg }).await;
        assert!(result.is_err());
        assert!(service.store().is_empty());
    }
}
