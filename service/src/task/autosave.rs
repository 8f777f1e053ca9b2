//! [`Autosave`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Perform, Save, Start};
use smart_default::SmartDefault;
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    command::{save_schedule, SaveSchedule},
    domain::assignment,
    infra::{persistence, Persistence},
    Service,
};

use super::Task;

/// Configuration for [`Autosave`] [`Task`].
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Interval between flushes of dirty session state.
    #[default(time::Duration::from_secs(30))]
    pub interval: time::Duration,
}

/// [`Task`] periodically flushing dirty session state to the persistence
/// collaborator.
///
/// Runs cooperatively on the same thread as every other mutation, issuing
/// the same [`SaveSchedule`] command a user action would, so the in-flight
/// save coordination applies to it unchanged. Failures are logged and left
/// for the next tick: the dirty cells stay dirty.
#[derive(Clone, Debug)]
pub struct Autosave<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<P> Task<Start<By<Autosave<Self>, Config>>> for Service<P>
where
    Autosave<Self>:
        Task<Perform<()>, Ok = save_schedule::Outcome, Err: Error> + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<Autosave<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let task = Autosave {
            config: by.into_inner(),
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task.execute(Perform(())).await.map_err(|e| {
                log::error!("`task::Autosave` failed: {e}");
            });
        }
    }
}

impl<P> Task<Perform<()>> for Autosave<Service<P>>
where
    P: Persistence<
        Save<assignment::Batch>,
        Ok = (),
        Err = Traced<persistence::Error>,
    >,
{
    type Ok = save_schedule::Outcome;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        self.service.execute(SaveSchedule).await
    }
}

/// Error of [`Autosave`] execution.
pub type ExecutionError = Traced<save_schedule::ExecutionError>;
