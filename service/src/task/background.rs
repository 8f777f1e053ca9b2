//! Background environment for running [`Task`]s.

use std::{
    error::Error,
    future::{Future, IntoFuture},
    iter,
};

use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};
use tokio::task;

#[cfg(doc)]
use crate::Task;

/// Boxed error of a spawned [`Task`].
type TaskError = Box<dyn Error + 'static>;

/// Background environment for running [`Task`]s.
///
/// Built on a [`task::LocalSet`], as the service is deliberately not
/// [`Send`]: every spawned [`Task`] runs cooperatively on the one thread
/// driving this environment.
#[derive(Debug, Default)]
pub struct Background {
    /// Local set of tasks.
    set: task::LocalSet,

    /// Handles of spawned tasks.
    handles: Vec<task::JoinHandle<Result<(), TaskError>>>,
}

impl Background {
    /// Spawns a new [`Task`] inside this [`Background`] environment.
    ///
    /// The `future` won't make progress until this [`Background`] is
    /// awaited.
    pub fn spawn<F, E>(&mut self, future: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Error + 'static,
    {
        self.handles.push(
            self.set
                .spawn_local(future.map_err(|e| TaskError::from(Box::new(e)))),
        );
    }
}

impl IntoFuture for Background {
    type Output = Result<(), TaskError>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { set, handles } = self;
        future::try_join_all(iter::once(set.map(Ok).boxed_local()).chain(
            handles.into_iter().map(|handle| {
                handle
                    .map(|joined| match joined {
                        Ok(result) => result,
                        Err(e) => Err(TaskError::from(Box::new(e))),
                    })
                    .boxed_local()
            }),
        ))
        .map_ok(drop)
        .boxed_local()
    }
}
