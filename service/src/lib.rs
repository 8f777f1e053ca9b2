//! Service contains the schedule grid engine of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod autofill;
pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;
pub mod selection;
pub mod store;
pub mod task;

use std::{
    cell::{Ref, RefCell},
    error::Error,
    rc::Rc,
};

use common::operations::{By, Start};

use crate::{
    domain::user,
    store::{AssignmentStore, Scope},
};

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Acting [`user::Id`] stamped into every modification.
    ///
    /// Supplied by the identity collaborator.
    pub user: user::Id,

    /// [`Scope`] of the schedule session.
    pub scope: Scope,

    /// [`task::Autosave`] configuration.
    pub autosave: task::autosave::Config,
}

/// Schedule grid service.
///
/// One [`Service`] is one editing session over one patient's schedule
/// grid. Its state is owned explicitly and shared between clones through
/// an [`Rc`], making the whole engine deliberately single-threaded: all
/// mutations happen on the one thread driving the UI events, and no state
/// borrow is ever held across an await point.
#[derive(Clone, Debug)]
pub struct Service<P> {
    /// Configuration of this [`Service`].
    config: Config,

    /// Persistence collaborator of this [`Service`].
    persistence: P,

    /// Mutable session state, shared between clones.
    state: Rc<RefCell<State>>,
}

impl<P> Service<P> {
    /// Creates a new [`Service`] with the provided parameters, spawning
    /// its background tasks.
    pub fn new(config: Config, persistence: P) -> (Self, task::Background)
    where
        Self: Task<
                Start<By<task::Autosave<Self>, task::autosave::Config>>,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let this = Self {
            config,
            persistence,
            state: Rc::new(RefCell::new(State {
                store: AssignmentStore::new(config.scope),
                save: SaveFlags::default(),
            })),
        };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn(async move {
            svc.execute(Start(By::new(svc.config().autosave))).await
        });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the persistence collaborator of this [`Service`].
    #[must_use]
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Returns a shared borrow of the session's [`AssignmentStore`].
    ///
    /// The borrow must not be held across an await point.
    #[must_use]
    pub fn store(&self) -> Ref<'_, AssignmentStore> {
        Ref::map(self.state.borrow(), |state| &state.store)
    }

    /// Runs the provided function over an exclusive borrow of the session
    /// [`State`].
    pub(crate) fn state_mut<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut self.state.borrow_mut())
    }
}

/// Mutable state of a [`Service`] session.
#[derive(Debug)]
pub(crate) struct State {
    /// [`AssignmentStore`] of the session.
    pub(crate) store: AssignmentStore,

    /// Save coordination flags of the session.
    pub(crate) save: SaveFlags,
}

/// Coordination flags of the save flow.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SaveFlags {
    /// Indicator whether a save is currently in flight.
    pub(crate) in_flight: bool,

    /// Indicator whether a save request arrived while one was in flight.
    pub(crate) queued: bool,
}
