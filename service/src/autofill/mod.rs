//! Auto-fill planning over the schedule grid.
//!
//! Planning is pure: it consults the store read-only and returns a
//! proposed [`assignment::Batch`] for the caller to apply, keeping the
//! decision of when (and whether) to apply at the call site.

use std::collections::BTreeSet;

use common::date;
use itertools::iproduct;
use strum::{Display, EnumString};

use crate::{
    domain::{
        assignment::{self, Assignment},
        demand, professional,
        regime::{Regime, SlotIndex},
        user,
    },
    store::AssignmentStore,
};

/// Policy deciding which already-present cells an auto-fill may replace.
#[derive(Clone, Copy, Debug, Display, EnumString, Eq, PartialEq)]
#[strum(serialize_all = "kebab-case")]
pub enum OverwritePolicy {
    /// Fills only cells that are absent or explicitly cleared; any cell
    /// with a professional assigned is kept.
    SkipOccupied,

    /// Fills every cell in range, whatever it currently holds.
    OverwriteAll,

    /// Fills cells carrying no source demand (absent, cleared, or manually
    /// entered); demand-sourced cells are kept.
    OverwriteEmptySourceOnly,
}

/// Configuration of one auto-fill pass.
#[derive(Clone, Debug)]
pub struct Config {
    /// [`professional::Id`] to fill the cells with.
    pub professional: professional::Id,

    /// [`demand::Id`] the filled cells are produced from, if any.
    pub source_demand: Option<demand::Id>,

    /// [`Regime`] whose slot table bounds the fill.
    pub regime: Regime,

    /// Inclusive [`date::Range`] of days to fill.
    pub range: date::Range,

    /// [`SlotIndex`]es to fill within each day.
    pub slots: BTreeSet<SlotIndex>,

    /// [`OverwritePolicy`] of this pass.
    pub policy: OverwritePolicy,
}

/// Plans the [`assignment::Batch`] an auto-fill pass would apply.
///
/// The proposal walks the `config`'s date × slot product, consulting the
/// `store` for each cell and including it per the [`OverwritePolicy`].
/// It is ordered by `(day, slot)` ascending, so downstream history diffs
/// stay reproducible for the same inputs. An inverted date range or an
/// empty slot set plans nothing: a fill with no eligible targets is a
/// valid no-op, not a failure. Slot indices beyond the regime's table are
/// skipped, as such cells cannot exist.
#[must_use]
pub fn plan(
    store: &AssignmentStore,
    config: &Config,
    modified_at: assignment::ModificationDateTime,
    modified_by: user::Id,
) -> assignment::Batch {
    let patient = store.scope().patient;
    iproduct!(config.range.iter(), config.slots.iter().copied())
        .filter(|(_, slot)| config.regime.slot(*slot).is_some())
        .map(|(day, slot)| assignment::Key { patient, day, slot })
        .filter(|key| {
            use OverwritePolicy as P;

            match config.policy {
                P::SkipOccupied => store
                    .get(key)
                    .is_none_or(|held| held.professional.is_none()),
                P::OverwriteAll => true,
                P::OverwriteEmptySourceOnly => store
                    .get(key)
                    .is_none_or(|held| held.source_demand.is_none()),
            }
        })
        .map(|key| {
            (
                key,
                Assignment {
                    professional: Some(config.professional),
                    source_demand: config.source_demand,
                    modified_at,
                    modified_by,
                },
            )
        })
        .collect()
}
