//! Batch selection over the schedule grid.
//!
//! A selection is an ephemeral set of grid [`Cell`]s the UI operates upon
//! in bulk. It never persists and never touches the assignment store.

pub mod preset;

use std::collections::BTreeSet;

use common::{date, Date};
use itertools::Itertools as _;

use crate::domain::regime::{Regime, SlotIndex};

pub use self::preset::Registry;

/// Single selectable cell of the grid: one slot of one day.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Cell {
    /// [`Date`] of the cell.
    pub day: Date,

    /// [`SlotIndex`] of the cell within its day.
    pub slot: SlotIndex,
}

/// Context a selection is evaluated against.
#[derive(Clone, Copy, Debug)]
pub struct Context {
    /// [`Regime`] whose slot table shapes the grid.
    pub regime: Regime,

    /// Visible [`date::Range`] of the grid.
    pub visible: date::Range,
}

/// Computes the inclusive rectangular selection spanned by two [`Cell`]s.
///
/// The bounds are order-independent: the smaller/larger day and slot are
/// derived from both corners, not assumed from argument order. Days are
/// clamped to the visible range of the `context`, and slots to its
/// [`Regime`] table; a rectangle lying fully outside either is empty.
#[must_use]
pub fn select_range(context: &Context, a: Cell, b: Cell) -> BTreeSet<Cell> {
    let days = date::Range::new(
        a.day.min(b.day).max(context.visible.start),
        a.day.max(b.day).min(context.visible.end),
    );
    let slots =
        u8::from(a.slot.min(b.slot))..=u8::from(a.slot.max(b.slot));
    days.iter()
        .cartesian_product(slots)
        .map(|(day, slot)| Cell {
            day,
            slot: slot.into(),
        })
        .filter(|cell| context.regime.slot(cell.slot).is_some())
        .collect()
}
