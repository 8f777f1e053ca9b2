//! Schedule grid read model.
//!
//! The shape the grid component renders: one row per visible day, one
//! cell per slot of the session's regime.

use common::Date;

use crate::domain::{regime::SlotIndex, Assignment};

/// Rendered schedule grid.
#[derive(Clone, Debug)]
pub struct Grid {
    /// Visible [`Day`] rows, in ascending order.
    pub days: Vec<Day>,
}

/// One day row of a [`Grid`].
#[derive(Clone, Debug)]
pub struct Day {
    /// [`Date`] of this row.
    pub day: Date,

    /// [`Cell`]s of this row, one per slot, in slot order.
    pub cells: Vec<Cell>,
}

/// One cell of a [`Grid`] row.
#[derive(Clone, Debug)]
pub struct Cell {
    /// [`SlotIndex`] of this cell within its day.
    pub slot: SlotIndex,

    /// Human label of the slot.
    pub label: &'static str,

    /// [`Assignment`] held by this cell, if it was ever touched.
    pub assignment: Option<Assignment>,
}
