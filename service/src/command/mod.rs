//! [`Command`] definition.

pub mod apply_assignment;
pub mod apply_batch;
pub mod auto_fill;
pub mod clear_assignment;
pub mod load_schedule;
pub mod save_schedule;
pub mod undo;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    apply_assignment::ApplyAssignment, apply_batch::ApplyBatch,
    auto_fill::AutoFill, clear_assignment::ClearAssignment,
    load_schedule::LoadSchedule, save_schedule::SaveSchedule, undo::Undo,
};
