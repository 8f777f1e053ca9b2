//! Demand definitions.
//!
//! A demand is an upstream care-hours requirement that can pre-populate
//! assignments. The engine never resolves demands itself: it only tags
//! assignments produced from one, so demand-sourced and manually entered
//! cells stay distinguishable.

use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ID of a scheduling demand.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}
