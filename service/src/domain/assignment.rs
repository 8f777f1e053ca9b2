//! [`Assignment`] definitions.

use std::{cmp::Ordering, collections::HashMap, fmt, num, str::FromStr};

use common::{unit, Date, DateTimeOf};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use common::DateTime;

use crate::domain::{demand, patient, professional, regime::SlotIndex, user};

/// Assignment of a professional to one cell of a patient's schedule grid.
///
/// An [`Assignment`] with no `professional` is an explicitly cleared cell,
/// which is distinct from a [`Key`] absent from the [`Map`] (never touched).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Assignment {
    /// Assigned [`professional::Id`], if any.
    pub professional: Option<professional::Id>,

    /// [`demand::Id`] this [`Assignment`] was produced from, if any.
    ///
    /// Manually entered cells carry no demand.
    pub source_demand: Option<demand::Id>,

    /// [`DateTime`] when this [`Assignment`] was last modified.
    #[serde(with = "common::datetime::serde::unix_timestamp")]
    pub modified_at: ModificationDateTime,

    /// [`user::Id`] of whoever modified this [`Assignment`] last.
    pub modified_by: user::Id,
}

/// [`DateTime`] when an [`Assignment`] was last modified.
pub type ModificationDateTime = DateTimeOf<(Assignment, unit::Modification)>;

/// Key of a schedule grid cell: one slot of one day of one patient.
///
/// Its textual form `{patient}:{day}:{slot}` round-trips through
/// [`FromStr`], so collaborators may address cells by plain strings.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Key {
    /// [`patient::Id`] the cell belongs to.
    pub patient: patient::Id,

    /// [`Date`] of the cell.
    pub day: Date,

    /// [`SlotIndex`] of the cell within its day.
    pub slot: SlotIndex,
}

// Keys order by `(day, slot)` first, so sorted batches walk the grid
// row by row regardless of the patient component.
impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.day, self.slot, self.patient).cmp(&(
            other.day,
            other.slot,
            other.patient,
        ))
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { patient, day, slot } = self;
        write!(f, "{patient}:{day}:{slot}")
    }
}

impl FromStr for Key {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use ParseKeyError as E;

        let mut parts = s.splitn(3, ':');
        let (Some(patient), Some(day), Some(slot)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(E::Malformed);
        };

        Ok(Self {
            patient: patient.parse().map_err(E::Patient)?,
            day: day.parse().map_err(E::Day)?,
            slot: slot.parse::<u8>().map_err(E::Slot)?.into(),
        })
    }
}

/// Error of parsing a [`Key`] from a string.
#[derive(Clone, Debug, Display, Error)]
pub enum ParseKeyError {
    /// String is not shaped as `{patient}:{day}:{slot}`.
    #[display("expected a `{{patient}}:{{day}}:{{slot}}` key")]
    Malformed,

    /// Patient component is not a valid ID.
    #[display("invalid patient component: {_0}")]
    Patient(uuid::Error),

    /// Day component is not a valid date.
    #[display("invalid day component: {_0}")]
    Day(common::date::ParseError),

    /// Slot component is not a valid index.
    #[display("invalid slot component: {_0}")]
    Slot(num::ParseIntError),
}

mod key_serde {
    //! [`Key`] (de)serialization as its textual form, making it usable as
    //! a JSON map key.

    use std::str::FromStr as _;

    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use super::Key;

    impl serde::Serialize for Key {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Key {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            Self::from_str(&s).map_err(D::Error::custom)
        }
    }
}

/// Mapping of a patient's schedule grid cells to their [`Assignment`]s.
pub type Map = HashMap<Key, Assignment>;

/// Ordered batch of [`Assignment`]s applied (or proposed) as one unit.
pub type Batch = Vec<(Key, Assignment)>;
