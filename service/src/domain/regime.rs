//! [`Regime`] definitions.

use std::{fmt, time::Duration};

use common::define_kind;
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

define_kind! {
    #[doc = "Shift pattern defining the set and order of slots per day."]
    enum Regime {
        #[doc = "12-hour shifts alternating with 36 hours of rest."]
        TwelveByThirtySix = 1,

        #[doc = "Round-the-clock care split into four 6-hour shifts."]
        TwentyFourHour = 2,

        #[doc = "Daytime-only care split into two 6-hour shifts."]
        Daytime = 3,
    }
}

/// Slot table of [`Regime::TwelveByThirtySix`].
const TWELVE_BY_THIRTY_SIX: &[SlotDescriptor] = &[
    SlotDescriptor::new("day", 7 * 60, 12 * 60),
    SlotDescriptor::new("night", 19 * 60, 12 * 60),
];

/// Slot table of [`Regime::TwentyFourHour`].
const TWENTY_FOUR_HOUR: &[SlotDescriptor] = &[
    SlotDescriptor::new("early morning", 0, 6 * 60),
    SlotDescriptor::new("morning", 6 * 60, 6 * 60),
    SlotDescriptor::new("afternoon", 12 * 60, 6 * 60),
    SlotDescriptor::new("night", 18 * 60, 6 * 60),
];

/// Slot table of [`Regime::Daytime`].
const DAYTIME: &[SlotDescriptor] = &[
    SlotDescriptor::new("morning", 7 * 60, 6 * 60),
    SlotDescriptor::new("afternoon", 13 * 60, 6 * 60),
];

impl Regime {
    /// Returns the ordered table of [`SlotDescriptor`]s of this [`Regime`].
    ///
    /// The table is total for every [`Regime`] and its positions are the
    /// [`SlotIndex`]es: stable and contiguous from 0.
    #[must_use]
    pub const fn slots(self) -> &'static [SlotDescriptor] {
        match self {
            Self::TwelveByThirtySix => TWELVE_BY_THIRTY_SIX,
            Self::TwentyFourHour => TWENTY_FOUR_HOUR,
            Self::Daytime => DAYTIME,
        }
    }

    /// Returns the [`SlotDescriptor`] at the provided [`SlotIndex`].
    ///
    /// [`None`] is returned if the index lies beyond this [`Regime`]'s
    /// table.
    #[must_use]
    pub fn slot(self, index: SlotIndex) -> Option<&'static SlotDescriptor> {
        self.slots().get(usize::from(u8::from(index)))
    }

    /// Returns all the [`SlotIndex`]es of this [`Regime`], in order.
    pub fn slot_indices(self) -> impl Iterator<Item = SlotIndex> {
        #[expect(clippy::cast_possible_truncation, reason = "tables are tiny")]
        let len = self.slots().len() as u8;
        (0..len).map(SlotIndex::from)
    }
}

/// Index of a [`SlotDescriptor`] within a [`Regime`] day.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
pub struct SlotIndex(u8);

/// Descriptor of a single assignable time slot within a [`Regime`] day.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SlotDescriptor {
    /// Human label of the slot.
    label: &'static str,

    /// Minute of the day the slot starts at.
    starts_at_minute: u16,

    /// Length of the slot, in minutes.
    minutes: u16,
}

impl SlotDescriptor {
    /// Creates a new [`SlotDescriptor`] with the provided parameters.
    const fn new(
        label: &'static str,
        starts_at_minute: u16,
        minutes: u16,
    ) -> Self {
        Self {
            label,
            starts_at_minute,
            minutes,
        }
    }

    /// Returns the human label of this slot.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Returns the minute of the day this slot starts at.
    #[must_use]
    pub const fn starts_at_minute(&self) -> u16 {
        self.starts_at_minute
    }

    /// Returns the [`Duration`] of this slot.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_secs(self.minutes as u64 * 60)
    }

    /// Indicates whether this slot starts before noon.
    #[must_use]
    pub const fn starts_before_noon(&self) -> bool {
        self.starts_at_minute < 12 * 60
    }
}

impl fmt::Display for SlotDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            label,
            starts_at_minute,
            minutes,
        } = self;
        write!(
            f,
            "{label} ({:02}:{:02}, ",
            starts_at_minute / 60,
            starts_at_minute % 60,
        )?;
        if minutes % 60 == 0 {
            write!(f, "{}h)", minutes / 60)
        } else {
            write!(f, "{}m)", minutes)
        }
    }
}

#[cfg(test)]
mod spec {
    use super::{Regime, SlotIndex};

    #[test]
    fn tables_are_contiguous_from_zero() {
        for regime in Regime::ALL {
            let slots = regime.slots();
            assert!(!slots.is_empty(), "{regime} has no slots");
            for (i, _) in slots.iter().enumerate() {
                let index = SlotIndex::from(u8::try_from(i).unwrap());
                assert!(regime.slot(index).is_some(), "{regime} misses {i}");
            }
            let beyond = SlotIndex::from(u8::try_from(slots.len()).unwrap());
            assert!(regime.slot(beyond).is_none());
        }
    }

    #[test]
    fn tables_are_ordered_by_start() {
        for regime in Regime::ALL {
            let starts = regime
                .slots()
                .iter()
                .map(super::SlotDescriptor::starts_at_minute)
                .collect::<Vec<_>>();
            let mut sorted = starts.clone();
            sorted.sort_unstable();
            assert_eq!(starts, sorted, "{regime} table out of order");
        }
    }

    #[test]
    fn slot_indices_match_table_len() {
        for regime in Regime::ALL {
            assert_eq!(regime.slot_indices().count(), regime.slots().len());
        }
    }

    #[test]
    fn renders_slot_description() {
        let slot = Regime::TwelveByThirtySix.slot(SlotIndex::from(0)).unwrap();
        assert_eq!(slot.to_string(), "day (07:00, 12h)");
        assert!(slot.starts_before_noon());

        let slot = Regime::TwelveByThirtySix.slot(SlotIndex::from(1)).unwrap();
        assert_eq!(slot.to_string(), "night (19:00, 12h)");
        assert!(!slot.starts_before_noon());
    }
}
