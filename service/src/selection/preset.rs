//! Named selection presets.
//!
//! A preset is a pure function from a [`Context`] to a set of [`Cell`]s,
//! recomputed on demand: "everything visible", "all morning slots" and the
//! like. Presets are registered under validated names, so an unknown name
//! is a caller bug, not a user input to tolerate.

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    str::FromStr,
    sync::LazyLock,
};

use derive_more::{AsRef, Display, Error};
use regex::Regex;

use crate::domain::regime::SlotDescriptor;

use super::{Cell, Context};

/// Name of a selection preset.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Name`] invariants:
        /// - Must start with a lowercase letter;
        /// - May contain lowercase letters, digits and dashes only;
        /// - Must be between 1 and 64 characters long.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[a-z][a-z0-9-]{0,63}$").expect("valid regex")
        });

        REGEX.is_match(name.as_ref())
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Preset function evaluating a selection against a [`Context`].
pub type Preset = Box<dyn Fn(&Context) -> BTreeSet<Cell>>;

/// Registry of named [`Preset`]s.
pub struct Registry {
    /// Registered [`Preset`]s, by their [`Name`]s.
    presets: HashMap<Name, Preset>,
}

impl Registry {
    /// Name of the built-in preset selecting every visible cell.
    pub const FULL_RANGE: &'static str = "full-range";

    /// Name of the built-in preset selecting slots starting before noon.
    pub const MORNING_SLOTS: &'static str = "morning-slots";

    /// Name of the built-in preset selecting slots starting at 18:00 or
    /// later.
    pub const EVENING_SLOTS: &'static str = "evening-slots";

    /// Name of the built-in preset selecting every slot of Saturdays and
    /// Sundays.
    pub const WEEKENDS: &'static str = "weekends";

    /// Creates a new [`Registry`] with the built-in [`Preset`]s
    /// registered.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut this = Self {
            presets: HashMap::new(),
        };

        let name = |n: &str| Name::new(n).expect("valid `Name`");
        this.register(name(Self::FULL_RANGE), |ctx| {
            cells(ctx, |_, _| true)
        });
        this.register(name(Self::MORNING_SLOTS), |ctx| {
            cells(ctx, |_, slot| slot.starts_before_noon())
        });
        this.register(name(Self::EVENING_SLOTS), |ctx| {
            cells(ctx, |_, slot| slot.starts_at_minute() >= 18 * 60)
        });
        this.register(name(Self::WEEKENDS), |ctx| {
            cells(ctx, |cell, _| cell.day.is_weekend())
        });
        this
    }

    /// Registers the provided [`Preset`] under the given [`Name`],
    /// replacing any previously registered one.
    pub fn register(
        &mut self,
        name: Name,
        preset: impl Fn(&Context) -> BTreeSet<Cell> + 'static,
    ) {
        _ = self.presets.insert(name, Box::new(preset));
    }

    /// Evaluates the [`Preset`] registered under the given [`Name`]
    /// against the provided [`Context`].
    ///
    /// # Errors
    ///
    /// If no [`Preset`] is registered under the [`Name`], which indicates
    /// a caller bug.
    pub fn apply(
        &self,
        name: &Name,
        context: &Context,
    ) -> Result<BTreeSet<Cell>, UnknownPresetError> {
        self.presets
            .get(name)
            .map(|preset| preset(context))
            .ok_or_else(|| UnknownPresetError { name: name.clone() })
    }

    /// Returns an [`Iterator`] over the registered [`Name`]s.
    pub fn names(&self) -> impl Iterator<Item = &Name> + '_ {
        self.presets.keys()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("presets", &self.presets.keys())
            .finish()
    }
}

/// Collects the visible [`Cell`]s matching the provided predicate.
fn cells(
    context: &Context,
    matches: impl Fn(&Cell, &SlotDescriptor) -> bool,
) -> BTreeSet<Cell> {
    context
        .visible
        .iter()
        .flat_map(|day| {
            context.regime.slot_indices().map(move |slot| Cell { day, slot })
        })
        .filter(|cell| {
            context
                .regime
                .slot(cell.slot)
                .is_some_and(|slot| matches(cell, slot))
        })
        .collect()
}

/// Error of applying an unregistered [`Preset`].
#[derive(Clone, Debug, Display, Error)]
#[display("unknown selection preset: {name}")]
pub struct UnknownPresetError {
    /// [`Name`] no [`Preset`] is registered under.
    #[error(not(source))]
    pub name: Name,
}
