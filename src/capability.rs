//! Declared capabilities, collection-size classes and scenario preconditions.
//!
//! A [`CapabilitySet`] is resolved once per fixture: the features an
//! implementation declares plus the size class it was seeded for. Every
//! catalog scenario carries a [`Require`] predicate over that set; the runner
//! only executes scenarios whose predicate holds.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// Optional behavior a map implementation may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// `put_all` mutates the map instead of failing with `UnsupportedOperation`.
    SupportsBulkInsert,
    /// Null (`None`) keys may be stored.
    AllowsNullKeys,
    /// Null (`None`) values may be stored.
    AllowsNullValues,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Self; 3] = [
        Self::SupportsBulkInsert,
        Self::AllowsNullKeys,
        Self::AllowsNullValues,
    ];

    /// Canonical upper-case name, as used in reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SupportsBulkInsert => "SUPPORTS_BULK_INSERT",
            Self::AllowsNullKeys => "ALLOWS_NULL_KEYS",
            Self::AllowsNullValues => "ALLOWS_NULL_VALUES",
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// CollectionSize
// ---------------------------------------------------------------------------

/// Size class of a fixture before the operation under test runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionSize {
    /// No entries.
    Empty,
    /// Exactly e0.
    One,
    /// e0, e1 and e2.
    Several,
}

impl CollectionSize {
    /// Every size class, smallest first.
    pub const ALL: [Self; 3] = [Self::Empty, Self::One, Self::Several];

    /// Number of sample pairs a fixture of this class is seeded with.
    ///
    /// Never reaches e3, which stays reserved as an absent pair.
    #[must_use]
    pub const fn seed_count(self) -> usize {
        match self {
            Self::Empty => 0,
            Self::One => 1,
            Self::Several => 3,
        }
    }

    /// Canonical upper-case name, as used in reports and configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Empty => "EMPTY",
            Self::One => "ONE",
            Self::Several => "SEVERAL",
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for CollectionSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// CapabilitySet
// ---------------------------------------------------------------------------

/// Immutable set of declared capabilities together with the fixture's size
/// class.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapabilitySet {
    bits: u8,
    size: CollectionSize,
}

impl CapabilitySet {
    /// Creates a set with no capabilities for a fixture of class `size`.
    #[must_use]
    pub const fn new(size: CollectionSize) -> Self {
        Self { bits: 0, size }
    }

    /// Returns a copy of this set that also declares `capability`.
    #[must_use]
    pub const fn with(self, capability: Capability) -> Self {
        Self {
            bits: self.bits | capability.bit(),
            size: self.size,
        }
    }

    /// Builds a set from any collection of capabilities.
    #[must_use]
    pub fn from_capabilities<I>(capabilities: I, size: CollectionSize) -> Self
    where
        I: IntoIterator<Item = Capability>,
    {
        capabilities
            .into_iter()
            .fold(Self::new(size), Self::with)
    }

    /// Returns `true` if `capability` is declared.
    #[must_use]
    pub const fn has(self, capability: Capability) -> bool {
        self.bits & capability.bit() != 0
    }

    /// Returns the fixture's size class.
    #[must_use]
    pub const fn size(self) -> CollectionSize {
        self.size
    }

    /// Iterates over the declared capabilities in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL.into_iter().filter(move |&c| self.has(c))
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilitySet")
            .field("size", &self.size)
            .field("capabilities", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Require
// ---------------------------------------------------------------------------

/// Precondition of a scenario: capabilities that must be present, must be
/// absent, and size classes the scenario cannot run against.
///
/// Built with `const` combinators so catalog entries can live in a `const`
/// table.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Require {
    present: u8,
    absent: u8,
    absent_sizes: u8,
}

impl Require {
    /// Satisfied by every capability set.
    pub const ANY: Self = Self {
        present: 0,
        absent: 0,
        absent_sizes: 0,
    };

    /// Additionally requires `capability` to be declared.
    #[must_use]
    pub const fn present(self, capability: Capability) -> Self {
        Self {
            present: self.present | capability.bit(),
            ..self
        }
    }

    /// Additionally requires `capability` to be absent.
    #[must_use]
    pub const fn absent(self, capability: Capability) -> Self {
        Self {
            absent: self.absent | capability.bit(),
            ..self
        }
    }

    /// Excludes fixtures of class `size`.
    #[must_use]
    pub const fn absent_size(self, size: CollectionSize) -> Self {
        Self {
            absent_sizes: self.absent_sizes | size.bit(),
            ..self
        }
    }

    /// Returns `true` if `set` meets every condition of this requirement.
    #[must_use]
    pub const fn is_satisfied_by(self, set: CapabilitySet) -> bool {
        set.bits & self.present == self.present
            && set.bits & self.absent == 0
            && self.absent_sizes & set.size.bit() == 0
    }

    /// Returns the first capability that is required both present and
    /// absent, if any. Such a requirement can never be satisfied.
    #[must_use]
    pub fn conflict(self) -> Option<Capability> {
        Capability::ALL
            .into_iter()
            .find(|c| self.present & self.absent & c.bit() != 0)
    }

    fn caps(bits: u8) -> impl Iterator<Item = Capability> {
        Capability::ALL
            .into_iter()
            .filter(move |c| bits & c.bit() != 0)
    }
}

impl fmt::Display for Require {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Self::caps(self.present).map(|c| c.to_string()).collect();
        parts.extend(Self::caps(self.absent).map(|c| format!("!{c}")));
        parts.extend(
            CollectionSize::ALL
                .into_iter()
                .filter(|s| self.absent_sizes & s.bit() != 0)
                .map(|s| format!("size != {s}")),
        );
        if parts.is_empty() {
            f.write_str("<none>")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

impl fmt::Debug for Require {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Require({self})")
    }
}
