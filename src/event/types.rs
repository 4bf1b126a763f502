//! # Event type algebra.
//!
//! [`EventType`] packs a family byte and a 16-bit subtype mask. Filters and
//! published events share the representation; the rules differ only in how
//! many bits they carry:
//!
//! - a **filter** may set any number of bits; a zero mask is shorthand for
//!   "every subtype in this family";
//! - a **published event** sets exactly one bit (validated on publish).
//!
//! Two types match when their families are equal and their masks intersect.

use std::fmt;
use std::str::FromStr;

use crate::error::HubError;

/// Family reserved for control events emitted by the hub itself.
pub const CONTROL_FAMILY: u8 = 0;

/// Terminal control event: the subscription has ended.
///
/// Enqueued exactly once to an async-task subscription when it transitions
/// to inactive, and guaranteed to be the last envelope its queue delivers
/// for that subscription.
pub const SUB_END: EventType = EventType {
    family: CONTROL_FAMILY,
    subtypes: 1,
};

/// A `(family, subtype bitmask)` event type.
///
/// Cheap to copy and compare; construction validates the subtype bit index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct EventType {
    family: u8,
    subtypes: u16,
}

impl EventType {
    /// Number of subtype bits available per family.
    pub const MAX_SUBTYPES: u8 = 16;

    /// Creates a type with a single subtype bit set.
    ///
    /// # Panics
    /// Panics if `bit >= 16`.
    pub fn new(family: u8, bit: u8) -> Self {
        assert!(
            bit < Self::MAX_SUBTYPES,
            "subtype bit {bit} out of range (0..{})",
            Self::MAX_SUBTYPES
        );
        Self {
            family,
            subtypes: 1 << bit,
        }
    }

    /// Creates a family-wide type: a filter built from it matches every
    /// subtype of `family`.
    pub fn family_wide(family: u8) -> Self {
        Self {
            family,
            subtypes: 0,
        }
    }

    /// The family byte.
    pub fn family(&self) -> u8 {
        self.family
    }

    /// The raw subtype bitmask.
    pub fn subtypes(&self) -> u16 {
        self.subtypes
    }

    /// Combines two types of the same family into one covering both masks.
    ///
    /// # Errors
    /// [`HubError::FamilyMismatch`] when the families differ.
    pub fn union(self, other: EventType) -> Result<EventType, HubError> {
        if self.family != other.family {
            return Err(HubError::FamilyMismatch {
                expected: self.family,
                found: other.family,
            });
        }
        Ok(Self {
            family: self.family,
            subtypes: self.subtypes | other.subtypes,
        })
    }

    /// Whether a filter of type `self` accepts the published `event`.
    ///
    /// Families must be equal and the masks must intersect; a filter mask of
    /// zero accepts any subtype of the family.
    pub fn matches(&self, event: EventType) -> bool {
        self.family == event.family
            && (self.subtypes == 0 || self.subtypes & event.subtypes != 0)
    }

    /// Whether exactly one subtype bit is set (the publishable shape).
    pub fn is_singleton(&self) -> bool {
        self.subtypes.count_ones() == 1
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::names::format_type(*self, f)
    }
}

impl FromStr for EventType {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::names::parse_type(s)
    }
}
