//! # Event name registry.
//!
//! Maps `(family, subtype bit)` pairs to stable names so event types can be
//! rendered in logs and parsed back from configuration. Registration is
//! global and lock-free on the read side; the control family comes
//! pre-registered as `hub` with `sub_end` on bit 0.
//!
//! The textual form is `family.subtype`, with `|` joining multiple subtype
//! bits and the bare family name standing for a family-wide mask.
//! Unregistered components render as `fam{N}` / `bit{N}`, and those forms
//! parse back, so `Display` and `FromStr` round-trip regardless of what has
//! been registered.

use std::fmt;
use std::sync::OnceLock;

use dashmap::DashMap;

use super::types::{EventType, CONTROL_FAMILY};
use crate::error::HubError;

struct Registry {
    family_names: DashMap<u8, &'static str>,
    family_ids: DashMap<&'static str, u8>,
    subtype_names: DashMap<(u8, u8), &'static str>,
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

fn registry() -> &'static Registry {
    REGISTRY.get_or_init(|| {
        let reg = Registry {
            family_names: DashMap::new(),
            family_ids: DashMap::new(),
            subtype_names: DashMap::new(),
        };
        reg.family_names.insert(CONTROL_FAMILY, "hub");
        reg.family_ids.insert("hub", CONTROL_FAMILY);
        reg.subtype_names.insert((CONTROL_FAMILY, 0), "sub_end");
        reg
    })
}

/// Registers a display name for an event family.
///
/// Later registrations replace earlier ones. Publishers of a family
/// typically register its names once at startup.
pub fn register_family(family: u8, name: &'static str) {
    let reg = registry();
    reg.family_names.insert(family, name);
    reg.family_ids.insert(name, family);
}

/// Registers a display name for one subtype bit of a family.
///
/// # Panics
/// Panics if `bit >= 16`.
pub fn register_subtype(family: u8, bit: u8, name: &'static str) {
    assert!(
        bit < EventType::MAX_SUBTYPES,
        "subtype bit {bit} out of range (0..{})",
        EventType::MAX_SUBTYPES
    );
    registry().subtype_names.insert((family, bit), name);
}

pub(super) fn format_type(t: EventType, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let reg = registry();
    match reg.family_names.get(&t.family()) {
        Some(name) => write!(f, "{}", *name)?,
        None => write!(f, "fam{}", t.family())?,
    }
    if t.subtypes() == 0 {
        return Ok(());
    }
    write!(f, ".")?;
    let mut first = true;
    for bit in 0..EventType::MAX_SUBTYPES {
        if t.subtypes() & (1 << bit) == 0 {
            continue;
        }
        if !first {
            write!(f, "|")?;
        }
        first = false;
        match reg.subtype_names.get(&(t.family(), bit)) {
            Some(name) => write!(f, "{}", *name)?,
            None => write!(f, "bit{bit}")?,
        }
    }
    Ok(())
}

pub(super) fn parse_type(s: &str) -> Result<EventType, HubError> {
    let unknown = || HubError::UnknownEvent {
        name: s.to_string(),
    };
    let (family_part, subtype_part) = match s.split_once('.') {
        Some((fam, sub)) => (fam, Some(sub)),
        None => (s, None),
    };
    let family = resolve_family(family_part).ok_or_else(unknown)?;
    let Some(subtype_part) = subtype_part else {
        return Ok(EventType::family_wide(family));
    };
    let mut out = EventType::family_wide(family);
    for piece in subtype_part.split('|') {
        let bit = resolve_subtype(family, piece).ok_or_else(unknown)?;
        // Same family throughout, union cannot fail.
        out = out.union(EventType::new(family, bit)).map_err(|_| unknown())?;
    }
    if out.subtypes() == 0 {
        return Err(unknown());
    }
    Ok(out)
}

fn resolve_family(name: &str) -> Option<u8> {
    if let Some(id) = registry().family_ids.get(name) {
        return Some(*id);
    }
    name.strip_prefix("fam")?.parse().ok()
}

fn resolve_subtype(family: u8, name: &str) -> Option<u8> {
    let reg = registry();
    for bit in 0..EventType::MAX_SUBTYPES {
        if let Some(n) = reg.subtype_names.get(&(family, bit)) {
            if *n == name {
                return Some(bit);
            }
        }
    }
    let bit: u8 = name.strip_prefix("bit")?.parse().ok()?;
    (bit < EventType::MAX_SUBTYPES).then_some(bit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::SUB_END;

    #[test]
    fn control_family_is_preregistered() {
        assert_eq!(SUB_END.to_string(), "hub.sub_end");
        assert_eq!("hub.sub_end".parse::<EventType>().unwrap(), SUB_END);
    }

    #[test]
    fn registered_names_round_trip() {
        register_family(21, "cache");
        register_subtype(21, 0, "hit");
        register_subtype(21, 1, "miss");

        let t = EventType::new(21, 0).union(EventType::new(21, 1)).unwrap();
        assert_eq!(t.to_string(), "cache.hit|miss");
        assert_eq!("cache.hit|miss".parse::<EventType>().unwrap(), t);

        let wide = EventType::family_wide(21);
        assert_eq!(wide.to_string(), "cache");
        assert_eq!("cache".parse::<EventType>().unwrap(), wide);
    }

    #[test]
    fn unregistered_fallback_round_trips() {
        let t = EventType::new(99, 5);
        assert_eq!(t.to_string(), "fam99.bit5");
        assert_eq!("fam99.bit5".parse::<EventType>().unwrap(), t);
    }

    #[test]
    fn unknown_names_are_rejected() {
        let err = "no_such_family.ever".parse::<EventType>().unwrap_err();
        assert!(matches!(err, HubError::UnknownEvent { .. }));
        let err = "fam99.no_such_subtype".parse::<EventType>().unwrap_err();
        assert!(matches!(err, HubError::UnknownEvent { .. }));
    }
}
