//! Key layout.
//!
//! ```text
//! event:{event_id}:meta                       event root
//! event:{event_id}:{segment}:{entity_id}      everything the event owns
//! ```
//!
//! Event ids may not contain `:`, so `event:{event_id}:` is never a prefix
//! of another event's keys.

use super::EntityKind;
use crate::error::{Error, Result};

pub const ROOT: &str = "event:";
pub const META_SUFFIX: &str = ":meta";

pub fn validate_event_id(event_id: &str) -> Result<()> {
    if event_id.is_empty() {
        return Err(Error::ScopeViolation("event id is empty".to_string()));
    }
    if event_id.contains(':') || event_id.chars().any(char::is_whitespace) {
        return Err(Error::ScopeViolation(format!(
            "event id {event_id:?} contains a separator or whitespace"
        )));
    }
    Ok(())
}

pub fn validate_entity_id(kind: EntityKind, entity_id: &str) -> Result<()> {
    if entity_id.is_empty() {
        return Err(Error::ScopeViolation(format!("{kind} id is empty")));
    }
    Ok(())
}

/// `event:{event_id}:`, which covers everything the event owns, root included.
pub fn namespace_prefix(event_id: &str) -> Result<String> {
    validate_event_id(event_id)?;
    Ok(format!("{ROOT}{event_id}:"))
}

/// Prefix under which every record of `kind` in the event lives.
pub fn kind_prefix(event_id: &str, kind: EntityKind) -> Result<String> {
    validate_event_id(event_id)?;
    Ok(match kind {
        EntityKind::Event => format!("{ROOT}{event_id}{META_SUFFIX}"),
        other => format!("{ROOT}{event_id}:{}:", other.segment()),
    })
}

pub fn record_key(event_id: &str, kind: EntityKind, entity_id: &str) -> Result<String> {
    validate_entity_id(kind, entity_id)?;
    match kind {
        EntityKind::Event if entity_id != event_id => Err(Error::ScopeViolation(format!(
            "event root {entity_id:?} addressed through namespace {event_id:?}"
        ))),
        EntityKind::Event => kind_prefix(event_id, kind),
        other => Ok(format!("{}{entity_id}", kind_prefix(event_id, other)?)),
    }
}

/// Extract the event id from an event root key, if `key` is one.
pub fn parse_root_key(key: &str) -> Option<&str> {
    let event_id = key.strip_prefix(ROOT)?.strip_suffix(META_SUFFIX)?;
    (!event_id.is_empty() && !event_id.contains(':')).then_some(event_id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        assert_eq!(
            record_key("e1", EntityKind::Session, "s1").unwrap(),
            "event:e1:session:s1"
        );
        assert_eq!(
            record_key("e1", EntityKind::BaselineAnalysis, "s1").unwrap(),
            "event:e1:analysis:baseline:s1"
        );
        assert_eq!(record_key("e1", EntityKind::Event, "e1").unwrap(), "event:e1:meta");
        assert_eq!(namespace_prefix("e1").unwrap(), "event:e1:");
    }

    #[test]
    fn test_every_kind_has_a_distinct_prefix() {
        let prefixes: Vec<_> = EntityKind::ALL
            .iter()
            .map(|kind| kind_prefix("e", *kind).unwrap())
            .collect();
        for (i, a) in prefixes.iter().enumerate() {
            for (j, b) in prefixes.iter().enumerate() {
                if i != j {
                    assert!(!b.starts_with(a.as_str()), "{a} is a prefix of {b}");
                }
            }
        }
    }

    #[test]
    fn test_bad_event_ids_are_scope_violations() {
        for bad in ["", "a:b", "a b", "tab\t"] {
            assert!(matches!(
                record_key(bad, EntityKind::Session, "s1"),
                Err(Error::ScopeViolation(_))
            ));
        }
        assert!(matches!(
            record_key("e1", EntityKind::Session, ""),
            Err(Error::ScopeViolation(_))
        ));
        assert!(matches!(
            record_key("e1", EntityKind::Event, "e2"),
            Err(Error::ScopeViolation(_))
        ));
    }

    #[test]
    fn test_parse_root_key() {
        assert_eq!(parse_root_key("event:e1:meta"), Some("e1"));
        assert_eq!(parse_root_key("event:e1:session:meta"), None);
        assert_eq!(parse_root_key("event::meta"), None);
        assert_eq!(parse_root_key("other:e1:meta"), None);
    }
}
