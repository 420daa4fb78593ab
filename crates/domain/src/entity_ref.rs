//! Entity references — `domain.object_id` identifiers for host entities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reference to a controllable binary-state entity in the host environment,
/// e.g. `switch.kitchen` or `light.hall`.
///
/// The part before the dot is the entity's capability domain; it is what the
/// synchroniser uses to batch outbound commands. Both parts must be lowercase
/// alphanumeric with underscores, and the domain may not contain a double
/// underscore.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityRef {
    domain: String,
    object_id: String,
}

/// Reasons an entity reference can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityRefError {
    #[error("an entity reference needs a '.' between domain and object id")]
    MissingSeparator,
    #[error("invalid domain part (lowercase alphanumerics and single underscores only)")]
    InvalidDomain,
    #[error("invalid object id (lowercase alphanumerics and underscores only)")]
    InvalidObjectId,
}

impl EntityRef {
    /// Build a reference from its two parts, validating both.
    ///
    /// # Errors
    ///
    /// Returns [`EntityRefError`] when either part is empty or contains
    /// characters outside the allowed set.
    pub fn new(
        domain: impl Into<String>,
        object_id: impl Into<String>,
    ) -> Result<Self, EntityRefError> {
        let domain = domain.into();
        let object_id = object_id.into();

        if !is_valid_segment(&domain) || domain.contains("__") {
            return Err(EntityRefError::InvalidDomain);
        }
        if !is_valid_segment(&object_id) {
            return Err(EntityRefError::InvalidObjectId);
        }

        Ok(Self { domain, object_id })
    }

    /// The capability domain (everything before the dot).
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The object id (everything after the dot).
    #[must_use]
    pub fn object_id(&self) -> &str {
        &self.object_id
    }
}

/// Lowercase alphanumerics and underscores, no leading/trailing underscore.
fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with('_')
        && !segment.ends_with('_')
        && segment
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

impl FromStr for EntityRef {
    type Err = EntityRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (domain, object_id) = s.split_once('.').ok_or(EntityRefError::MissingSeparator)?;
        Self::new(domain, object_id)
    }
}

impl TryFrom<String> for EntityRef {
    type Error = EntityRefError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<EntityRef> for String {
    fn from(entity: EntityRef) -> String {
        entity.to_string()
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.domain, self.object_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_valid_reference() {
        let entity: EntityRef = "switch.kitchen".parse().unwrap();
        assert_eq!(entity.domain(), "switch");
        assert_eq!(entity.object_id(), "kitchen");
    }

    #[test]
    fn should_accept_digits_and_underscores() {
        let entity: EntityRef = "light.hall_2".parse().unwrap();
        assert_eq!(entity.object_id(), "hall_2");
    }

    #[test]
    fn should_roundtrip_through_display_and_from_str() {
        let entity: EntityRef = "light.living_room".parse().unwrap();
        let parsed: EntityRef = entity.to_string().parse().unwrap();
        assert_eq!(entity, parsed);
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let entity: EntityRef = "switch.tv".parse().unwrap();
        let json = serde_json::to_string(&entity).unwrap();
        assert_eq!(json, "\"switch.tv\"");
        let parsed: EntityRef = serde_json::from_str(&json).unwrap();
        assert_eq!(entity, parsed);
    }

    #[test]
    fn should_reject_reference_without_separator() {
        let result = "kitchen".parse::<EntityRef>();
        assert_eq!(result, Err(EntityRefError::MissingSeparator));
    }

    #[test]
    fn should_reject_empty_domain() {
        let result = ".kitchen".parse::<EntityRef>();
        assert_eq!(result, Err(EntityRefError::InvalidDomain));
    }

    #[test]
    fn should_reject_empty_object_id() {
        let result = "switch.".parse::<EntityRef>();
        assert_eq!(result, Err(EntityRefError::InvalidObjectId));
    }

    #[test]
    fn should_reject_uppercase_characters() {
        let result = "Switch.kitchen".parse::<EntityRef>();
        assert_eq!(result, Err(EntityRefError::InvalidDomain));
    }

    #[test]
    fn should_reject_double_underscore_in_domain() {
        let result = "my__domain.thing".parse::<EntityRef>();
        assert_eq!(result, Err(EntityRefError::InvalidDomain));
    }

    #[test]
    fn should_reject_leading_underscore_in_object_id() {
        let result = "switch._kitchen".parse::<EntityRef>();
        assert_eq!(result, Err(EntityRefError::InvalidObjectId));
    }

    #[test]
    fn should_order_by_domain_then_object_id() {
        let a: EntityRef = "light.z".parse().unwrap();
        let b: EntityRef = "switch.a".parse().unwrap();
        assert!(a < b);
    }
}
