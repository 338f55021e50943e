//! Identifier types.
//!
//! Action components are tracked by a stable identifier rather than by
//! reference identity, so a component rebuilt from the same metadata on a
//! later render still compares equal to the one that started executing.

use serde::{Deserialize, Serialize};
use uuid::{uuid, Uuid};

/// Namespace UUID for deterministic UUID v5 generation.
const ACTGATE_NAMESPACE: Uuid = uuid!("6f1c2a7e-43d8-4b8e-9a51-0d6c6f3e8b27");

/// Identifier for one invocable component of an action.
///
/// Derived from the action URL and the component's position in the
/// action's component list using UUID v5:
///
/// - Same action URL and index always produce the same id
/// - Components of different actions never collide
///
/// # Example
///
/// ```
/// use actgate_types::ComponentId;
///
/// let first = ComponentId::derive("https://x.test/api/swap", 0);
/// let second = ComponentId::derive("https://x.test/api/swap", 1);
/// assert_ne!(first, second);
/// assert_eq!(first.index(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentId {
    uuid: Uuid,
    index: usize,
}

impl ComponentId {
    /// Derives the id of the `index`-th component of the action at `action_url`.
    #[must_use]
    pub fn derive(action_url: &str, index: usize) -> Self {
        let name = format!("{action_url}#{index}");
        Self {
            uuid: Uuid::new_v5(&ACTGATE_NAMESPACE, name.as_bytes()),
            index,
        }
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Returns the component's position within its action.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cmp:{}#{}", self.uuid, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        let a = ComponentId::derive("https://x.test/api/donate", 2);
        let b = ComponentId::derive("https://x.test/api/donate", 2);
        assert_eq!(a, b);
        assert_eq!(a.uuid(), b.uuid());
    }

    #[test]
    fn different_actions_do_not_collide() {
        let a = ComponentId::derive("https://x.test/api/donate", 0);
        let b = ComponentId::derive("https://y.test/api/donate", 0);
        assert_ne!(a, b);
        assert_eq!(a.index(), b.index());
    }

    #[test]
    fn display_contains_uuid_and_index() {
        let id = ComponentId::derive("https://x.test/api", 3);
        let shown = id.to_string();
        assert!(shown.starts_with("cmp:"));
        assert!(shown.contains(&id.uuid().to_string()));
        assert!(shown.ends_with("#3"));
    }

    #[test]
    fn serde_roundtrip_preserves_identity() {
        let id = ComponentId::derive("https://x.test/api", 1);
        let json = serde_json::to_string(&id).unwrap();
        let back: ComponentId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
