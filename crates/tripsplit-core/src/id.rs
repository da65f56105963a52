//! Identifiers for members and expenses.
//!
//! Ids are opaque strings assigned by the application (UUIDs in practice).
//! They are compared and hashed constantly while folding over a trip's
//! expenses, so they are stored as `Arc<str>`: cloning is a reference count
//! bump and ids read from the same snapshot can share one allocation through
//! a [`StringInterner`].
//!
//! # Example
//!
//! ```
//! use tripsplit_core::id::StringInterner;
//!
//! let mut interner = StringInterner::new();
//!
//! let a1 = interner.intern("alice");
//! let a2 = interner.intern("alice");
//! let b = interner.intern("bob");
//!
//! assert!(a1.ptr_eq(&a2));
//! assert!(!a1.ptr_eq(&b));
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An opaque identifier.
#[derive(Debug, Clone, Eq)]
pub struct Id(Arc<str>);

/// Identifier of a trip member, unique within a trip.
pub type MemberId = Id;

/// Identifier of an expense record.
pub type ExpenseId = Id;

impl Id {
    /// Create an id without deduplication.
    pub fn new(s: impl Into<Arc<str>>) -> Self {
        Self(s.into())
    }

    /// Get the string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if two ids share the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(s))
    }
}

impl PartialEq for Id {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl PartialOrd for Id {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Id {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl std::hash::Hash for Id {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for Id {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&Self> for Id {
    fn from(s: &Self) -> Self {
        s.clone()
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Hands out one shared [`Id`] per distinct string.
///
/// The loader runs every id in a snapshot through one interner, so a member
/// id that appears in hundreds of expenses is stored once.
#[derive(Debug, Default)]
pub struct StringInterner {
    ids: HashSet<Id>,
}

impl StringInterner {
    /// Empty interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared id for `s`, allocating it on first sight.
    pub fn intern(&mut self, s: &str) -> Id {
        match self.ids.get(s) {
            Some(id) => id.clone(),
            None => self.insert(Id::new(s)),
        }
    }

    /// Like [`intern`](Self::intern) but reuses `id`'s allocation when the
    /// string has not been seen yet.
    pub fn reintern(&mut self, id: &Id) -> Id {
        match self.ids.get(id.as_str()) {
            Some(shared) => shared.clone(),
            None => self.insert(id.clone()),
        }
    }

    fn insert(&mut self, id: Id) -> Id {
        self.ids.insert(id.clone());
        id
    }

    /// Whether `s` has been interned.
    pub fn contains(&self, s: &str) -> bool {
        self.ids.contains(s)
    }

    /// Number of distinct ids held.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True before anything is interned.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_equality() {
        let a1 = Id::new("alice");
        let a2 = Id::new("alice");
        let b = Id::new("bob");

        assert_eq!(a1, a2);
        assert_ne!(a1, b);
        assert_eq!(a1, "alice");
    }

    #[test]
    fn test_interner_deduplication() {
        let mut interner = StringInterner::new();

        let a1 = interner.intern("m-1");
        let a2 = interner.intern("m-1");
        let b = interner.intern("m-2");

        assert!(a1.ptr_eq(&a2));
        assert!(!a1.ptr_eq(&b));
        assert!(interner.contains("m-2"));
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_reintern_shares_allocation() {
        let mut interner = StringInterner::new();
        let first = interner.intern("m-1");

        let loose = Id::new("m-1");
        assert!(!loose.ptr_eq(&first));

        let shared = interner.reintern(&loose);
        assert!(shared.ptr_eq(&first));
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn test_roster_lookup_by_str() {
        let roster: std::collections::HashMap<MemberId, &str> =
            [(Id::new("m-1"), "Alice")].into_iter().collect();

        assert_eq!(roster.get("m-1"), Some(&"Alice"));
        assert_eq!(roster.get(&MemberId::from("m-1")), Some(&"Alice"));
        assert!(roster.get("m-2").is_none());
    }

    #[test]
    fn test_id_serde_as_plain_string() {
        let id = Id::new("m-7");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"m-7\"");

        let back: Id = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
