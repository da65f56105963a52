//! Trip members.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::id::MemberId;

/// A person taking part in a trip.
///
/// # Examples
///
/// ```
/// use tripsplit_core::Member;
///
/// let alice = Member::new("m-1", "Alice");
/// assert_eq!(alice.id, "m-1");
/// assert_eq!(alice.to_string(), "Alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Unique within the trip.
    pub id: MemberId,
    /// Display name.
    pub name: String,
    /// Account this member is linked to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Member {
    /// Create a member that is not linked to an account.
    #[must_use]
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            user_id: None,
        }
    }

    /// Link this member to an account.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// A lightweight `{ id, name }` copy used inside computed artifacts.
    #[must_use]
    pub fn to_ref(&self) -> MemberRef {
        MemberRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The `{ id, name }` pair carried by a [`crate::Debt`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberRef {
    /// Member id.
    pub id: MemberId,
    /// Member display name at the time of computation.
    pub name: String,
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Find a member by id.
#[must_use]
pub fn find_member<'a>(members: &'a [Member], id: &str) -> Option<&'a Member> {
    members.iter().find(|m| m.id == id)
}
