//! Expense-sharing groups.
//!
//! The settlement engine consumes a group purely as a participant list; the
//! membership rules live in the core's group service.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Identifiable;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub creator_id: Uuid,
    /// Ordered so split iteration is deterministic.
    pub members: BTreeSet<Uuid>,
}

impl Group {
    /// Creates a group; the creator is always a member.
    pub fn new(name: impl Into<String>, creator_id: Uuid) -> Self {
        let mut members = BTreeSet::new();
        members.insert(creator_id);
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            creator_id,
            members,
        }
    }

    pub fn with_members(mut self, members: impl IntoIterator<Item = Uuid>) -> Self {
        self.members.extend(members);
        self
    }
}

impl Identifiable for Group {
    fn id(&self) -> Uuid {
        self.id
    }
}
