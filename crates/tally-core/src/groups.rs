//! Group membership rules that touch settlement state.

use std::sync::Arc;

use uuid::Uuid;

use tally_domain::Group;

use crate::error::{CoreError, Result};
use crate::store::LedgerStore;

pub struct GroupService {
    store: Arc<dyn LedgerStore>,
}

impl GroupService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Persists a group. The creator is always a member.
    pub fn create(&self, mut group: Group) -> Result<Group> {
        group.members.insert(group.creator_id);
        self.store.save_group(&group)?;
        Ok(group)
    }

    pub fn add_member(&self, group_id: Uuid, user_id: Uuid) -> Result<Group> {
        let mut group = self.store.group(group_id)?;
        group.members.insert(user_id);
        self.store.save_group(&group)?;
        Ok(group)
    }

    /// Removes a member. The creator cannot be removed, and membership is
    /// frozen while the group has unsettled transactions — dropping a member
    /// would orphan their pending obligations.
    pub fn remove_member(&self, group_id: Uuid, user_id: Uuid) -> Result<Group> {
        let mut group = self.store.group(group_id)?;
        if user_id == group.creator_id {
            return Err(CoreError::InvalidArgument(
                "cannot remove the group creator".into(),
            ));
        }
        if self.has_unsettled_transactions(group_id)? {
            return Err(CoreError::IllegalState(
                "cannot remove a member while the group has unsettled transactions".into(),
            ));
        }
        group.members.remove(&user_id);
        self.store.save_group(&group)?;
        Ok(group)
    }

    pub fn has_unsettled_transactions(&self, group_id: Uuid) -> Result<bool> {
        let unsettled = self
            .store
            .transactions_where(&|t| t.group_id == Some(group_id) && !t.settled)?;
        Ok(!unsettled.is_empty())
    }
}
