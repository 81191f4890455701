//! Grade-tracking rows touched by a student's group transfer.

use crate::ids::GroupId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Whether moving a student from `previous` to `next` requires
/// re-synchronising grade sums and journal logs. Clearing the group or
/// re-saving the same group does not.
pub fn needs_group_transfer(previous: Option<GroupId>, next: Option<GroupId>) -> bool {
    next.is_some() && next != previous
}

/// Rows removed and created by one group transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GroupTransferSummary {
    pub grade_sums_removed: u64,
    pub grade_sums_created: u64,
    pub journal_logs_removed: u64,
    pub journal_logs_created: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_on_new_group() {
        assert!(needs_group_transfer(None, Some(GroupId::new(1))));
        assert!(needs_group_transfer(Some(GroupId::new(1)), Some(GroupId::new(2))));
    }

    #[test]
    fn test_no_transfer_on_same_group() {
        assert!(!needs_group_transfer(Some(GroupId::new(1)), Some(GroupId::new(1))));
    }

    #[test]
    fn test_no_transfer_when_cleared() {
        assert!(!needs_group_transfer(Some(GroupId::new(1)), None));
        assert!(!needs_group_transfer(None, None));
    }
}
