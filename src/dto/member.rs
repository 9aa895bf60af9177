use serde::Serialize;

use crate::domain::types::{MemberId, TeamId, TeamName, Username};

/// Flat view of a member joined with its team. Team fields are `None` for
/// members without a team. Never persisted.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct MemberTeamDto {
    pub member_id: MemberId,
    pub username: Username,
    pub age: i32,
    pub team_id: Option<TeamId>,
    pub team_name: Option<TeamName>,
}
