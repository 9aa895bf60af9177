use serde::{Deserialize, Serialize};

use crate::domain::types::{MemberId, TeamId, Username};

/// A member as stored. The team reference is optional; members without a
/// team are valid.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub username: Username,
    pub age: i32,
    pub team_id: Option<TeamId>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewMember {
    pub username: Username,
    pub age: i32,
    pub team_id: Option<TeamId>,
}

impl NewMember {
    #[must_use]
    pub fn new(username: Username, age: i32, team_id: Option<TeamId>) -> Self {
        Self {
            username,
            age,
            team_id,
        }
    }
}
