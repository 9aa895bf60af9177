use serde::{Deserialize, Serialize};

use crate::{
    db::{DbConnection, DbPool, get_connection},
    domain::{
        member::{Member, NewMember},
        team::{NewTeam, Team},
        types::{MemberId, TeamId, Username},
    },
    dto::member::MemberTeamDto,
    pagination::{Page, PageRequest, PaginationStrategy},
    repository::errors::RepositoryResult,
};

pub mod errors;
pub mod member;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod predicate;
pub mod support;
pub mod team;

/// Optional search criteria over the member/team view.
///
/// Every field is independently optional. Blank strings count as absent;
/// present strings are matched exactly as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSearchCondition {
    pub username: Option<String>,
    pub team_name: Option<String>,
    /// Inclusive lower bound on age.
    pub age_goe: Option<i32>,
    /// Inclusive upper bound on age.
    pub age_loe: Option<i32>,
}

impl MemberSearchCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into());
        self
    }

    pub fn age_goe(mut self, age: i32) -> Self {
        self.age_goe = Some(age);
        self
    }

    pub fn age_loe(mut self, age: i32) -> Self {
        self.age_loe = Some(age);
        self
    }

    /// Username criterion, if present.
    pub fn username_criterion(&self) -> Option<&str> {
        has_text(self.username.as_deref())
    }

    /// Team name criterion, if present.
    pub fn team_name_criterion(&self) -> Option<&str> {
        has_text(self.team_name.as_deref())
    }

    /// Whether matching rows depends on the team join. Counts may skip the
    /// join when this is false.
    pub fn requires_team_join(&self) -> bool {
        self.team_name_criterion().is_some()
    }

    /// True when no criterion is present, i.e. the condition matches every row.
    pub fn is_unconstrained(&self) -> bool {
        self.username_criterion().is_none()
            && self.team_name_criterion().is_none()
            && self.age_goe.is_none()
            && self.age_loe.is_none()
    }
}

fn has_text(value: Option<&str>) -> Option<&str> {
    value.filter(|s| s.chars().any(|c| !c.is_whitespace()))
}

pub trait MemberReader {
    fn find_member_by_id(&self, id: MemberId) -> RepositoryResult<Option<Member>>;
    fn find_all_members(&self) -> RepositoryResult<Vec<Member>>;
    fn find_members_by_username(&self, username: &Username) -> RepositoryResult<Vec<Member>>;
}

pub trait MemberWriter {
    fn save_member(&self, new_member: &NewMember) -> RepositoryResult<Member>;
}

pub trait TeamReader {
    fn find_team_by_id(&self, id: TeamId) -> RepositoryResult<Option<Team>>;
}

pub trait TeamWriter {
    fn save_team(&self, new_team: &NewTeam) -> RepositoryResult<Team>;
}

pub trait MemberSearch {
    /// All rows of the member/team view matching the condition, by member id.
    fn search(&self, condition: &MemberSearchCondition) -> RepositoryResult<Vec<MemberTeamDto>>;

    /// One page of the member/team view; `strategy` decides how the total is
    /// determined.
    fn search_page(
        &self,
        condition: &MemberSearchCondition,
        request: &PageRequest,
        strategy: PaginationStrategy,
    ) -> RepositoryResult<Page<MemberTeamDto>>;

    /// Matching members as full entities.
    fn search_members(&self, condition: &MemberSearchCondition) -> RepositoryResult<Vec<Member>>;

    /// One page of matching members as full entities.
    fn search_member_page(
        &self,
        condition: &MemberSearchCondition,
        request: &PageRequest,
    ) -> RepositoryResult<Page<Member>>;
}

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Checks out the connection used for one operation.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_are_absent() {
        let condition = MemberSearchCondition::new().username("   ").team_name("");
        assert_eq!(condition.username_criterion(), None);
        assert_eq!(condition.team_name_criterion(), None);
        assert!(condition.is_unconstrained());
        assert!(!condition.requires_team_join());
    }

    #[test]
    fn present_strings_are_kept_verbatim() {
        let condition = MemberSearchCondition::new().username(" member1");
        assert_eq!(condition.username_criterion(), Some(" member1"));
    }

    #[test]
    fn team_name_requires_join() {
        let condition = MemberSearchCondition::new().team_name("teamA").age_goe(20);
        assert!(condition.requires_team_join());
        assert!(!condition.is_unconstrained());
    }

    #[test]
    fn numeric_criteria_count_even_when_zero() {
        let condition = MemberSearchCondition::new().age_loe(0);
        assert!(!condition.is_unconstrained());
    }
}
