//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::member::{Member, NewMember};
use crate::domain::team::{NewTeam, Team};
use crate::domain::types::{MemberId, TeamId, Username};
use crate::dto::member::MemberTeamDto;
use crate::pagination::{Page, PageRequest, PaginationStrategy};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    MemberReader, MemberSearch, MemberSearchCondition, MemberWriter, TeamReader, TeamWriter,
};

mock! {
    pub Repository {}

    impl MemberReader for Repository {
        fn find_member_by_id(&self, id: MemberId) -> RepositoryResult<Option<Member>>;
        fn find_all_members(&self) -> RepositoryResult<Vec<Member>>;
        fn find_members_by_username(&self, username: &Username) -> RepositoryResult<Vec<Member>>;
    }

    impl MemberWriter for Repository {
        fn save_member(&self, new_member: &NewMember) -> RepositoryResult<Member>;
    }

    impl TeamReader for Repository {
        fn find_team_by_id(&self, id: TeamId) -> RepositoryResult<Option<Team>>;
    }

    impl TeamWriter for Repository {
        fn save_team(&self, new_team: &NewTeam) -> RepositoryResult<Team>;
    }

    impl MemberSearch for Repository {
        fn search(&self, condition: &MemberSearchCondition) -> RepositoryResult<Vec<MemberTeamDto>>;
        fn search_page(
            &self,
            condition: &MemberSearchCondition,
            request: &PageRequest,
            strategy: PaginationStrategy,
        ) -> RepositoryResult<Page<MemberTeamDto>>;
        fn search_members(&self, condition: &MemberSearchCondition) -> RepositoryResult<Vec<Member>>;
        fn search_member_page(
            &self,
            condition: &MemberSearchCondition,
            request: &PageRequest,
        ) -> RepositoryResult<Page<Member>>;
    }
}
