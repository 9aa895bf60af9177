use serde::Deserialize;

use crate::domain::member::{Member, NewMember};
use crate::domain::types::{MemberId, TeamId, Username};
use crate::dto::member::MemberTeamDto;
use crate::models::config::PaginationConfig;
use crate::pagination::{Page, PageRequest, PaginationStrategy, Sort};
use crate::repository::{
    MemberReader, MemberSearch, MemberSearchCondition, MemberWriter, TeamReader,
};
use crate::services::{ServiceError, ServiceResult};

/// Page parameters as supplied by a caller; missing parts come from
/// [`PaginationConfig`].
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SearchPageQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort: Option<Sort>,
    pub strategy: Option<PaginationStrategy>,
}

/// Lists every member/team row matching the condition.
pub fn search_members<R>(
    repo: &R,
    condition: &MemberSearchCondition,
) -> ServiceResult<Vec<MemberTeamDto>>
where
    R: MemberSearch + ?Sized,
{
    repo.search(condition).map_err(ServiceError::from)
}

/// Loads one page of matching member/team rows.
///
/// Size is capped at the configured maximum. Invalid values (negative page,
/// non-positive size) are passed through and rejected by the repository.
pub fn search_members_page<R>(
    repo: &R,
    condition: &MemberSearchCondition,
    query: SearchPageQuery,
    settings: &PaginationConfig,
) -> ServiceResult<Page<MemberTeamDto>>
where
    R: MemberSearch + ?Sized,
{
    let size = query
        .size
        .unwrap_or(settings.default_page_size)
        .min(settings.max_page_size);
    let mut request = PageRequest::of(query.page.unwrap_or(0), size);
    if let Some(sort) = query.sort {
        request = request.sorted(sort);
    }
    let strategy = query.strategy.unwrap_or(settings.strategy);

    repo.search_page(condition, &request, strategy)
        .map_err(|err| {
            log::error!("Failed to load member page: {err}");
            ServiceError::from(err)
        })
}

/// Stores a new member after checking the referenced team exists.
pub fn register_member<R>(
    repo: &R,
    username: &str,
    age: i32,
    team_id: Option<i32>,
) -> ServiceResult<Member>
where
    R: MemberWriter + TeamReader + ?Sized,
{
    let username = Username::new(username)?;
    let team_id = team_id.map(TeamId::new).transpose()?;

    if let Some(team_id) = team_id {
        if repo.find_team_by_id(team_id)?.is_none() {
            return Err(ServiceError::InvalidInput(format!(
                "team {team_id} does not exist"
            )));
        }
    }

    repo.save_member(&NewMember::new(username, age, team_id))
        .map_err(ServiceError::from)
}

/// Fetches a member by id.
pub fn find_member<R>(repo: &R, member_id: i32) -> ServiceResult<Option<Member>>
where
    R: MemberReader + ?Sized,
{
    let member_id = MemberId::new(member_id)?;
    repo.find_member_by_id(member_id).map_err(ServiceError::from)
}
