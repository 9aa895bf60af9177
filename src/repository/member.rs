//! Repository implementation for members and the member/team search.

use diesel::dsl::{IntoBoxed, LeftJoin, Nullable, Select, count, sql};
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel::sqlite::{Sqlite, SqliteConnection};
use log::debug;

use crate::{
    domain::{
        member::{Member, NewMember},
        types::{MemberId, TypeConstraintError, Username},
    },
    dto::member::MemberTeamDto,
    models::member::{Member as DbMember, MemberTeamRow, NewMember as DbNewMember},
    pagination::{Direction, Page, PageRequest, PaginationStrategy, Sort, SortProperty},
    repository::{
        DieselRepository, MemberReader, MemberSearch, MemberSearchCondition, MemberWriter,
        errors::{RepositoryError, RepositoryResult},
        predicate::{CountFilter, compose, compose_count_filter},
        support::{self, CountPolicy, Window},
    },
    schema::{members, teams},
};

type MemberTeamJoin = LeftJoin<members::table, teams::table>;

type MemberTeamColumns = (
    members::id,
    members::username,
    members::age,
    Nullable<teams::id>,
    Nullable<teams::name>,
);

type MemberColumns = (members::id, members::username, members::age, members::team_id);

type BoxedMemberTeamQuery = IntoBoxed<'static, Select<MemberTeamJoin, MemberTeamColumns>, Sqlite>;

type BoxedMemberQuery = IntoBoxed<'static, Select<MemberTeamJoin, MemberColumns>, Sqlite>;

fn member_team_columns() -> MemberTeamColumns {
    (
        members::id,
        members::username,
        members::age,
        teams::id.nullable(),
        teams::name.nullable(),
    )
}

/// Orders a boxed member/team query by the requested sort, with member id
/// ascending as tie-break.
macro_rules! order_by_sort {
    ($query:expr, $sort:expr) => {{
        let query = $query;
        match $sort {
            None => query.order(members::id.asc()),
            Some(Sort {
                property,
                direction,
            }) => {
                let query = match (property, direction) {
                    (SortProperty::Id, Direction::Asc) => query.order(members::id.asc()),
                    (SortProperty::Id, Direction::Desc) => query.order(members::id.desc()),
                    (SortProperty::Username, Direction::Asc) => {
                        query.order(members::username.asc())
                    }
                    (SortProperty::Username, Direction::Desc) => {
                        query.order(members::username.desc())
                    }
                    (SortProperty::Age, Direction::Asc) => query.order(members::age.asc()),
                    (SortProperty::Age, Direction::Desc) => query.order(members::age.desc()),
                    (SortProperty::TeamName, Direction::Asc) => query.order(teams::name.asc()),
                    (SortProperty::TeamName, Direction::Desc) => {
                        query.order(teams::name.desc())
                    }
                };
                query.then_order_by(members::id.asc())
            }
        }
    }};
}

/// `members LEFT JOIN teams` projected to the flat row, filtered and ordered.
fn member_team_query(condition: &MemberSearchCondition, sort: Option<Sort>) -> BoxedMemberTeamQuery {
    let mut query = members::table
        .left_join(teams::table)
        .select(member_team_columns())
        .into_boxed::<Sqlite>();
    if let Some(filter) = compose(condition) {
        query = query.filter(filter);
    }
    order_by_sort!(query, sort)
}

/// Same join and filter as [`member_team_query`], projected to the member
/// entity. The join stays because the team name may decide which members
/// match.
fn member_query(condition: &MemberSearchCondition, sort: Option<Sort>) -> BoxedMemberQuery {
    let mut query = members::table
        .left_join(teams::table)
        .select(members::all_columns)
        .into_boxed::<Sqlite>();
    if let Some(filter) = compose(condition) {
        query = query.filter(filter);
    }
    order_by_sort!(query, sort)
}

fn into_domain<R, D>(rows: Vec<R>) -> RepositoryResult<Vec<D>>
where
    D: TryFrom<R, Error = TypeConstraintError>,
{
    rows.into_iter()
        .map(|row| D::try_from(row).map_err(RepositoryError::from))
        .collect()
}

fn load_member_team(
    conn: &mut SqliteConnection,
    condition: &MemberSearchCondition,
    sort: Option<Sort>,
    window: Option<Window>,
) -> RepositoryResult<Vec<MemberTeamDto>> {
    let mut query = member_team_query(condition, sort);
    if let Some(window) = window {
        query = query.offset(window.offset).limit(window.limit);
    }
    let rows = query.load::<MemberTeamRow>(conn)?;
    into_domain(rows)
}

/// Loads one slice with the total of the filtered join attached to every
/// row by a `COUNT(*) OVER ()` window.
fn load_member_team_with_total(
    conn: &mut SqliteConnection,
    condition: &MemberSearchCondition,
    sort: Option<Sort>,
    window: Window,
) -> RepositoryResult<Vec<(MemberTeamDto, i64)>> {
    let rows = member_team_query(condition, sort)
        .select((member_team_columns(), sql::<BigInt>("COUNT(*) OVER ()")))
        .offset(window.offset)
        .limit(window.limit)
        .load::<(MemberTeamRow, i64)>(conn)?;

    rows.into_iter()
        .map(|(row, total)| {
            MemberTeamDto::try_from(row)
                .map(|dto| (dto, total))
                .map_err(RepositoryError::from)
        })
        .collect()
}

fn load_members(
    conn: &mut SqliteConnection,
    condition: &MemberSearchCondition,
    sort: Option<Sort>,
    window: Option<Window>,
) -> RepositoryResult<Vec<Member>> {
    let mut query = member_query(condition, sort);
    if let Some(window) = window {
        query = query.offset(window.offset).limit(window.limit);
    }
    let rows = query.load::<DbMember>(conn)?;
    into_domain(rows)
}

/// Number of distinct members matching the condition. The team join is
/// only added when the team name takes part in the filter.
fn count_members(
    conn: &mut SqliteConnection,
    condition: &MemberSearchCondition,
) -> RepositoryResult<i64> {
    let total = match compose_count_filter(condition) {
        CountFilter::Joined(filter) => {
            let mut query = members::table
                .left_join(teams::table)
                .select(count(members::id).aggregate_distinct())
                .into_boxed::<Sqlite>();
            if let Some(filter) = filter {
                query = query.filter(filter);
            }
            query.get_result::<i64>(conn)?
        }
        CountFilter::MemberOnly(filter) => {
            let mut query = members::table.into_boxed::<Sqlite>();
            if let Some(filter) = filter {
                query = query.filter(filter);
            }
            query.count().get_result::<i64>(conn)?
        }
    };
    Ok(total)
}

/// Number of rows of the filtered join, the figure the window function of
/// the single-statement strategy reports.
fn count_joined_rows(
    conn: &mut SqliteConnection,
    condition: &MemberSearchCondition,
) -> RepositoryResult<i64> {
    let mut query = members::table.left_join(teams::table).into_boxed::<Sqlite>();
    if let Some(filter) = compose(condition) {
        query = query.filter(filter);
    }
    Ok(query.count().get_result::<i64>(conn)?)
}

impl MemberWriter for DieselRepository {
    fn save_member(&self, new_member: &NewMember) -> RepositoryResult<Member> {
        let mut conn = self.conn()?;

        let db_new_member: DbNewMember = new_member.into();

        let db_member = diesel::insert_into(members::table)
            .values(&db_new_member)
            .get_result::<DbMember>(&mut conn)?;

        let member = Member::try_from(db_member)?;
        Ok(member)
    }
}

impl MemberReader for DieselRepository {
    fn find_member_by_id(&self, id: MemberId) -> RepositoryResult<Option<Member>> {
        let mut conn = self.conn()?;
        let db_member = members::table
            .find(id.get())
            .first::<DbMember>(&mut conn)
            .optional()?;

        match db_member {
            Some(db_member) => Ok(Some(Member::try_from(db_member)?)),
            None => Ok(None),
        }
    }

    fn find_all_members(&self) -> RepositoryResult<Vec<Member>> {
        let mut conn = self.conn()?;
        let rows = members::table
            .order(members::id.asc())
            .load::<DbMember>(&mut conn)?;
        into_domain(rows)
    }

    fn find_members_by_username(&self, username: &Username) -> RepositoryResult<Vec<Member>> {
        let mut conn = self.conn()?;
        let rows = members::table
            .filter(members::username.eq(username.as_str()))
            .order(members::id.asc())
            .load::<DbMember>(&mut conn)?;
        into_domain(rows)
    }
}

impl MemberSearch for DieselRepository {
    fn search(&self, condition: &MemberSearchCondition) -> RepositoryResult<Vec<MemberTeamDto>> {
        let mut conn = self.conn()?;
        load_member_team(&mut conn, condition, None, None)
    }

    fn search_page(
        &self,
        condition: &MemberSearchCondition,
        request: &PageRequest,
        strategy: PaginationStrategy,
    ) -> RepositoryResult<Page<MemberTeamDto>> {
        debug!(
            "searching members page {} with {strategy}{}",
            request.page,
            if condition.is_unconstrained() {
                " over every member"
            } else {
                ""
            }
        );

        let mut conn = self.conn()?;
        let sort = request.sort;

        match strategy {
            PaginationStrategy::SingleQuery => support::fetch_results(
                &mut conn,
                request,
                |conn, window| load_member_team_with_total(conn, condition, sort, window),
                |conn| count_joined_rows(conn, condition),
            ),
            PaginationStrategy::ExplicitCount => support::apply_pagination(
                &mut conn,
                request,
                CountPolicy::Always,
                |conn, window| load_member_team(conn, condition, sort, Some(window)),
                |conn| count_members(conn, condition),
            ),
            PaginationStrategy::CountSkip => support::apply_pagination(
                &mut conn,
                request,
                CountPolicy::SkipOnShortPage,
                |conn, window| load_member_team(conn, condition, sort, Some(window)),
                |conn| count_members(conn, condition),
            ),
        }
    }

    fn search_members(&self, condition: &MemberSearchCondition) -> RepositoryResult<Vec<Member>> {
        let mut conn = self.conn()?;
        load_members(&mut conn, condition, None, None)
    }

    fn search_member_page(
        &self,
        condition: &MemberSearchCondition,
        request: &PageRequest,
    ) -> RepositoryResult<Page<Member>> {
        let mut conn = self.conn()?;
        let sort = request.sort;

        support::apply_pagination(
            &mut conn,
            request,
            CountPolicy::SkipOnShortPage,
            |conn, window| load_members(conn, condition, sort, Some(window)),
            |conn| count_members(conn, condition),
        )
    }
}
